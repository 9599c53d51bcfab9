use crate::document::{text_of, SourceNode};
use crate::extract::{parse_int, resolve_play_source, PlaySource};
use crate::naming::{bucket_letter, Transliterator};
use crate::types::{Record, VideoBrief, VideoRecord};

/// Shape of the record built for one `<video>` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Every field, `vod_sub` filled from the description.
    Full,
    /// Every field, `vod_sub` left empty.
    Detail,
    /// The eight-field summary used by `list`.
    Brief,
}

/// Values read from one `<video>` node. Missing tags read as empty strings, `id`/`tid` as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFields {
    pub id: i64,
    pub tid: i64,
    pub name: String,
    pub type_name: String,
    pub des: String,
    pub pic: String,
    pub actor: String,
    pub director: String,
    pub note: String,
    pub year: String,
    pub area: String,
    pub lang: String,
    pub state: String,
    pub last: String,
    /// Text of the `<dt>` label alone; the reduced record reports only this.
    pub label: String,
    pub play: PlaySource,
}

impl VideoFields {
    pub fn extract<N: SourceNode>(video: N) -> Self {
        let text = |tag: &str| text_of(video.child_named(tag));
        Self {
            id: parse_int(&text("id")),
            tid: parse_int(&text("tid")),
            name: text("name"),
            type_name: text("type"),
            des: text("des"),
            pic: text("pic"),
            actor: text("actor"),
            director: text("director"),
            note: text("note"),
            year: text("year"),
            area: text("area"),
            lang: text("lang"),
            state: text("state"),
            last: text("last"),
            label: text("dt"),
            play: resolve_play_source(video),
        }
    }
}

pub fn build_record(
    fields: VideoFields,
    mode: RecordMode,
    naming: &dyn Transliterator,
    now: i64,
) -> Record {
    let vod_en = naming.transliterate(&fields.name);
    if mode == RecordMode::Brief {
        return Record::Brief(VideoBrief {
            vod_id: fields.id,
            vod_name: fields.name,
            type_id: fields.tid,
            type_name: fields.type_name,
            vod_en,
            vod_time: fields.last,
            vod_remarks: fields.note,
            vod_play_from: fields.label,
        });
    }

    let vod_sub = match mode {
        RecordMode::Detail => String::new(),
        _ => fields.des.clone(),
    };
    Record::Full(Box::new(VideoRecord {
        vod_id: fields.id,
        type_id: fields.tid,
        vod_letter: bucket_letter(&fields.name).to_string(),
        vod_name: fields.name,
        vod_sub,
        vod_en,
        vod_pic: fields.pic,
        vod_actor: fields.actor,
        vod_director: fields.director,
        vod_blurb: fields.des.clone(),
        vod_remarks: fields.note,
        vod_pubdate: fields.year.clone(),
        vod_area: fields.area,
        vod_lang: fields.lang,
        vod_year: fields.year,
        vod_state: fields.state,
        vod_time: fields.last,
        vod_time_add: now,
        vod_content: fields.des,
        vod_play_from: fields.play.from,
        vod_play_url: fields.play.url,
        type_name: fields.type_name,
        ..VideoRecord::default()
    }))
}
