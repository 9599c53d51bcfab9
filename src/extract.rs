//! Action dispatch over a parsed feed.
//!
//! Extraction is total: any tree yields an envelope, with absent or malformed fields
//! falling back to `0`/`""`.

use tracing::debug;

use crate::document::{attr_of, text_of, SourceNode};
use crate::mapping::{build_record, RecordMode, VideoFields};
use crate::naming::{TableTransliterator, Transliterator};
use crate::types::{CategoryRecord, Envelope, Page, Pagination, Record};

/// Response shape requested through the `ac` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    VideoList,
    List,
    Detail,
}

impl Action {
    pub fn parse(ac: &str) -> Option<Self> {
        match ac {
            "videolist" => Some(Self::VideoList),
            "list" => Some(Self::List),
            "detail" => Some(Self::Detail),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::VideoList => "videolist",
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

/// Where a video plays from, and the playlist of its first play entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaySource {
    pub from: String,
    pub url: String,
}

/// A `<dt>` sibling names the source when present; otherwise the `flag` of the first
/// `<dd>` in the first `<dl>` does. The url always comes from that first `<dd>`.
pub fn resolve_play_source<N: SourceNode>(video: N) -> PlaySource {
    let entry = video
        .child_named("dl")
        .and_then(|group| group.child_named("dd"));
    let from = match video.child_named("dt") {
        Some(label) => label.text_value(),
        None => attr_of(entry, "flag"),
    };
    PlaySource { from, url: text_of(entry) }
}

/// Leading-digits integer parse: `" 12abc"` is 12, anything without digits is 0.
pub fn parse_int(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn pagination_of<N: SourceNode>(list: Option<N>) -> Pagination {
    Pagination {
        page: Page::Text(non_empty_or(attr_of(list, "page"), "1")),
        pagecount: parse_int(&attr_of(list, "pagecount")),
        limit: non_empty_or(attr_of(list, "pagesize"), "20"),
        total: parse_int(&attr_of(list, "recordcount")),
    }
}

fn category_of<N: SourceNode>(ty: N) -> CategoryRecord {
    CategoryRecord {
        type_id: parse_int(&ty.attr("id")),
        type_pid: 0,
        type_name: ty.text_value(),
    }
}

/// Maps a parsed feed to the downstream envelope.
pub struct Mapper {
    naming: Box<dyn Transliterator>,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(Box::new(TableTransliterator::default()))
    }
}

impl Mapper {
    pub fn new(naming: Box<dyn Transliterator>) -> Self {
        Self { naming }
    }

    /// Builds the envelope for `ac`. `now` is stamped into every `vod_time_add`.
    pub fn map<N: SourceNode>(&self, root: N, ac: &str, now: i64) -> Envelope {
        let Some(action) = Action::parse(ac) else {
            debug!(ac, "unrecognized action");
            return Envelope::invalid_request();
        };
        debug!(action = action.as_str(), "mapping feed");
        let list = root.child_named("list");
        match action {
            Action::VideoList => {
                Envelope::listing(pagination_of(list), self.records(list, RecordMode::Full, now))
            }
            Action::List => {
                let categories: Vec<CategoryRecord> = root
                    .child_named("class")
                    .map(|class| class.children_named("ty").into_iter().map(category_of).collect())
                    .unwrap_or_default();
                Envelope::listing(pagination_of(list), self.records(list, RecordMode::Brief, now))
                    .with_categories(categories)
            }
            Action::Detail => {
                Envelope::listing(Pagination::single(), self.records(list, RecordMode::Detail, now))
            }
        }
    }

    fn records<N: SourceNode>(&self, list: Option<N>, mode: RecordMode, now: i64) -> Vec<Record> {
        list.map(|l| l.children_named("video"))
            .unwrap_or_default()
            .into_iter()
            .map(|video| build_record(VideoFields::extract(video), mode, self.naming.as_ref(), now))
            .collect()
    }
}
