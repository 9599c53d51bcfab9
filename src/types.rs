use serde::Serialize;

use crate::error::BridgeError;

pub const MSG_LISTING: &str = "data list";
pub const MSG_INVALID_REQUEST: &str = "invalid request";

/// Envelope returned for every inbound request, success or not.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub code: i32,
    pub msg: String,
    #[serde(flatten)]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<Record>>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRecord>>,
}

impl Envelope {
    pub fn listing(pagination: Pagination, list: Vec<Record>) -> Self {
        Self {
            code: 1,
            msg: MSG_LISTING.to_string(),
            pagination: Some(pagination),
            list: Some(list),
            categories: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<CategoryRecord>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn invalid_request() -> Self {
        Self::message(0, MSG_INVALID_REQUEST)
    }

    pub fn from_error(err: &BridgeError) -> Self {
        Self::message(err.code(), err.to_string())
    }

    fn message(code: i32, msg: impl Into<String>) -> Self {
        Self { code, msg: msg.into(), pagination: None, list: None, categories: None }
    }
}

/// `page` is a string echoed from the source, except for detail responses which report `1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Page {
    Text(String),
    Number(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: Page,
    pub pagecount: i64,
    pub limit: String,
    pub total: i64,
}

impl Pagination {
    /// Fixed pagination reported by `detail`.
    pub fn single() -> Self {
        Self { page: Page::Number(1), pagecount: 1, limit: "20".to_string(), total: 1 }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Record {
    Full(Box<VideoRecord>),
    Brief(VideoBrief),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub type_id: i64,
    pub type_pid: i64,
    pub type_name: String,
}

/// Reduced record used by the `list` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoBrief {
    pub vod_id: i64,
    pub vod_name: String,
    pub type_id: i64,
    pub type_name: String,
    pub vod_en: String,
    pub vod_time: String,
    pub vod_remarks: String,
    pub vod_play_from: String,
}

/// Full downstream record. Field order is the serialized order.
///
/// Most fields have no source counterpart and keep the values from [`Default`], which are
/// part of the downstream contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecord {
    pub vod_id: i64,
    pub type_id: i64,
    pub type_id_1: i64,
    pub group_id: i64,
    pub vod_name: String,
    pub vod_sub: String,
    pub vod_en: String,
    pub vod_status: i64,
    pub vod_letter: String,
    pub vod_color: String,
    pub vod_tag: String,
    pub vod_class: String,
    pub vod_pic: String,
    pub vod_pic_thumb: String,
    pub vod_pic_slide: String,
    pub vod_pic_screenshot: String,
    pub vod_actor: String,
    pub vod_director: String,
    pub vod_writer: String,
    pub vod_behind: String,
    pub vod_blurb: String,
    pub vod_remarks: String,
    pub vod_pubdate: String,
    pub vod_total: i64,
    pub vod_serial: String,
    pub vod_tv: String,
    pub vod_weekday: String,
    pub vod_area: String,
    pub vod_lang: String,
    pub vod_year: String,
    pub vod_version: String,
    pub vod_state: String,
    pub vod_author: String,
    pub vod_jumpurl: String,
    pub vod_tpl: String,
    pub vod_tpl_play: String,
    pub vod_tpl_down: String,
    pub vod_isend: i64,
    pub vod_lock: i64,
    pub vod_level: i64,
    pub vod_copyright: i64,
    pub vod_points: i64,
    pub vod_points_play: i64,
    pub vod_points_down: i64,
    pub vod_hits: i64,
    pub vod_hits_day: i64,
    pub vod_hits_week: i64,
    pub vod_hits_month: i64,
    pub vod_duration: String,
    pub vod_up: i64,
    pub vod_down: i64,
    pub vod_score: String,
    pub vod_score_all: i64,
    pub vod_score_num: i64,
    pub vod_time: String,
    pub vod_time_add: i64,
    pub vod_time_hits: i64,
    pub vod_time_make: i64,
    pub vod_trysee: i64,
    pub vod_douban_id: i64,
    pub vod_douban_score: String,
    pub vod_reurl: String,
    pub vod_rel_vod: String,
    pub vod_rel_art: String,
    pub vod_pwd: String,
    pub vod_pwd_url: String,
    pub vod_pwd_play: String,
    pub vod_pwd_play_url: String,
    pub vod_pwd_down: String,
    pub vod_pwd_down_url: String,
    pub vod_content: String,
    pub vod_play_from: String,
    pub vod_play_server: String,
    pub vod_play_note: String,
    pub vod_play_url: String,
    pub vod_down_from: String,
    pub vod_down_server: String,
    pub vod_down_note: String,
    pub vod_down_url: String,
    pub vod_plot: i64,
    pub vod_plot_name: String,
    pub vod_plot_detail: String,
    pub type_name: String,
}

impl Default for VideoRecord {
    fn default() -> Self {
        Self {
            vod_id: 0,
            type_id: 0,
            type_id_1: 2,
            group_id: 0,
            vod_name: String::new(),
            vod_sub: String::new(),
            vod_en: String::new(),
            vod_status: 1,
            vod_letter: String::new(),
            vod_color: String::new(),
            vod_tag: String::new(),
            vod_class: String::new(),
            vod_pic: String::new(),
            vod_pic_thumb: String::new(),
            vod_pic_slide: String::new(),
            vod_pic_screenshot: String::new(),
            vod_actor: String::new(),
            vod_director: String::new(),
            vod_writer: String::new(),
            vod_behind: String::new(),
            vod_blurb: String::new(),
            vod_remarks: String::new(),
            vod_pubdate: String::new(),
            vod_total: 0,
            vod_serial: "0".to_string(),
            vod_tv: String::new(),
            vod_weekday: String::new(),
            vod_area: String::new(),
            vod_lang: String::new(),
            vod_year: String::new(),
            vod_version: String::new(),
            vod_state: String::new(),
            vod_author: String::new(),
            vod_jumpurl: String::new(),
            vod_tpl: String::new(),
            vod_tpl_play: String::new(),
            vod_tpl_down: String::new(),
            vod_isend: 0,
            vod_lock: 0,
            vod_level: 0,
            vod_copyright: 0,
            vod_points: 0,
            vod_points_play: 0,
            vod_points_down: 0,
            // placeholder popularity figures expected by downstream clients
            vod_hits: 581,
            vod_hits_day: 939,
            vod_hits_week: 83,
            vod_hits_month: 137,
            vod_duration: String::new(),
            vod_up: 512,
            vod_down: 838,
            vod_score: "6.0".to_string(),
            vod_score_all: 7280,
            vod_score_num: 728,
            vod_time: String::new(),
            vod_time_add: 0,
            vod_time_hits: 0,
            vod_time_make: 0,
            vod_trysee: 0,
            vod_douban_id: 36427183,
            vod_douban_score: "0.0".to_string(),
            vod_reurl: String::new(),
            vod_rel_vod: String::new(),
            vod_rel_art: String::new(),
            vod_pwd: String::new(),
            vod_pwd_url: String::new(),
            vod_pwd_play: String::new(),
            vod_pwd_play_url: String::new(),
            vod_pwd_down: String::new(),
            vod_pwd_down_url: String::new(),
            vod_content: String::new(),
            vod_play_from: String::new(),
            vod_play_server: String::new(),
            vod_play_note: String::new(),
            vod_play_url: String::new(),
            vod_down_from: String::new(),
            vod_down_server: String::new(),
            vod_down_note: String::new(),
            vod_down_url: String::new(),
            vod_plot: 0,
            vod_plot_name: String::new(),
            vod_plot_detail: String::new(),
            type_name: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_request_has_no_listing_keys() {
        let out = serde_json::to_string(&Envelope::invalid_request()).unwrap();
        assert_eq!(out, r#"{"code":0,"msg":"invalid request"}"#);
    }

    #[test]
    fn error_envelope_is_code_and_msg_only() {
        let v = serde_json::to_value(Envelope::from_error(&BridgeError::EmptyResponse)).unwrap();
        assert_eq!(v, json!({"code": -1, "msg": "Empty response from API"}));
    }

    #[test]
    fn listing_flattens_pagination() {
        let p = Pagination { page: Page::Text("3".into()), pagecount: 7, limit: "20".into(), total: 140 };
        let v = serde_json::to_value(Envelope::listing(p, Vec::new())).unwrap();
        assert_eq!(
            v,
            json!({"code": 1, "msg": "data list", "page": "3", "pagecount": 7, "limit": "20", "total": 140, "list": []})
        );
        let v = serde_json::to_value(Envelope::listing(Pagination::single(), Vec::new())).unwrap();
        assert_eq!(v["page"], json!(1));
    }

    #[test]
    fn default_record_carries_contract_constants() {
        let v = serde_json::to_value(VideoRecord::default()).unwrap();
        assert_eq!(v["type_id_1"], json!(2));
        assert_eq!(v["vod_hits"], json!(581));
        assert_eq!(v["vod_douban_id"], json!(36427183));
        assert_eq!(v["vod_score"], json!("6.0"));
        assert_eq!(v["vod_serial"], json!("0"));
        assert_eq!(v.as_object().unwrap().len(), 83);
    }

    #[test]
    fn record_serializes_in_declared_order() {
        let out = serde_json::to_string(&VideoRecord::default()).unwrap();
        assert!(out.starts_with(r#"{"vod_id":0,"type_id":0,"type_id_1":2,"group_id":0,"vod_name":"#));
        assert!(out.ends_with(r#""vod_plot_detail":"","type_name":""}"#));
    }
}
