use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Id = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Id,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: Id,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Id>,
    pub title: String,
    pub creator: Id,
    pub posted_ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<Id>,
    pub creator: Id,
    pub posted_ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attachment {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.file_name,
        }
    }
}

/// Fields shared by a thread's opening post and its comments. Optional keys
/// stay `None` when the API left them out so the archive round-trips exactly.
pub trait Post {
    fn creator(&self) -> Id;
    fn posted_ts(&self) -> i64;
    fn content(&self) -> &str;
    fn attachments(&self) -> &[Attachment];
}

impl Post for Thread {
    fn creator(&self) -> Id {
        self.creator
    }
    fn posted_ts(&self) -> i64 {
        self.posted_ts
    }
    fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
    fn attachments(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or_default()
    }
}

impl Post for Comment {
    fn creator(&self) -> Id {
        self.creator
    }
    fn posted_ts(&self) -> i64 {
        self.posted_ts
    }
    fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
    fn attachments(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_records_serialize_without_invented_keys() {
        let raw = json!({
            "id": 1, "title": "t", "creator": 1, "posted_ts": 1,
            "attachments": [{"file_name": "a", "url": "u"}]
        });
        let thread: Thread = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(thread.content(), "");
        assert_eq!(thread.attachments().len(), 1);
        assert_eq!(serde_json::to_value(&thread).unwrap(), raw);

        let raw = json!({"id": 2, "creator": 1, "posted_ts": 1});
        let comment: Comment = serde_json::from_value(raw.clone()).unwrap();
        assert!(comment.attachments().is_empty());
        assert_eq!(serde_json::to_value(&comment).unwrap(), raw);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let raw = json!({
            "id": 3, "thread_id": 9, "creator": 1, "posted_ts": 5, "content": "hi",
            "attachments": [], "reactions": {"+1": [1, 2]}, "system_message": null
        });
        let comment: Comment = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(comment.content(), "hi");
        assert_eq!(serde_json::to_value(&comment).unwrap(), raw);
    }
}
