use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ExportError;
use crate::model::{Channel, Comment, Id, Thread, User, Workspace};

/// Everything scraped during one run. Populated in traversal order and
/// written to disk once at the end.
#[derive(Debug, Serialize)]
pub struct Archive {
    pub workspace: Workspace,
    pub channels: Vec<Channel>,
    /// Channel id -> threads in fetch order.
    pub threads: BTreeMap<Id, Vec<Thread>>,
    /// Thread id -> comments in fetch order.
    pub comments: BTreeMap<Id, Vec<Comment>>,
    pub users: BTreeMap<Id, User>,
}

impl Archive {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            channels: Vec::new(),
            threads: BTreeMap::new(),
            comments: BTreeMap::new(),
            users: BTreeMap::new(),
        }
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn push_channel(&mut self, channel: Channel) {
        self.threads.entry(channel.id).or_default();
        self.channels.push(channel);
    }

    pub fn push_thread(&mut self, channel_id: Id, thread: Thread) {
        self.comments.entry(thread.id).or_default();
        self.threads.entry(channel_id).or_default().push(thread);
    }

    pub fn push_comment(&mut self, thread_id: Id, comment: Comment) {
        self.comments.entry(thread_id).or_default().push(comment);
    }

    pub fn user_name(&self, id: Id) -> Result<&str, ExportError> {
        self.users
            .get(&id)
            .map(|u| u.name.as_str())
            .ok_or(ExportError::UnknownAuthor(id))
    }

    pub fn file_name(&self) -> String {
        archive_file_name(&self.workspace.name)
    }

    /// Writes the archive as pretty JSON into `out_dir`, returning the path.
    pub fn write_json(&self, out_dir: &Path) -> Result<PathBuf, ExportError> {
        let path = out_dir.join(self.file_name());
        write_pretty_json(&path, self)?;
        Ok(path)
    }
}

fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| ExportError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|e| ExportError::io(format!("write {}", path.display()), e))
}

/// `archive_<alphanumerics of the workspace name>.json`
pub fn archive_file_name(workspace_name: &str) -> String {
    let clean: String = workspace_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    format!("archive_{clean}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn workspace(name: &str) -> Workspace {
        Workspace {
            id: 1,
            name: name.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn archive_name_strips_punctuation() {
        assert_eq!(archive_file_name("Acme, Inc!"), "archive_AcmeInc.json");
        assert_eq!(archive_file_name("  R&D 2024 "), "archive_RD2024.json");
        assert_eq!(archive_file_name("Café"), "archive_Café.json");
    }

    #[test]
    fn unknown_author_is_an_error() {
        let mut archive = Archive::new(workspace("w"));
        archive.insert_user(User {
            id: 10,
            name: "Ada".to_string(),
            extra: Map::new(),
        });
        assert_eq!(archive.user_name(10).unwrap(), "Ada");
        assert!(matches!(
            archive.user_name(11),
            Err(ExportError::UnknownAuthor(11))
        ));
    }

    #[test]
    fn encode_failure_is_not_reported_as_io() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("archive.json");
        let not_json: BTreeMap<Vec<u8>, u8> = BTreeMap::from([(vec![1, 2], 3)]);

        match write_pretty_json(&path, &not_json) {
            Err(ExportError::Encode { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn serializes_parent_keyed_maps() {
        let mut archive = Archive::new(workspace("w"));
        let channel: Channel =
            serde_json::from_value(json!({"id": 5, "name": "general"})).unwrap();
        archive.push_channel(channel);
        let thread: Thread = serde_json::from_value(json!({
            "id": 9, "channel_id": 5, "title": "t", "creator": 1, "posted_ts": 100,
            "content": "hi", "attachments": [], "pinned": false
        }))
        .unwrap();
        archive.push_thread(5, thread);

        let v = serde_json::to_value(&archive).unwrap();
        assert_eq!(v["channels"][0]["name"], "general");
        assert_eq!(v["threads"]["5"][0]["id"], 9);
        assert_eq!(v["threads"]["5"][0]["pinned"], false);
        assert_eq!(v["comments"]["9"], json!([]));
    }
}
