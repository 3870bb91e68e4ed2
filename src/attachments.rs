use std::collections::HashMap;
use std::path::{Path, PathBuf};

use maud::{DOCTYPE, Markup, html};

use crate::error::ExportError;
use crate::model::{Attachment, Channel, Comment, Id, Thread};

pub const INDEX_FILE_NAME: &str = "attachments.html";

/// One attachment together with the post it was found on.
#[derive(Debug, Clone)]
pub struct AttachmentEntry {
    pub channel_id: Id,
    pub channel_name: String,
    pub thread_id: Id,
    pub thread_title: String,
    /// `None` when the attachment belongs to the thread's opening post.
    pub comment_id: Option<Id>,
    pub attachment: Attachment,
}

impl AttachmentEntry {
    pub fn new(
        channel: &Channel,
        thread: &Thread,
        comment: Option<&Comment>,
        attachment: &Attachment,
    ) -> Self {
        Self {
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            thread_id: thread.id,
            thread_title: thread.title.clone(),
            comment_id: comment.map(|c| c.id),
            attachment: attachment.clone(),
        }
    }

    fn post_label(&self) -> String {
        match self.comment_id {
            Some(id) => format!("comment {id}"),
            None => "thread".to_string(),
        }
    }
}

/// Attachments in the order they were met during the crawl.
#[derive(Debug, Default)]
pub struct AttachmentIndex {
    download_requested: bool,
    entries: Vec<AttachmentEntry>,
}

impl AttachmentIndex {
    pub fn new(download_requested: bool) -> Self {
        Self {
            download_requested,
            entries: Vec::new(),
        }
    }

    /// Records an attachment for the link index. Fails if the configuration
    /// asked for the files themselves, which this tool never fetches.
    pub fn record(&mut self, entry: AttachmentEntry) -> Result<(), ExportError> {
        if self.download_requested {
            return Err(ExportError::UnsupportedDownload);
        }
        tracing::debug!(
            channel = %entry.channel_name,
            thread = %entry.thread_title,
            file = %entry.attachment.file_name,
            "recorded attachment"
        );
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        render_index(&group(&self.entries)).into_string()
    }

    pub fn write_html(&self, out_dir: &Path) -> Result<PathBuf, ExportError> {
        let path = out_dir.join(INDEX_FILE_NAME);
        std::fs::write(&path, self.render())
            .map_err(|e| ExportError::io(format!("write {}", path.display()), e))?;
        Ok(path)
    }
}

struct ChannelGroup<'a> {
    name: &'a str,
    threads: Vec<ThreadGroup<'a>>,
}

struct ThreadGroup<'a> {
    title: &'a str,
    entries: Vec<&'a AttachmentEntry>,
}

/// Groups by channel then thread id, both in first-seen order.
fn group(entries: &[AttachmentEntry]) -> Vec<ChannelGroup<'_>> {
    let mut channels: Vec<ChannelGroup<'_>> = Vec::new();
    let mut channel_slots: HashMap<Id, usize> = HashMap::new();
    let mut thread_slots: HashMap<(Id, Id), usize> = HashMap::new();

    for entry in entries {
        let ci = *channel_slots.entry(entry.channel_id).or_insert_with(|| {
            channels.push(ChannelGroup {
                name: &entry.channel_name,
                threads: Vec::new(),
            });
            channels.len() - 1
        });
        let threads = &mut channels[ci].threads;
        let ti = *thread_slots
            .entry((entry.channel_id, entry.thread_id))
            .or_insert_with(|| {
                threads.push(ThreadGroup {
                    title: &entry.thread_title,
                    entries: Vec::new(),
                });
                threads.len() - 1
            });
        threads[ti].entries.push(entry);
    }
    channels
}

fn render_index(channels: &[ChannelGroup<'_>]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Attachments" }
            }
            body {
                @for channel in channels {
                    h1 { (channel.name) }
                    @for thread in &channel.threads {
                        h2 { (thread.title) }
                        ul {
                            @for entry in &thread.entries {
                                li {
                                    (entry.post_label()) ": "
                                    a href=(entry.attachment.url) { (entry.attachment.display_title()) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
