use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use crate::archive::Archive;
use crate::error::ExportError;
use crate::model::Post;

pub const SEPARATOR: &str = "==========\n\n";

/// Renders one post block. The author is looked up in the archive's user
/// map; content is copied verbatim.
pub fn format_post(post: &impl Post, archive: &Archive) -> Result<String, ExportError> {
    let author = archive.user_name(post.creator())?;

    let mut out = String::new();
    let _ = writeln!(out, "Post by {} at {}:", author, post.posted_ts());
    let _ = writeln!(out, "{}", post.content());
    for attachment in post.attachments() {
        let _ = writeln!(
            out,
            "Attachment: {} hosted at {}",
            attachment.file_name, attachment.url
        );
    }
    out.push_str(SEPARATOR);
    Ok(out)
}

/// Opens the transcript in append mode, writes one block and closes it again.
pub fn append(path: &Path, block: &str) -> Result<(), ExportError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ExportError::io(format!("open {}", path.display()), e))?;
    file.write_all(block.as_bytes())
        .map_err(|e| ExportError::io(format!("write {}", path.display()), e))
}
