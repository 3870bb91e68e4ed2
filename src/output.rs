use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// Creates `path` (and its parents) but refuses to reuse an existing one, so
/// two exports never end up mixed in the same tree.
pub fn create_dir_strict(path: &Path) -> Result<(), ExportError> {
    if path.exists() {
        tracing::error!(path = %path.display(), "file or folder already exists");
        return Err(ExportError::OutputConflict(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ExportError::io(format!("create {}", parent.display()), e))?;
        }
    }
    match std::fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(ExportError::OutputConflict(path.to_path_buf()))
        }
        Err(e) => Err(ExportError::io(format!("create {}", path.display()), e)),
    }
}

pub fn channels_dir(out_dir: &Path) -> PathBuf {
    out_dir.join("channels")
}

pub fn channel_dir(out_dir: &Path, channel_name: &str) -> PathBuf {
    channels_dir(out_dir).join(path_component(channel_name))
}

pub fn transcript_path(out_dir: &Path, channel_name: &str, thread_title: &str) -> PathBuf {
    channel_dir(out_dir, channel_name).join(path_component(thread_title))
}

/// Keeps the name as-is apart from characters that would leave the parent
/// directory. Identical names still map to the same file.
fn path_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" => "untitled".to_string(),
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn strict_create_rejects_existing() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("output/channels");
        create_dir_strict(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(matches!(
            create_dir_strict(&dir),
            Err(ExportError::OutputConflict(p)) if p == dir
        ));
    }

    #[test]
    fn transcript_path_stays_inside_channel() {
        let out = Path::new("output");
        assert_eq!(
            transcript_path(out, "general", "Q3 plan"),
            Path::new("output/channels/general/Q3 plan")
        );
        assert_eq!(
            transcript_path(out, "a/b", "../etc"),
            Path::new("output/channels/a_b/.._etc")
        );
        assert_eq!(
            transcript_path(out, "general", ""),
            Path::new("output/channels/general/untitled")
        );
    }
}
