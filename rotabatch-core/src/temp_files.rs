//! Temporary file management utilities.
//!
//! Preview frames are written next to their source video. The tempfile crate
//! handles cleanup via the Drop trait, so a frame is removed on every exit
//! path, including errors and panics while it is displayed.

use crate::error::CoreResult;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, TempPath};

/// Extension of rendered preview frames.
pub const PREVIEW_EXTENSION: &str = "jpg";

/// Creates an empty placeholder for a preview frame in `dir`, named
/// `<stem>_preview_<random>.jpg`. Deleted when the returned path is dropped.
pub fn create_preview_frame(dir: &Path, stem: &str) -> CoreResult<TempPath> {
    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{stem}_preview_"))
        .suffix(&format!(".{PREVIEW_EXTENSION}"))
        .tempfile_in(dir)?;

    Ok(temp_file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_adjacent_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let frame = create_preview_frame(dir.path(), "clip").unwrap();
        let path = frame.to_path_buf();

        assert_eq!(path.parent().unwrap(), dir.path());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("clip_preview_"), "{name}");
        assert!(name.ends_with(".jpg"), "{name}");
        assert!(path.exists());

        drop(frame);
        assert!(!path.exists());
    }
}
