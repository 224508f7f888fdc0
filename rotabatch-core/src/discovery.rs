//! File discovery for finding video files to tag.
//!
//! Only the top level of the given directory is searched. A file counts as a
//! video when its extension (case-insensitive) is one of
//! [`VIDEO_EXTENSIONS`](crate::config::VIDEO_EXTENSIONS).

use crate::config::VIDEO_EXTENSIONS;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// A file known, by its extension, to be a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Directory the file was discovered in.
    pub directory: PathBuf,
    /// File name including extension.
    pub basename: String,
}

impl VideoFile {
    /// Builds a `VideoFile` from a path, resolving it to an absolute path.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let path = std::path::absolute(path)?;
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CoreError::OperationFailed(format!("'{}' has no file name", path.display()))
            })?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            path,
            directory,
            basename,
        })
    }

    /// File name without the extension.
    pub fn stem(&self) -> String {
        Path::new(&self.basename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.basename.clone())
    }
}

/// Returns true if the path has a recognized video extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Finds video files in the top level of `input_dir`.
///
/// # Returns
///
/// * `Ok(Vec<VideoFile>)` - The discovered files, sorted by name. May be empty.
/// * `Err(CoreError::NotFound)` - If `input_dir` does not exist or is not a directory
/// * `Err(CoreError::Io)` - If the directory cannot be read
///
/// # Examples
///
/// ```rust,no_run
/// use rotabatch_core::find_video_files;
/// use std::path::Path;
///
/// let files = find_video_files(Path::new("/path/to/videos")).unwrap();
/// for file in &files {
///     println!("{}", file.basename);
/// }
/// ```
pub fn find_video_files(input_dir: &Path) -> CoreResult<Vec<VideoFile>> {
    if !input_dir.is_dir() {
        return Err(CoreError::NotFound(input_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut skipped_count = 0;

    for entry_result in std::fs::read_dir(input_dir)? {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(
                    "Failed to read directory entry in {}: {}",
                    input_dir.display(),
                    e
                );
                continue;
            }
        };
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if is_video_file(&path) {
            files.push(VideoFile::from_path(&path)?);
        } else {
            skipped_count += 1;
        }
    }

    if skipped_count > 0 {
        log::debug!(
            "Skipped {} non-video files in {}",
            skipped_count,
            input_dir.display()
        );
    }

    // read_dir order is platform-defined; sort so one run always sees the same order
    files.sort_by(|a, b| a.basename.cmp(&b.basename));

    log::info!(
        "Found {} video files in {}",
        files.len(),
        input_dir.display()
    );

    Ok(files)
}

/// Lists the non-hidden direct subdirectories of `base`, sorted by name.
pub fn list_subdirectories(base: &Path) -> CoreResult<Vec<String>> {
    if !base.is_dir() {
        return Err(CoreError::NotFound(base.to_path_buf()));
    }

    let mut directories: Vec<String> = std::fs::read_dir(base)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.path().is_dir() {
                return None;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            (!name.starts_with('.')).then_some(name)
        })
        .collect();

    directories.sort();
    log::info!(
        "Found {} directories in {}",
        directories.len(),
        base.display()
    );
    Ok(directories)
}
