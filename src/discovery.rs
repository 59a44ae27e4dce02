//! Finding videos on disk and naming their sheets.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ThumbnailError;

/// File extensions (lowercase, without the dot) treated as video files.
pub const VIDEO_FILE_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "3gp2", "3gpp", "amr", "amv", "asf", "avi", "bdmv", "bik", "d2v", "divx", "drc",
    "dsa", "dsm", "dss", "dsv", "evo", "f4v", "flc", "fli", "flic", "flv", "hdmov", "ifo", "ivf",
    "m1v", "m2p", "m2t", "m2ts", "m2v", "m4v", "mkv", "mp2v", "mp4", "mp4v", "mpe", "mpeg", "mpg",
    "mpls", "mpv2", "mpv4", "mov", "mts", "ogm", "ogv", "pss", "pva", "qt", "ram", "ratdvd", "rm",
    "rmm", "rmvb", "roq", "rpm", "smil", "smk", "swf", "tp", "tpr", "ts", "vob", "vp6", "webm",
    "wm", "wmp", "wmv",
];

/// Whether `path` has a video file extension (case-insensitive).
///
/// # Example
///
/// ```
/// assert!(vidsheet::is_video_file("holiday.MP4"));
/// assert!(!vidsheet::is_video_file("holiday.jpg"));
/// assert!(!vidsheet::is_video_file("mp4"));
/// ```
pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_FILE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
}

/// Recursively collect every video file under `directory`, sorted by path.
///
/// Symbolic links are not followed. Entries that cannot be read are logged
/// and skipped.
///
/// # Errors
///
/// Returns [`ThumbnailError::PathNotFound`] if `directory` does not exist.
pub fn find_videos<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, ThumbnailError> {
    let directory = directory.as_ref();
    if !directory.exists() {
        return Err(ThumbnailError::PathNotFound(directory.to_path_buf()));
    }

    let mut videos: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                log::warn!("Skipping unreadable entry: {error}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_video_file(path))
        .collect();
    videos.sort();

    log::debug!(
        "Found {} video file(s) under {}",
        videos.len(),
        directory.display()
    );
    Ok(videos)
}

/// Where the sheet for `video` is written: same directory, `.jpg` extension.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// assert_eq!(
///     vidsheet::output_path_for("clips/a.b.mkv"),
///     Path::new("clips/a.b.jpg"),
/// );
/// ```
pub fn output_path_for<P: AsRef<Path>>(video: P) -> PathBuf {
    video.as_ref().with_extension("jpg")
}
