//! Layout of the uploaded-media directories. The database only ever stores a
//! path string; this module is the single place that turns those strings back
//! into filesystem locations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// The three flat upload folders beneath the media root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Music,
    Gallery,
    HeaderPhoto,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Music, MediaKind::Gallery, MediaKind::HeaderPhoto];

    /// Folder name under the media root.
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaKind::Music => "music_uploads",
            MediaKind::Gallery => "gallery_uploads",
            MediaKind::HeaderPhoto => "header_photos",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaLayout {
    root: PathBuf,
}

impl MediaLayout {
    /// Layout rooted at `root`. Nothing is created until `ensure_dirs`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory every stored media path is relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Upload folder for one kind of media.
    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Create the media root and its upload folders if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for kind in MediaKind::ALL {
            let dir = self.dir(kind);
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create media directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// The string to persist for a file named `file_name` in `kind`'s folder.
    /// Only the final path component of `file_name` is kept.
    pub fn stored_path(&self, kind: MediaKind, file_name: &str) -> String {
        let name = Path::new(file_name)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{}", kind.dir_name(), name)
    }

    /// Map a persisted path back onto the filesystem.
    pub fn resolve(&self, stored: &str) -> PathBuf {
        let path = Path::new(stored);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Like [`resolve`](Self::resolve), but only for paths that stay inside the
    /// media root. A relative path may not climb out with `..`; an absolute
    /// path must canonicalize to a location under the canonical root.
    pub fn resolve_within(&self, stored: &str) -> Option<PathBuf> {
        let path = Path::new(stored);
        if path.is_absolute() {
            let root = self.root.canonicalize().ok()?;
            let target = path.canonicalize().ok()?;
            return target.starts_with(&root).then_some(target);
        }

        path.components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
            .then(|| self.root.join(path))
    }

    /// Delete the file behind `stored`, swallowing every error. Returns whether
    /// a file was actually removed. Paths outside the media root are never
    /// touched.
    pub fn remove_best_effort(&self, stored: &str) -> bool {
        if stored.trim().is_empty() {
            return false;
        }

        let Some(path) = self.resolve_within(stored) else {
            warn!(stored, root = %self.root.display(), "refusing to remove media file outside the media root");
            return false;
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed media file");
                true
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "media file already gone");
                false
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to remove media file");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_path_keeps_only_the_file_name() {
        let layout = MediaLayout::new("/srv/media");
        assert_eq!(
            layout.stored_path(MediaKind::HeaderPhoto, "../../etc/portrait.jpg"),
            "header_photos/portrait.jpg"
        );
        assert_eq!(
            layout.resolve("header_photos/portrait.jpg"),
            PathBuf::from("/srv/media/header_photos/portrait.jpg")
        );
    }

    #[test]
    fn remove_best_effort_tolerates_missing_files() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let layout = MediaLayout::new(dir.path());
        layout.ensure_dirs().expect("failed to create media dirs");

        let stored = layout.stored_path(MediaKind::Gallery, "shot.png");
        fs::write(layout.resolve(&stored), b"png").expect("failed to write file");

        assert!(layout.remove_best_effort(&stored));
        assert!(!layout.remove_best_effort(&stored));
        assert!(!layout.remove_best_effort(""));
    }

    #[test]
    fn paths_outside_the_root_are_not_resolved_for_removal() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let layout = MediaLayout::new(dir.path().join("media"));
        layout.ensure_dirs().expect("failed to create media dirs");

        let outside = dir.path().join("yanti_siggs.sqlite");
        fs::write(&outside, b"db").expect("failed to write file");
        let inside = layout.dir(MediaKind::HeaderPhoto).join("a.jpg");
        fs::write(&inside, b"jpeg").expect("failed to write file");

        assert_eq!(layout.resolve_within("../yanti_siggs.sqlite"), None);
        assert_eq!(layout.resolve_within("header_photos/../../yanti_siggs.sqlite"), None);
        assert_eq!(layout.resolve_within(&outside.to_string_lossy()), None);
        assert!(layout.resolve_within(&inside.to_string_lossy()).is_some());
        assert_eq!(
            layout.resolve_within("./header_photos/a.jpg"),
            Some(layout.root().join("./header_photos/a.jpg"))
        );

        assert!(!layout.remove_best_effort("../yanti_siggs.sqlite"));
        assert!(outside.exists());
    }
}
