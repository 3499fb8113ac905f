//! Filesystem helpers used by the pipeline stages

use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::BuildError;

/// How [`copy_dir`] treats an existing destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Destination must not exist yet
    Fresh,
    /// Merge into the destination, overwriting files with the same name
    Merge,
}

/// Recursively copy `src` into `dst`
pub fn copy_dir(src: &Path, dst: &Path, mode: CopyMode) -> Result<(), BuildError> {
    if !src.is_dir() {
        return Err(BuildError::CopyFailed(format!(
            "source directory {} does not exist",
            src.display()
        )));
    }
    if mode == CopyMode::Fresh && dst.exists() {
        return Err(BuildError::CopyFailed(format!(
            "destination {} already exists",
            dst.display()
        )));
    }

    debug!("Copying {} -> {}", src.display(), dst.display());

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| BuildError::CopyFailed(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildError::CopyFailed(e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Copy a single file, creating the parent directory
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), BuildError> {
    if !src.is_file() {
        return Err(BuildError::CopyFailed(format!("{} does not exist", src.display())));
    }
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)?;
    Ok(())
}

/// Delete a directory if present and create it empty
pub fn recreate_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Create a directory symlink at `link` pointing to `target`
pub fn symlink_dir(target: &Path, link: &Path) -> Result<(), BuildError> {
    if let Some(parent) = link.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link)?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(target, link)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_fresh_copy() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write(&src.join("a.txt"), "a");
        write(&src.join("nested/b.txt"), "b");

        let dst = temp.path().join("dst");
        copy_dir(&src, &dst, CopyMode::Fresh).unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(dst.join("nested/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_fresh_copy_rejects_existing_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write(&src.join("a.txt"), "a");
        std::fs::create_dir_all(temp.path().join("dst")).unwrap();

        let result = copy_dir(&src, &temp.path().join("dst"), CopyMode::Fresh);
        assert!(matches!(result, Err(BuildError::CopyFailed(_))));
    }

    #[test]
    fn test_merge_copy_keeps_existing_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("libs");
        write(&src.join("libSDL2.so"), "new");

        let dst = temp.path().join("deps");
        write(&dst.join("libSDL2.so"), "old");
        write(&dst.join("libgame.rlib"), "rlib");

        copy_dir(&src, &dst, CopyMode::Merge).unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("libSDL2.so")).unwrap(), "new");
        assert!(dst.join("libgame.rlib").exists());
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = copy_dir(&temp.path().join("nope"), &temp.path().join("dst"), CopyMode::Merge);
        assert!(matches!(result, Err(BuildError::CopyFailed(_))));
    }

    #[test]
    fn test_recreate_dir_empties_contents() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("jniLibs/x86");
        write(&dir.join("stale.so"), "stale");

        recreate_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_dir() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("SDL");
        write(&target.join("Android.mk"), "");

        let link = temp.path().join("project/app/jni/SDL");
        symlink_dir(&target, &link).unwrap();

        assert!(link.join("Android.mk").exists());
        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }
}
