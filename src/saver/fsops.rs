//! Filesystem adapter for the saver: atomic-visibility file replacement,
//! hard-link placement, and prefix/extension directory listing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Move `tmp` onto `dst`, removing any existing `dst` first.
///
/// Rename alone cannot replace an existing target on every filesystem, so
/// the destination is unlinked explicitly. A reader never observes a
/// partially written `dst`: either the old file is still in place or the
/// fully written temp file has been renamed over it.
pub fn replace_file(tmp: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        fs::remove_file(dst)?;
    }
    fs::rename(tmp, dst)
}

/// Hard-link `src` to `dst`, removing any existing `dst` first.
pub fn link_replace(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        fs::remove_file(dst)?;
    }
    fs::hard_link(src, dst)
}

/// Lexicographically first file in `dir` whose name starts with `prefix`
/// and ends with `extension`. `None` when nothing matches or the directory
/// does not exist.
pub fn first_match(dir: &Path, prefix: &str, extension: &str) -> io::Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(prefix) && name.ends_with(extension) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.first().map(|name| dir.join(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_file_over_existing() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("tmp.ckpt");
        let dst = dir.path().join("last.ckpt");
        fs::write(&dst, b"old").unwrap();
        fs::write(&tmp, b"new").unwrap();

        replace_file(&tmp, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
        assert!(!tmp.exists());
    }

    #[test]
    fn test_replace_file_without_existing() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("tmp.ckpt");
        let dst = dir.path().join("last.ckpt");
        fs::write(&tmp, b"payload").unwrap();

        replace_file(&tmp, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn test_link_replace_shares_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("last.ckpt");
        let dst = dir.path().join("model_best.ckpt");
        fs::write(&src, b"weights").unwrap();
        fs::write(&dst, b"stale").unwrap();

        link_replace(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"weights");

        // A link survives replacement of the source name.
        fs::remove_file(&src).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"weights");
    }

    #[test]
    fn test_first_match_sorts_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["recovery-9-0.ckpt", "recovery-10-0.ckpt", "recovery-2-5.ckpt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let found = first_match(dir.path(), "recovery", ".ckpt").unwrap().unwrap();
        assert_eq!(found, dir.path().join("recovery-10-0.ckpt"));
    }

    #[test]
    fn test_first_match_filters_prefix_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("checkpoint-1.ckpt"), b"x").unwrap();
        fs::write(dir.path().join("recovery-1-0.bak"), b"x").unwrap();
        assert!(first_match(dir.path(), "recovery", ".ckpt").unwrap().is_none());

        fs::write(dir.path().join("recovery-1-0.ckpt"), b"x").unwrap();
        let found = first_match(dir.path(), "recovery", ".ckpt").unwrap().unwrap();
        assert_eq!(found, dir.path().join("recovery-1-0.ckpt"));
    }

    #[test]
    fn test_first_match_missing_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(first_match(&missing, "recovery", ".ckpt").unwrap().is_none());
    }
}
