/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! Filesystem side of sorting: bucket directories and non-clobbering copies

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SortError;

/// What happened to one source file.
#[derive(Debug)]
pub enum CopyOutcome {
    Copied,
    /// Destination name already taken; nothing written.
    SkippedConflict,
    /// Dry run: the copy would have happened.
    Planned,
    Failed(SortError),
}

impl CopyOutcome {
    pub fn is_failure(&self) -> bool
    {
        matches!(self, CopyOutcome::Failed(_))
    }
}

/// Make sure `path` is a directory, creating it (rwx for everyone, less the
/// umask) when absent. Existing directories are left alone.
pub fn ensure_directory(path: &Path) -> Result<(), SortError>
{
    if dir_exists(path)? {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }

    match builder.create(path) {
        Ok(()) => {
            debug!("created {}", path.display());
            Ok(())
        },
        // lost a race with someone else making the same directory
        Err(ref e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(SortError::CreateDir { path: path.to_path_buf(), source: e }),
    }
}

/// Read-only half of [`ensure_directory`]: fails the same way when the path
/// is taken by a non-directory, but never creates anything.
pub fn check_directory(path: &Path) -> Result<(), SortError>
{
    dir_exists(path).map(|_| ())
}

/// Ok(true) for an existing directory, Ok(false) when nothing is there.
fn dir_exists(path: &Path) -> Result<bool, SortError>
{
    match fs::metadata(path) {
        Ok(md) if md.is_dir() => Ok(true),
        Ok(_) => Err(SortError::BucketNotADirectory { path: path.to_path_buf() }),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SortError::CreateDir { path: path.to_path_buf(), source: e }),
    }
}

/// Destination path for `src` inside `dest_dir`, keeping the base name.
pub fn dest_path(src: &Path, dest_dir: &Path) -> PathBuf
{
    match src.file_name() {
        Some(name) => dest_dir.join(name),
        None => dest_dir.join(src),
    }
}

/// Dry-run counterpart of [`copy_if_absent`]; never writes.
pub fn plan_copy(src: &Path, dest_dir: &Path) -> CopyOutcome
{
    let dst = dest_path(src, dest_dir);
    if exists(&dst) {
        warn!("File exists. Not copied to {}: {}", dst.display(), src.display());
        CopyOutcome::SkippedConflict
    } else {
        CopyOutcome::Planned
    }
}

/// Copy `src` into `dest_dir` under its base name unless something already
/// has that name there. Existing destination files are never touched.
pub fn copy_if_absent(src: &Path, dest_dir: &Path) -> CopyOutcome
{
    let dst = dest_path(src, dest_dir);
    if exists(&dst) {
        warn!("File exists. Not copied to {}: {}", dst.display(), src.display());
        return CopyOutcome::SkippedConflict;
    }

    let mut from = match File::open(src) {
        Ok(f) => f,
        Err(e) => return CopyOutcome::Failed(SortError::OpenSource { path: src.to_path_buf(), source: e }),
    };

    // create_new closes the gap between the check above and this create
    let to = match OpenOptions::new().write(true).create_new(true).open(&dst) {
        Ok(f) => f,
        Err(ref e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!("File exists. Not copied to {}: {}", dst.display(), src.display());
            return CopyOutcome::SkippedConflict;
        },
        Err(e) => return CopyOutcome::Failed(SortError::CreateDestination { path: dst, source: e }),
    };

    match stream(&mut from, to, src, &dst) {
        Ok(nbytes) => {
            debug!("{} bytes -> {}", nbytes, dst.display());
            CopyOutcome::Copied
        },
        Err(err) => {
            // only ever our own freshly created file
            if let Err(e) = fs::remove_file(&dst) {
                warn!("cannot remove partial copy {}: {}", dst.display(), e);
            }
            CopyOutcome::Failed(err)
        },
    }
}

fn stream(from: &mut File, to: File, src: &Path, dst: &Path) -> Result<u64, SortError>
{
    let mut wr = BufWriter::new(to);
    let nbytes = io::copy(from, &mut wr).map_err(|e| SortError::Stream {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;

    let finish = |e: io::Error| SortError::Finish { path: dst.to_path_buf(), source: e };
    let to = wr.into_inner().map_err(|e| finish(e.into_error()))?;
    to.sync_all().map_err(finish)?;
    Ok(nbytes)
}

/// Anything at all at `p`, including dangling symlinks.
fn exists(p: &Path) -> bool
{
    fs::symlink_metadata(p).is_ok()
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn t_ensure_creates_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let d = tmp.path().join("2024-4");

        ensure_directory(&d).unwrap();
        assert!(d.is_dir());

        fs::write(d.join("keep.jpg"), b"keep").unwrap();
        ensure_directory(&d).unwrap();
        assert_eq!(fs::read(d.join("keep.jpg")).unwrap(), b"keep");
    }

    #[test]
    fn t_ensure_rejects_file_in_the_way() {
        let tmp = tempfile::tempdir().unwrap();
        let d = tmp.path().join("unsorted");
        fs::write(&d, b"not a dir").unwrap();

        match ensure_directory(&d) {
            Err(SortError::BucketNotADirectory { path }) => assert_eq!(path, d),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(fs::read(&d).unwrap(), b"not a dir");
    }

    #[test]
    fn t_ensure_missing_parent_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let d = tmp.path().join("no").join("such");
        assert!(matches!(ensure_directory(&d), Err(SortError::CreateDir { .. })));
    }

    #[test]
    fn t_copy_new_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("photo.jpg");
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(&src, b"pixels").unwrap();

        assert!(matches!(copy_if_absent(&src, &out), CopyOutcome::Copied));
        assert_eq!(fs::read(out.join("photo.jpg")).unwrap(), b"pixels");
        assert_eq!(fs::read(&src).unwrap(), b"pixels");
    }

    #[test]
    fn t_copy_skips_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("photo.jpg");
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(&src, b"new pixels").unwrap();
        fs::write(out.join("photo.jpg"), b"old pixels").unwrap();

        assert!(matches!(copy_if_absent(&src, &out), CopyOutcome::SkippedConflict));
        assert_eq!(fs::read(out.join("photo.jpg")).unwrap(), b"old pixels");
    }

    #[test]
    fn t_copy_missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();

        let res = copy_if_absent(&tmp.path().join("gone.jpg"), &out);
        assert!(matches!(res, CopyOutcome::Failed(SortError::OpenSource { .. })));
        assert!(!out.join("gone.jpg").exists());
    }

    #[test]
    fn t_copy_into_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("photo.jpg");
        fs::write(&src, b"pixels").unwrap();

        let res = copy_if_absent(&src, &tmp.path().join("nowhere"));
        assert!(matches!(res, CopyOutcome::Failed(SortError::CreateDestination { .. })));
    }

    #[test]
    fn t_check_is_read_only() {
        let tmp = tempfile::tempdir().unwrap();
        let absent = tmp.path().join("2024-4");
        check_directory(&absent).unwrap();
        assert!(!absent.exists());

        let blocked = tmp.path().join("unsorted");
        fs::write(&blocked, b"file").unwrap();
        assert!(matches!(check_directory(&blocked), Err(SortError::BucketNotADirectory { .. })));
        check_directory(tmp.path()).unwrap();
    }

    #[test]
    fn t_plan_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.jpg");
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(&src, b"x").unwrap();

        assert!(matches!(plan_copy(&src, &out), CopyOutcome::Planned));
        assert!(!out.join("a.jpg").exists());

        fs::write(out.join("a.jpg"), b"y").unwrap();
        assert!(matches!(plan_copy(&src, &out), CopyOutcome::SkippedConflict));
    }
}
