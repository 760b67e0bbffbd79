/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

use ignore::WalkBuilder;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// A non-directory entry found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct ScanData {
    pub files: Vec<SourceFile>,
    /// entries the walker could not read
    pub errors: usize,
}

/// List every non-directory entry under `dir`. Hidden and git-ignored files
/// are included and symlinks are not followed. A directory resolving to
/// `exclude` is not descended into.
pub fn scan_path(dir: &Path, exclude: Option<&Path>) -> ScanData
{
    let mut walk = WalkBuilder::new(dir);
    walk.standard_filters(false).follow_links(false);

    if let Some(ex) = exclude.and_then(|p| fs::canonicalize(p).ok()) {
        walk.filter_entry(move |ent| {
            let is_dir = ent.file_type().map_or(false, |ft| ft.is_dir());
            if !is_dir || ent.depth() == 0 {
                return true;
            }
            let same = fs::canonicalize(ent.path()).map_or(false, |p| p == ex);
            if same {
                debug!("not descending into destination {}", ent.path().display());
            }
            !same
        });
    }

    let mut sd = ScanData::default();
    for res in walk.build() {
        match res {
            Ok(ent) => {
                if ent.file_type().map_or(false, |ft| ft.is_dir()) {
                    continue;
                }
                sd.files.push(SourceFile { path: ent.into_path() });
            },
            Err(e) => {
                warn!("cannot read entry: {}", e);
                sd.errors += 1;
            },
        }
    }
    sd
}
