/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::exif_date::CaptureResult;

pub const UNSORTED_DIR: &str = "unsorted";

/// Destination directory a file is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Month { year: i32, month: u32 },
    Unsorted,
}

impl Bucket {
    pub fn resolve(res: &CaptureResult) -> Bucket
    {
        match res {
            CaptureResult::Resolved(ts) => Bucket::Month { year: ts.year(), month: ts.month() },
            CaptureResult::Unresolved => Bucket::Unsorted,
        }
    }

    /// "2023-3" style, month never zero padded
    pub fn dir_name(&self) -> String
    {
        match self {
            Bucket::Month { year, month } => format!("{}-{}", year, month),
            Bucket::Unsorted => String::from(UNSORTED_DIR),
        }
    }

    pub fn path(&self, dest_root: &Path) -> PathBuf
    {
        dest_root.join(self.dir_name())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}
