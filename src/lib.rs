/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! photosort copies photos into `YYYY-M` directories named after their
//! EXIF capture month, with an `unsorted` directory for everything else.
//! Sources are never modified and existing destination files are never
//! overwritten.

pub mod actions;
pub mod bucket;
pub mod error;
pub mod exif_date;
pub mod options;
pub mod scan;
pub mod sort;

pub use actions::CopyOutcome;
pub use bucket::Bucket;
pub use error::SortError;
pub use exif_date::{CaptureResult, CaptureTimeSource, ExifCaptureTime};
pub use options::{ErrorPolicy, Options};
pub use sort::{FileRecord, RunReport, Sorter};
