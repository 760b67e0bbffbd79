/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! Capture time lookup from embedded EXIF metadata

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Tag, Value};
use tracing::{debug, trace};

/// Outcome of asking a file for its capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureResult {
    Resolved(NaiveDateTime),
    Unresolved,
}

/// Something that can pull a capture timestamp out of an open file.
pub trait CaptureTimeSource {
    fn capture_time(&self, file: &mut BufReader<File>) -> Option<NaiveDateTime>;
}

/// EXIF tags consulted, most trusted first.
const DATE_TAGS: [Tag; 2] = [Tag::DateTimeOriginal, Tag::DateTime];

/// [`CaptureTimeSource`] backed by kamadak-exif. Build one per process and
/// share it across files.
pub struct ExifCaptureTime {
    reader: exif::Reader,
}

impl ExifCaptureTime {
    pub fn new() -> Self
    {
        ExifCaptureTime { reader: exif::Reader::new() }
    }
}

impl Default for ExifCaptureTime {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureTimeSource for ExifCaptureTime {
    fn capture_time(&self, file: &mut BufReader<File>) -> Option<NaiveDateTime>
    {
        let exif = match self.reader.read_from_container(file) {
            Ok(exif) => exif,
            Err(e) => {
                debug!("no readable EXIF: {}", e);
                return None;
            }
        };

        for tag in DATE_TAGS.iter() {
            let field = match exif.get_field(*tag, In::PRIMARY) {
                Some(f) => f,
                None => continue,
            };
            match exif_to_chrono(&field.value) {
                Some(ts) => return Some(ts),
                None => trace!("unusable {} value: {}", tag, field.display_value()),
            }
        }
        debug!("no capture date tag present");
        None
    }
}

/// Convert an EXIF ASCII datetime value into a calendar timestamp.
/// Placeholder stamps such as "0000:00:00 00:00:00" yield None.
fn exif_to_chrono(value: &Value) -> Option<NaiveDateTime>
{
    let raw = match value {
        Value::Ascii(v) if !v.is_empty() => &v[0],
        _ => return None,
    };
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
        .and_hms_nano_opt(
            u32::from(dt.hour),
            u32::from(dt.minute),
            u32::from(dt.second),
            dt.nanosecond.unwrap_or(0),
        )
}

/// Open `path` and ask `source` for its capture time. Any failure along the
/// way, including the open itself, just means the date is unknown.
pub fn read_capture_time<S>(path: &Path, source: &S) -> CaptureResult
    where S: CaptureTimeSource + ?Sized
{
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("{}: cannot open for metadata: {}", path.display(), e);
            return CaptureResult::Unresolved;
        }
    };
    let mut rdr = BufReader::new(f);
    match source.capture_time(&mut rdr) {
        Some(ts) => {
            debug!("{}: captured {}", path.display(), ts);
            CaptureResult::Resolved(ts)
        },
        None => {
            debug!("{}: capture date unknown", path.display());
            CaptureResult::Unresolved
        },
    }
}


/// Minimal JPEG carrying one EXIF date. With `original` the stamp lands in
/// the Exif sub-IFD as DateTimeOriginal, otherwise in IFD0 as DateTime.
#[cfg(test)]
pub(crate) fn jpeg_with_date(stamp: &str, original: bool) -> Vec<u8>
{
    fn ifd(t: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: u32) {
        t.extend_from_slice(&1u16.to_be_bytes());
        t.extend_from_slice(&tag.to_be_bytes());
        t.extend_from_slice(&typ.to_be_bytes());
        t.extend_from_slice(&count.to_be_bytes());
        t.extend_from_slice(&value.to_be_bytes());
        t.extend_from_slice(&0u32.to_be_bytes());
    }

    let mut value = stamp.as_bytes().to_vec();
    value.push(0);
    let count = value.len() as u32;

    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    if original {
        ifd(&mut tiff, 0x8769, 4, 1, 26);
        ifd(&mut tiff, 0x9003, 2, count, 44);
    } else {
        ifd(&mut tiff, 0x0132, 2, count, 26);
    }
    tiff.extend_from_slice(&value);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\x00\x00");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}
