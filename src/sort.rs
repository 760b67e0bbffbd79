/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

//! Drives a whole run: scan, date, bucket, provision, copy.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::actions::{
    check_directory, copy_if_absent, dest_path, ensure_directory, plan_copy, CopyOutcome,
};
use crate::bucket::Bucket;
use crate::error::SortError;
use crate::exif_date::{read_capture_time, CaptureTimeSource};
use crate::options::{ErrorPolicy, Options};
use crate::scan::{scan_path, SourceFile};

/// One processed source file.
#[derive(Debug)]
pub struct FileRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bucket: Bucket,
    pub outcome: CopyOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub records: Vec<FileRecord>,
    /// unreadable entries reported by the walker
    pub walk_errors: usize,
    /// set when a failure stopped the run under [`ErrorPolicy::Abort`]
    pub halted: bool,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&FileRecord) -> bool) -> usize
    {
        self.records.iter().filter(|r| pred(r)).count()
    }

    pub fn copied(&self) -> usize
    {
        self.count(|r| matches!(r.outcome, CopyOutcome::Copied))
    }

    pub fn skipped(&self) -> usize
    {
        self.count(|r| matches!(r.outcome, CopyOutcome::SkippedConflict))
    }

    pub fn planned(&self) -> usize
    {
        self.count(|r| matches!(r.outcome, CopyOutcome::Planned))
    }

    pub fn failed(&self) -> usize
    {
        self.count(|r| r.outcome.is_failure())
    }

    /// files routed to the unsorted bucket, whatever their outcome
    pub fn unsorted(&self) -> usize
    {
        self.count(|r| r.bucket == Bucket::Unsorted)
    }

    pub fn success(&self) -> bool
    {
        !self.halted && self.failed() == 0
    }

    pub fn record_for(&self, source: &Path) -> Option<&FileRecord>
    {
        self.records.iter().find(|r| r.source == source)
    }
}

/// Per-run bookkeeping, dropped when the run ends.
#[derive(Default)]
struct RunState {
    /// buckets already provisioned (or checked, on a dry run)
    ensured: HashSet<Bucket>,
    /// dry run destinations already claimed by an earlier file
    planned: HashSet<PathBuf>,
}

pub struct Sorter<'a, S: CaptureTimeSource + ?Sized> {
    opts: Options,
    source: &'a S,
}

impl<'a, S: CaptureTimeSource + ?Sized> Sorter<'a, S> {
    /// Check both roots before anything is touched.
    pub fn new(opts: Options, source: &'a S) -> Result<Self, SortError>
    {
        fs::metadata(&opts.in_dir).map_err(|e| SortError::InvalidRoot {
            role: "source",
            path: opts.in_dir.clone(),
            source: e,
        })?;
        let md = fs::metadata(&opts.out_dir).map_err(|e| SortError::InvalidRoot {
            role: "destination",
            path: opts.out_dir.clone(),
            source: e,
        })?;
        if !md.is_dir() {
            return Err(SortError::RootNotADirectory { path: opts.out_dir.clone() });
        }
        Ok(Sorter { opts, source })
    }

    pub fn run(&self) -> RunReport
    {
        let sd = scan_path(&self.opts.in_dir, Some(&self.opts.out_dir));
        info!("found {} files under {}", sd.files.len(), self.opts.in_dir.display());

        let mut report = RunReport { walk_errors: sd.errors, ..RunReport::default() };
        let mut state = RunState::default();

        for file in sd.files.iter() {
            let rec = self.process(file, &mut state);
            let failed = rec.outcome.is_failure();
            report.records.push(rec);

            if failed && self.opts.on_error == ErrorPolicy::Abort {
                error!("aborting run, {} files left unprocessed",
                    sd.files.len() - report.records.len());
                report.halted = true;
                break;
            }
        }

        info!("{} copied, {} skipped, {} failed, {} planned, {} unsorted, {} unreadable entries",
            report.copied(), report.skipped(), report.failed(),
            report.planned(), report.unsorted(), report.walk_errors);
        report
    }

    fn process(&self, file: &SourceFile, state: &mut RunState) -> FileRecord
    {
        let capture = read_capture_time(&file.path, self.source);
        let bucket = Bucket::resolve(&capture);
        let dir = bucket.path(&self.opts.out_dir);
        let destination = dest_path(&file.path, &dir);

        let outcome = if self.opts.dry_run {
            self.plan(file, bucket, &dir, &destination, state)
        } else {
            match self.provision(bucket, &dir, &mut state.ensured) {
                Ok(()) => copy_if_absent(&file.path, &dir),
                Err(e) => CopyOutcome::Failed(e),
            }
        };

        match outcome {
            CopyOutcome::Copied => info!("{} -> {}", file.path.display(), destination.display()),
            CopyOutcome::Planned => info!("would copy {} -> {}", file.path.display(), destination.display()),
            CopyOutcome::Failed(ref e) => error!("A copy failed: {}: {}", file.path.display(), e),
            CopyOutcome::SkippedConflict => {},
        }

        FileRecord { source: file.path.clone(), destination, bucket, outcome }
    }

    /// Dry run: same decisions as a real run, minus the writes.
    fn plan(&self, file: &SourceFile, bucket: Bucket, dir: &Path, destination: &Path,
        state: &mut RunState) -> CopyOutcome
    {
        if !state.ensured.contains(&bucket) {
            if let Err(e) = check_directory(dir) {
                return CopyOutcome::Failed(e);
            }
            state.ensured.insert(bucket);
        }

        if state.planned.contains(destination) {
            warn!("File exists. Not copied to {}: {}", destination.display(), file.path.display());
            return CopyOutcome::SkippedConflict;
        }
        let outcome = plan_copy(&file.path, dir);
        if let CopyOutcome::Planned = outcome {
            state.planned.insert(destination.to_path_buf());
        }
        outcome
    }

    fn provision(&self, bucket: Bucket, dir: &Path, ensured: &mut HashSet<Bucket>) -> Result<(), SortError>
    {
        if ensured.contains(&bucket) {
            return Ok(());
        }
        ensure_directory(dir)?;
        ensured.insert(bucket);
        Ok(())
    }
}
