/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

use std::io::IsTerminal;
use std::process::ExitCode;

use tracing::error;

use photosort::options::args_to_opts;
use photosort::{ExifCaptureTime, Sorter};

fn main() -> ExitCode {
    let opts = args_to_opts();

    tracing_subscriber::fmt()
        .with_max_level(opts.log_level())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    let exif = ExifCaptureTime::new();
    let sorter = match Sorter::new(opts, &exif) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let report = sorter.run();
    if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
