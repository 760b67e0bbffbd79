/*
 * Copyright (c) 2017, Alan Chen
 * See LICENCE file for BSD-2 terms
 */

 //! parse and manage utilities options

use std::path::PathBuf;

use clap::{ value_parser, Arg, ArgAction, ArgMatches, Command };
use tracing::Level;

/// What to do when a file cannot be copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// stop the whole run at the first failure
    Abort,
    /// record the failure and move on to the next file
    Continue,
}

/// store options selections parsed by args_to_opts()
#[derive(Debug, Clone)]
pub struct Options {
    pub in_dir: PathBuf,
    pub out_dir: PathBuf,
    pub dry_run: bool,
    pub on_error: ErrorPolicy,
    pub quiet: bool,
    pub verbose: u8,
}

impl Options {
    pub fn new(in_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Options
    {
        Options {
            in_dir: in_dir.into(),
            out_dir: out_dir.into(),
            dry_run: false,
            on_error: ErrorPolicy::Abort,
            quiet: false,
            verbose: 0,
        }
    }

    /// Max log level picked by -q / -v
    pub fn log_level(&self) -> Level
    {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}


pub fn app() -> Command
{
    Command::new("photosort")
        .version(env!("CARGO_PKG_VERSION"))
        .about("photosort copies a pile of photo files into one directory \n\
            per capture month (YYYY-M), or 'unsorted' when no date is found")
        .arg(Arg::new("dir")
            .value_name("SOURCE_DIR")
            .help("directory to scan")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            )
        .arg(Arg::new("outdir")
            .value_name("DEST_DIR")
            .help("existing directory to copy sorted files into")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            )
        .arg(Arg::new("dry_run")
            .short('n')
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Report where files would go without writing anything")
            )
        .arg(Arg::new("on_error")
            .long("on-error")
            .value_name("POLICY")
            .value_parser(["abort", "continue"])
            .default_value("abort")
            .help("Stop at the first failed copy, or log it and continue")
            )
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("More logging, repeat for trace output")
            )
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .conflicts_with("verbose")
            .help("Only log warnings and errors")
            )
}

pub fn opts_from_matches(amats: &ArgMatches) -> Options
{
    let mut opts = Options::new(PathBuf::new(), PathBuf::new());

    if let Some(dir) = amats.get_one::<PathBuf>("dir") {
        opts.in_dir = dir.clone();
    }
    if let Some(od) = amats.get_one::<PathBuf>("outdir") {
        opts.out_dir = od.clone();
    }

    opts.dry_run = amats.get_flag("dry_run");
    opts.on_error = match amats.get_one::<String>("on_error").map(String::as_str) {
        Some("continue") => ErrorPolicy::Continue,
        _ => ErrorPolicy::Abort,
    };
    opts.quiet = amats.get_flag("quiet");
    opts.verbose = amats.get_count("verbose");
    opts
}

/// Parse the process arguments, exiting with usage on error.
pub fn args_to_opts() -> Options
{
    opts_from_matches(&app().get_matches())
}


#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        app().try_get_matches_from(args).map(|m| opts_from_matches(&m))
    }

    #[test]
    fn t_defaults() {
        let opts = parse(&["photosort", "in", "out"]).unwrap();
        assert_eq!(opts.in_dir, PathBuf::from("in"));
        assert_eq!(opts.out_dir, PathBuf::from("out"));
        assert!(!opts.dry_run);
        assert_eq!(opts.on_error, ErrorPolicy::Abort);
        assert_eq!(opts.log_level(), Level::INFO);
    }

    #[test]
    fn t_flags() {
        let opts = parse(&["photosort", "-n", "--on-error", "continue", "-vv", "in", "out"]).unwrap();
        assert!(opts.dry_run);
        assert_eq!(opts.on_error, ErrorPolicy::Continue);
        assert_eq!(opts.log_level(), Level::TRACE);

        let opts = parse(&["photosort", "-q", "in", "out"]).unwrap();
        assert_eq!(opts.log_level(), Level::WARN);
    }

    #[test]
    fn t_usage_errors() {
        assert!(parse(&["photosort"]).is_err());
        assert!(parse(&["photosort", "in"]).is_err());
        assert!(parse(&["photosort", "--on-error", "retry", "in", "out"]).is_err());
        assert!(parse(&["photosort", "-q", "-v", "in", "out"]).is_err());
    }
}
