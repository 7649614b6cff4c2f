//! pdflock - Batch PDF Write-Protection CLI
//!
//! Walks a directory of PDFs and writes protected copies to an output
//! directory, one unique, unrecorded owner password per file.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgAction, Command, ValueEnum};
use pdflock::{ProtectJob, Protector};
use tracing::{error, info};

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

fn main() {
    let matches = build_cli().get_matches();

    let filter_level = if matches.get_flag("quiet") {
        "error"
    } else {
        match matches.get_one::<LogLevel>("verbose").unwrap_or(&LogLevel::Info) {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    };
    init_logging(filter_level);

    let job = ProtectJob {
        input_dir: matches.get_one::<PathBuf>("input").cloned().unwrap(),
        output_dir: matches.get_one::<PathBuf>("output").cloned().unwrap(),
        recursive: matches.get_flag("recursive"),
        password_length: *matches.get_one::<usize>("password-length").unwrap(),
        stamp_info: matches.get_flag("stamp-info"),
    };

    let protector = Protector::new(job);
    let summary = match protector.run() {
        Ok(summary) => summary,
        Err(e) => {
            error!("❌ {e}");
            process::exit(1);
        }
    };

    println!("{summary}");

    if let Some(report_path) = matches.get_one::<PathBuf>("report") {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(e) = fs::write(report_path, json) {
                    error!("❌ Failed to write report {}: {e}", report_path.display());
                    process::exit(1);
                }
                info!("📋 Report written: {}", report_path.display());
            }
            Err(e) => {
                error!("❌ Failed to serialize report: {e}");
                process::exit(1);
            }
        }
    }

    if summary.failed > 0 {
        process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("pdflock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Write-protects every PDF under a directory with unique, unrecorded owner passwords")
        .long_about(
            "Walks an input directory and writes a protected copy of every PDF to an \
             output directory, mirroring the tree structure. Each file gets a freshly \
             generated strong owner password that is discarded immediately: the copies \
             stay readable by anyone but cannot be modified. Files whose protected copy \
             already exists are skipped, never overwritten.",
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Input directory containing the PDFs")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Output directory for the protected copies")
                .required(true),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .action(ArgAction::SetTrue)
                .help("Also process subdirectories"),
        )
        .arg(
            Arg::new("password-length")
                .long("password-length")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("20")
                .help("Length of the generated passwords"),
        )
        .arg(
            Arg::new("stamp-info")
                .long("stamp-info")
                .action(ArgAction::SetTrue)
                .help("Stamp invoice metadata parsed from each file name into the PDF"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write the run summary as JSON (contains no passwords)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .value_parser(value_parser!(LogLevel))
                .default_value("info")
                .help("Set logging verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Suppress all output except errors and the final summary"),
        )
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(format!("pdflock={level}")))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn defaults_parse() {
        let matches = build_cli()
            .try_get_matches_from(["pdflock", "-i", "in", "-o", "out"])
            .unwrap();
        assert_eq!(*matches.get_one::<usize>("password-length").unwrap(), 20);
        assert!(!matches.get_flag("recursive"));
        assert!(!matches.get_flag("stamp-info"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(build_cli()
            .try_get_matches_from(["pdflock", "-i", "in", "-o", "out", "-q", "-v", "debug"])
            .is_err());
    }
}
