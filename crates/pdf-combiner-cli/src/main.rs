//! PDF Combiner CLI - combine the PDFs of a folder into the Downloads folder.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_combiner_core::{AppConfig, Combiner, combine_folder_to_disk};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pdf-combine")]
#[command(author, version, about = "Combine PDFs of a folder in a chosen order", long_about = None)]
struct Args {
    /// Folder containing the PDFs to combine
    input_folder: PathBuf,

    /// File name of the combined PDF (saved into the Downloads folder)
    output_filename: String,

    /// Files to combine, in order (default: every PDF, alphabetically)
    files: Vec<String>,

    /// Save into this directory instead of the Downloads folder
    #[arg(long, env = "PDF_COMBINER_SAVE_DIR")]
    save_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not show a progress bar
    #[arg(long)]
    no_progress: bool,
}

fn run(args: Args) -> Result<PathBuf> {
    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    config.output_filename = args.output_filename;
    if args.save_dir.is_some() {
        config.save_dir = args.save_dir;
    }
    config.validate().context("Invalid output file name")?;

    info!(
        "Combining {} from {}",
        if args.files.is_empty() {
            "all PDFs".to_string()
        } else {
            format!("{} files", args.files.len())
        },
        args.input_folder.display()
    );

    let mut combiner = Combiner::new(config.merge.clone());

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("#>-"),
    );
    let progress = pb.clone();
    combiner = combiner.with_progress(Box::new(move |done, total| {
        progress.set_length(total as u64);
        progress.set_position(done as u64);
    }));

    let result = combine_folder_to_disk(
        &combiner,
        &args.input_folder,
        &args.files,
        &config.output_filename,
        config.save_dir.as_deref(),
    );
    pb.finish_and_clear();

    let (path, combined) = result?;

    for entry in &combined.skipped {
        warn!("Skipped {}", entry);
    }
    info!(
        "Merged {} files, {} pages",
        combined.files_merged, combined.page_count
    );

    Ok(path)
}

/// Line printed for a finished run, and the matching exit code.
fn report(result: &Result<PathBuf>) -> (String, ExitCode) {
    match result {
        Ok(path) => (
            format!("Combined PDF saved to {}", path.display()),
            ExitCode::SUCCESS,
        ),
        Err(e) => (format!("Error: {e:#}"), ExitCode::FAILURE),
    }
}

/// Usage errors are reported like run errors, as `Error: <message>`.
fn usage_error_message(e: &clap::Error) -> String {
    let rendered = e.render().to_string();
    let message = rendered.strip_prefix("error: ").unwrap_or(&rendered);
    format!("Error: {}", message.trim_end())
}

fn main() -> ExitCode {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    // Usage errors exit with 1 like every other failure; --help/--version exit 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", usage_error_message(&e));
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (message, code) = report(&run(args));

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("{message}");
    }

    code
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["pdf-combine"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_order_is_kept() {
        let args =
            Args::try_parse_from(["pdf-combine", "in", "out.pdf", "b.pdf", "a.pdf"]).unwrap();
        assert_eq!(args.input_folder, PathBuf::from("in"));
        assert_eq!(args.output_filename, "out.pdf");
        assert_eq!(args.files, vec!["b.pdf", "a.pdf"]);
    }

    #[test]
    fn test_missing_output_name_is_usage_error() {
        let err = Args::try_parse_from(["pdf-combine", "in"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let err = Args::try_parse_from(["pdf-combine", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_output_name_with_separator_is_rejected() {
        let args = Args::try_parse_from(["pdf-combine", "in", "sub/out.pdf", "--no-progress"])
            .unwrap();
        let err = run(args).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid output file name"));
    }

    #[test]
    fn test_usage_error_message_matches_run_errors() {
        let err = Args::try_parse_from(["pdf-combine", "in"]).unwrap_err();
        let message = usage_error_message(&err);
        assert!(message.starts_with("Error: "));
        assert!(!message.contains("error: "));
        assert!(message.contains("OUTPUT_FILENAME"));
    }

    #[test]
    fn test_report_success() {
        let (message, code) = report(&Ok(PathBuf::from("/tmp/out/combined.pdf")));
        assert_eq!(message, "Combined PDF saved to /tmp/out/combined.pdf");
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_report_no_valid_sources() {
        let input = TempDir::new().unwrap();
        let save = TempDir::new().unwrap();
        fs::write(input.path().join("notes.txt"), b"not a pdf").unwrap();
        let args = parse(&[
            input.path().to_str().unwrap(),
            "out.pdf",
            "--save-dir",
            save.path().to_str().unwrap(),
            "--no-progress",
        ]);

        let (message, code) = report(&run(args));

        assert_eq!(message, "Error: no valid PDFs found to merge");
        assert_eq!(code, ExitCode::FAILURE);
        assert!(!save.path().join("out.pdf").exists());
    }

    #[test]
    fn test_report_missing_input_folder() {
        let save = TempDir::new().unwrap();
        let missing = save.path().join("does-not-exist");
        let args = parse(&[
            missing.to_str().unwrap(),
            "out.pdf",
            "--save-dir",
            save.path().to_str().unwrap(),
            "--no-progress",
        ]);

        let (message, code) = report(&run(args));

        assert!(message.starts_with("Error: cannot read input folder"), "{message}");
        assert_eq!(code, ExitCode::FAILURE);
    }
}
