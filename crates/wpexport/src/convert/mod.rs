use crate::prelude::{println, *};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use wpexport_core::report::ExportReport;

mod render;

pub use render::{convert_data, ConvertOutput};

pub const URLS_CSV_FILE: &str = "out_exported.csv";
pub const ATTACHMENTS_CSV_FILE: &str = "out_exported_attachments.csv";

#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// WordPress eXtended RSS export to convert
    #[arg(short, long, env = "WPEXPORT_INPUT", default_value = "wordpress.xml")]
    pub input: PathBuf,

    /// Directory receiving documents and comment records
    #[arg(short, long, env = "WPEXPORT_OUT", default_value = "out")]
    pub out: PathBuf,

    /// Directory receiving the CSV manifests
    #[arg(long, env = "WPEXPORT_REPORTS_DIR", default_value = ".")]
    pub reports_dir: PathBuf,

    /// TOML file overriding the site configuration
    #[arg(short, long, env = "WPEXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run the whole conversion and report, without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// What a conversion wrote to disk
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub written: usize,
    pub failed: usize,
}

pub fn run(options: ConvertOptions, global: crate::Global) -> Result<()> {
    let config = crate::pipeline::load_config(options.config.as_deref())?;
    let xml = crate::pipeline::read_export(&options.input)
        .inspect_err(|err| log::error!("{err:#}"))?;

    let output = convert_data(&xml, &config)?;

    let stats = if options.dry_run {
        None
    } else {
        Some(write_output(&output, &options.out, &options.reports_dir)?)
    };

    print_report(&output, &options, stats.as_ref(), global.verbose);

    Ok(())
}

/// Write documents, comment records, and both CSV manifests
///
/// A file that cannot be written is logged and skipped; files already written
/// stay in place. Failing to write a manifest ends the run.
pub fn write_output(output: &ConvertOutput, out: &Path, reports_dir: &Path) -> Result<WriteStats> {
    let mut stats = WriteStats::default();

    for file in output.documents.iter().chain(output.comments.iter()) {
        let path = out.join(&file.path);
        match write_file(&path, &file.contents) {
            Ok(()) => stats.written += 1,
            Err(err) => {
                log::error!("{err:#}");
                stats.failed += 1;
            }
        }
    }

    write_reports(&output.report, reports_dir)?;

    Ok(stats)
}

fn write_reports(report: &ExportReport, reports_dir: &Path) -> Result<()> {
    write_file(&reports_dir.join(URLS_CSV_FILE), &report.urls_csv())?;
    write_file(
        &reports_dir.join(ATTACHMENTS_CSV_FILE),
        &report.attachments_csv(),
    )?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| f!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| f!("Failed to write {}", path.display()))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

fn print_report(
    output: &ConvertOutput,
    options: &ConvertOptions,
    stats: Option<&WriteStats>,
    verbose: bool,
) {
    crate::summary::print_classification(&output.classification, verbose);

    if verbose {
        print_header("Exported URLs");
        for row in output.report.sorted_urls() {
            println!(
                "{} {} {}",
                row.locale.bright_black(),
                row.link.cyan(),
                row.title.bright_white()
            );
        }
    }

    print_header("Output");
    println!(
        "{}: {}",
        "Documents".green(),
        output.documents.len().to_string().bright_cyan().bold()
    );
    println!(
        "{}: {}",
        "Comment records".green(),
        output.comments.len().to_string().bright_cyan().bold()
    );
    if !output.skipped.is_empty() {
        println!(
            "{}: {}",
            "Excluded".green(),
            output.skipped.join(", ").bright_black()
        );
    }
    if output.decode_fallbacks > 0 {
        println!(
            "{}: {}",
            "Meta decode fallbacks".green(),
            output.decode_fallbacks.to_string().yellow()
        );
    }

    match stats {
        Some(stats) => {
            println!(
                "{}: {} in {}",
                "Written".green(),
                stats.written.to_string().bright_cyan().bold(),
                options.out.display().to_string().cyan()
            );
            if stats.failed > 0 {
                println!(
                    "{}: {}",
                    "Failed".red(),
                    stats.failed.to_string().red().bold()
                );
            }
            println!(
                "{}: {}, {}",
                "Manifests".green(),
                options.reports_dir.join(URLS_CSV_FILE).display(),
                options.reports_dir.join(ATTACHMENTS_CSV_FILE).display()
            );
        }
        None => println!("\n{}", "Dry run, nothing written.".yellow()),
    }
}
