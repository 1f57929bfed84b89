//! Batch command - import every invoice matching a glob pattern.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use ispbill_core::{ImportRequest, Importer, InMemoryBillStore, Period, ProviderId};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    pub input: String,

    /// Provider id the invoices belong to
    #[arg(short, long)]
    pub provider: u32,

    /// Billing period start (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Billing period end (YYYY-MM-DD)
    #[arg(long)]
    pub to: NaiveDate,

    /// Services CSV backing the service directory
    #[arg(short, long)]
    pub services: PathBuf,

    /// Directory for per-file JSON results
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Result of importing a single file.
struct FileResult {
    path: PathBuf,
    lines: usize,
    warnings: usize,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let directory = super::load_services(&args.services)?;
    let period = Period::new(args.from, args.to)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    if files.is_empty() {
        anyhow::bail!("no files match {}", args.input);
    }

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let importer = Importer::new(&directory, config);
    // One store for the whole batch, so duplicate uploads inside the
    // batch are caught by the fingerprint check.
    let mut store = InMemoryBillStore::new();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        pb.set_message(path.display().to_string());

        let result = import_file(&importer, &mut store, &path, args.provider, period);
        if let Some(reason) = &result.error {
            error!(file = %path.display(), reason, "import failed");
            if !args.continue_on_error {
                pb.abandon();
                anyhow::bail!("import failed for {}: {reason}", path.display());
            }
        } else if let Some(dir) = &args.output_dir {
            // The bill just imported is the newest one in the store.
            let out = dir.join(file_stem(&path) + ".json");
            if let Some(bill) = store.bills().last() {
                fs::write(&out, serde_json::to_string_pretty(bill)?)?;
            }
        }

        results.push(result);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    print_summary(&results);
    Ok(())
}

fn import_file(
    importer: &Importer<'_>,
    store: &mut InMemoryBillStore,
    path: &PathBuf,
    provider: u32,
    period: Period,
) -> FileResult {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return FileResult {
                path: path.clone(),
                lines: 0,
                warnings: 0,
                error: Some(e.to_string()),
            }
        }
    };

    match importer.import_invoice(
        store,
        &ImportRequest {
            provider_id: ProviderId(provider),
            period,
            filename,
            bytes,
        },
    ) {
        Ok(outcome) => {
            if !outcome.diagnostics.is_empty() {
                warn!(
                    file = %path.display(),
                    warnings = outcome.diagnostics.len(),
                    "import finished with warnings"
                );
            }
            FileResult {
                path: path.clone(),
                lines: outcome.bill.lines().len(),
                warnings: outcome.diagnostics.len(),
                error: None,
            }
        }
        Err(e) => FileResult {
            path: path.clone(),
            lines: 0,
            warnings: 0,
            error: Some(e.to_string()),
        },
    }
}

fn file_stem(path: &PathBuf) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bill".to_string())
}

fn print_summary(results: &[FileResult]) {
    let ok = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - ok;

    println!();
    println!(
        "{} {} imported, {} failed",
        style("Summary:").bold(),
        ok,
        failed
    );
    for result in results {
        match &result.error {
            Some(reason) => println!(
                "  {} {} - {}",
                style("FAIL").red(),
                result.path.display(),
                reason
            ),
            None => println!(
                "  {}  {} - {} line(s), {} warning(s)",
                style("OK").green(),
                result.path.display(),
                result.lines,
                result.warnings
            ),
        }
    }
}
