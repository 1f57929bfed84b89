//! Import command - run one invoice through the pipeline.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::info;

use ispbill_core::{
    ImportOutcome, ImportRequest, Importer, InMemoryBillStore, Period, ProviderId,
};

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// Invoice file (PDF, ZIP, or CSV)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Provider id the invoice belongs to
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

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ImportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let directory = super::load_services(&args.services)?;

    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }

    let period = Period::new(args.from, args.to)?;
    let bytes = fs::read(&args.input)?;
    let filename = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!(file = %args.input.display(), provider = args.provider, "importing invoice");

    let importer = Importer::new(&directory, config);
    let mut store = InMemoryBillStore::new();
    let outcome = importer.import_invoice(
        &mut store,
        &ImportRequest {
            provider_id: ProviderId(args.provider),
            period,
            filename,
            bytes,
        },
    )?;

    let rendered = render(&outcome, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)?;
            println!("wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Render an import outcome in the requested format.
pub fn render(outcome: &ImportOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => Ok(render_text(outcome)),
    }
}

fn render_text(outcome: &ImportOutcome) -> String {
    let bill = &outcome.bill;
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} ({} to {}, {} days)\n",
        style("Bill:").bold(),
        bill.name,
        bill.period.date_from,
        bill.period.date_to,
        bill.period.total_days(),
    ));
    out.push_str(&format!(
        "{} {} lines, total {}\n",
        style("Matched:").bold(),
        bill.lines().len(),
        bill.total_amount(),
    ));

    for line in bill.lines() {
        let key = line
            .line_number
            .as_deref()
            .or(line.billing_account_number.as_deref())
            .unwrap_or("-");
        out.push_str(&format!("  service {:>4}  {:>12}  {}\n", line.service_id, line.amount, key));
    }

    if !outcome.diagnostics.is_empty() {
        out.push_str(&format!(
            "{}\n",
            style(format!("{} warning(s):", outcome.diagnostics.len())).yellow()
        ));
        for warning in &outcome.diagnostics {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out
}
