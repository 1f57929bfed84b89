//! Detect command - show which extractor a file would dispatch to.

use std::path::PathBuf;

use clap::Args;
use console::style;

use ispbill_core::FileFormat;

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Files to classify
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

pub fn run(args: DetectArgs) -> anyhow::Result<()> {
    let mut unsupported = 0;

    for path in &args.inputs {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match FileFormat::detect(&name) {
            Ok(format) => println!("{}: {}", path.display(), style(format).green()),
            Err(_) => {
                println!("{}: {}", path.display(), style("unsupported").red());
                unsupported += 1;
            }
        }
    }

    if unsupported > 0 {
        anyhow::bail!("{unsupported} file(s) unsupported");
    }
    Ok(())
}
