//! Classify command - report the format of each document.

use clap::Args;

use super::{converter, expand_inputs, read_document_text};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input files or glob patterns (PDF or text)
    #[arg(required = true)]
    inputs: Vec<String>,
}

pub fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let converter = converter(config_path)?;

    for path in expand_inputs(&args.inputs)? {
        let text = read_document_text(&converter, &path)?;
        println!("{}\t{}", path.display(), converter.classify(&text));
    }

    Ok(())
}
