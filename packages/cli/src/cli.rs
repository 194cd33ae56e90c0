//! Command-line interface for condoc.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use condoc_engine::{Condition, DataContext};
use console::style;

use crate::config::{default_output_path, DocumentFormat};
use crate::error::Result;
use crate::render::render_file;

/// condoc - Render <IF>/<ELSE> conditional templates against JSON data.
#[derive(Parser)]
#[command(name = "condoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve all conditional tags in a document and save the result.
    Render {
        /// Template document (.docx, WordprocessingML .xml or .json)
        input: PathBuf,

        /// Data as a path to a JSON file or literal JSON text
        #[arg(short, long)]
        data: String,

        /// Output path (default: <input stem>_parsed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format (default: detected from the input extension)
        #[arg(short, long, value_enum)]
        format: Option<DocumentFormat>,
    },

    /// Evaluate conditions against the data and print the outcome.
    Eval {
        /// Data as a path to a JSON file or literal JSON text
        #[arg(short, long)]
        data: String,

        /// Conditions in KEY or KEY=VALUE form
        #[arg(required = true)]
        conditions: Vec<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            data,
            output,
            format,
        } => render_command(&input, &data, output.as_deref(), format),
        Commands::Eval { data, conditions } => eval_command(&data, &conditions),
    }
}

/// Execute the render command.
fn render_command(
    input: &Path,
    data: &str,
    output: Option<&Path>,
    format: Option<DocumentFormat>,
) -> Result<()> {
    let format = DocumentFormat::resolve(format, input)?;
    let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);

    // Load the data before touching the document: a bad data file aborts the pass
    let data = DataContext::new(data)?;

    println!(
        "{} {}",
        style("Rendering").bold(),
        style(input.display()).cyan()
    );

    let report = render_file(&data, input, &output, format)?;
    let summary = report.summary;

    println!("  Elements: {}", summary.elements);
    println!("  Markers removed: {}", summary.markers_removed);
    println!("  Content removed: {}", summary.content_removed);
    println!("  Inline substitutions: {}", summary.substitutions);
    println!("  Remaining: {}", style(report.remaining).green());
    println!();
    println!("{} {}", style("Saved to:").green().bold(), output.display());

    Ok(())
}

/// Execute the eval command.
fn eval_command(data: &str, conditions: &[String]) -> Result<()> {
    let data = DataContext::new(data)?;

    for text in conditions {
        let condition = Condition::parse(text);
        let resolved = data.resolve(&condition.key);
        let outcome = if condition.evaluate(&data) {
            style("true").green()
        } else {
            style("false").red()
        };
        println!("{text}: {outcome} ({} = {resolved:?})", condition.key);
    }

    Ok(())
}
