use crate::commands::read_corrected;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use proofmark_differ::{
    diff_documents, ChangeStatus, DiffMode, DiffOutput, DiffSegment, Subject, Target,
};
use proofmark_editor::Document;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Original document
    pub document: PathBuf,

    /// File holding the corrected text, `-` for stdin
    #[arg(short, long)]
    pub corrected: String,

    /// Treat the corrected text as markup and diff tree against tree
    #[arg(long)]
    pub structural: bool,

    /// Print the raw segments as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn diff(args: DiffArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if args.structural {
        config.diff.mode = DiffMode::Structural;
    }

    let document = Document::load(&args.document)
        .with_context(|| format!("Failed to load {}", args.document.display()))?;
    let corrected = read_corrected(&args.corrected)?;
    info!(
        document = %args.document.display(),
        mode = ?config.diff.mode,
        "Diffing document"
    );

    let output = diff_documents(document.root(), Target::Text(&corrected), &config.diff);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render(&output));
        eprintln!(
            "{} added, {} removed, {} unchanged",
            output.stats.added.to_string().green(),
            output.stats.removed.to_string().red(),
            output.stats.unchanged
        );
    }
    Ok(())
}

/// Inline view of the segments: removed words struck through in red,
/// added words underlined in green
fn render(output: &DiffOutput) -> String {
    output.segments.iter().map(render_segment).collect()
}

fn render_segment(segment: &DiffSegment) -> String {
    match &segment.subject {
        Subject::Text => {
            let text = segment.text_str();
            match segment.status {
                ChangeStatus::Unchanged => text.to_string(),
                ChangeStatus::Added => text.green().underline().to_string(),
                ChangeStatus::Removed => text.red().strikethrough().to_string(),
            }
        }
        Subject::Subtree { node } => {
            let label = format!("[{} {}]", node.node_type.name(), segment.text_str());
            match segment.status {
                ChangeStatus::Added => format!("\n{}\n", label.green()),
                _ => format!("\n{}\n", label.red()),
            }
        }
        Subject::Container { .. } => String::new(),
    }
}
