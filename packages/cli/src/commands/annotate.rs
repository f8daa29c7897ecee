use crate::commands::read_corrected;
use crate::config::{Config, OutputFormat};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use proofmark_differ::DiffMode;
use proofmark_editor::{
    AnnotationMode, CorrectionSession, Document, DocumentFormat, Pipeline, SyncOutcome,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Write correction markers into the document
    Rebuild,
    /// Print decorations and leave the document alone
    Decorate,
}

impl From<ModeArg> for AnnotationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Rebuild => AnnotationMode::Rebuild,
            ModeArg::Decorate => AnnotationMode::Decorate,
        }
    }
}

#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Document to annotate (.json for a JSON tree, markup otherwise)
    pub document: PathBuf,

    /// File holding the corrected text, `-` for stdin
    #[arg(short, long)]
    pub corrected: String,

    /// Annotation mode (overrides config)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Treat the corrected text as markup and diff tree against tree
    #[arg(long)]
    pub structural: bool,

    /// Write the annotated document back instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

pub fn annotate(args: AnnotateArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if args.structural {
        config.diff.mode = DiffMode::Structural;
    }

    let document = Document::load(&args.document)
        .with_context(|| format!("Failed to load {}", args.document.display()))?;
    let corrected = read_corrected(&args.corrected)?;
    info!(
        document = %args.document.display(),
        mode = ?config.mode,
        diff_mode = ?config.diff.mode,
        corrected_len = corrected.len(),
        "Annotating document"
    );

    let format = args
        .format
        .or(config.format)
        .map(|format| match format {
            OutputFormat::Json => DocumentFormat::Json,
            OutputFormat::Markup => DocumentFormat::Markup,
        })
        .unwrap_or(document.format());

    let pipeline = Pipeline::new(config.diff, config.annotator);
    let mut session = CorrectionSession::new(
        args.document.display().to_string(),
        document,
        config.mode,
        pipeline,
    );

    let outcome = session.set_corrected_text(corrected)?;

    let mode = session.mode;
    match mode {
        AnnotationMode::Rebuild => {
            report(&outcome);
            let mut document = session.into_document();
            if args.write {
                document.save()?;
                eprintln!(
                    "  {} {}",
                    "✓".green(),
                    document
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                );
            } else {
                println!("{}", format.render(document.root())?);
            }
        }
        AnnotationMode::Decorate => {
            let decorations = session.decorations();
            eprintln!(
                "{} {} decorations",
                "✓".green(),
                decorations.len().to_string().bold()
            );
            println!("{}", serde_json::to_string_pretty(decorations)?);
        }
    }

    Ok(())
}

fn report(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Annotated { stats, .. } => {
            eprintln!(
                "{} {} added, {} removed, {} unchanged",
                "✓".green(),
                stats.added.to_string().green(),
                stats.removed.to_string().red(),
                stats.unchanged
            );
            if stats.exhausted_levels > 0 {
                eprintln!(
                    "{}",
                    format!(
                        "⚠️  {} level(s) had no matching nodes, compared as whole subtrees",
                        stats.exhausted_levels
                    )
                    .yellow()
                );
            }
        }
        SyncOutcome::Skipped => {
            eprintln!("{}", "⚠️  Corrected text is empty, nothing to annotate".yellow());
        }
    }
}
