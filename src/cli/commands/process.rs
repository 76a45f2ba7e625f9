//! Process command - run the full ingestion pipeline on one PDF.

use anyhow::anyhow;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::args::ProcessArgs;
use crate::config::Settings;
use crate::pipeline::{
    LocalBackend, Pipeline, PipelineConfig, PipelineEvent, PipelineOutcome, PipelineState,
    PipelineSummary,
};

/// Run process command.
pub fn run(args: &ProcessArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    args.apply(&mut settings);

    let backend = LocalBackend::new(&settings.embedding).with_in_memory_store(args.dry_run);
    let mut pipeline = Pipeline::new(PipelineConfig::from_settings(&settings), backend);

    let show_bar = !args.no_progress && console::Term::stderr().is_term();
    let mut bar: Option<ProgressBar> = None;

    let outcome = pipeline.run_with_progress(&args.file, |event| {
        report_event(event, show_bar, &mut bar);
    });

    if let Some(bar) = bar.take() {
        bar.finish_and_clear();
    }

    match outcome {
        PipelineOutcome::Completed(summary) => {
            print_summary(&summary, &settings, args.dry_run);
            Ok(())
        }
        PipelineOutcome::Failed { stage, error } => {
            eprintln!(
                "{} {} failed during {}",
                style("✗").red().bold(),
                args.file.display(),
                stage
            );
            Err(anyhow!(error))
        }
    }
}

fn report_event(event: &PipelineEvent, show_bar: bool, bar: &mut Option<ProgressBar>) {
    match event {
        PipelineEvent::StateChanged { to, .. } => {
            let marker = match to {
                PipelineState::Extracting => "[1/4] Extracting text",
                PipelineState::Chunking => "[2/4] Chunking",
                PipelineState::Embedding => "[3/4] Generating embeddings",
                PipelineState::Storing => "[4/4] Storing records",
                _ => return,
            };
            eprintln!("{}", style(marker).cyan().bold());
        }
        PipelineEvent::PagesExtracted { pages, chars } => {
            eprintln!("      {pages} pages, {chars} characters");
        }
        PipelineEvent::ChunksCreated { chunks } => {
            eprintln!("      {chunks} chunks");
        }
        PipelineEvent::ModelLoaded { model, dimension } => {
            eprintln!("      model {model} ({dimension} dimensions)");
        }
        PipelineEvent::EmbeddingProgress { current, total } => {
            if !show_bar {
                return;
            }
            let bar = bar.get_or_insert_with(|| embedding_bar(*total as u64));
            bar.set_position(*current as u64);
        }
        PipelineEvent::RecordsStored { count, collection } => {
            if let Some(bar) = bar.take() {
                bar.finish_and_clear();
            }
            eprintln!("      {count} records upserted into '{collection}'");
        }
    }
}

fn embedding_bar(total: u64) -> ProgressBar {
    let bar_style = ProgressStyle::with_template(
        "      [{bar:28.cyan/blue}] {pos}/{len} chunks embedded ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏ ");

    ProgressBar::new(total).with_style(bar_style)
}

fn print_summary(summary: &PipelineSummary, settings: &Settings, dry_run: bool) {
    println!(
        "{} Stored {} records from {} ({} pages) in {:.2?}",
        style("✓").green().bold(),
        summary.records_stored,
        summary.source.display(),
        summary.pages,
        summary.elapsed
    );
    if dry_run {
        println!("  dry run: nothing was written to disk");
    } else {
        println!(
            "  collection '{}' at {}",
            summary.collection,
            settings.store.db_path.display()
        );
    }
}
