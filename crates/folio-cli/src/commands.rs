use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use folio_ingest::{
    read_volume_ids, ComparisonRunner, FolioConfig, IngestionCoordinator, VolumeRemover,
};
use folio_locate::{PairtreeLocator, VolumeLocator};
use folio_mets::{MetsParser, ParserOptions};
use folio_store::{FsVolumeStore, VolumeStore};
use folio_types::VolumeId;
use serde_json::json;
use tracing::debug;

use crate::cli::*;

/// Run the parsed command. Returns `false` when any volume failed.
pub async fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => FolioConfig::load(path)?,
        None => FolioConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Ingest(args) => cmd_ingest(config, args, &cli.format).await,
        Command::Compare(args) => cmd_compare(config, args, &cli.format).await,
        Command::Remove(args) => cmd_remove(config, args, &cli.format).await,
        Command::Locate(args) => cmd_locate(config, args, &cli.format),
        Command::Inspect(args) => cmd_inspect(config, args, &cli.format),
    }
}

fn locator(config: &FolioConfig, extra_roots: Vec<PathBuf>) -> Arc<dyn VolumeLocator> {
    let mut roots = extra_roots;
    roots.extend(config.locator.roots.iter().cloned());
    Arc::new(
        PairtreeLocator::new(roots)
            .with_suffixes(&config.locator.archive_suffix, &config.locator.metadata_suffix),
    )
}

fn store(config: &FolioConfig, root: Option<PathBuf>) -> Arc<dyn VolumeStore> {
    Arc::new(FsVolumeStore::new(root.unwrap_or_else(|| config.store.root.clone())))
}

fn volume_list(path: &Path) -> anyhow::Result<Vec<VolumeId>> {
    read_volume_ids(path).with_context(|| format!("reading volume list {}", path.display()))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_ingest(mut config: FolioConfig, args: IngestArgs, format: &OutputFormat) -> anyhow::Result<bool> {
    if let Some(workers) = args.workers {
        config.ingest.workers = workers;
    }
    if args.no_checksums {
        config.ingest.verify_checksums = false;
    }
    let volumes = volume_list(&args.list)?;
    let coordinator = IngestionCoordinator::new(
        store(&config, args.store),
        locator(&config, Vec::new()),
        config.ingest.clone(),
    );
    coordinator.ensure_target().await.context("preparing store")?;

    let report = coordinator.ingest_batch(&volumes).await;

    if *format == OutputFormat::Json {
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(v) => json!({
                    "volume": o.volume_id,
                    "attempts": o.attempts,
                    "status": "ingested",
                    "pages": v.pages,
                    "byte_count": v.byte_count,
                    "character_count": v.character_count,
                }),
                Err(err) => json!({
                    "volume": o.volume_id,
                    "attempts": o.attempts,
                    "status": "failed",
                    "reason": err.reason().as_str(),
                    "error": err.to_string(),
                }),
            })
            .collect();
        print_json(&json!({
            "succeeded": report.success_count(),
            "failed": report.failure_count(),
            "volumes": outcomes,
        }))?;
        return Ok(report.all_succeeded());
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(v) => println!(
                "{} {}  {} pages, {} bytes, {} chars",
                "✓".green().bold(),
                outcome.volume_id.to_string().cyan(),
                v.pages,
                v.byte_count,
                v.character_count
            ),
            Err(err) => println!(
                "{} {}  {} after {} attempt(s): {}",
                "✗".red().bold(),
                outcome.volume_id.to_string().cyan(),
                err.reason().as_str().yellow(),
                outcome.attempts,
                err
            ),
        }
    }
    println!(
        "\n{} ingested, {} failed",
        report.success_count().to_string().green().bold(),
        report.failure_count().to_string().red().bold()
    );
    Ok(report.all_succeeded())
}

async fn cmd_compare(config: FolioConfig, args: BatchArgs, format: &OutputFormat) -> anyhow::Result<bool> {
    let volumes = volume_list(&args.list)?;
    let runner = ComparisonRunner::new(
        store(&config, args.store),
        locator(&config, Vec::new()),
        &config.ingest,
    );
    let report = runner.compare_batch(&volumes).await;
    let all_ok = report.failures().next().is_none();

    if *format == OutputFormat::Json {
        let results: Vec<_> = report
            .results
            .iter()
            .map(|(id, result)| match result {
                Ok(r) => json!({ "volume": id, "comparison": r }),
                Err(err) => json!({
                    "volume": id,
                    "reason": err.reason().as_str(),
                    "error": err.to_string(),
                }),
            })
            .collect();
        print_json(&json!(results))?;
        return Ok(all_ok);
    }

    for (drift, ids) in report.by_drift() {
        println!("{} ({})", drift.as_str().bold(), ids.len());
        for id in ids {
            println!("  {}", id.to_string().cyan());
        }
    }
    for (id, r) in report.results.iter().filter_map(|(id, r)| r.as_ref().ok().map(|r| (id, r))) {
        if !r.to_remove.is_empty() || !r.to_add.is_empty() {
            println!(
                "  {} stored {} / delivered {}: {} to remove, {} to add",
                id.to_string().cyan(),
                r.prior.len(),
                r.new.len(),
                r.to_remove.len().to_string().red(),
                r.to_add.len().to_string().green()
            );
        }
    }
    for (id, err) in report.failures() {
        println!("{} {}  {}: {}", "✗".red().bold(), id.to_string().cyan(), err.reason().as_str().yellow(), err);
    }
    Ok(all_ok)
}

async fn cmd_remove(config: FolioConfig, args: BatchArgs, format: &OutputFormat) -> anyhow::Result<bool> {
    let volumes = volume_list(&args.list)?;
    let report = VolumeRemover::new(store(&config, args.store))
        .remove_batch(&volumes)
        .await;
    let all_ok = report.failed.is_empty();

    if *format == OutputFormat::Json {
        let failed: Vec<_> = report
            .failed
            .iter()
            .map(|(id, err)| json!({ "volume": id, "error": err.to_string() }))
            .collect();
        print_json(&json!({
            "removed": report.removed,
            "absent": report.absent,
            "failed": failed,
        }))?;
        return Ok(all_ok);
    }

    for id in &report.removed {
        println!("{} removed {}", "✓".green().bold(), id.to_string().cyan());
    }
    for id in &report.absent {
        println!("{} not stored {}", "-".dimmed(), id.to_string().cyan());
    }
    for (id, err) in &report.failed {
        println!("{} {}  {}", "✗".red().bold(), id.to_string().cyan(), err);
    }
    Ok(all_ok)
}

fn cmd_locate(config: FolioConfig, args: LocateArgs, format: &OutputFormat) -> anyhow::Result<bool> {
    let volume = VolumeId::parse(&args.volume)?;
    let files = locator(&config, args.root).locate(&volume)?;

    if *format == OutputFormat::Json {
        print_json(&json!({
            "volume": volume,
            "archive": files.archive,
            "metadata": files.metadata,
        }))?;
    } else {
        println!("Volume {}", volume.to_string().cyan().bold());
        println!("  archive:  {}", files.archive.display());
        println!("  metadata: {}", files.metadata.display());
    }
    Ok(true)
}

fn cmd_inspect(config: FolioConfig, args: InspectArgs, format: &OutputFormat) -> anyhow::Result<bool> {
    let volume = VolumeId::parse(&args.volume)?;
    let parser = MetsParser::new(ParserOptions {
        text_file_group: config.ingest.text_file_group,
    });
    let record = parser.parse_file(volume, &args.file)?;

    if *format == OutputFormat::Json {
        print_json(&json!({
            "volume": record.volume_id(),
            "page_count": record.page_count(),
            "pages": record.pages(),
        }))?;
        return Ok(true);
    }

    println!(
        "Volume {}: {} pages",
        record.volume_id().to_string().cyan().bold(),
        record.page_count().to_string().bold()
    );
    for page in record.pages() {
        let label = page.label.as_deref().unwrap_or("-");
        println!(
            "  {:>5}  {:<8} {}  {} bytes  {} {}",
            page.order,
            label.yellow(),
            page.filename,
            page.byte_count,
            page.checksum_type.dimmed(),
            page.checksum.dimmed()
        );
        if !page.features.is_empty() {
            println!("         {}", page.features.join(", ").dimmed());
        }
    }
    Ok(true)
}
