//! `import` command handler.

use std::time::Duration;

use kioskmap_core::AppConfig;
use kioskmap_db::{MachineStore, MemoryMachineStore, PgMachineStore};
use kioskmap_geocode::Geocoder;
use kioskmap_import::{ImportPipeline, OpenDataClient, RecordTransformer};

fn build_pipeline<S: MachineStore>(
    config: &AppConfig,
    store: S,
) -> anyhow::Result<ImportPipeline<S>> {
    let transformer = RecordTransformer::new(Geocoder::from_app_config(config)?);
    let source = OpenDataClient::from_app_config(config)?;
    Ok(ImportPipeline::new(source, transformer, store).with_concurrency(config.import_concurrency))
}

/// Imports one page and prints the run summary as JSON.
///
/// With `dry_run` the records land in an in-memory store and are printed
/// instead of persisted; the database is not touched.
///
/// # Errors
///
/// Returns an error if a client cannot be built, the database is
/// unreachable, or the run fails at any stage.
pub(crate) async fn run_import(
    config: &AppConfig,
    page: u32,
    size: Option<u32>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let per_page = size.unwrap_or(config.import_page_size);
    anyhow::ensure!(page >= 1, "--page must be at least 1");
    anyhow::ensure!(per_page >= 1, "--size must be at least 1");
    let deadline = Duration::from_secs(config.import_deadline_secs);
    tracing::info!(page, per_page, dry_run, "cli: starting import");

    if dry_run {
        let store = MemoryMachineStore::new();
        let pipeline = build_pipeline(config, store.clone())?;
        let summary = pipeline.run_with_deadline(page, per_page, deadline).await?;

        println!("{}", serde_json::to_string_pretty(&store.find_all().await?)?);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        println!("dry run: nothing was written to the database");
        return Ok(());
    }

    let pool = kioskmap_db::connect_pool(
        &config.database_url,
        kioskmap_db::PoolConfig::from_app_config(config),
    )
    .await?;
    let pipeline = build_pipeline(config, PgMachineStore::new(pool.clone()))?;
    let result = pipeline.run_with_deadline(page, per_page, deadline).await;
    pool.close().await;

    let summary = result?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
