//! Background job scheduler.
//!
//! Registers the recurring import when `KIOSKMAP_IMPORT_SCHEDULE` is set.

use std::{sync::Arc, time::Duration};

use kioskmap_core::AppConfig;
use kioskmap_db::MachineStore;
use kioskmap_import::ImportPipeline;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it stops all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot start or the cron
/// expression is invalid.
pub async fn build_scheduler<S: MachineStore>(
    pipeline: Arc<ImportPipeline<S>>,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match config.import_schedule.as_deref() {
        Some(cron) => register_import_job(&scheduler, cron, pipeline, &config).await?,
        None => tracing::info!("scheduler: KIOSKMAP_IMPORT_SCHEDULE not set; no import job"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Imports page 1 with the configured page size on each tick. Failures are
/// logged; the next tick runs regardless.
async fn register_import_job<S: MachineStore>(
    scheduler: &JobScheduler,
    cron: &str,
    pipeline: Arc<ImportPipeline<S>>,
    config: &AppConfig,
) -> Result<(), JobSchedulerError> {
    let per_page = config.import_page_size;
    let deadline = Duration::from_secs(config.import_deadline_secs);

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pipeline = Arc::clone(&pipeline);

        Box::pin(async move {
            tracing::info!("scheduler: starting import run");
            match pipeline.run_with_deadline(1, per_page, deadline).await {
                Ok(summary) => tracing::info!(
                    imported = summary.imported,
                    unresolved_coordinates = summary.unresolved_coordinates,
                    "scheduler: import run complete"
                ),
                Err(e) => tracing::error!(
                    kind = %e.kind(),
                    error = %e,
                    "scheduler: import run failed"
                ),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, per_page, "scheduler: registered import job");
    Ok(())
}
