//! Import run orchestration.

use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use kioskmap_db::MachineStore;
use serde::Serialize;

use crate::client::OpenDataClient;
use crate::error::ImportError;
use crate::transform::RecordTransformer;
use crate::types::DataPage;

/// Stages of one import run, in order. A run ends in either
/// [`ImportStage::Committed`] or [`ImportStage::RolledBack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Idle,
    Fetching,
    Parsing,
    Transforming,
    Persisting,
    Committed,
    RolledBack,
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImportStage::Idle => "idle",
            ImportStage::Fetching => "fetching",
            ImportStage::Parsing => "parsing",
            ImportStage::Transforming => "transforming",
            ImportStage::Persisting => "persisting",
            ImportStage::Committed => "committed",
            ImportStage::RolledBack => "rolled_back",
        };
        f.write_str(name)
    }
}

/// Outcome of a committed import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub page: u32,
    pub per_page: u32,
    /// Records persisted by this run.
    pub imported: usize,
    /// Records stored with the `(0, 0)` coordinate sentinel.
    pub unresolved_coordinates: usize,
    /// Records with resolved coordinates but no region.
    pub unresolved_regions: usize,
    /// Dataset size reported by the source, if any.
    pub total_count: Option<u64>,
}

/// Fetch, transform and atomically persist one page of the dataset.
#[derive(Debug, Clone)]
pub struct ImportPipeline<S> {
    source: OpenDataClient,
    transformer: RecordTransformer,
    store: S,
    concurrency: usize,
}

impl<S: MachineStore> ImportPipeline<S> {
    /// A pipeline that transforms rows strictly one at a time.
    #[must_use]
    pub fn new(source: OpenDataClient, transformer: RecordTransformer, store: S) -> Self {
        Self {
            source,
            transformer,
            store,
            concurrency: 1,
        }
    }

    /// Transforms up to `concurrency` rows at once. Output order still
    /// matches source order. Zero is treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn transformer(&self) -> &RecordTransformer {
        &self.transformer
    }

    /// Runs one import of `page` with `per_page` rows.
    ///
    /// Row transformation cannot fail; a station that does not geocode is
    /// stored with unresolved coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when fetching, parsing or persisting fails.
    /// Nothing from the run is committed in that case.
    pub async fn run(&self, page: u32, per_page: u32) -> Result<ImportSummary, ImportError> {
        let started = Instant::now();
        tracing::info!(stage = %ImportStage::Idle, page, per_page, "import run starting");

        match self.execute(page, per_page).await {
            Ok(summary) => {
                tracing::info!(
                    stage = %ImportStage::Committed,
                    page,
                    imported = summary.imported,
                    unresolved_coordinates = summary.unresolved_coordinates,
                    unresolved_regions = summary.unresolved_regions,
                    elapsed = ?started.elapsed(),
                    "import run committed"
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(
                    stage = %ImportStage::RolledBack,
                    page,
                    kind = %e.kind(),
                    error = %e,
                    elapsed = ?started.elapsed(),
                    "import run rolled back"
                );
                Err(e)
            }
        }
    }

    /// [`ImportPipeline::run`] bounded by `deadline`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DeadlineExceeded`] if the run does not finish in
    /// time; the in-flight run is dropped and nothing is committed. Other
    /// errors as for [`ImportPipeline::run`].
    pub async fn run_with_deadline(
        &self,
        page: u32,
        per_page: u32,
        deadline: Duration,
    ) -> Result<ImportSummary, ImportError> {
        if let Ok(result) = tokio::time::timeout(deadline, self.run(page, per_page)).await {
            result
        } else {
            let err = ImportError::DeadlineExceeded { deadline };
            tracing::error!(
                stage = %ImportStage::RolledBack,
                page,
                kind = %err.kind(),
                "import run exceeded its deadline"
            );
            Err(err)
        }
    }

    async fn execute(&self, page: u32, per_page: u32) -> Result<ImportSummary, ImportError> {
        tracing::debug!(stage = %ImportStage::Fetching, page);
        let body = self.source.fetch_page(page, per_page).await?;

        tracing::debug!(stage = %ImportStage::Parsing, page, bytes = body.len());
        let data = DataPage::parse(&body, page)?;

        tracing::info!(
            stage = %ImportStage::Transforming,
            page,
            rows = data.rows.len(),
            concurrency = self.concurrency,
            "transforming rows"
        );
        let DataPage { rows, total_count } = data;
        let transformer = &self.transformer;
        // Rows are moved into the stream so the run future stays `Send`.
        // `buffered` yields in input order regardless of completion order.
        let records: Vec<_> = stream::iter(rows)
            .map(|row| async move { transformer.transform(&row, Utc::now()).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let unresolved_coordinates = records
            .iter()
            .filter(|r| !r.coordinates().is_resolved())
            .count();
        let unresolved_regions = records
            .iter()
            .filter(|r| r.coordinates().is_resolved() && !r.region().is_resolved())
            .count();

        let count = records.len();
        tracing::debug!(stage = %ImportStage::Persisting, page, count);
        let saved = self
            .store
            .save_all(records)
            .await
            .map_err(|source| ImportError::Persist { count, source })?;

        Ok(ImportSummary {
            page,
            per_page,
            imported: saved.len(),
            unresolved_coordinates,
            unresolved_regions,
            total_count,
        })
    }
}
