//! Bulk import of station kiosks from the odcloud open-data API.
//!
//! [`ImportPipeline::run`] fetches one page, turns every row into a
//! geocoded [`kioskmap_core::MachineRecord`] and persists the batch in a
//! single atomic `save_all`.

pub mod client;
pub mod error;
pub mod pipeline;
pub mod transform;
pub mod types;

pub use client::OpenDataClient;
pub use error::{ImportError, ImportErrorKind};
pub use pipeline::{ImportPipeline, ImportStage, ImportSummary};
pub use transform::RecordTransformer;
pub use types::{DataPage, RawRow};
