use axum::{
    extract::{Query, State},
    Extension, Json,
};
use kioskmap_db::MachineStore;
use kioskmap_import::{ImportError, ImportErrorKind, ImportSummary};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Deserialize)]
pub(super) struct ImportQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ImportQuery {
    fn resolve(&self, request_id: &str, default_size: u32) -> Result<(u32, u32), ApiError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::new(
                request_id,
                "validation_error",
                "page must be at least 1",
            ));
        }

        let size = self.size.unwrap_or(default_size);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ApiError::new(
                request_id,
                "validation_error",
                format!("size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        Ok((page, size))
    }
}

/// Upstream failures surface as 502; the rest are internal. The message
/// names only the failed stage.
fn map_import_error(request_id: &str, error: &ImportError) -> ApiError {
    let kind = error.kind();
    let code = match kind {
        ImportErrorKind::Fetch | ImportErrorKind::Parse => "upstream_error",
        ImportErrorKind::Persist | ImportErrorKind::Deadline => "import_failed",
    };
    ApiError::new(request_id, code, format!("import failed at {kind} stage"))
}

/// POST /api/v1/machines/import?page=&size=
pub(super) async fn import_machines<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ImportQuery>,
) -> Result<Json<ApiResponse<ImportSummary>>, ApiError> {
    let rid = &req_id.0;
    let (page, size) = query.resolve(rid, state.default_page_size)?;

    let summary = state
        .pipeline
        .run_with_deadline(page, size, state.import_deadline)
        .await
        .map_err(|e| map_import_error(rid, &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}
