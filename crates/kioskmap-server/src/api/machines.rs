use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use kioskmap_core::{DetailUpdate, MachineDetails, MachineRecord};
use kioskmap_db::MachineStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct MachineItem {
    id: Uuid,
    line: String,
    station_name: String,
    device_type: String,
    location_type: String,
    floor: String,
    detail_location: String,
    contractor: String,
    phone: String,
    latitude: f64,
    longitude: f64,
    city: String,
    district: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl From<MachineRecord> for MachineItem {
    fn from(record: MachineRecord) -> Self {
        Self {
            // Stored records always carry an id.
            id: record.id.unwrap_or_default(),
            line: record.line,
            station_name: record.station_name,
            device_type: record.device_type,
            location_type: record.location_type,
            floor: record.floor,
            detail_location: record.detail_location,
            contractor: record.contractor,
            phone: record.phone,
            latitude: record.latitude,
            longitude: record.longitude,
            city: record.city,
            district: record.district,
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub city: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedItem {
    id: Uuid,
    deleted: bool,
}

fn parse_machine_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::new(request_id, "validation_error", "id must be a UUID"))
}

fn into_items(records: Vec<MachineRecord>) -> Vec<MachineItem> {
    records.into_iter().map(MachineItem::from).collect()
}

/// GET /api/v1/machines
pub(super) async fn list_machines<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<MachineItem>>>, ApiError> {
    let records = state
        .store
        .find_all()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: into_items(records),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/machines/{id}
pub(super) async fn get_machine<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MachineItem>>, ApiError> {
    let id = parse_machine_id(&req_id.0, &id)?;
    let record = state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "machine not found"))?;

    Ok(Json(ApiResponse {
        data: record.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/machines/search?city=&district=
///
/// A blank or missing `district` searches by city alone.
pub(super) async fn search_machines<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<MachineItem>>>, ApiError> {
    let rid = &req_id.0;

    let city = query
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::new(rid, "validation_error", "city is required"))?;

    let records = match query.district.filter(|d| !d.trim().is_empty()) {
        Some(district) => state.store.find_by_city_and_district(&city, &district).await,
        None => state.store.find_by_city(&city).await,
    }
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: into_items(records),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/machines. Geocodes the station before saving.
pub(super) async fn create_machine<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<MachineDetails>,
) -> Result<(StatusCode, Json<ApiResponse<MachineItem>>), ApiError> {
    let rid = &req_id.0;

    if body.station_name.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "station_name is required",
        ));
    }

    let record = state
        .pipeline
        .transformer()
        .build_record(body, Utc::now())
        .await;
    if !record.coordinates().is_resolved() {
        tracing::info!(station = %record.station_name, "created machine without coordinates");
    }

    let saved = state
        .store
        .save(record)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: saved.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/machines/{id}. Edits detail fields only and never re-geocodes.
pub(super) async fn update_machine<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<DetailUpdate>,
) -> Result<Json<ApiResponse<MachineItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_machine_id(rid, &id)?;

    let mut record = state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "machine not found"))?;

    record.apply_update(body, Utc::now());

    let saved = state
        .store
        .save(record)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: saved.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/machines/{id}
pub(super) async fn delete_machine<S: MachineStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_machine_id(rid, &id)?;

    let exists = state
        .store
        .exists_by_id(id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if !exists {
        return Err(ApiError::new(rid, "not_found", "machine not found"));
    }

    let deleted = state
        .store
        .delete_by_id(id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if !deleted {
        // Removed concurrently between the check and the delete.
        return Err(ApiError::new(rid, "not_found", "machine not found"));
    }

    Ok(Json(ApiResponse {
        data: DeletedItem { id, deleted },
        meta: ResponseMeta::new(req_id.0),
    }))
}
