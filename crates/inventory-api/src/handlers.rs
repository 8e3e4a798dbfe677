//! REST API handlers.
//!
//! Each handler validates its input, calls the `DeviceService` and returns
//! a JSON response. No business rules live here.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use utoipa::ToSchema;

use inventory_rules::DeviceUpdate;
use inventory_state::{Device, DeviceId, DeviceState, NewDevice};

use crate::ApiState;
use crate::error::{ApiError, ApiResult, ErrorBody};

/// Body of `POST /devices` and `PUT /devices/{id}`.
///
/// Any `id` or `creationTime` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeviceRequest {
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
}

impl DeviceRequest {
    fn validate(self) -> ApiResult<Self> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be blank".to_string()));
        }
        if self.brand.trim().is_empty() {
            return Err(ApiError::Validation("brand must not be blank".to_string()));
        }
        Ok(self)
    }
}

// ── Devices ────────────────────────────────────────────────────

/// POST /devices
#[utoipa::path(
    post,
    path = "/devices",
    tag = "devices",
    summary = "Create a device",
    request_body = DeviceRequest,
    responses(
        (status = 201, description = "Device created", body = Device),
        (status = 400, description = "Invalid request body", body = ErrorBody),
    )
)]
pub async fn create_device(
    State(state): State<ApiState>,
    body: Result<Json<DeviceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Device>)> {
    let Json(req) = body?;
    let req = req.validate()?;
    let device = state
        .devices
        .create(NewDevice::new(req.name, req.brand, req.state))?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// PUT /devices/{id}
#[utoipa::path(
    put,
    path = "/devices/{id}",
    tag = "devices",
    summary = "Update a device",
    description = "Name and brand of an IN_USE device cannot change; creation time is never rewritten.",
    params(("id" = u64, Path, description = "Device id")),
    request_body = DeviceRequest,
    responses(
        (status = 200, description = "Device updated", body = Device),
        (status = 400, description = "Invalid request or device in use", body = ErrorBody),
        (status = 404, description = "Device not found", body = ErrorBody),
    )
)]
pub async fn update_device(
    State(state): State<ApiState>,
    id: Result<Path<DeviceId>, PathRejection>,
    body: Result<Json<DeviceRequest>, JsonRejection>,
) -> ApiResult<Json<Device>> {
    let Path(id) = id?;
    let Json(req) = body?;
    let req = req.validate()?;
    let device = state
        .devices
        .update(id, DeviceUpdate::new(req.name, req.brand, req.state))?;
    Ok(Json(device))
}

/// GET /devices/{id}
#[utoipa::path(
    get,
    path = "/devices/{id}",
    tag = "devices",
    summary = "Get a device",
    params(("id" = u64, Path, description = "Device id")),
    responses(
        (status = 200, description = "Device found", body = Device),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 404, description = "Device not found", body = ErrorBody),
    )
)]
pub async fn get_device(
    State(state): State<ApiState>,
    id: Result<Path<DeviceId>, PathRejection>,
) -> ApiResult<Json<Device>> {
    let Path(id) = id?;
    Ok(Json(state.devices.get_by_id(id)?))
}

/// GET /devices
#[utoipa::path(
    get,
    path = "/devices",
    tag = "devices",
    summary = "List all devices",
    responses((status = 200, description = "All devices in id order", body = Vec<Device>))
)]
pub async fn list_devices(State(state): State<ApiState>) -> ApiResult<Json<Vec<Device>>> {
    Ok(Json(state.devices.list_all()?))
}

/// GET /devices/brand/{brand}
#[utoipa::path(
    get,
    path = "/devices/brand/{brand}",
    tag = "devices",
    summary = "List devices of a brand",
    params(("brand" = String, Path, description = "Exact, case-sensitive brand")),
    responses((status = 200, description = "Matching devices", body = Vec<Device>))
)]
pub async fn list_devices_by_brand(
    State(state): State<ApiState>,
    Path(brand): Path<String>,
) -> ApiResult<Json<Vec<Device>>> {
    Ok(Json(state.devices.list_by_brand(&brand)?))
}

/// GET /devices/state/{state}
#[utoipa::path(
    get,
    path = "/devices/state/{state}",
    tag = "devices",
    summary = "List devices in a state",
    params(("state" = DeviceState, Path, description = "AVAILABLE, IN_USE or INACTIVE")),
    responses(
        (status = 200, description = "Matching devices", body = Vec<Device>),
        (status = 400, description = "Unknown state", body = ErrorBody),
    )
)]
pub async fn list_devices_by_state(
    State(state): State<ApiState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<Device>>> {
    let device_state = raw
        .parse::<DeviceState>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(Json(state.devices.list_by_state(device_state)?))
}

/// DELETE /devices/{id}
#[utoipa::path(
    delete,
    path = "/devices/{id}",
    tag = "devices",
    summary = "Delete a device",
    params(("id" = u64, Path, description = "Device id")),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 400, description = "Device in use", body = ErrorBody),
        (status = 404, description = "Device not found", body = ErrorBody),
    )
)]
pub async fn delete_device(
    State(state): State<ApiState>,
    id: Result<Path<DeviceId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.devices.delete_by_id(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::response::IntoResponse;
    use inventory_rules::DeviceService;
    use inventory_state::StateStore;

    fn test_state() -> ApiState {
        let store = StateStore::open_in_memory().unwrap();
        ApiState {
            devices: DeviceService::new(Arc::new(store)),
        }
    }

    fn request(name: &str, brand: &str, state: DeviceState) -> DeviceRequest {
        DeviceRequest {
            name: name.to_string(),
            brand: brand.to_string(),
            state,
        }
    }

    fn seed(state: &ApiState, name: &str, brand: &str, device_state: DeviceState) -> Device {
        state
            .devices
            .create(NewDevice::new(name, brand, device_state))
            .unwrap()
    }

    #[tokio::test]
    async fn list_devices_empty() {
        let state = test_state();
        let resp = list_devices(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_and_get_device() {
        let state = test_state();

        let resp = create_device(
            State(state.clone()),
            Ok(Json(request("Pixel", "Google", DeviceState::Available))),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let Json(device) = get_device(State(state), Ok(Path(1))).await.unwrap();
        assert_eq!(device.name, "Pixel");
        assert_eq!(device.brand, "Google");
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let state = test_state();
        let resp = create_device(
            State(state.clone()),
            Ok(Json(request("  ", "Google", DeviceState::Available))),
        )
        .await
        .into_response();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.devices.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_nonexistent_device() {
        let state = test_state();
        let resp = get_device(State(state), Ok(Path(404))).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_in_use_name_change_is_bad_request() {
        let state = test_state();
        let device = seed(&state, "iPad", "Apple", DeviceState::InUse);

        let resp = update_device(
            State(state),
            Ok(Path(device.id)),
            Ok(Json(request("iPad Pro", "Apple", DeviceState::InUse))),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_available_device() {
        let state = test_state();
        let device = seed(&state, "Pixel", "Google", DeviceState::Available);

        let Json(updated) = update_device(
            State(state),
            Ok(Path(device.id)),
            Ok(Json(request("Pixel 8", "Google", DeviceState::InUse))),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Pixel 8");
        assert_eq!(updated.state, DeviceState::InUse);
    }

    #[tokio::test]
    async fn update_nonexistent_device() {
        let state = test_state();
        let resp = update_device(
            State(state),
            Ok(Path(9)),
            Ok(Json(request("x", "y", DeviceState::Available))),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_available_device() {
        let state = test_state();
        let device = seed(&state, "iPad Air", "Apple", DeviceState::Available);

        let resp = delete_device(State(state), Ok(Path(device.id))).await.into_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_in_use_device_is_bad_request() {
        let state = test_state();
        let device = seed(&state, "iPad", "Apple", DeviceState::InUse);

        let resp = delete_device(State(state.clone()), Ok(Path(device.id)))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.devices.get_by_id(device.id).is_ok());
    }

    #[tokio::test]
    async fn delete_nonexistent_device() {
        let state = test_state();
        let resp = delete_device(State(state), Ok(Path(1))).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_by_brand_without_match_is_empty() {
        let state = test_state();
        seed(&state, "iPhone", "Apple", DeviceState::Available);

        let Json(devices) = list_devices_by_brand(State(state), Path("Nokia".to_string()))
            .await
            .unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn list_by_state_filters() {
        let state = test_state();
        seed(&state, "iPhone", "Apple", DeviceState::Available);
        seed(&state, "iPad", "Apple", DeviceState::InUse);

        let Json(devices) = list_devices_by_state(State(state), Path("IN_USE".to_string()))
            .await
            .unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "iPad");
    }

    #[tokio::test]
    async fn list_by_unknown_state_is_bad_request() {
        let state = test_state();
        let resp = list_devices_by_state(State(state), Path("BROKEN".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn healthz_returns_ok() {
        assert_eq!(healthz().await, "ok");
    }
}
