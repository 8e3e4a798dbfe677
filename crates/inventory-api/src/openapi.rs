//! OpenAPI document for the device routes, served at `GET /openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use inventory_state::{Device, DeviceState};

use crate::error::ErrorBody;
use crate::handlers::{self, DeviceRequest};

#[derive(OpenApi)]
#[openapi(
    info(title = "Device inventory API"),
    paths(
        handlers::list_devices,
        handlers::create_device,
        handlers::get_device,
        handlers::update_device,
        handlers::delete_device,
        handlers::list_devices_by_brand,
        handlers::list_devices_by_state,
    ),
    components(schemas(Device, DeviceState, DeviceRequest, ErrorBody)),
    tags((name = "devices", description = "Manage devices"))
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
