//! inventory-api — REST API for the device inventory.
//!
//! Provides axum route handlers that validate requests, call the
//! [`DeviceService`] rules engine and serialize its results.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/devices` | List all devices |
//! | POST | `/devices` | Create a device |
//! | GET | `/devices/{id}` | Get a device |
//! | PUT | `/devices/{id}` | Update a device |
//! | DELETE | `/devices/{id}` | Delete a device |
//! | GET | `/devices/brand/{brand}` | List devices of a brand |
//! | GET | `/devices/state/{state}` | List devices in a state |
//! | GET | `/healthz` | Liveness probe |
//! | GET | `/openapi.json` | OpenAPI document for the device routes |

pub mod error;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::routing::get;
use inventory_rules::DeviceService;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use openapi::ApiDoc;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub devices: DeviceService,
}

/// Build the complete API router.
pub fn build_router(devices: DeviceService) -> Router {
    let api_state = ApiState { devices };

    Router::new()
        .route("/devices", get(handlers::list_devices).post(handlers::create_device))
        .route(
            "/devices/{id}",
            get(handlers::get_device)
                .put(handlers::update_device)
                .delete(handlers::delete_device),
        )
        .route("/devices/brand/{brand}", get(handlers::list_devices_by_brand))
        .route("/devices/state/{state}", get(handlers::list_devices_by_state))
        .route("/healthz", get(handlers::healthz))
        .route("/openapi.json", get(openapi::openapi_json))
        .with_state(api_state)
}
