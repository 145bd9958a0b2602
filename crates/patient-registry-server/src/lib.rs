//! HTTP API for the patient registry.
//!
//! | Method | Path              | Handler                      |
//! |--------|-------------------|------------------------------|
//! | GET    | `/`               | [`handlers::root`]           |
//! | GET    | `/about`          | [`handlers::about`]          |
//! | GET    | `/view`           | [`handlers::view`]           |
//! | GET    | `/patient/:id`    | [`handlers::get_patient`]    |
//! | GET    | `/sort`           | [`handlers::sort_patients`]  |
//! | POST   | `/create`         | [`handlers::create_patient`] |
//! | PUT    | `/edit/:id`       | [`handlers::edit_patient`]   |
//! | DELETE | `/delete/:id`     | [`handlers::delete_patient`] |

pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use patient_registry_core::{PatientRegistry, RecordStore};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, ApiResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<PatientRegistry>,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            registry: Arc::new(PatientRegistry::new(store)),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/about", get(handlers::about))
        .route("/view", get(handlers::view))
        .route("/patient/:id", get(handlers::get_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:id", put(handlers::edit_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
