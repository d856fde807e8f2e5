pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use routes::{
    create_change, create_dumping, create_reading, delete_reading, list_readings, update_reading,
};
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/readings", get(list_readings).post(create_reading))
        .route("/readings/change", post(create_change))
        .route("/readings/dumping", post(create_dumping))
        .route(
            "/readings/{id}",
            put(update_reading).delete(delete_reading),
        )
        .with_state(state)
}
