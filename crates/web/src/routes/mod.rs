mod conditions;
mod export;
mod health;
mod metrics;
mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::registry::Registry;

/// Build the full route table
pub fn app_routes() -> Router<Registry> {
    Router::new()
        .route("/", get(pages::index))
        .route("/patient_list", get(pages::patient_list))
        .route("/new_patient", get(pages::new_patient))
        .route("/patients", post(pages::create_patient))
        .route("/new_practitioner", get(pages::new_practitioner))
        .route("/create_practitioner", post(pages::create_practitioner))
        .route(
            "/todesursachen/{patient_id}",
            get(pages::causes).post(pages::add_cause),
        )
        .route(
            "/patient_list/conditions/{patient_id}",
            get(pages::conditions_alias),
        )
        .route("/statistics", get(pages::statistics))
        .route("/conditions", post(conditions::create))
        .route(
            "/conditions/{id}",
            get(conditions::list).delete(conditions::remove),
        )
        .route("/export_patients_csv", post(export::export_patients_csv))
        .route("/health", get(health::check))
        .route("/metrics", get(metrics::get))
}
