//! Askama template structs for the HTML pages

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use totenbeschau_core::Concept;

use crate::flash::Flash;
use crate::registry::{ConditionRow, PatientRow, PractitionerOption};

/// Renders a template into an HTML response, degrading to a 500 when
/// rendering itself fails.
pub struct HtmlTemplate<T>(pub T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "patient_list.html")]
pub struct PatientListPage {
    pub flash: Option<Flash>,
    pub patients: Vec<PatientRow>,
}

#[derive(Template)]
#[template(path = "new_patient.html")]
pub struct NewPatientPage {
    pub flash: Option<Flash>,
    pub practitioners: Vec<PractitionerOption>,
}

#[derive(Template)]
#[template(path = "new_practitioner.html")]
pub struct NewPractitionerPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "todesursachen.html")]
pub struct CausesPage {
    pub flash: Option<Flash>,
    pub patient_id: String,
    pub concepts: Vec<Concept>,
    pub conditions: Vec<ConditionRow>,
}

#[derive(Template)]
#[template(path = "statistics.html")]
pub struct StatisticsPage {
    pub flash: Option<Flash>,
    pub statistics: Vec<(String, u64)>,
}
