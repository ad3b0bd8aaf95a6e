//! CSV export of selected patients

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::flash::{Flash, flash_redirect};
use crate::registry::{ExportRow, Registry};

/// Checkbox selection from the patient list; the key repeats per checked row
#[derive(Debug, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub selected_patients: Vec<String>,
}

/// POST /export_patients_csv - Semicolon-delimited CSV download
pub async fn export_patients_csv(
    State(registry): State<Registry>,
    Form(form): Form<ExportForm>,
) -> Response {
    if form.selected_patients.is_empty() {
        return flash_redirect("/patient_list", &Flash::warning("Keine Patienten ausgewählt"))
            .into_response();
    }

    let rows = registry.export_rows(&form.selected_patients).await;

    match render_csv(&rows) {
        Ok(body) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            );
            headers.insert(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=patients.csv"),
            );
            (headers, body).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "CSV rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "CSV rendering failed").into_response()
        }
    }
}

/// Render export rows as `;`-delimited UTF-8 CSV with a fixed header line.
fn render_csv(rows: &[ExportRow]) -> csv::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(["Vorname", "Nachname", "Todesursache"])?;
    for row in rows {
        writer.write_record([&row.first_name, &row.last_name, &row.cause_of_death])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
