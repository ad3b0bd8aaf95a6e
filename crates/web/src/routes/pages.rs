//! HTML page handlers
//!
//! Every upstream failure on a GET page degrades to empty data plus a
//! danger flash; POST handlers answer with a redirect carrying the flash
//! in the query string (post/redirect/get).

use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::flash::{Flash, FlashQuery, flash_redirect};
use crate::registry::{NewPatient, NewPractitioner, Registry};
use crate::views::{
    CausesPage, HtmlTemplate, NewPatientPage, NewPractitionerPage, PatientListPage, StatisticsPage,
};

/// GET / - Redirect to the patient list
pub async fn index() -> Redirect {
    Redirect::to("/patient_list")
}

/// GET /patient_list - Patient table with latest conditions
pub async fn patient_list(
    State(registry): State<Registry>,
    Query(query): Query<FlashQuery>,
) -> HtmlTemplate<PatientListPage> {
    let mut flash = query.into_flash();
    let patients = match registry.patient_overview().await {
        Ok(patients) => patients,
        Err(err) => {
            tracing::error!(error = %err, "Patient list fetch failed");
            flash = Some(Flash::danger("Error retrieving patients"));
            Vec::new()
        }
    };

    HtmlTemplate(PatientListPage { flash, patients })
}

/// GET /new_patient - Patient form with practitioner selection
pub async fn new_patient(State(registry): State<Registry>) -> HtmlTemplate<NewPatientPage> {
    let practitioners = match registry.practitioner_options().await {
        Ok(practitioners) => practitioners,
        Err(err) => {
            tracing::warn!(error = %err, "Practitioner lookup failed");
            Vec::new()
        }
    };

    HtmlTemplate(NewPatientPage {
        flash: None,
        practitioners,
    })
}

/// POST /patients - Two-phase patient registration, then redirect
pub async fn create_patient(
    State(registry): State<Registry>,
    Form(form): Form<NewPatient>,
) -> Redirect {
    let outcome = registry.register_patient(form).await;
    flash_redirect("/patient_list", &outcome.flash())
}

/// GET /new_practitioner - Practitioner form
pub async fn new_practitioner(Query(query): Query<FlashQuery>) -> HtmlTemplate<NewPractitionerPage> {
    HtmlTemplate(NewPractitionerPage {
        flash: query.into_flash(),
    })
}

/// POST /create_practitioner - Create practitioner, redirect back to the form
pub async fn create_practitioner(
    State(registry): State<Registry>,
    Form(form): Form<NewPractitioner>,
) -> Redirect {
    let flash = match registry.register_practitioner(form).await {
        Ok(()) => Flash::success("Practitioner erfolgreich erstellt"),
        Err(err) => {
            tracing::error!(error = %err, "Practitioner creation failed");
            Flash::danger(format!("Fehler beim Erstellen des Practitioners: {err}"))
        }
    };
    flash_redirect("/new_practitioner", &flash)
}

/// Cause-of-death form input: the catalog code plus its display text
#[derive(Debug, Deserialize)]
pub struct CauseOfDeathForm {
    pub code: String,
    pub display: String,
}

/// GET /todesursachen/{patient_id} - Catalog plus existing conditions
pub async fn causes(
    State(registry): State<Registry>,
    Path(patient_id): Path<String>,
    Query(query): Query<FlashQuery>,
) -> HtmlTemplate<CausesPage> {
    let page = registry.cause_of_death_page(&patient_id).await;

    HtmlTemplate(CausesPage {
        flash: query.into_flash(),
        patient_id,
        concepts: page.concepts,
        conditions: page.conditions,
    })
}

/// POST /todesursachen/{patient_id} - Record a coded cause of death, then
/// redirect back to the same page so a refresh cannot resubmit.
pub async fn add_cause(
    State(registry): State<Registry>,
    Path(patient_id): Path<String>,
    Form(form): Form<CauseOfDeathForm>,
) -> Redirect {
    let flash = match registry
        .add_cause_of_death(&patient_id, &form.code, &form.display)
        .await
    {
        Ok(()) => Flash::success("Todesursache hinzugefügt"),
        Err(err) => {
            tracing::error!(patient_id, error = %err, "Cause of death creation failed");
            Flash::danger("Fehler beim Hinzufügen der Todesursache")
        }
    };
    flash_redirect(&format!("/todesursachen/{patient_id}"), &flash)
}

/// GET /patient_list/conditions/{patient_id} - Legacy alias
pub async fn conditions_alias(Path(patient_id): Path<String>) -> Redirect {
    Redirect::to(&format!("/todesursachen/{patient_id}"))
}

/// GET /statistics - Cause-of-death tally, descending by count
pub async fn statistics(State(registry): State<Registry>) -> HtmlTemplate<StatisticsPage> {
    match registry.statistics().await {
        Ok(statistics) => HtmlTemplate(StatisticsPage {
            flash: None,
            statistics,
        }),
        Err(err) => {
            tracing::error!(error = %err, "Statistics fetch failed");
            HtmlTemplate(StatisticsPage {
                flash: Some(Flash::danger("Error retrieving statistics")),
                statistics: Vec::new(),
            })
        }
    }
}
