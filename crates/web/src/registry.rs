//! Registry service: the operations behind each route.
//!
//! Handlers never talk to the upstream directly; they go through this
//! layer, which owns the field mappings between form/JSON input and FHIR
//! payloads and returns typed outcomes instead of session flash state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use totenbeschau_core::{Concept, Condition, FhirError, ICD10_SYSTEM, Patient, Practitioner, Procedure};

use crate::fhir::FhirClient;
use crate::flash::Flash;

/// Id of the fixed cause-of-death catalog ValueSet on the upstream server
const CAUSE_OF_DEATH_VALUESET: &str = "1";

/// Service layer over the upstream FHIR server
#[derive(Clone)]
pub struct Registry {
    client: FhirClient,
}

// ---------------------------------------------------------------------------
// Row / input types
// ---------------------------------------------------------------------------

/// One row of the patient list
#[derive(Debug, Clone, Serialize)]
pub struct PatientRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub address: String,
    pub gender: String,
    pub latest_condition: Option<String>,
}

/// Practitioner entry for the new-patient selection list
#[derive(Debug, Clone, Serialize)]
pub struct PractitionerOption {
    pub id: String,
    pub name: String,
}

/// Reduced condition shape served by the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct ConditionRow {
    pub id: String,
    pub code: String,
    pub clinical_status: String,
}

/// New-patient form input
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub practitioner: String,
}

/// New-practitioner form input
#[derive(Debug, Clone, Deserialize)]
pub struct NewPractitioner {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
}

/// Free-text condition submitted through the JSON API
#[derive(Debug, Clone, Deserialize)]
pub struct NewCondition {
    pub code: String,
    pub clinical_status: String,
    pub patient_id: String,
}

/// Data for the cause-of-death page: catalog plus existing conditions
#[derive(Debug, Clone)]
pub struct CausePage {
    pub concepts: Vec<Concept>,
    pub conditions: Vec<ConditionRow>,
}

/// One row of the CSV export
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub first_name: String,
    pub last_name: String,
    pub cause_of_death: String,
}

/// Result of the two-phase patient registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Patient and Totenbeschau procedure both created (201/201)
    Created { patient_id: String },
    /// Patient created but the procedure failed; `compensated` reports
    /// whether the dangling patient could be deleted again
    ProcedureFailed { patient_id: String, compensated: bool },
    /// The initial patient create failed; nothing was written upstream
    PatientFailed,
}

impl RegistrationOutcome {
    /// The user-facing flash message for this outcome; each variant has a
    /// distinct text.
    pub fn flash(&self) -> Flash {
        match self {
            RegistrationOutcome::Created { .. } => {
                Flash::success("Patient und Totenbeschau erfolgreich erstellt")
            }
            RegistrationOutcome::ProcedureFailed {
                compensated: true, ..
            } => Flash::danger(
                "Fehler beim Erstellen der Totenbeschau, Patient wurde wieder entfernt",
            ),
            RegistrationOutcome::ProcedureFailed {
                compensated: false, ..
            } => Flash::danger("Patient erstellt, aber Fehler beim Erstellen der Totenbeschau"),
            RegistrationOutcome::PatientFailed => {
                Flash::danger("Fehler beim Erstellen des Patienten")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Registry {
    pub fn new(client: FhirClient) -> Self {
        Self { client }
    }

    /// Patient list with each patient's latest condition.
    ///
    /// One sequential condition lookup per patient. A failed lookup
    /// degrades that row to "no condition" instead of failing the page.
    pub async fn patient_overview(&self) -> Result<Vec<PatientRow>, FhirError> {
        let patients = self.client.search_patients().await?.resources();

        let mut rows = Vec::with_capacity(patients.len());
        for patient in patients {
            let Some(id) = patient.id.clone() else {
                continue;
            };
            let latest_condition = self.latest_condition(&id).await;
            rows.push(PatientRow {
                first_name: patient.given_name().to_string(),
                last_name: patient.family_name().to_string(),
                birth_date: patient.birth_date.clone().unwrap_or_default(),
                address: patient.address_text().to_string(),
                gender: patient.gender.clone().unwrap_or_default(),
                latest_condition,
                id,
            });
        }
        Ok(rows)
    }

    /// Latest condition display for a patient: the *last* entry of the
    /// bundle as returned by the server, never sorted by date.
    async fn latest_condition(&self, patient_id: &str) -> Option<String> {
        match self.client.search_conditions(patient_id).await {
            Ok(bundle) => bundle
                .last_resource()
                .and_then(|c| c.coded_display().map(str::to_owned)),
            Err(err) => {
                tracing::warn!(patient_id, error = %err, "Condition lookup failed");
                None
            }
        }
    }

    pub async fn practitioner_options(&self) -> Result<Vec<PractitionerOption>, FhirError> {
        let practitioners = self.client.search_practitioners().await?.resources();
        Ok(practitioners
            .into_iter()
            .filter_map(|p| {
                let name = p.display_name();
                p.id.map(|id| PractitionerOption { id, name })
            })
            .collect())
    }

    /// Two-phase registration: create the Patient, then the dependent
    /// Totenbeschau Procedure referencing it. If the second call fails the
    /// patient is deleted again as a compensating action, so no orphan is
    /// left on the upstream server.
    pub async fn register_patient(&self, input: NewPatient) -> RegistrationOutcome {
        let patient = Patient::new(
            &input.first_name,
            &input.last_name,
            &input.gender,
            &input.birth_date,
            &input.address,
        );

        let created = match self.client.create_patient(&patient).await {
            Ok(created) => created,
            Err(err) => {
                tracing::error!(error = %err, "Patient creation failed");
                return RegistrationOutcome::PatientFailed;
            }
        };

        let Some(patient_id) = created.id else {
            tracing::error!("Upstream returned a created patient without an id");
            return RegistrationOutcome::PatientFailed;
        };

        let procedure = Procedure::totenbeschau(&patient_id, &input.practitioner);
        match self.client.create_procedure(&procedure).await {
            Ok(()) => RegistrationOutcome::Created { patient_id },
            Err(err) => {
                tracing::error!(patient_id, error = %err, "Procedure creation failed");
                let compensated = match self.client.delete_patient(&patient_id).await {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::error!(patient_id, error = %err, "Compensating delete failed");
                        false
                    }
                };
                RegistrationOutcome::ProcedureFailed {
                    patient_id,
                    compensated,
                }
            }
        }
    }

    pub async fn register_practitioner(&self, input: NewPractitioner) -> Result<(), FhirError> {
        let practitioner = Practitioner::new(&input.first_name, &input.last_name, &input.gender);
        self.client.create_practitioner(&practitioner).await
    }

    pub async fn conditions_for(&self, patient_id: &str) -> Result<Vec<ConditionRow>, FhirError> {
        let conditions = self.client.search_conditions(patient_id).await?.resources();
        Ok(conditions.into_iter().map(condition_row).collect())
    }

    pub async fn add_condition(&self, input: NewCondition) -> Result<(), FhirError> {
        let condition =
            Condition::free_text(&input.patient_id, &input.code, &input.clinical_status);
        self.client.create_condition(&condition).await
    }

    pub async fn add_cause_of_death(
        &self,
        patient_id: &str,
        code: &str,
        display: &str,
    ) -> Result<(), FhirError> {
        let condition = Condition::coded(patient_id, ICD10_SYSTEM, code, display);
        self.client.create_condition(&condition).await
    }

    pub async fn remove_condition(&self, condition_id: &str) -> Result<(), FhirError> {
        self.client.delete_condition(condition_id).await
    }

    /// Catalog and existing conditions for the cause-of-death page; either
    /// lookup failing degrades to an empty list.
    pub async fn cause_of_death_page(&self, patient_id: &str) -> CausePage {
        let concepts = match self.client.get_valueset(CAUSE_OF_DEATH_VALUESET).await {
            Ok(valueset) => valueset.concepts().to_vec(),
            Err(err) => {
                tracing::warn!(error = %err, "ValueSet lookup failed");
                Vec::new()
            }
        };

        let conditions = match self.conditions_for(patient_id).await {
            Ok(conditions) => conditions,
            Err(err) => {
                tracing::warn!(patient_id, error = %err, "Condition lookup failed");
                Vec::new()
            }
        };

        CausePage {
            concepts,
            conditions,
        }
    }

    /// Tally all conditions across all patients by cause display text,
    /// sorted descending by count.
    pub async fn statistics(&self) -> Result<Vec<(String, u64)>, FhirError> {
        let conditions = self.client.search_all_conditions().await?.resources();
        Ok(tally_causes(&conditions))
    }

    /// CSV export rows for the selected patients: two sequential upstream
    /// calls per id. A failed patient fetch skips the row; a missing or
    /// uncoded condition exports as "Unbekannt".
    pub async fn export_rows(&self, patient_ids: &[String]) -> Vec<ExportRow> {
        let mut rows = Vec::with_capacity(patient_ids.len());
        for patient_id in patient_ids {
            let patient = match self.client.get_patient(patient_id).await {
                Ok(patient) => patient,
                Err(err) => {
                    tracing::warn!(patient_id, error = %err, "Patient fetch failed, skipping row");
                    continue;
                }
            };

            let cause_of_death = match self.client.search_conditions(patient_id).await {
                Ok(bundle) => bundle
                    .last_resource()
                    .and_then(|c| c.coded_display().map(str::to_owned))
                    .unwrap_or_else(|| "Unbekannt".to_string()),
                Err(_) => "Unbekannt".to_string(),
            };

            rows.push(ExportRow {
                first_name: patient.given_name().to_string(),
                last_name: patient.family_name().to_string(),
                cause_of_death,
            });
        }
        rows
    }

    pub async fn ping(&self) -> Result<(), FhirError> {
        self.client.ping().await
    }
}

fn condition_row(condition: Condition) -> ConditionRow {
    ConditionRow {
        id: condition.id.clone().unwrap_or_default(),
        code: condition.code_text().to_string(),
        clinical_status: condition.status_text().to_string(),
    }
}

/// Count conditions per first-coding display text and sort descending by
/// count. Conditions without a coding are skipped. Ties keep the
/// alphabetical order of the underlying BTreeMap (stable sort).
pub fn tally_causes(conditions: &[Condition]) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for condition in conditions {
        if let Some(display) = condition.display() {
            *counts.entry(display.to_string()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<(String, u64)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use totenbeschau_core::SNOMED_SYSTEM;

    fn coded(display: &str) -> Condition {
        Condition::coded("p1", ICD10_SYSTEM, "X", display)
    }

    #[test]
    fn tally_sorts_descending_by_count() {
        let conditions = vec![coded("Flu"), coded("Flu"), coded("Cold")];
        assert_eq!(
            tally_causes(&conditions),
            vec![("Flu".to_string(), 2), ("Cold".to_string(), 1)]
        );
    }

    #[test]
    fn tally_skips_uncoded_conditions() {
        let conditions = vec![
            coded("Flu"),
            Condition::free_text("p1", "freitext", "active"),
        ];
        assert_eq!(tally_causes(&conditions), vec![("Flu".to_string(), 1)]);
    }

    #[test]
    fn tally_ties_keep_alphabetical_order() {
        let conditions = vec![coded("Zoster"), coded("Asthma")];
        assert_eq!(
            tally_causes(&conditions),
            vec![("Asthma".to_string(), 1), ("Zoster".to_string(), 1)]
        );
    }

    #[test]
    fn registration_outcomes_have_distinct_flash_messages() {
        let outcomes = [
            RegistrationOutcome::Created {
                patient_id: "p".into(),
            },
            RegistrationOutcome::ProcedureFailed {
                patient_id: "p".into(),
                compensated: true,
            },
            RegistrationOutcome::ProcedureFailed {
                patient_id: "p".into(),
                compensated: false,
            },
            RegistrationOutcome::PatientFailed,
        ];
        let messages: std::collections::BTreeSet<_> =
            outcomes.iter().map(|o| o.flash().message).collect();
        assert_eq!(messages.len(), outcomes.len());
    }

    #[test]
    fn condition_row_maps_free_text_fields() {
        let mut condition = Condition::free_text("p1", "Fieber", "active");
        condition.id = Some("c9".into());
        let row = condition_row(condition);
        assert_eq!(row.id, "c9");
        assert_eq!(row.code, "Fieber");
        assert_eq!(row.clinical_status, "active");
    }

    #[test]
    fn snomed_constant_reaches_procedure_payload() {
        let procedure = Procedure::totenbeschau("p1", "d1");
        let system = procedure.code.unwrap().coding[0].system.clone().unwrap();
        assert_eq!(system, SNOMED_SYSTEM);
    }
}
