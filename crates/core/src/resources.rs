//! Reduced FHIR resource projections.
//!
//! Only the fields the front end reads or writes are modeled; everything
//! else the upstream server sends is dropped on deserialization. The
//! constructors build byte-for-byte the payloads the registry submits.

use serde::{Deserialize, Serialize};

/// Coding system URI for ICD-10 cause-of-death codes
pub const ICD10_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10";

/// Coding system URI for SNOMED CT
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";

// ---------------------------------------------------------------------------
// Common datatypes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn free_text(text: impl Into<String>) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.into()),
        }
    }
}

/// Reference to another resource, e.g. `Patient/123`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn patient(id: &str) -> Self {
        Self {
            reference: format!("Patient/{id}"),
            display: None,
        }
    }

    pub fn practitioner(id: &str, display: &str) -> Self {
        Self {
            reference: format!("Practitioner/{id}"),
            display: Some(display.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Patient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

impl Patient {
    /// Build the creation payload from flat form input.
    pub fn new(first_name: &str, last_name: &str, gender: &str, birth_date: &str, address: &str) -> Self {
        Self {
            resource_type: "Patient".to_string(),
            id: None,
            name: vec![HumanName {
                given: vec![first_name.to_string()],
                family: Some(last_name.to_string()),
            }],
            gender: Some(gender.to_string()),
            birth_date: Some(birth_date.to_string()),
            address: vec![Address {
                text: Some(address.to_string()),
            }],
        }
    }

    /// First given name of the first name entry, or `""`.
    pub fn given_name(&self) -> &str {
        self.name
            .first()
            .and_then(|n| n.given.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Family name of the first name entry, or `""`.
    pub fn family_name(&self) -> &str {
        self.name
            .first()
            .and_then(|n| n.family.as_deref())
            .unwrap_or("")
    }

    /// Text of the first address entry, or `""`.
    pub fn address_text(&self) -> &str {
        self.address
            .first()
            .and_then(|a| a.text.as_deref())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Practitioner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Practitioner {
    /// Build the creation payload; new practitioners are always active.
    pub fn new(first_name: &str, last_name: &str, gender: &str) -> Self {
        Self {
            resource_type: "Practitioner".to_string(),
            id: None,
            name: vec![HumanName {
                given: vec![first_name.to_string()],
                family: Some(last_name.to_string()),
            }],
            gender: Some(gender.to_string()),
            active: Some(true),
        }
    }

    /// `"{given} {family}"`, with missing parts rendered empty.
    pub fn display_name(&self) -> String {
        let given = self
            .name
            .first()
            .and_then(|n| n.given.first())
            .map(String::as_str)
            .unwrap_or("");
        let family = self
            .name
            .first()
            .and_then(|n| n.family.as_deref())
            .unwrap_or("");
        format!("{given} {family}")
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_status: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
}

impl Condition {
    /// Free-text condition as submitted through the JSON API.
    pub fn free_text(patient_id: &str, code: &str, clinical_status: &str) -> Self {
        Self {
            resource_type: "Condition".to_string(),
            id: None,
            code: Some(CodeableConcept::free_text(code)),
            clinical_status: Some(CodeableConcept::free_text(clinical_status)),
            subject: Some(Reference::patient(patient_id)),
        }
    }

    /// Coded condition, used for ICD-10 causes of death.
    pub fn coded(patient_id: &str, system: &str, code: &str, display: &str) -> Self {
        Self {
            resource_type: "Condition".to_string(),
            id: None,
            code: Some(CodeableConcept {
                coding: vec![Coding {
                    system: Some(system.to_string()),
                    code: Some(code.to_string()),
                    display: Some(display.to_string()),
                }],
                text: None,
            }),
            clinical_status: None,
            subject: Some(Reference::patient(patient_id)),
        }
    }

    /// Display text of the first coding, if any coding exists at all.
    pub fn display(&self) -> Option<&str> {
        self.code.as_ref()?.coding.first()?.display.as_deref()
    }

    /// Display text of the first coding, falling back to `"Unbekannt"`
    /// when the coding carries no display. `None` without any coding.
    pub fn coded_display(&self) -> Option<&str> {
        let coding = self.code.as_ref()?.coding.first()?;
        Some(coding.display.as_deref().unwrap_or("Unbekannt"))
    }

    /// Free-text code, or `""`.
    pub fn code_text(&self) -> &str {
        self.code
            .as_ref()
            .and_then(|c| c.text.as_deref())
            .unwrap_or("")
    }

    /// Free-text clinical status, or `""`.
    pub fn status_text(&self) -> &str {
        self.clinical_status
            .as_ref()
            .and_then(|c| c.text.as_deref())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Procedure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<ProcedurePerformer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcedurePerformer {
    pub actor: Reference,
}

impl Procedure {
    /// The post-mortem examination recorded alongside every new patient:
    /// SNOMED 394914008 "Totenbeschau", performed by the chosen practitioner.
    pub fn totenbeschau(patient_id: &str, practitioner_id: &str) -> Self {
        Self {
            resource_type: "Procedure".to_string(),
            status: Some("completed".to_string()),
            code: Some(CodeableConcept {
                coding: vec![Coding {
                    system: Some(SNOMED_SYSTEM.to_string()),
                    code: Some("394914008".to_string()),
                    display: Some("Totenbeschau".to_string()),
                }],
                text: Some("Totenbeschau".to_string()),
            }),
            subject: Some(Reference::patient(patient_id)),
            performer: vec![ProcedurePerformer {
                actor: Reference::practitioner(practitioner_id, "Totenbeschauarzt"),
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// ValueSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSet {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose: Option<ValueSetCompose>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueSetCompose {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<ValueSetInclude>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueSetInclude {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<Concept>,
}

/// A permissible cause-of-death concept from the fixed ValueSet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Concept {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub display: String,
}

impl ValueSet {
    /// Concepts of the first include block; the catalog ValueSet has
    /// exactly one.
    pub fn concepts(&self) -> &[Concept] {
        self.compose
            .as_ref()
            .and_then(|c| c.include.first())
            .map(|i| i.concept.as_slice())
            .unwrap_or(&[])
    }
}
