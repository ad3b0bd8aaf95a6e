//! Thin reqwest wrapper over the upstream FHIR REST API.
//!
//! One method per upstream call the front end makes. Error handling is
//! binary per call (see `FhirError`); no retries and no timeouts beyond
//! the reqwest client defaults.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use totenbeschau_core::{Bundle, Condition, FhirError, Patient, Practitioner, Procedure, ValueSet};

/// Client for the upstream FHIR server
#[derive(Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
}

impl FhirClient {
    /// Create a new client for the given base URL (trailing slash tolerated)
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // -- Patient ------------------------------------------------------------

    pub async fn search_patients(&self) -> Result<Bundle<Patient>, FhirError> {
        self.get_json("Patient", &[], "GET Patient").await
    }

    pub async fn get_patient(&self, id: &str) -> Result<Patient, FhirError> {
        self.get_json(&format!("Patient/{id}"), &[], "GET Patient by id")
            .await
    }

    /// Create a patient; the upstream echoes the resource with its new id.
    pub async fn create_patient(&self, patient: &Patient) -> Result<Patient, FhirError> {
        let response = self
            .http
            .post(format!("{}/Patient", self.base_url))
            .json(patient)
            .send()
            .await
            .map_err(|e| FhirError::Network(e.to_string()))?;

        if response.status() != StatusCode::CREATED {
            return Err(FhirError::UnexpectedStatus {
                context: "POST Patient".to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Patient>()
            .await
            .map_err(|e| FhirError::Decode(e.to_string()))
    }

    // -- Practitioner -------------------------------------------------------

    pub async fn search_practitioners(&self) -> Result<Bundle<Practitioner>, FhirError> {
        self.get_json("Practitioner", &[], "GET Practitioner").await
    }

    pub async fn create_practitioner(&self, practitioner: &Practitioner) -> Result<(), FhirError> {
        self.post_created("Practitioner", practitioner).await
    }

    // -- Condition ----------------------------------------------------------

    pub async fn search_conditions(&self, patient_id: &str) -> Result<Bundle<Condition>, FhirError> {
        self.get_json(
            "Condition",
            &[("patient", patient_id)],
            "GET Condition by patient",
        )
        .await
    }

    pub async fn search_all_conditions(&self) -> Result<Bundle<Condition>, FhirError> {
        self.get_json("Condition", &[], "GET Condition").await
    }

    pub async fn create_condition(&self, condition: &Condition) -> Result<(), FhirError> {
        self.post_created("Condition", condition).await
    }

    /// Delete a condition; only an upstream 204 counts as success.
    pub async fn delete_condition(&self, id: &str) -> Result<(), FhirError> {
        self.delete(&format!("Condition/{id}"), "DELETE Condition")
            .await
    }

    // -- Procedure ----------------------------------------------------------

    pub async fn create_procedure(&self, procedure: &Procedure) -> Result<(), FhirError> {
        self.post_created("Procedure", procedure).await
    }

    // -- ValueSet / misc ----------------------------------------------------

    pub async fn get_valueset(&self, id: &str) -> Result<ValueSet, FhirError> {
        self.get_json(&format!("ValueSet/{id}"), &[], "GET ValueSet")
            .await
    }

    /// Compensating action after a failed dependent-resource create.
    pub async fn delete_patient(&self, id: &str) -> Result<(), FhirError> {
        self.delete(&format!("Patient/{id}"), "DELETE Patient").await
    }

    /// Upstream reachability probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), FhirError> {
        let response = self
            .http
            .get(format!("{}/metadata", self.base_url))
            .send()
            .await
            .map_err(|e| FhirError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FhirError::UnexpectedStatus {
                context: "GET metadata".to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    // -- Shared plumbing ----------------------------------------------------

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, FhirError> {
        let mut request = self.http.get(format!("{}/{}", self.base_url, path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FhirError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FhirError::UnexpectedStatus {
                context: context.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FhirError::Decode(e.to_string()))
    }

    /// POST a resource; anything but 201 Created is a failure.
    async fn post_created<T: Serialize>(
        &self,
        resource_type: &str,
        resource: &T,
    ) -> Result<(), FhirError> {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, resource_type))
            .json(resource)
            .send()
            .await
            .map_err(|e| FhirError::Network(e.to_string()))?;

        if response.status() != StatusCode::CREATED {
            return Err(FhirError::UnexpectedStatus {
                context: format!("POST {resource_type}"),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// DELETE a resource; anything but 204 No Content is a failure.
    async fn delete(&self, path: &str, context: &str) -> Result<(), FhirError> {
        let response = self
            .http
            .delete(format!("{}/{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| FhirError::Network(e.to_string()))?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(FhirError::UnexpectedStatus {
                context: context.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
