//! Outbound HTTP client for the upstream FHIR server

mod client;

pub use client::FhirClient;
