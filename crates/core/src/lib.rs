//! totenbeschau-core: Shared FHIR resource shapes and upstream error type
//!
//! This crate provides the reduced FHIR resource projections the web front
//! end actually maps — Patient, Practitioner, Condition, Procedure and
//! ValueSet — together with the generic search `Bundle` wrapper. None of
//! these shapes are owned here; they mirror schemas defined by the upstream
//! FHIR server.

pub mod bundle;
pub mod error;
pub mod resources;

pub use bundle::{Bundle, BundleEntry};
pub use error::FhirError;
pub use resources::{
    Address, CodeableConcept, Coding, Concept, Condition, HumanName, ICD10_SYSTEM, Patient,
    Practitioner, Procedure, Reference, SNOMED_SYSTEM, ValueSet,
};
