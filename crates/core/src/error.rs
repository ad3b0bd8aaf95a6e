use thiserror::Error;

/// Error raised by a single upstream FHIR call.
///
/// The taxonomy is deliberately coarse: every handler treats an upstream
/// call as either succeeded or failed, so no finer distinction is carried.
#[derive(Debug, Error)]
pub enum FhirError {
    #[error("upstream request failed: {0}")]
    Network(String),

    #[error("unexpected status {status} from upstream ({context})")]
    UnexpectedStatus { context: String, status: u16 },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}
