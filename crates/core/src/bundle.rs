use serde::{Deserialize, Serialize};

/// FHIR search Bundle (reduced to what the front end reads).
///
/// Deserialization is deliberately lenient: HAPI omits `entry` entirely
/// when a search matches nothing, so every field carries a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<T> {
    #[serde(default)]
    pub resource_type: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry<T>>,
}

/// A single entry within a search Bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    pub resource: T,
}

impl<T> Bundle<T> {
    /// Unwrap all entries into their resources, preserving server order.
    pub fn resources(self) -> Vec<T> {
        self.entry.into_iter().map(|e| e.resource).collect()
    }

    /// The last resource in the bundle, in the order the server returned it.
    ///
    /// The front end treats this as the "latest" entry. This is positional,
    /// not date-based, and callers depend on that exact semantics.
    pub fn last_resource(mut self) -> Option<T> {
        self.entry.pop().map(|e| e.resource)
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Condition;
    use serde_json::json;

    #[test]
    fn empty_bundle_without_entry_field_parses() {
        let bundle: Bundle<Condition> =
            serde_json::from_value(json!({"resourceType": "Bundle", "type": "searchset"}))
                .unwrap();
        assert!(bundle.is_empty());
        assert!(bundle.last_resource().is_none());
    }

    #[test]
    fn last_resource_is_positional() {
        let raw = json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [
                {"resource": {"resourceType": "Condition", "id": "a"}},
                {"resource": {"resourceType": "Condition", "id": "b"}}
            ]
        });
        let bundle: Bundle<Condition> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(bundle.last_resource().unwrap().id.as_deref(), Some("b"));

        // Reversing the server order reverses which entry is "latest".
        let reversed = json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [
                {"resource": {"resourceType": "Condition", "id": "b"}},
                {"resource": {"resourceType": "Condition", "id": "a"}}
            ]
        });
        let bundle: Bundle<Condition> = serde_json::from_value(reversed).unwrap();
        assert_eq!(bundle.last_resource().unwrap().id.as_deref(), Some("a"));
    }

    #[test]
    fn resources_preserves_order() {
        let raw = json!({
            "resourceType": "Bundle",
            "entry": [
                {"fullUrl": "http://example/Condition/1", "resource": {"resourceType": "Condition", "id": "1"}},
                {"resource": {"resourceType": "Condition", "id": "2"}}
            ]
        });
        let bundle: Bundle<Condition> = serde_json::from_value(raw).unwrap();
        let ids: Vec<_> = bundle
            .resources()
            .into_iter()
            .map(|c| c.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
