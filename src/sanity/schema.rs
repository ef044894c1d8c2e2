//! The seam to an external JSON Schema validator.
//!
//! The schema is owned by the OpenLABEL standard, not by this crate. Callers
//! plug in whichever validator they use and the store surfaces its verdict.

use serde_json::Value;

/// Validates a serialized document against the OpenLABEL JSON Schema.
pub trait SchemaValidator {
    /// Returns one message per violation; empty means the document conforms.
    fn validate(&self, document: &Value) -> Vec<String>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&Value) -> Vec<String>,
{
    fn validate(&self, document: &Value) -> Vec<String> {
        self(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_is_a_validator() {
        let needs_metadata = |doc: &Value| {
            if doc["openlabel"]["metadata"].is_object() {
                Vec::new()
            } else {
                vec!["missing metadata".to_string()]
            }
        };
        assert!(needs_metadata
            .validate(&json!({"openlabel": {"metadata": {}}}))
            .is_empty());
        assert_eq!(needs_metadata.validate(&json!({"openlabel": {}})).len(), 1);
    }
}
