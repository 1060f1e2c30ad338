use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata written by the governance auditor. Capabilities may seed
/// provisional values (e.g. a self-reported `hallucinationRisk`) that the
/// auditor later validates or overwrites.
pub type AuditMetadata = Map<String, Value>;

/// The uniform output of every capability.
///
/// `decision_trace` is append-only for the whole orchestration run: entries are
/// pushed, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub capability_name: String,
    /// Free text, or prose wrapped around a JSON payload. Consumers must
    /// tolerate decode failure.
    pub content: String,
    pub reasoning: String,
    /// Self-reported, expected in [0, 1].
    pub confidence_score: f64,
    pub decision_trace: Vec<String>,
    pub audit_metadata: AuditMetadata,
}

impl Response {
    pub fn new(
        capability_name: impl Into<String>,
        content: impl Into<String>,
        reasoning: impl Into<String>,
        confidence_score: f64,
        decision_trace: Vec<String>,
        audit_metadata: AuditMetadata,
    ) -> Self {
        Self {
            capability_name: capability_name.into(),
            content: content.into(),
            reasoning: reasoning.into(),
            confidence_score,
            decision_trace,
            audit_metadata,
        }
    }

    /// Reads a numeric metadata value, if present.
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.audit_metadata.get(key).and_then(Value::as_f64)
    }

    /// The governance verdict (`"passed"` / `"flagged"`), once audited.
    pub fn audit_status(&self) -> Option<&str> {
        self.audit_metadata
            .get("governance_audit")
            .and_then(Value::as_str)
    }

    /// Flags recorded by the audit, in order.
    pub fn audit_flags(&self) -> Vec<String> {
        self.audit_metadata
            .get("audit_flags")
            .and_then(Value::as_array)
            .map(|flags| {
                flags
                    .iter()
                    .filter_map(|f| f.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audit_accessors_read_metadata() {
        let mut metadata = AuditMetadata::new();
        metadata.insert("governance_audit".to_string(), json!("flagged"));
        metadata.insert("audit_flags".to_string(), json!(["low_confidence"]));
        metadata.insert("hallucinationRisk".to_string(), json!(0.4));

        let response = Response::new("ResumeCriticAgent", "ok", "why", 0.2, vec![], metadata);

        assert_eq!(response.audit_status(), Some("flagged"));
        assert_eq!(response.audit_flags(), vec!["low_confidence".to_string()]);
        assert_eq!(response.metadata_f64("hallucinationRisk"), Some(0.4));
    }

    #[test]
    fn test_unaudited_response_has_no_status_or_flags() {
        let response = Response::new("ResumeCriticAgent", "ok", "", 0.9, vec![], AuditMetadata::new());
        assert!(response.audit_status().is_none());
        assert!(response.audit_flags().is_empty());
    }

    #[test]
    fn test_response_serializes_with_snake_case_fields() {
        let response = Response::new("JobAlignmentAgent", "text", "r", 0.5, vec!["a".into()], AuditMetadata::new());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["capability_name"], "JobAlignmentAgent");
        assert_eq!(value["decision_trace"][0], "a");
    }
}
