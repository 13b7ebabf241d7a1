// Per-customer repair statistics
use serde::{Deserialize, Serialize};

/// Counters shown on the partner form. The server is trusted to keep
/// `completed + pending <= total`; nothing here checks it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerStats {
    #[serde(default)]
    pub total_repairs: u64,
    #[serde(default)]
    pub completed_repairs: u64,
    #[serde(default)]
    pub pending_repairs: u64,
}

/// Pre-rendered "recent repairs" fragment, inserted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecentRepairs {
    #[serde(default)]
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_are_ignored() {
        let stats: CustomerStats = serde_json::from_value(json!({
            "total_repairs": 10,
            "completed_repairs": 6,
            "pending_repairs": 4,
            "recent_repairs": [{"id": 1, "name": "RO/0001"}]
        }))
        .unwrap();
        assert_eq!(
            stats,
            CustomerStats {
                total_repairs: 10,
                completed_repairs: 6,
                pending_repairs: 4
            }
        );
    }

    #[test]
    fn test_negative_counter_is_rejected() {
        let result = serde_json::from_value::<CustomerStats>(json!({"total_repairs": -1}));
        assert!(result.is_err());
    }
}
