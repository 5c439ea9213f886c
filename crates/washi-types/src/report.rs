//! The report entity: a titled, owned container for an ordered block list.

use serde::{Deserialize, Serialize};

use crate::ids::{ReportId, UserId};
use crate::now_millis;

/// A report. The blocks themselves live in the store, keyed by
/// `report_id`; deleting a report cascades to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Report {
    /// Create a report with a fresh id and both timestamps set to now.
    pub fn new(created_by: UserId, title: impl Into<String>, description: Option<String>) -> Self {
        let t = now_millis();
        Self {
            id: ReportId::new(),
            title: title.into(),
            description,
            created_by,
            created_at: t,
            updated_at: t,
        }
    }

    /// Bump `updated_at`. Monotonic even if the clock stepped backwards.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report() {
        let user = UserId::local();
        let r = Report::new(user, "Q3 Review", None);
        assert_eq!(r.created_by, user);
        assert_eq!(r.title, "Q3 Review");
        assert_eq!(r.description, None);
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut r = Report::new(UserId::local(), "t", None);
        r.updated_at = u64::MAX;
        r.touch();
        assert_eq!(r.updated_at, u64::MAX);
    }

    #[test]
    fn test_serde_roundtrip() {
        let r = Report::new(UserId::new(), "Board deck", Some("August numbers".to_string()));
        let json = serde_json::to_string(&r).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, r);
    }

    #[test]
    fn test_none_description_omitted_on_wire() {
        let r = Report::new(UserId::new(), "t", None);
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("description"));
    }
}
