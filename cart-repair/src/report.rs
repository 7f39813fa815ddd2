//! Outcome of a sanitize pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CartError, ErrorKind};
use crate::item::ItemRepair;
use crate::sanitizer::RepairPlan;

/// Terminal state of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    /// Nothing stored under the key
    Empty,
    /// Cart parsed and every item was already valid
    Unchanged,
    /// At least one field was replaced
    Repaired,
    /// Cart could not be read, parsed or written
    Failed,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::Empty => "empty",
            RepairStatus::Unchanged => "unchanged",
            RepairStatus::Repaired => "repaired",
            RepairStatus::Failed => "failed",
        }
    }
}

/// Result object handed back to whoever invoked the pass
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeReport {
    pub success: bool,
    pub status: RepairStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Cart>,
    pub repairs: Vec<ItemRepair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub dry_run: bool,
    pub checked_at: DateTime<Utc>,
}

impl SanitizeReport {
    pub fn from_plan(plan: RepairPlan, dry_run: bool) -> Self {
        let message = match plan.status {
            RepairStatus::Empty => "cart empty, no repair needed".to_string(),
            RepairStatus::Unchanged => "cart data valid, no repair needed".to_string(),
            RepairStatus::Repaired if dry_run => format!(
                "cart data needs repair ({} field(s), dry run, nothing written)",
                plan.repairs.len()
            ),
            RepairStatus::Repaired => {
                format!("cart data repaired ({} field(s))", plan.repairs.len())
            }
            RepairStatus::Failed => "failed to repair cart data".to_string(),
        };

        Self {
            success: true,
            status: plan.status,
            message,
            data: plan.cart,
            repairs: plan.repairs,
            error_kind: None,
            error: None,
            dry_run,
            checked_at: Utc::now(),
        }
    }

    pub fn failure(err: &CartError, dry_run: bool) -> Self {
        let kind = err.kind();
        let message = match kind {
            ErrorKind::Format => "cart data is not valid JSON",
            ErrorKind::Shape => "cart data has wrong shape",
            ErrorKind::Unclassified => "failed to repair cart data",
        };

        Self {
            success: false,
            status: RepairStatus::Failed,
            message: message.to_string(),
            data: None,
            repairs: Vec::new(),
            error_kind: Some(kind),
            error: Some(err.to_string()),
            dry_run,
            checked_at: Utc::now(),
        }
    }

    pub fn was_repaired(&self) -> bool {
        self.status == RepairStatus::Repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_report_shape() {
        let report = SanitizeReport::failure(&CartError::Shape { found: "object" }, false);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["status"], json!("failed"));
        assert_eq!(value["message"], json!("cart data has wrong shape"));
        assert_eq!(value["error_kind"], json!("shape"));
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_empty_report_message() {
        let report = SanitizeReport::from_plan(RepairPlan::empty(), false);
        assert!(report.success);
        assert!(report.message.contains("no repair needed"));
        assert!(!report.was_repaired());
    }
}
