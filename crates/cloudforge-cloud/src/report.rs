//! Provisioning report

use crate::model::Outcome;
use serde::{Deserialize, Serialize};

/// What happened to one resource during a provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Created by this run
    Created,
    /// Already present
    Existing,
    /// Best-effort step that did not happen; does not fail the run
    Warning(String),
    /// Could not be provisioned
    Failed(String),
}

impl From<Outcome> for ReportOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Created => ReportOutcome::Created,
            Outcome::Existing => ReportOutcome::Existing,
        }
    }
}

/// Single line of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Resource type (e.g., "iam-user", "iam-policy", "s3-bucket", "s3-object")
    pub resource_type: String,

    /// Resource name or ARN
    pub resource_id: String,

    pub outcome: ReportOutcome,
}

/// Result of a provisioning run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub entries: Vec<ReportEntry>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ProvisionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        outcome: impl Into<ReportOutcome>,
    ) {
        self.entries.push(ReportEntry {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            outcome: outcome.into(),
        });
    }

    pub fn record_failure(
        &mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        error: impl std::fmt::Display,
    ) {
        self.record(
            resource_type,
            resource_id,
            ReportOutcome::Failed(error.to_string()),
        );
    }

    pub fn record_warning(
        &mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        reason: impl std::fmt::Display,
    ) {
        self.record(
            resource_type,
            resource_id,
            ReportOutcome::Warning(reason.to_string()),
        );
    }

    /// Warnings do not count against success.
    pub fn is_success(&self) -> bool {
        !self
            .entries
            .iter()
            .any(|e| matches!(e.outcome, ReportOutcome::Failed(_)))
    }

    pub fn failures(&self) -> Vec<&ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ReportOutcome::Failed(_)))
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ReportOutcome::Warning(_)))
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry.outcome {
                ReportOutcome::Created => summary.created += 1,
                ReportOutcome::Existing => summary.existing += 1,
                ReportOutcome::Warning(_) => summary.warnings += 1,
                ReportOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Counts per outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub created: usize,
    pub existing: usize,
    pub warnings: usize,
    pub failed: usize,
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} already present, {} failed",
            self.created, self.existing, self.failed
        )?;
        if self.warnings > 0 {
            write!(f, ", {} warnings", self.warnings)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut report = ProvisionReport::new();
        report.record("iam-user", "alice", Outcome::Created);
        report.record("iam-policy", "ReadOnly", Outcome::Existing);
        report.record("s3-bucket", "artifacts", Outcome::Existing);
        assert!(report.is_success());

        report.record_failure("s3-object", "a.txt", "NoSuchBucket");
        assert!(!report.is_success());
        assert_eq!(report.failures().len(), 1);

        let summary = report.summary();
        assert_eq!(
            summary,
            ReportSummary {
                created: 1,
                existing: 2,
                warnings: 0,
                failed: 1
            }
        );
        assert_eq!(summary.to_string(), "1 created, 2 already present, 1 failed");
    }

    #[test]
    fn test_warning_does_not_fail_report() {
        let mut report = ProvisionReport::new();
        report.record("s3-bucket", "artifacts", Outcome::Existing);
        report.record_warning("s3-object", "s3://artifacts/a.txt", "upload failed");

        assert!(report.is_success());
        assert!(report.failures().is_empty());
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(
            report.summary().to_string(),
            "0 created, 1 already present, 0 failed, 1 warnings"
        );
    }
}
