//! Batch confirmation over a list of task records.

use chrono::{DateTime, Utc};
use oarecon_core::{AmbiguousDoiPolicy, TaskRecord};
use serde::Serialize;

use crate::confirm::IdentityConfirmer;
use crate::error::{Result, ScienceError};

/// Status value of records that need no further work.
const STATUS_COMPLETE: &str = "Complete";

/// What happened to one record in a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Confirmed { id: String, doi: String },
    Skipped { id: String, reason: String },
}

impl BatchOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Confirmed { id, .. } | Self::Skipped { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn confirmed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Confirmed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.confirmed()
    }
}

/// Runs identity confirmation record by record. Subject-level failures are
/// recorded and the run continues; collaborator failures stop it.
pub struct BatchRunner<'a> {
    confirmer: IdentityConfirmer<'a>,
    ambiguous: AmbiguousDoiPolicy,
}

impl<'a> BatchRunner<'a> {
    pub fn new(confirmer: IdentityConfirmer<'a>, ambiguous: AmbiguousDoiPolicy) -> Self {
        Self {
            confirmer,
            ambiguous,
        }
    }

    pub async fn confirm_batch(&self, records: &[TaskRecord]) -> Result<BatchReport> {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(records.len());

        for record in records {
            let id = record.label().to_string();
            if let Some(reason) = already_done(record) {
                tracing::debug!(record = %id, reason, "skipping record");
                outcomes.push(BatchOutcome::Skipped {
                    id,
                    reason: reason.to_string(),
                });
                continue;
            }

            let result = self
                .confirmer
                .confirm_identity(
                    record.title_str(),
                    record.doi.as_deref(),
                    record.external_id.as_deref(),
                )
                .await;

            match result {
                Ok(doi) => outcomes.push(BatchOutcome::Confirmed {
                    id,
                    doi: doi.to_string(),
                }),
                Err(err @ ScienceError::AmbiguousDoi { .. })
                    if self.ambiguous == AmbiguousDoiPolicy::Fail =>
                {
                    tracing::error!(record = %id, error = %err, "stopping batch");
                    return Err(err);
                }
                Err(err) if err.is_subject_level() => {
                    tracing::warn!(record = %id, error = %err, "record not confirmed");
                    outcomes.push(BatchOutcome::Skipped {
                        id,
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!(record = %id, error = %err, "stopping batch");
                    return Err(err);
                }
            }
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        tracing::info!(
            confirmed = report.confirmed(),
            skipped = report.skipped(),
            "batch finished"
        );
        Ok(report)
    }
}

fn already_done(record: &TaskRecord) -> Option<&'static str> {
    if record.doi_confirmed {
        Some("DOI already confirmed")
    } else if record.status.as_deref() == Some(STATUS_COMPLETE) {
        Some("record complete")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRegistry, FakeResolver, FakeService, citation, publication};

    const TITLE: &str = "Deep Learning for Protein Folding";

    fn record(id: &str, doi: Option<&str>, external_id: Option<&str>) -> TaskRecord {
        TaskRecord {
            id: Some(id.to_string()),
            title: Some(TITLE.to_string()),
            doi: doi.map(str::to_string),
            external_id: external_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn subject_failures_do_not_stop_the_batch() {
        let registry = FakeRegistry::with([
            ("10.1000/good", citation(TITLE)),
            ("10.1000/other", citation("Medieval Trade Routes")),
        ]);
        let service = FakeService::default();
        let resolver = FakeResolver::with(&["10.1000/good", "10.1000/other"]);
        let runner = BatchRunner::new(
            IdentityConfirmer::new(&registry, &service, &resolver),
            AmbiguousDoiPolicy::Skip,
        );

        let records = vec![
            record("r1", Some("10.1000/other"), None),
            record("r2", Some("10.1000/missing"), None),
            record("r3", None, None),
            record("r4", Some("https://doi.org/10.1000/GOOD"), None),
        ];
        let report = runner.confirm_batch(&records).await.unwrap();

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.confirmed(), 1);
        assert_eq!(report.skipped(), 3);
        assert_eq!(report.outcomes[3], BatchOutcome::Confirmed {
            id: "r4".to_string(),
            doi: "10.1000/good".to_string(),
        });
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn finished_records_are_skipped_without_lookups() {
        let registry = FakeRegistry::default();
        let service = FakeService::default();
        let resolver = FakeResolver::default();
        let runner = BatchRunner::new(
            IdentityConfirmer::new(&registry, &service, &resolver),
            AmbiguousDoiPolicy::Skip,
        );

        let records = vec![
            TaskRecord {
                doi_confirmed: true,
                ..record("done", Some("10.1000/x"), None)
            },
            TaskRecord {
                status: Some("Complete".to_string()),
                ..record("complete", Some("10.1000/y"), None)
            },
        ];
        let report = runner.confirm_batch(&records).await.unwrap();

        assert_eq!(report.skipped(), 2);
        assert_eq!(report.outcomes[0].id(), "done");
        assert_eq!(registry.calls(), 0);
    }

    #[tokio::test]
    async fn ambiguous_doi_follows_policy() {
        let registry = FakeRegistry::default();
        let service = FakeService::with(
            "ai-1",
            vec![publication(TITLE, "10.1000/one"), publication(TITLE, "10.1000/two")],
        );
        let resolver = FakeResolver::default();
        let records = vec![record("r1", None, Some("ai-1"))];

        let skip = BatchRunner::new(
            IdentityConfirmer::new(&registry, &service, &resolver),
            AmbiguousDoiPolicy::Skip,
        );
        let report = skip.confirm_batch(&records).await.unwrap();
        assert!(matches!(&report.outcomes[0], BatchOutcome::Skipped { .. }));

        let fail = BatchRunner::new(
            IdentityConfirmer::new(&registry, &service, &resolver),
            AmbiguousDoiPolicy::Fail,
        );
        let err = fail.confirm_batch(&records).await.unwrap_err();
        assert!(matches!(err, ScienceError::AmbiguousDoi { .. }));
    }

    #[tokio::test]
    async fn doi_unknown_to_registry_is_skipped() {
        let registry = FakeRegistry::with([("10.1000/good", citation(TITLE))]);
        let service = FakeService::default();
        let resolver = FakeResolver::with(&["10.5281/zenodo.123", "10.1000/good"]);
        let runner = BatchRunner::new(
            IdentityConfirmer::new(&registry, &service, &resolver),
            AmbiguousDoiPolicy::Skip,
        );

        let records = vec![
            record("r1", Some("10.5281/zenodo.123"), None),
            record("r2", Some("10.1000/good"), None),
        ];
        let report = runner.confirm_batch(&records).await.unwrap();

        assert!(matches!(
            &report.outcomes[0],
            BatchOutcome::Skipped { id, reason } if id == "r1" && reason.contains("not in registry")
        ));
        assert_eq!(report.outcomes[1], BatchOutcome::Confirmed {
            id: "r2".to_string(),
            doi: "10.1000/good".to_string(),
        });
        assert_eq!(registry.calls(), 2);
    }

    #[tokio::test]
    async fn collaborator_failure_aborts() {
        let registry = FakeRegistry::failing();
        let service = FakeService::default();
        let resolver = FakeResolver::with(&["10.1000/good"]);
        let runner = BatchRunner::new(
            IdentityConfirmer::new(&registry, &service, &resolver),
            AmbiguousDoiPolicy::Skip,
        );

        let records = vec![
            record("r1", Some("10.1000/good"), None),
            record("r2", Some("10.1000/good"), None),
        ];
        let err = runner.confirm_batch(&records).await.unwrap_err();
        assert!(matches!(err, ScienceError::Registry(_)));
        assert_eq!(registry.calls(), 1);
    }
}
