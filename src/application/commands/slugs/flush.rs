use super::SlugCommandService;
use crate::{
    application::dto::{FlushReport, GeneratedSlugDto},
    domain::{
        errors::DomainResult,
        slug::{
            ChangeTracker, RecordHandle,
            services::{BatchLedger, BuildOutcome, SlugTarget},
        },
    },
};

impl SlugCommandService {
    /// Batch hook. Builds slugs for every scheduled insertion, then every
    /// scheduled update, one record at a time. The first failure aborts
    /// the flush; fields written before it stay on their records.
    pub async fn flush(&self, tracker: &mut dyn ChangeTracker) -> DomainResult<FlushReport> {
        let mut ledger = BatchLedger::new();
        ledger.clear();
        let mut report = FlushReport::default();

        for record in tracker.scheduled_insertions() {
            self.process(tracker, &mut ledger, &mut report, record, true)
                .await?;
        }

        for record in tracker.scheduled_updates() {
            if tracker.is_scheduled_for_insert(record) {
                continue;
            }
            self.process(tracker, &mut ledger, &mut report, record, false)
                .await?;
        }

        tracing::debug!(
            generated = report.len(),
            ledger = ledger.len(),
            "slug flush complete"
        );
        Ok(report)
    }

    async fn process(
        &self,
        tracker: &mut dyn ChangeTracker,
        ledger: &mut BatchLedger,
        report: &mut FlushReport,
        record: RecordHandle,
        is_insert: bool,
    ) -> DomainResult<()> {
        let Some(record_type) = tracker.record(record).map(|r| r.record_type().to_string()) else {
            tracing::warn!(%record, "scheduled record is not tracked, skipping");
            return Ok(());
        };
        let Some(sluggable) = self.registry.get(&record_type) else {
            return Ok(());
        };

        let change_set = tracker.change_set_of(record);
        let mut finalized_unique = false;

        for field in &sluggable.fields {
            let target = SlugTarget {
                record,
                metadata: &sluggable.metadata,
                field,
            };
            let outcome = self
                .builder
                .build(tracker, ledger, target, &change_set, is_insert)
                .await?;

            if let BuildOutcome::Generated(generated) = outcome {
                tracing::debug!(
                    %record,
                    record_type = %record_type,
                    field = %generated.field,
                    slug = %generated.slug,
                    "slug generated"
                );
                finalized_unique |= field.unique;
                report.push(GeneratedSlugDto::new(record, record_type.as_str(), generated));
            }
        }

        if finalized_unique {
            ledger.record(&sluggable.metadata.root_type, record);
        }
        Ok(())
    }
}
