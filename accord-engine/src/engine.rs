//! Detection engine
//!
//! Drives the lookup pipeline: parse a constraint batch into the index once,
//! then stream events through it. The two-phase contract is encoded in the
//! types: [`EngineBuilder`] is the only mutable stage, and the only way to
//! obtain a [`DetectionEngine`] is to finish a build, so any reachable engine
//! is ready and immutable. Shared references may classify concurrently.

use accord_core::{
    AccordResult, BuildMode, Constraint, ConstraintError, EngineConfig, Event, EventError,
    RawActivityRecord, RawConstraintRecord,
};
use tracing::warn;

use crate::index::ConstraintIndex;
use crate::normalizer::normalize;
use crate::parser::parse_constraint;

// ============================================================================
// BUILD REPORTING
// ============================================================================

/// One constraint row dropped during a lenient build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedConstraint {
    /// Zero-based row index within the batch.
    pub row: usize,
    /// Why the row was rejected.
    pub error: ConstraintError,
}

/// Out-of-band record of what a build accepted and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Constraints inserted into the index.
    pub accepted: usize,
    /// Rows rejected and skipped (lenient mode only).
    pub dropped: Vec<DroppedConstraint>,
}

impl BuildReport {
    /// Whether every row in the batch was accepted.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

// ============================================================================
// ENGINE BUILDER
// ============================================================================

/// Mutable build stage of the engine.
///
/// Supports incremental loading: batches may be added in any number of calls
/// before [`finish`]. Constraint order never affects classification results.
///
/// [`finish`]: EngineBuilder::finish
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    index: ConstraintIndex,
    report: BuildReport,
    rows_seen: usize,
}

impl EngineBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Insert an already-parsed constraint.
    pub fn add_constraint(&mut self, constraint: &Constraint) {
        self.index.insert(constraint);
        self.report.accepted += 1;
    }

    /// Parse and insert one raw constraint row.
    ///
    /// # Errors
    ///
    /// In strict mode, a malformed row is returned as an error. In lenient
    /// mode the row is dropped, warned about, recorded in the build report,
    /// and `Ok` is returned.
    pub fn add_record(&mut self, record: &RawConstraintRecord) -> AccordResult<()> {
        let row = self.rows_seen;
        self.rows_seen += 1;

        match parse_constraint(record) {
            Ok(constraint) => {
                self.add_constraint(&constraint);
                Ok(())
            }
            Err(error) => match self.config.build_mode {
                BuildMode::Strict => Err(error.into()),
                BuildMode::Lenient => {
                    warn!(row, %error, "dropping malformed constraint");
                    self.report.dropped.push(DroppedConstraint { row, error });
                    Ok(())
                }
            },
        }
    }

    /// Parse and insert a batch of raw constraint rows.
    ///
    /// # Errors
    ///
    /// Strict mode stops at the first malformed row; the builder should then
    /// be discarded, retaining no partial index.
    pub fn add_records<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a RawConstraintRecord>,
    ) -> AccordResult<()> {
        for record in records {
            self.add_record(record)?;
        }
        Ok(())
    }

    /// Finalize the build. The returned engine is immutable.
    pub fn finish(self) -> DetectionEngine {
        DetectionEngine {
            index: self.index,
            report: self.report,
        }
    }
}

// ============================================================================
// CLASSIFICATION REPORTING
// ============================================================================

/// One activity record skipped during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Zero-based record index within the batch.
    pub row: usize,
    /// Why normalization failed. The record is classified as a non-conflict.
    pub error: EventError,
}

/// Per-batch classification outcome with the conflict tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationReport {
    /// One flag per input record, in input order.
    pub flags: Vec<bool>,
    /// Number of flags set.
    pub conflicts: usize,
    /// Records that failed normalization (flagged `false`).
    pub malformed: Vec<MalformedRecord>,
}

// ============================================================================
// DETECTION ENGINE
// ============================================================================

/// The ready, immutable conflict-detection engine.
#[derive(Debug, Clone)]
pub struct DetectionEngine {
    index: ConstraintIndex,
    report: BuildReport,
}

impl DetectionEngine {
    /// Parse a constraint batch and build an engine in one step.
    ///
    /// # Errors
    ///
    /// Strict mode fails atomically on the first malformed constraint.
    /// Lenient mode (the default) never fails; dropped rows are recorded in
    /// the build report.
    pub fn build(records: &[RawConstraintRecord], config: EngineConfig) -> AccordResult<Self> {
        let mut builder = EngineBuilder::new(config);
        builder.add_records(records)?;
        Ok(builder.finish())
    }

    /// Build an engine from already-parsed constraints.
    pub fn from_constraints(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        let mut builder = EngineBuilder::new(EngineConfig::default());
        for constraint in constraints {
            builder.add_constraint(&constraint);
        }
        builder.finish()
    }

    /// What the build accepted and dropped.
    pub fn build_report(&self) -> &BuildReport {
        &self.report
    }

    /// The underlying constraint index.
    pub fn index(&self) -> &ConstraintIndex {
        &self.index
    }

    /// Classify one normalized event.
    pub fn check(&self, event: &Event) -> bool {
        self.index.check(event)
    }

    /// Classify a batch of normalized events, one flag per event in input
    /// order.
    pub fn classify_events(&self, events: &[Event]) -> Vec<bool> {
        events.iter().map(|event| self.check(event)).collect()
    }

    /// Normalize and classify a batch of raw activity records.
    ///
    /// Always returns one flag per record, in input order. A record that
    /// fails normalization is flagged `false` and warned about; one bad
    /// record never disturbs its neighbours.
    pub fn classify(&self, records: &[RawActivityRecord]) -> Vec<bool> {
        self.classify_report(records).flags
    }

    /// Like [`classify`], also returning the conflict tally and the rows
    /// that failed normalization.
    ///
    /// [`classify`]: DetectionEngine::classify
    pub fn classify_report(&self, records: &[RawActivityRecord]) -> ClassificationReport {
        let mut report = ClassificationReport::default();
        for (row, record) in records.iter().enumerate() {
            let flag = match normalize(record) {
                Ok(event) => self.check(&event),
                Err(error) => {
                    warn!(row, %error, "skipping malformed event");
                    report.malformed.push(MalformedRecord { row, error });
                    false
                }
            };
            if flag {
                report.conflicts += 1;
            }
            report.flags.push(flag);
        }
        report
    }
}

/// One-shot driver: build a lenient engine from `constraints` and classify
/// `logdata`, returning one conflict flag per record.
pub fn detect(logdata: &[RawActivityRecord], constraints: &[RawConstraintRecord]) -> Vec<bool> {
    match DetectionEngine::build(constraints, EngineConfig::lenient()) {
        Ok(engine) => engine.classify(logdata),
        // Lenient builds never fail; keep the contract total regardless.
        Err(_) => vec![false; logdata.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn delete_constraint() -> RawConstraintRecord {
        RawConstraintRecord::new(
            strings(&["doc1"]),
            "Can Delete",
            strings(&["admin@x"]),
            "",
            strings(&[]),
        )
    }

    fn bad_constraint() -> RawConstraintRecord {
        RawConstraintRecord::new(
            strings(&["doc1"]),
            "Can Delete",
            strings(&["admin@x"]),
            "almost",
            strings(&[]),
        )
    }

    fn delete_record(doc: &str, actor: &str) -> RawActivityRecord {
        RawActivityRecord::new(
            "2024-04-22T15:57:06Z",
            "Delete",
            doc,
            "Report",
            "uid-1",
            actor,
        )
    }

    #[test]
    fn lenient_build_drops_and_reports() {
        let records = vec![delete_constraint(), bad_constraint(), delete_constraint()];
        let engine = DetectionEngine::build(&records, EngineConfig::lenient()).unwrap();

        let report = engine.build_report();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].row, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn strict_build_fails_atomically() {
        let records = vec![delete_constraint(), bad_constraint()];
        assert!(DetectionEngine::build(&records, EngineConfig::strict()).is_err());
    }

    #[test]
    fn malformed_event_classifies_false_and_continues() {
        let engine =
            DetectionEngine::build(&[delete_constraint()], EngineConfig::default()).unwrap();

        let records = vec![
            delete_record("doc1", "admin@x"),
            RawActivityRecord::new("2024-04-22T15:57:06Z", "Shred", "doc1", "", "", "admin@x"),
            delete_record("doc1", "admin@x"),
        ];
        let report = engine.classify_report(&records);

        assert_eq!(report.flags, vec![true, false, true]);
        assert_eq!(report.conflicts, 2);
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].row, 1);
    }

    #[test]
    fn incremental_loading_before_finish() {
        let mut builder = EngineBuilder::new(EngineConfig::lenient());
        builder.add_records(&[delete_constraint()]).unwrap();
        builder
            .add_records(&[RawConstraintRecord::new(
                strings(&["doc2"]),
                "Can Delete",
                strings(&["admin@x"]),
                "",
                strings(&[]),
            )])
            .unwrap();
        let engine = builder.finish();

        assert_eq!(
            engine.classify(&[
                delete_record("doc1", "admin@x"),
                delete_record("doc2", "admin@x"),
            ]),
            vec![true, true]
        );
    }

    #[test]
    fn detect_is_a_lenient_one_shot() {
        let flags = detect(
            &[
                delete_record("doc1", "admin@x"),
                delete_record("doc1", "guest@x"),
            ],
            &[delete_constraint(), bad_constraint()],
        );
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn empty_batches() {
        let engine = DetectionEngine::build(&[], EngineConfig::default()).unwrap();
        assert!(engine.index().is_empty());
        assert!(engine.classify(&[]).is_empty());
        assert_eq!(engine.classify(&[delete_record("doc1", "admin@x")]), vec![false]);
    }
}
