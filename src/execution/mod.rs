//! The chunked rule-processing pipeline.
//!
//! A [`Pipeline`] pulls rows from a [`RowSource`] in chunks of at most
//! [`PipelineOptions::chunk_size`] rows, runs every rule of its [`RuleSet`] over each chunk in
//! arrival order, and accumulates a [`Report`]. Processing is sequential and deterministic: the
//! chunk size never changes the output rows or the report contents.
//!
//! Three ways to drive it:
//!
//! - [`Pipeline::run`]: collect all cleaned rows in memory
//! - [`Pipeline::run_into`]: stream cleaned rows into a [`RowSink`], one chunk in memory at a time
//! - [`Pipeline::start`]: a [`PipelineRun`] iterator; stop pulling to end early and read the
//!   partial report
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use csv_normalizer::execution::{Pipeline, PipelineOptions};
//! use csv_normalizer::rules::Rule;
//! use csv_normalizer::types::{Header, Row};
//!
//! # fn main() -> Result<(), csv_normalizer::PipelineError> {
//! let header = Arc::new(Header::new(["email"]));
//! let rows = ["  Foo@Bar.COM ", "not-an-email", ""]
//!     .into_iter()
//!     .map(|e| Ok::<_, csv_normalizer::PipelineError>(Row::from_pairs(header.clone(), [("email", e)])));
//!
//! let pipeline = Pipeline::new(PipelineOptions { chunk_size: 2 }, Rule::email("email"))?;
//! let out = pipeline.run(rows)?;
//!
//! assert_eq!(out.rows[0].get("email"), Some("foo@bar.com"));
//! let rejected: Vec<_> = out.report.records_for("email", "email").iter().map(|r| r.row).collect();
//! assert_eq!(rejected, vec![1, 2]);
//! # Ok(())
//! # }
//! ```

mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::ingestion::RowSource;
use crate::output::RowSink;
use crate::processing::{process_chunk, DedupFilter, OneFilledFilter};
use crate::report::{DedupSummary, Report, RowFilterSummary};
use crate::rules::RuleSet;
use crate::types::{Chunk, Row};

pub use observer::{CompositeObserver, PipelineEvent, PipelineObserver, StdErrPipelineObserver};

/// Default number of rows per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Configuration for the [`Pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum rows per chunk. Must be > 0.
    pub chunk_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Lifecycle of a [`PipelineRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, nothing pulled yet.
    Idle,
    /// At least one chunk pulled, source not yet exhausted.
    Running,
    /// Source exhausted; the report is final.
    Done,
    /// The source failed. The report covers the chunks completed before the failure only.
    Aborted,
}

/// Cleaned rows plus the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub rows: Vec<Row>,
    pub report: Report,
}

/// A validated rule set plus run options. Reusable for any number of runs.
pub struct Pipeline {
    opts: PipelineOptions,
    rules: RuleSet,
    row_filter: Option<OneFilledFilter>,
    dedup: Option<DedupFilter>,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl Pipeline {
    /// Create a pipeline, failing fast on invalid configuration (`chunk_size == 0`, no rules,
    /// a rule without target column, duplicate rules, bad rule parameters).
    pub fn new(opts: PipelineOptions, rules: impl Into<RuleSet>) -> PipelineResult<Self> {
        if opts.chunk_size == 0 {
            return Err(PipelineError::config("chunk_size must be > 0"));
        }
        let rules = rules.into();
        rules.validate()?;
        Ok(Self {
            opts,
            rules,
            row_filter: None,
            dedup: None,
            observer: None,
        })
    }

    /// Drop rows with exactly one filled cell among `subset` (after rules, before dedup).
    pub fn with_row_filter(mut self, subset: Vec<String>) -> PipelineResult<Self> {
        self.row_filter = Some(OneFilledFilter::new(subset)?);
        Ok(self)
    }

    /// Drop rows repeating an earlier row's `subset` values (after rules are applied).
    pub fn with_dedup(mut self, subset: Vec<String>, ignore_empty: bool) -> PipelineResult<Self> {
        self.dedup = Some(DedupFilter::new(subset, ignore_empty)?);
        Ok(self)
    }

    /// Attach an observer for run events.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.opts
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Begin a lazy run over `source`. Nothing is read until the first pull.
    pub fn start<S: RowSource>(&self, source: S) -> PipelineRun<'_, S> {
        let mut report = Report::for_rules(&self.rules);
        let row_filter = self.row_filter.clone();
        if let Some(f) = &row_filter {
            report.row_filter = Some(RowFilterSummary {
                subset: f.subset().to_vec(),
                removed: 0,
            });
        }
        let dedup = self.dedup.clone();
        if let Some(d) = &dedup {
            report.dedup = Some(DedupSummary {
                subset: d.subset().to_vec(),
                removed: 0,
            });
        }
        PipelineRun {
            pipeline: self,
            source,
            state: RunState::Idle,
            report,
            row_filter,
            dedup,
            next_offset: 0,
            started: None,
        }
    }

    /// Run to completion, collecting every cleaned row.
    pub fn run<S: RowSource>(&self, source: S) -> PipelineResult<PipelineOutput> {
        let mut rows = Vec::new();
        let report = self.run_into(source, &mut rows)?;
        Ok(PipelineOutput { rows, report })
    }

    /// Run to completion, streaming each cleaned chunk into `sink` in order.
    pub fn run_into<S: RowSource, K: RowSink + ?Sized>(&self, source: S, sink: &mut K) -> PipelineResult<Report> {
        let mut run = self.start(source);
        while let Some(chunk) = run.next() {
            sink.write_rows(chunk?.rows)?;
        }
        Ok(run.into_report())
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("opts", &self.opts)
            .field("rules", &self.rules)
            .field("row_filter", &self.row_filter.as_ref().map(OneFilledFilter::subset))
            .field("dedup", &self.dedup.as_ref().map(DedupFilter::subset))
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// An in-progress run. Each `next()` pulls and processes one chunk.
///
/// The yielded [`Chunk`] keeps the offset of its first input row; with the row filter or dedup
/// enabled it may hold fewer rows than were read.
pub struct PipelineRun<'p, S> {
    pipeline: &'p Pipeline,
    source: S,
    state: RunState,
    report: Report,
    row_filter: Option<OneFilledFilter>,
    dedup: Option<DedupFilter>,
    next_offset: usize,
    started: Option<Instant>,
}

impl<S: RowSource> PipelineRun<'_, S> {
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Report for the chunks processed so far.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Stop the run and take the report. Chunks never pulled are not reflected in it.
    pub fn into_report(self) -> Report {
        self.report
    }

    fn begin(&mut self) {
        self.state = RunState::Running;
        self.started = Some(Instant::now());
        let opts = self.pipeline.opts;
        info!(
            rules = self.pipeline.rules.len(),
            chunk_size = opts.chunk_size,
            "pipeline run started"
        );
        self.pipeline.emit(PipelineEvent::RunStarted {
            rules: self.pipeline.rules.len(),
            chunk_size: opts.chunk_size,
        });
    }

    fn complete(&mut self) {
        self.state = RunState::Done;
        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        let rejected = self.report.total_rejected();
        info!(
            rows = self.report.rows_total,
            chunks = self.report.chunks,
            rejected,
            elapsed_ms = elapsed.as_millis() as u64,
            "pipeline run finished"
        );
        self.pipeline.emit(PipelineEvent::RunFinished {
            elapsed,
            rows: self.report.rows_total,
            chunks: self.report.chunks,
            rejected,
        });
    }

    fn abort(&mut self, error: &PipelineError) {
        self.state = RunState::Aborted;
        warn!(next_row = self.next_offset, %error, "pipeline run aborted");
        self.pipeline.emit(PipelineEvent::RunAborted {
            next_row: self.next_offset,
            error: error.to_string(),
        });
    }

    fn process(&mut self, rows: Vec<Row>) -> Chunk {
        let mut chunk = Chunk::new(self.next_offset, rows);
        let start_row = chunk.start_offset;
        let row_count = chunk.len();
        self.next_offset = chunk.end_offset();
        self.pipeline.emit(PipelineEvent::ChunkStarted { start_row, row_count });

        let mut rejected = 0;
        for rule in &self.pipeline.rules {
            let out = process_chunk(chunk, rule);
            rejected += out.rejections.len();
            self.report.absorb(rule, out.stats, out.rejections);
            chunk = out.chunk;
        }

        if let Some(filter) = &mut self.row_filter {
            chunk.rows = filter.filter_rows(std::mem::take(&mut chunk.rows));
            if let Some(summary) = &mut self.report.row_filter {
                summary.removed = filter.removed();
            }
        }

        if let Some(dedup) = &mut self.dedup {
            chunk.rows = dedup.filter_rows(std::mem::take(&mut chunk.rows));
            if let Some(summary) = &mut self.report.dedup {
                summary.removed = dedup.removed();
            }
        }

        self.report.rows_total += row_count;
        self.report.chunks += 1;
        debug!(start_row, row_count, rejected, output_rows = chunk.len(), "chunk processed");
        self.pipeline.emit(PipelineEvent::ChunkFinished {
            start_row,
            output_rows: chunk.len(),
            rejected,
        });
        chunk
    }
}

impl<S: RowSource> Iterator for PipelineRun<'_, S> {
    type Item = PipelineResult<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            RunState::Done | RunState::Aborted => return None,
            RunState::Idle => self.begin(),
            RunState::Running => {}
        }

        match self.source.next_chunk(self.pipeline.opts.chunk_size) {
            Ok(Some(rows)) => Some(Ok(self.process(rows))),
            Ok(None) => {
                self.complete();
                None
            }
            Err(e) => {
                self.abort(&e);
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        CompositeObserver, Pipeline, PipelineEvent, PipelineObserver, PipelineOptions, RunState,
        StdErrPipelineObserver,
    };
    use crate::error::{PipelineError, PipelineResult};
    use crate::rules::{PhoneRule, Rule, RuleKind, RuleSet};
    use crate::types::{Header, Row};

    fn email_rows(emails: &[&str]) -> Vec<PipelineResult<Row>> {
        let h = Arc::new(Header::new(["id", "email"]));
        emails
            .iter()
            .enumerate()
            .map(|(i, e)| Ok(Row::new(h.clone(), vec![i.to_string(), e.to_string()])))
            .collect()
    }

    fn opts(chunk_size: usize) -> PipelineOptions {
        PipelineOptions { chunk_size }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<PipelineEvent>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn on_event(&self, event: &PipelineEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn zero_chunk_size_fails_fast() {
        let err = Pipeline::new(opts(0), Rule::email("email")).err().unwrap();
        assert!(matches!(err, PipelineError::Config { .. }));
    }

    #[test]
    fn missing_target_column_fails_fast() {
        let err = Pipeline::new(opts(10), Rule::email("")).err().unwrap();
        assert!(err.to_string().contains("no target column"));
    }

    #[test]
    fn state_machine_goes_idle_running_done() {
        let pipeline = Pipeline::new(opts(2), Rule::email("email")).unwrap();
        let mut run = pipeline.start(email_rows(&["a@b.co", "x", "c@d.io"]).into_iter());
        assert_eq!(run.state(), RunState::Idle);

        assert_eq!(run.next().unwrap().unwrap().len(), 2);
        assert_eq!(run.state(), RunState::Running);
        assert_eq!(run.next().unwrap().unwrap().start_offset, 2);
        assert!(run.next().is_none());
        assert_eq!(run.state(), RunState::Done);
        assert!(run.next().is_none());

        let report = run.into_report();
        assert_eq!(report.rows_total, 3);
        assert_eq!(report.chunks, 2);
    }

    #[test]
    fn stopping_early_leaves_partial_report() {
        let pipeline = Pipeline::new(opts(2), Rule::email("email")).unwrap();
        let mut run = pipeline.start(email_rows(&["bad", "a@b.co", "worse", "worst"]).into_iter());
        run.next().unwrap().unwrap();

        let report = run.into_report();
        assert_eq!(report.rows_total, 2);
        let rows: Vec<_> = report.records_for("email", "email").iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn source_failure_aborts_the_run() {
        let mut items = email_rows(&["a@b.co", "b@c.co", "c@d.co"]);
        items.insert(
            2,
            Err(PipelineError::SourceRead {
                row: 2,
                message: "corrupt".to_string(),
            }),
        );
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = Pipeline::new(opts(2), Rule::email("email"))
            .unwrap()
            .with_observer(observer.clone());

        let mut run = pipeline.start(items.into_iter());
        assert!(run.next().unwrap().is_ok());
        let err = run.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("corrupt"));
        assert_eq!(run.state(), RunState::Aborted);
        assert!(run.next().is_none());

        let events = observer.events.lock().unwrap();
        assert!(matches!(events.last(), Some(PipelineEvent::RunAborted { next_row: 2, .. })));
    }

    #[test]
    fn run_propagates_source_failure() {
        let items: Vec<PipelineResult<Row>> = vec![Err(PipelineError::SourceRead {
            row: 0,
            message: "unreadable".to_string(),
        })];
        let pipeline = Pipeline::new(opts(5), Rule::email("email")).unwrap();
        assert!(pipeline.run(items.into_iter()).is_err());
    }

    #[test]
    fn composite_observer_forwards_run_events() {
        let recorder = Arc::new(RecordingObserver::default());
        let composite = CompositeObserver::new(vec![
            recorder.clone() as Arc<dyn PipelineObserver>,
            Arc::new(StdErrPipelineObserver),
        ]);
        let pipeline = Pipeline::new(opts(5), Rule::email("email"))
            .unwrap()
            .with_observer(Arc::new(composite));
        pipeline.run(email_rows(&["a@b.co"]).into_iter()).unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[3], PipelineEvent::RunFinished { rows: 1, chunks: 1, rejected: 0, .. }));
    }

    #[test]
    fn observer_sees_run_lifecycle() {
        let observer = Arc::new(RecordingObserver::default());
        let pipeline = Pipeline::new(opts(2), Rule::email("email"))
            .unwrap()
            .with_observer(observer.clone());
        pipeline.run(email_rows(&["a@b.co", "bad", "c@d.io"]).into_iter()).unwrap();

        let events = observer.events.lock().unwrap();
        assert_eq!(events[0], PipelineEvent::RunStarted { rules: 1, chunk_size: 2 });
        assert_eq!(events[1], PipelineEvent::ChunkStarted { start_row: 0, row_count: 2 });
        assert_eq!(
            events[2],
            PipelineEvent::ChunkFinished {
                start_row: 0,
                output_rows: 2,
                rejected: 1
            }
        );
        assert!(matches!(
            events.last(),
            Some(PipelineEvent::RunFinished { rows: 3, chunks: 2, rejected: 1, .. })
        ));
    }

    #[test]
    fn rules_run_in_registration_order_on_their_columns() {
        let h = Arc::new(Header::new(["email", "phone"]));
        let rows: Vec<PipelineResult<Row>> = vec![
            Ok(Row::new(h.clone(), vec![" A@B.CO ".into(), "+7 912 345 67 89".into()])),
            Ok(Row::new(h.clone(), vec!["nope".into(), "12".into()])),
        ];
        let rules = RuleSet::new()
            .with(Rule::email("email"))
            .with(Rule::new("phone", RuleKind::Phone(PhoneRule::default())));
        let out = Pipeline::new(opts(10), rules).unwrap().run(rows.into_iter()).unwrap();

        assert_eq!(out.rows[0].values(), &["a@b.co".to_string(), "79123456789".to_string()]);
        assert_eq!(out.rows[1].values(), &[String::new(), String::new()]);
        assert_eq!(out.report.section("phone", "phone").unwrap().records[0].raw, "12");
        assert_eq!(out.report.total_rejected(), 2);
    }

    #[test]
    fn dedup_runs_after_rules_and_is_reported() {
        let pipeline = Pipeline::new(opts(2), Rule::email("email"))
            .unwrap()
            .with_dedup(vec!["email".to_string()], true)
            .unwrap();
        let out = pipeline
            .run(email_rows(&["A@b.co", "a@b.co ", "bad", "worse", "c@d.io"]).into_iter())
            .unwrap();

        let ids: Vec<_> = out.rows.iter().map(|r| r.get("id").unwrap()).collect();
        assert_eq!(ids, vec!["0", "2", "3", "4"]);
        assert_eq!(out.report.dedup.as_ref().unwrap().removed, 1);
        assert_eq!(out.report.rows_total, 5);
    }

    #[test]
    fn empty_source_completes_with_empty_report() {
        let pipeline = Pipeline::new(opts(3), Rule::email("email")).unwrap();
        let out = pipeline.run(Vec::<PipelineResult<Row>>::new().into_iter()).unwrap();
        assert!(out.rows.is_empty());
        assert_eq!(out.report.chunks, 0);
        assert_eq!(out.report.section("email", "email").unwrap().stats.examined, 0);
    }
}
