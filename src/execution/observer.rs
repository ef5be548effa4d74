use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Events emitted by a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    RunStarted { rules: usize, chunk_size: usize },
    ChunkStarted { start_row: usize, row_count: usize },
    ChunkFinished {
        start_row: usize,
        output_rows: usize,
        rejected: usize,
    },
    RunFinished {
        elapsed: Duration,
        rows: usize,
        chunks: usize,
        rejected: usize,
    },
    /// The row source failed; no further chunks are produced.
    RunAborted { next_row: usize, error: String },
}

/// Observer hook for pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// A simple stderr logger for pipeline events.
#[derive(Debug, Default)]
pub struct StdErrPipelineObserver;

impl StdErrPipelineObserver {
    /// The line written to stderr for `event`.
    pub fn format_event(event: &PipelineEvent) -> String {
        match event {
            PipelineEvent::RunAborted { next_row, error } => {
                format!("[pipeline][abort] next_row={next_row} err={error}")
            }
            PipelineEvent::RunFinished {
                elapsed,
                rows,
                chunks,
                rejected,
            } => format!("[pipeline][ok] rows={rows} chunks={chunks} rejected={rejected} elapsed={elapsed:?}"),
            other => format!("[pipeline] {other:?}"),
        }
    }
}

impl PipelineObserver for StdErrPipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        eprintln!("{}", Self::format_event(event));
    }
}

/// An observer that fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_event(&self, event: &PipelineEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}
