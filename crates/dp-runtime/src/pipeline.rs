use std::sync::Arc;

use orion_error::prelude::*;
use orion_error::ErrorOweBase;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;

use dp_config::PipelineConfig;
use dp_core::{DateParts, Diagnostics};

use crate::diagnostics::TracingDiagnostics;
use crate::error::{RuntimeReason, RuntimeResult};
use crate::event_bridge::{decode_event, encode_event};
use crate::metrics::{PipelineMetrics, RunReport};

/// One input line, tagged with its 1-based position in the stream.
type NumberedLine = (u64, String);

/// JSON-lines enrichment pipeline around one shared [`DateParts`] filter.
///
/// Lines are read in batches of `batch_size`. Each batch is split across up
/// to `workers` blocking tasks and the results are written back in input
/// order. Lines that are not UTF-8 JSON objects are skipped and counted; events
/// that fail the filter are still written, carrying the error tags.
pub struct Pipeline {
    filter: Arc<DateParts>,
    time_fields: Arc<[String]>,
    workers: usize,
    batch_size: usize,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> RuntimeResult<Self> {
        Self::with_diagnostics(config, Arc::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(
        config: &PipelineConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> RuntimeResult<Self> {
        let filter = DateParts::with_diagnostics(&config.filter, diagnostics).err_conv()?;
        check_time_fields(&filter, &config.runtime.time_fields)?;
        dp_info!(
            conf,
            filter = filter.id(),
            time_field = filter.time_field(),
            fields = filter.fields().len(),
            duration = filter.duration().is_some(),
            workers = config.runtime.workers,
            batch_size = config.runtime.batch_size,
            "date-parts pipeline ready"
        );
        Ok(Self {
            filter: Arc::new(filter),
            time_fields: config.runtime.time_fields.clone().into(),
            workers: config.runtime.workers.max(1),
            batch_size: config.runtime.batch_size.max(1),
            metrics: Arc::new(PipelineMetrics::new()),
        })
    }

    pub fn filter(&self) -> &DateParts {
        &self.filter
    }

    /// Counters accumulated over every `run` so far.
    pub fn report(&self) -> RunReport {
        self.metrics.snapshot()
    }

    /// Enrich every line of `reader` and write the results to `writer`.
    ///
    /// Returns the counters for this run only.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> RuntimeResult<RunReport>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let before = self.metrics.snapshot();
        let mut batch: Vec<NumberedLine> = Vec::with_capacity(self.batch_size);
        let mut buf = Vec::new();
        let mut line_no = 0u64;

        loop {
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .owe(RuntimeReason::Io)?;
            let done = read == 0;
            if !done {
                line_no += 1;
                match String::from_utf8(std::mem::take(&mut buf)) {
                    Ok(mut line) => {
                        line.truncate(line.trim_end_matches(['\r', '\n']).len());
                        if !line.trim().is_empty() {
                            batch.push((line_no, line));
                        }
                    }
                    Err(e) => {
                        self.metrics.decode_error();
                        dp_warn!(pipe, line = line_no, error = %e, "skipping line that is not UTF-8");
                    }
                }
            }

            if batch.len() >= self.batch_size || (done && !batch.is_empty()) {
                let output = self.process_batch(std::mem::take(&mut batch)).await?;
                for line in output {
                    writer.write_all(line.as_bytes()).await.owe(RuntimeReason::Io)?;
                    writer.write_all(b"\n").await.owe(RuntimeReason::Io)?;
                }
            }

            if done {
                break;
            }
        }
        writer.flush().await.owe(RuntimeReason::Io)?;

        let after = self.metrics.snapshot();
        let report = RunReport {
            events: after.events - before.events,
            matched: after.matched - before.matched,
            failed: after.failed - before.failed,
            decode_errors: after.decode_errors - before.decode_errors,
        };
        dp_info!(
            sys,
            filter = self.filter.id(),
            lines = line_no,
            events = report.events,
            matched = report.matched,
            failed = report.failed,
            decode_errors = report.decode_errors,
            "pipeline finished"
        );
        Ok(report)
    }

    async fn process_batch(&self, mut batch: Vec<NumberedLine>) -> RuntimeResult<Vec<String>> {
        let chunk_size = batch.len().div_ceil(self.workers).max(1);
        let rows = batch.len();
        let mut join_set = JoinSet::new();
        let mut chunks = 0usize;

        while !batch.is_empty() {
            let rest = batch.split_off(chunk_size.min(batch.len()));
            let chunk = std::mem::replace(&mut batch, rest);
            let filter = Arc::clone(&self.filter);
            let time_fields = Arc::clone(&self.time_fields);
            let metrics = Arc::clone(&self.metrics);
            let index = chunks;
            join_set.spawn_blocking(move || {
                (index, process_chunk(&filter, &time_fields, &metrics, chunk))
            });
            chunks += 1;
        }
        dp_trace!(pipe, rows, chunks, "batch dispatched");

        let mut slots: Vec<Vec<String>> = vec![Vec::new(); chunks];
        while let Some(joined) = join_set.join_next().await {
            let (index, lines) = joined.map_err(|e| {
                StructError::from(RuntimeReason::Worker).with_detail(format!("task join error: {e}"))
            })?;
            slots[index] = lines;
        }
        Ok(slots.into_iter().flatten().collect())
    }
}

/// Only fields listed in `runtime.time_fields` are decoded into timestamps,
/// so a filter reading any other field could never match.
fn check_time_fields(filter: &DateParts, time_fields: &[String]) -> RuntimeResult<()> {
    let mut needed = vec![filter.time_field()];
    if let Some(duration) = filter.duration() {
        needed.push(duration.start_field.as_str());
        needed.push(duration.end_field.as_str());
    }
    match needed
        .into_iter()
        .find(|field| !time_fields.iter().any(|t| t == field))
    {
        Some(missing) => StructError::from(RuntimeReason::Bootstrap)
            .with_detail(format!(
                "time field {missing:?} is not listed in runtime.time_fields"
            ))
            .err(),
        None => Ok(()),
    }
}

fn process_chunk(
    filter: &DateParts,
    time_fields: &[String],
    metrics: &PipelineMetrics,
    chunk: Vec<NumberedLine>,
) -> Vec<String> {
    chunk
        .into_iter()
        .filter_map(|(line_no, line)| process_line(filter, time_fields, metrics, line_no, &line))
        .collect()
}

fn process_line(
    filter: &DateParts,
    time_fields: &[String],
    metrics: &PipelineMetrics,
    line_no: u64,
    line: &str,
) -> Option<String> {
    let mut event = match decode_event(line, time_fields) {
        Ok(event) => event,
        Err(e) => {
            metrics.decode_error();
            dp_warn!(pipe, line = line_no, error = %e, "skipping undecodable line");
            return None;
        }
    };

    let outcome = filter.filter(&mut event);
    metrics.observe(&outcome);

    match serde_json::to_string(&encode_event(&event)) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            dp_warn!(pipe, line = line_no, error = %e, "dropping unencodable event");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
