//! Main execution logic for cf-enrich.

use anyhow::{anyhow, Context, Result};
use cf_enrichment::{AddContextualData, StatsSnapshot};
use cf_types::{InstallPaths, LogMessage, PathOptions};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::args::Cli;

/// Outcome of one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub events: u64,
    pub rejected: u64,
    pub threads: usize,
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

/// Execute the enrichment with the provided arguments.
pub fn execute(args: &Cli) -> Result<RunSummary> {
    let started = Instant::now();

    let mut stage =
        AddContextualData::from_config(&args.stage_config(), InstallPaths::new(&args.sysconfdir))?;
    stage.initialize()?;

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open input {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let (mut events, rejected) = read_events(input)?;

    let threads = worker_count(args.threads, events.len());
    let stats = enrich_events(&stage, &mut events, threads)?;

    let stdout = io::stdout();
    write_events(&events, BufWriter::new(stdout.lock()))?;

    let summary = RunSummary {
        events: events.len() as u64 + rejected,
        rejected,
        threads,
        stats,
        elapsed: started.elapsed(),
    };

    info!(
        events = summary.events,
        rejected = summary.rejected,
        enriched = stats.enriched,
        threads,
        "Enrichment finished"
    );

    Ok(summary)
}

/// Parses NDJSON events, dropping lines that are not JSON objects.
///
/// Returns the parsed events and the number of rejected lines.
pub fn read_events<R: BufRead>(input: R) -> Result<(Vec<LogMessage>, u64)> {
    let mut events = Vec::new();
    let mut rejected = 0;

    for (idx, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match LogMessage::from_json_str(line) {
            Ok(msg) => events.push(msg),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "Dropping invalid input event");
                rejected += 1;
            }
        }
    }

    Ok((events, rejected))
}

fn worker_count(requested: usize, events: usize) -> usize {
    requested.clamp(1, events.max(1))
}

/// Enriches events in place, one stage clone per thread.
///
/// Each thread owns a contiguous chunk, so output order matches input order.
pub fn enrich_events(
    stage: &AddContextualData,
    events: &mut [LogMessage],
    threads: usize,
) -> Result<StatsSnapshot> {
    let chunk_size = events.len().div_ceil(threads.max(1)).max(1);

    std::thread::scope(|s| {
        let handles: Vec<_> = events
            .chunks_mut(chunk_size)
            .enumerate()
            .map(|(thread_id, chunk)| {
                let mut worker = stage.clone();
                s.spawn(move || -> Result<StatsSnapshot> {
                    worker.initialize()?;
                    let options = PathOptions::default();
                    for msg in chunk.iter_mut() {
                        worker.process(msg, &options);
                    }
                    let snapshot = worker.stats().snapshot();
                    debug!(thread_id, processed = snapshot.processed, "Worker finished");
                    Ok(snapshot)
                })
            })
            .collect();

        let mut total = StatsSnapshot::default();
        for handle in handles {
            total += handle
                .join()
                .map_err(|_| anyhow!("enrichment worker panicked"))??;
        }
        Ok(total)
    })
}

/// Writes events as NDJSON.
pub fn write_events<W: Write>(events: &[LogMessage], mut out: W) -> Result<()> {
    for msg in events {
        serde_json::to_writer(&mut out, &msg.to_json_value())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
