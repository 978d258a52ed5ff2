//! cf-enrich CLI
//!
//! Adds contextual data from a reference table to NDJSON events.

use cf_cli_common::{format_count, format_rate, init_logging};
use clap::Parser;

mod args;
mod run;

use args::Cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(args.log_level)?;

    let summary = run::execute(&args)?;
    let stats = &summary.stats;

    eprintln!();
    eprintln!("Enrichment completed:");
    eprintln!("  Threads:         {}", summary.threads);
    eprintln!("  Events read:     {}", format_count(summary.events));
    eprintln!("  Events rejected: {}", format_count(summary.rejected));
    eprintln!("  Enriched:        {}", format_count(stats.enriched));
    eprintln!("  Unmatched:       {}", format_count(stats.unmatched));
    eprintln!("  Default hits:    {}", format_count(stats.default_hits));
    eprintln!("  Fields injected: {}", format_count(stats.fields_injected));
    eprintln!("  Hit rate:        {:.1}%", stats.hit_rate() * 100.0);
    eprintln!(
        "  Duration:        {:.2}s ({})",
        summary.elapsed.as_secs_f64(),
        format_rate(stats.processed, summary.elapsed)
    );

    Ok(())
}
