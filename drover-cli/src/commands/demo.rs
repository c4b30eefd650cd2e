use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Args, ValueEnum};
use serde::Serialize;

use drover_core::config::ProgressConfig;
use drover_core::format::format_duration;
use drover_core::progress::{NoopReporter, ProgressReporter, RenderOptions};
use drover_core::render::{BarReporter, JsonStreamReporter, LogReporter, SpinnerReporter};
use drover_core::select::select;

use super::print_result;

/// Renderer to force instead of letting the selector decide.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Noop,
    Spinner,
    Bar,
    Log,
    Json,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of work items to process
    #[arg(long, default_value_t = 40)]
    pub items: u64,

    /// Milliseconds spent on each item
    #[arg(long, default_value_t = 50)]
    pub item_ms: u64,

    /// Announce the total only after the first item (exercises set_total)
    #[arg(long)]
    pub late_total: bool,

    /// Force a renderer instead of detecting one
    #[arg(long, value_enum)]
    pub renderer: Option<Renderer>,
}

#[derive(Debug, Serialize)]
struct DemoOutcome {
    items: u64,
    renderer: String,
    elapsed_ms: u64,
}

fn build(renderer: Renderer, options: RenderOptions) -> Arc<dyn ProgressReporter> {
    match renderer {
        Renderer::Noop => Arc::new(NoopReporter),
        Renderer::Spinner => Arc::new(SpinnerReporter::new(options)),
        Renderer::Bar => Arc::new(BarReporter::new(options)),
        Renderer::Log => Arc::new(LogReporter::new(options)),
        Renderer::Json => Arc::new(JsonStreamReporter::new(options)),
    }
}

pub async fn run(args: DemoArgs, config: &ProgressConfig) -> anyhow::Result<()> {
    let options = RenderOptions::new(args.items).with_throttle(config.throttle());
    let reporter = match args.renderer {
        Some(renderer) => build(renderer, options),
        None => select(config, options),
    };

    if args.late_total {
        reporter.set_total(0);
    }
    let started = Instant::now();
    reporter.start("Processing items");
    for done in 1..=args.items {
        tokio::time::sleep(Duration::from_millis(args.item_ms)).await;
        if args.late_total && done == 1 {
            reporter.set_total(args.items);
        }
        reporter.update(done, &format!("item {done}/{}", args.items));
    }
    reporter.finish();

    let elapsed = started.elapsed();
    let outcome = DemoOutcome {
        items: args.items,
        renderer: reporter.kind().to_string(),
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    };
    let text = format!(
        "Processed {} items with the {} renderer in {}",
        outcome.items,
        outcome.renderer,
        format_duration(elapsed)
    );
    print_result(config, &outcome, &text)
}
