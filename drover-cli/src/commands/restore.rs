use std::time::{Duration, Instant};

use clap::Args;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use drover_core::config::ProgressConfig;
use drover_core::format::format_duration;
use drover_core::progress::RenderOptions;
use drover_core::select::select;
use drover_core::ticker::{Tick, estimated_progress, track};

use super::{Cancelled, print_result};

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Name of the database to restore
    #[arg(long, default_value = "main")]
    pub database: String,

    /// Expected duration in seconds, e.g. from past restores (0 = unknown)
    #[arg(long, default_value_t = 0)]
    pub estimate_secs: u64,

    /// Simulated length of the restore in seconds
    #[arg(long, default_value_t = 5)]
    pub work_secs: u64,

    /// Seconds between progress ticks
    #[arg(long, default_value_t = 1)]
    pub tick_secs: u64,
}

#[derive(Debug, Serialize)]
struct RestoreOutcome {
    database: String,
    status: &'static str,
    elapsed_ms: u64,
}

pub async fn run(args: RestoreArgs, config: &ProgressConfig) -> anyhow::Result<()> {
    let estimate = Duration::from_secs(args.estimate_secs);
    let work = Duration::from_secs(args.work_secs);
    let reporter = select(config, RenderOptions::new(args.estimate_secs));
    info!(database = %args.database, renderer = %reporter.kind(), "Starting restore");

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let started = Instant::now();
    let work_cancel = cancel.clone();
    let completed = track(
        reporter,
        &format!("Restoring {}", args.database),
        Duration::from_secs(args.tick_secs),
        cancel,
        move |elapsed| Tick::new(estimated_progress(elapsed, estimate), ""),
        async move {
            tokio::select! {
                () = work_cancel.cancelled() => false,
                () = tokio::time::sleep(work) => true,
            }
        },
    )
    .await;
    ctrl_c.abort();

    let elapsed = started.elapsed();
    let outcome = RestoreOutcome {
        database: args.database,
        status: if completed { "restored" } else { "cancelled" },
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    };
    let text = format!(
        "Database {} {} in {}",
        outcome.database,
        outcome.status,
        format_duration(elapsed)
    );
    print_result(config, &outcome, &text)?;

    if completed {
        Ok(())
    } else {
        Err(Cancelled.into())
    }
}
