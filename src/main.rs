use clap::Parser;
use simplelog::*;
use std::process::ExitCode;
use std::sync::Arc;

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod clapargs;
mod error;
mod lister;
mod pathspec;
mod pool;
mod s3agent;
mod store;
#[cfg(test)]
mod testutil;

use error::GscpError;
use pathspec::SourcePath;
use pool::TransferStats;
use s3agent::S3Agent;

// lazy static is used to only retrieve the number of cores once
lazy_static! {
    static ref NUM_CORES: usize = num_cpus::get();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line args
    let args = clapargs::Args::parse();
    // Set up logging; --debug turns on per-object diagnostics
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .unwrap();

    let bin_name = env!("CARGO_PKG_NAME");
    info!(
        "{} started, pid: {}, num_cores: {}",
        bin_name,
        std::process::id(),
        *NUM_CORES,
    );

    match run(&args).await {
        Ok(stats) => {
            info!(
                "{} finished, copied {} objects ({} bytes), {} failed",
                bin_name, stats.completed, stats.bytes, stats.failed,
            );
            if stats.failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &clapargs::Args) -> Result<TransferStats, GscpError> {
    // Validate both sides before touching the network
    let source = SourcePath::parse(&args.src_url)?;
    let dst_root = pathspec::resolve_destination(&args.dst_url)?;

    // Credential resolution happens here; an auth failure aborts the run
    // before any listing or download starts
    let agent = Arc::new(
        S3Agent::new(
            &source.bucket,
            args.region.as_deref(),
            args.endpoint.as_deref(),
        )
        .await?,
    );

    // Unbounded mpmc channel between the lister and the workers. The
    // lister may outpace the pool; buffered tasks are small and bucket
    // listings are assumed boundable.
    let (tx, rx) = async_channel::unbounded();

    // Spawn a task to stream listed keys into the channel for the worker
    // tasks to read from
    let producer = {
        let agent = agent.clone();
        let source = source.clone();
        let dst_root = dst_root.clone();
        let recursive = args.recursive;
        tokio::spawn(async move {
            let res = lister::enqueue_tasks(agent.as_ref(), &source, recursive, &dst_root, &tx).await;
            // Close the channel so drained workers exit
            tx.close();
            res
        })
    };

    let stats = pool::run_pool(agent, rx, args.parallel).await;

    // A listing failure is fatal even if some tasks already completed
    let enqueued = producer
        .await
        .map_err(|e| GscpError::Listing(format!("listing task failed: {}", e)))??;
    debug!("enqueued {} download tasks", enqueued);

    Ok(stats)
}
