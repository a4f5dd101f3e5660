use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};

use crate::error::GscpError;
use crate::store::ObjectStore;

/// One object to copy, paired with where it lands locally
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub key: String,
    pub dest: PathBuf,
}

/// Aggregate outcome of a run
#[derive(Debug, Default)]
pub struct TransferStats {
    pub completed: u64,
    pub failed: u64,
    pub bytes: u64,
}

/// Drain the task channel with `num_workers` concurrent workers. Each task
/// maps to a distinct local path, so workers never contend on writes. A
/// failed task is logged and counted without stopping the others; the
/// caller decides the process exit status from the returned stats.
pub async fn run_pool<S>(
    store: Arc<S>,
    rx: async_channel::Receiver<DownloadTask>,
    num_workers: usize,
) -> TransferStats
where
    S: ObjectStore + ?Sized + 'static,
{
    let num_workers = num_workers.max(1);

    // Workers report per-task outcomes to an aggregator task
    let (result_tx, mut result_rx) = mpsc::channel::<(String, Result<u64, GscpError>)>(num_workers);

    // Oneshot channel to hand the totals back once the outcome channel drains
    let (stats_tx, stats_rx) = oneshot::channel::<TransferStats>();

    let output_handle = tokio::spawn(async move {
        let mut stats = TransferStats::default();
        while let Some((key, outcome)) = result_rx.recv().await {
            match outcome {
                Ok(bytes_len) => {
                    stats.completed += 1;
                    stats.bytes += bytes_len;
                    debug!("copied {} ({} bytes)", key, bytes_len);
                }
                Err(e) => {
                    stats.failed += 1;
                    error!("{}", e);
                }
            }
        }
        let _ = stats_tx.send(stats);
    });

    // Create a vec to hold the handles for the worker + aggregator tasks
    let mut handles = Vec::with_capacity(num_workers + 1);
    handles.push(output_handle);

    for _ in 0..num_workers {
        let rx = rx.clone();
        let result_tx = result_tx.clone();
        let store = store.clone();
        let handle = tokio::spawn(async move {
            while let Ok(task) = rx.recv().await {
                let outcome = copy_object(store.as_ref(), &task).await;
                if result_tx.send((task.key, outcome)).await.is_err() {
                    error!("error sending result back to channel");
                }
            }
            // Drop this worker's cloned result channel tx
            drop(result_tx);
        });
        handles.push(handle);
    }
    // Only the workers report outcomes
    drop(result_tx);

    // Wait for all the worker and aggregator tasks to finish
    futures::future::join_all(handles).await;

    match stats_rx.await {
        Ok(stats) => stats,
        Err(_) => {
            error!("stats aggregator exited early");
            TransferStats {
                failed: 1,
                ..TransferStats::default()
            }
        }
    }
}

/// Fetch one object and write it to its destination, creating intermediate
/// directories as needed. Re-runs truncate and overwrite existing files.
async fn copy_object<S>(store: &S, task: &DownloadTask) -> Result<u64, GscpError>
where
    S: ObjectStore + ?Sized,
{
    let bytes = store.read_object(&task.key).await?;
    let bytes_len = bytes.len() as u64;

    if let Some(dir) = task.dest.parent() {
        fs::create_dir_all(dir).await.map_err(|e| GscpError::Download {
            key: task.key.clone(),
            message: e.to_string(),
        })?;
    }

    let mut localfh = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&task.dest)
        .await
        .map_err(|e| GscpError::Download {
            key: task.key.clone(),
            message: e.to_string(),
        })?;
    localfh
        .write_all(&bytes)
        .await
        .map_err(|e| GscpError::Download {
            key: task.key.clone(),
            message: e.to_string(),
        })?;

    Ok(bytes_len)
}
