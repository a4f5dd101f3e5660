use std::path::Path;

use crate::error::GscpError;
use crate::pathspec::{local_path_for, SourcePath};
use crate::pool::DownloadTask;
use crate::store::ObjectStore;

/// Turn the source into a finite sequence of download tasks and feed them
/// into the channel the worker pool drains. Pages are pulled lazily, so a
/// long listing never has to be held in memory at once. Returns the number
/// of tasks enqueued; any listing error is fatal for the run.
pub async fn enqueue_tasks<S>(
    store: &S,
    source: &SourcePath,
    recursive: bool,
    dst_root: &Path,
    tx: &async_channel::Sender<DownloadTask>,
) -> Result<u64, GscpError>
where
    S: ObjectStore + ?Sized,
{
    // A non-recursive source without a trailing delimiter names one
    // literal object: enqueue exactly that key without listing, and let
    // the download attempt surface a missing object. When a prefix names
    // both an object and a directory, the object wins.
    if !recursive && !source.prefix.is_empty() && !source.prefix.ends_with('/') {
        let task = DownloadTask {
            key: source.prefix.clone(),
            dest: local_path_for(dst_root, &source.prefix, &source.prefix),
        };
        if tx.send(task).await.is_err() {
            return Ok(0);
        }
        return Ok(1);
    }

    // Delimiter-bounded listing gives only immediate children; recursive
    // mode lists every key under the prefix across all pages
    let delimiter = if recursive { None } else { Some("/") };
    let mut token: Option<String> = None;
    let mut count: u64 = 0;

    loop {
        let page = store
            .list_page(&source.prefix, delimiter, token.take())
            .await?;

        for obj in page.objects {
            // Skip directory markers
            if obj.key.is_empty() || obj.key.ends_with('/') {
                continue;
            }
            debug!(
                "queued {}/{} ({} bytes)",
                obj.bucket,
                obj.key,
                obj.size.unwrap_or(0),
            );
            let dest = local_path_for(dst_root, &obj.key, &source.prefix);
            let task = DownloadTask { key: obj.key, dest };
            if tx.send(task).await.is_err() {
                // All workers are gone, no point listing further
                return Ok(count);
            }
            count += 1;
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(count)
}
