//! Bounded resource loader
//!
//! A strictly serialized FIFO queue for expensive per-item fetches
//! (thumbnail generation). All submissions feed a single worker task, so
//! at most one job runs at any time and jobs complete in submission
//! order. The loader holds no cache and performs no deduplication of
//! repeated identities; the query cache is the sole deduplication point.

use std::future::Future;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};

use crate::{QueryError, QueryKey};

struct Job<T> {
    identity: QueryKey,
    priority: i64,
    work: BoxFuture<'static, Result<T, QueryError>>,
    done: oneshot::Sender<Result<T, QueryError>>,
}

/// Fixed-concurrency (exactly one) job queue.
pub struct ResourceLoader<T> {
    tx: mpsc::UnboundedSender<Job<T>>,
}

impl<T: Send + 'static> ResourceLoader<T> {
    /// Spawn the worker task. Must be called inside a Tokio runtime; the
    /// worker lives until every handle to the loader is dropped.
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job<T>>();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                tracing::debug!(
                    identity = %job.identity,
                    priority = job.priority,
                    "resource job started"
                );
                let result = job.work.await;
                if job.done.send(result).is_err() {
                    tracing::debug!(identity = %job.identity, "resource job caller went away");
                }
            }
        });

        Self { tx }
    }

    /// Enqueue `work` and wait for its turn and its completion.
    ///
    /// `priority` is a visual-importance hint carried for diagnostics;
    /// execution order stays strictly first-in-first-out.
    pub async fn submit<F>(
        &self,
        identity: QueryKey,
        priority: i64,
        work: F,
    ) -> Result<T, QueryError>
    where
        F: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let (done, wait) = oneshot::channel();
        let job = Job {
            identity,
            priority,
            work: Box::pin(work),
            done,
        };

        self.tx.send(job).map_err(|_| QueryError::LoaderClosed)?;
        wait.await.map_err(|_| QueryError::LoaderClosed)?
    }
}

impl<T> Clone for ResourceLoader<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> Default for ResourceLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn identity(arg: &str) -> QueryKey {
        QueryKey::new("get_thumbnail_path", arg).unwrap()
    }

    #[tokio::test]
    async fn jobs_never_overlap_and_run_in_submission_order() {
        let loader = ResourceLoader::<usize>::new();
        let running = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let order = Arc::new(Mutex::new(Vec::new()));

        let job = |n: usize| {
            let running = running.clone();
            let overlapped = overlapped.clone();
            let order = order.clone();
            async move {
                if running.swap(true, Ordering::SeqCst) {
                    overlapped.store(true, Ordering::SeqCst);
                }
                sleep(Duration::from_millis(15)).await;
                order.lock().push(n);
                running.store(false, Ordering::SeqCst);
                Ok(n)
            }
        };

        let (a, b, c) = tokio::join!(
            loader.submit(identity("/a.jpg"), 0, job(1)),
            loader.submit(identity("/b.jpg"), 5, job(2)),
            loader.submit(identity("/c.jpg"), 2, job(3)),
        );

        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 2);
        assert_eq!(c.unwrap(), 3);
        assert!(!overlapped.load(Ordering::SeqCst));
        // Priority is a hint only; execution stays FIFO.
        assert_eq!(*order.lock(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_identities_are_not_deduplicated_here() {
        let loader = ResourceLoader::<u32>::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let job = || {
            let runs = runs.clone();
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(0u32)
            }
        };

        let (a, b) = tokio::join!(
            loader.submit(identity("/same.jpg"), 0, job()),
            loader.submit(identity("/same.jpg"), 0, job()),
        );

        a.unwrap();
        b.unwrap();
        // Deduplication belongs to the query cache layer.
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn job_errors_reach_only_their_submitter() {
        let loader = ResourceLoader::<u32>::new();

        let (bad, good) = tokio::join!(
            loader.submit(identity("/broken.jpg"), 0, async {
                Err(QueryError::Command("Unsupported file type!".into()))
            }),
            loader.submit(identity("/fine.jpg"), 0, async { Ok(1u32) }),
        );

        assert!(matches!(bad, Err(QueryError::Command(_))));
        assert_eq!(good.unwrap(), 1);
    }
}
