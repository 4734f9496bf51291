//! Bounded worker pool for the pure per-claim resolution stage.
//!
//! Results are written back by input index, so the caller sees exactly
//! the sequence the sequential path would produce.

use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

/// Applies `resolve` to every item, on up to `workers` scoped threads.
///
/// With one worker (or one item) this runs on the calling thread. If no
/// worker thread can be spawned it also falls back to the calling thread.
pub(crate) fn map_ordered<I, T, F>(items: &[I], workers: usize, queue_capacity: usize, resolve: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Sync,
{
    let workers = workers.min(items.len());
    if workers <= 1 {
        return items.iter().map(&resolve).collect();
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(items.len()).collect();

    thread::scope(|scope| {
        let (job_tx, job_rx): (Sender<usize>, Receiver<usize>) = bounded(queue_capacity.max(1));
        let (done_tx, done_rx) = unbounded::<(usize, T)>();
        let resolve = &resolve;

        let mut spawned = 0;
        for idx in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let spawn = thread::Builder::new()
                .name(format!("sci-lower-{idx}"))
                .spawn_scoped(scope, move || {
                    while let Ok(i) = job_rx.recv() {
                        if done_tx.send((i, resolve(&items[i]))).is_err() {
                            break;
                        }
                    }
                });
            match spawn {
                Ok(_) => spawned += 1,
                Err(e) => warn!(worker = idx, error = %e, "failed to spawn lowering worker"),
            }
        }
        drop(job_rx);
        drop(done_tx);

        if spawned == 0 {
            return;
        }
        debug!(workers = spawned, items = items.len(), "resolving claims in parallel");

        // Feed jobs while draining results so neither channel can stall.
        let mut next = 0;
        while next < items.len() {
            match job_tx.try_send(next) {
                Ok(()) => next += 1,
                Err(TrySendError::Full(_)) => match done_rx.recv() {
                    Ok((i, value)) => slots[i] = Some(value),
                    Err(_) => break,
                },
                Err(TrySendError::Disconnected(_)) => break,
            }
        }
        drop(job_tx);

        for (i, value) in done_rx {
            slots[i] = Some(value);
        }
    });

    slots
        .into_iter()
        .zip(items)
        .map(|(slot, item)| slot.unwrap_or_else(|| resolve(item)))
        .collect()
}
