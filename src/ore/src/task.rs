//! Named task spawning.
//!
//! Every task spawned by the compilation engine goes through [`spawn`]
//! rather than `tokio::task::spawn` directly, so that its lifetime shows up
//! in `tracing` output under a span carrying its name, the same convention
//! `mz_ore::task::spawn` establishes for the teacher's own background tasks
//! (e.g. the compaction scheduler in `persist-client`'s `compact.rs`).

use std::future::Future;

use tracing::{debug_span, Instrument};

/// Spawns `future` as a new Tokio task, tagging it with `name` for tracing.
///
/// `name` is evaluated lazily (it is common to pass a closure building a
/// `format!` string here) so that naming a task costs nothing unless
/// tracing is actually recording spans.
pub fn spawn<Name, Nf, Fut>(name: Nf, future: Fut) -> tokio::task::JoinHandle<Fut::Output>
where
    Name: AsRef<str>,
    Nf: FnOnce() -> Name,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let span = debug_span!("task", name = %name().as_ref());
    tokio::task::spawn(future.instrument(span))
}

/// Spawns a blocking closure on the blocking thread pool, tagging it with
/// `name` the same way [`spawn`] tags async tasks.
pub fn spawn_blocking<Name, Nf, F, T>(name: Nf, f: F) -> tokio::task::JoinHandle<T>
where
    Name: AsRef<str>,
    Nf: FnOnce() -> Name,
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let span = debug_span!("blocking_task", name = %name().as_ref());
    tokio::task::spawn_blocking(move || span.in_scope(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn spawn_runs_future_to_completion() {
        let handle = spawn(|| "test-task", async { 1 + 1 });
        assert_eq!(handle.await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn spawn_blocking_runs_closure() {
        let handle = spawn_blocking(|| "test-blocking", || 21 * 2);
        assert_eq!(handle.await.unwrap(), 42);
    }
}
