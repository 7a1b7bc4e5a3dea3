//! Task sync (§4.5): per-round coordination of output-key production so
//! that at most one task produces any given output key.
//!
//! The specification describes this in terms of a lock-free waiter list
//! and TBB-style continuation respawn. Per §9 ("Coroutines / async control
//! flow"), this implementation instead uses real `tokio` tasks: a waiter
//! simply awaits a [`tokio::sync::Notify`] rather than being threaded onto
//! an intrusive list and respawned by the last decrement. The externally
//! observable contract — `Done` / `Claimed` / `Wait`, and "a task that sees
//! `claim → Done` observes the producer's cache write" — is preserved: the
//! state transition uses `AcqRel`/`Acquire` ordering, so `markDone`'s
//! release synchronizes-with the `Acquire` a waiter performs once woken.
//!
//! `Notify::notify_waiters` wakes only futures already registered at the
//! moment it runs, so the check-then-await in [`Entry::wait_until_done`]
//! enables its `Notified` future (registering the waiter) before reading
//! the state, not after — otherwise a `mark_done` landing in that window
//! would be missed and the waiter would hang.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Notify;

use sc_scene::OutputKeyIdentity;

const UNCLAIMED: u8 = 0;
const CLAIMED: u8 = 1;
const DONE: u8 = 2;

struct Entry {
    state: AtomicU8,
    notify: Notify,
}

impl Entry {
    fn new() -> Self {
        Entry {
            state: AtomicU8::new(UNCLAIMED),
            notify: Notify::new(),
        }
    }

    async fn wait_until_done(&self) {
        loop {
            // `notify_waiters` only wakes futures already registered at the
            // moment it's called; it stores no permit. Build the `Notified`
            // future and `enable()` it — registering this waiter — before
            // the state check, so a `mark_done` that runs between the check
            // and the `.await` still wakes us instead of being missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.state.load(Ordering::Acquire) == DONE {
                return;
            }
            notified.await;
        }
    }
}

/// The outcome of [`TaskSync::claim`].
pub enum ClaimOutcome {
    /// The key is already produced; the caller reads the cache.
    Done,
    /// The caller won the race and must produce the value, then call
    /// [`TaskSync::mark_done`].
    Claimed,
    /// Another task is producing; await the returned handle, then
    /// re-consult the cache (the producer may have resolved to a null
    /// output).
    Wait(WaitHandle),
}

/// An awaitable handle for the `Wait` claim outcome.
pub struct WaitHandle {
    entry: Arc<Entry>,
}

impl WaitHandle {
    /// Awaits the producing task's `mark_done` call.
    pub async fn wait(&self) {
        self.entry.wait_until_done().await;
    }
}

/// Per-compilation-round synchronization over output-key production
/// (§4.5).
///
/// A fresh `TaskSync` is created for each call to
/// [`crate::compiler::compile`]; entries do not persist across rounds
/// (persistent "already produced" state lives in the
/// [`crate::cache::CompiledOutputCache`] instead).
#[derive(Default)]
pub struct TaskSync {
    entries: DashMap<OutputKeyIdentity, Arc<Entry>>,
}

impl TaskSync {
    /// Creates an empty task-sync table for a new round.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim `key` for production.
    pub fn claim(&self, key: OutputKeyIdentity) -> ClaimOutcome {
        let entry = Arc::clone(&self.entries.entry(key).or_insert_with(|| Arc::new(Entry::new())));
        match entry
            .state
            .compare_exchange(UNCLAIMED, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => ClaimOutcome::Claimed,
            Err(DONE) => ClaimOutcome::Done,
            Err(_) => ClaimOutcome::Wait(WaitHandle { entry }),
        }
    }

    /// Marks `key` as produced, releasing every waiter.
    ///
    /// Must be called exactly once by whichever task received `Claimed`
    /// for `key`, after that task has published the result to the
    /// compiled-output cache (§4.6 "the connection step ... happens-before
    /// `markDone` happens-before any dependent task's stage B").
    pub fn mark_done(&self, key: &OutputKeyIdentity) {
        if let Some(entry) = self.entries.get(key) {
            entry.state.store(DONE, Ordering::Release);
            entry.notify.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_repr::{DefinitionId, ScenePath};

    fn key() -> OutputKeyIdentity {
        OutputKeyIdentity::new(ScenePath::new("/A").unwrap(), DefinitionId::from_raw(0))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn second_claimant_waits_then_observes_done() {
        let sync = Arc::new(TaskSync::new());
        let k = key();

        match sync.claim(k.clone()) {
            ClaimOutcome::Claimed => {}
            _ => panic!("first claim should win"),
        }

        let waiter_sync = Arc::clone(&sync);
        let waiter_key = k.clone();
        let waiter = tokio::spawn(async move {
            match waiter_sync.claim(waiter_key) {
                ClaimOutcome::Wait(handle) => handle.wait().await,
                _ => panic!("second claimant should wait"),
            }
        });

        // Give the waiter a chance to register before marking done.
        tokio::task::yield_now().await;
        sync.mark_done(&k);
        waiter.await.unwrap();

        match sync.claim(k) {
            ClaimOutcome::Done => {}
            _ => panic!("a claim after mark_done should observe Done"),
        }
    }
}
