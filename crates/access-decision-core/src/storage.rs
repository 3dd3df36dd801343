// crates/access-decision-core/src/storage.rs
// ============================================================================
// Module: Token Storage
// Description: Holder for the token of the current principal.
// Purpose: Provide lazily initialized, resettable access to the active token.
// Dependencies: crate::token
// ============================================================================

//! ## Overview
//! [`TokenStorage`] keeps the token consulted by
//! [`crate::AuthorizationChecker`]. An optional one-shot initializer lets a
//! host defer token loading (for example from a session) until the first
//! read. Setting a token explicitly runs any pending initializer first so its
//! side effects are never skipped.
//!
//! While an initializer runs, other threads block in [`TokenStorage::token`]
//! and [`TokenStorage::set_token`] until it finishes. The initializer itself
//! may call back into the storage on its own thread.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::thread;
use std::thread::ThreadId;

use crate::token::Token;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One-shot initializer run before the first read.
///
/// A returned token replaces the stored one. `None` leaves the stored token
/// untouched, so an initializer may act purely through
/// [`TokenStorage::set_token`].
pub type TokenInitializer = Box<dyn FnOnce() -> Option<Arc<dyn Token>> + Send>;

/// Mutable storage state.
#[derive(Default)]
struct StorageState {
    /// Current token.
    token: Option<Arc<dyn Token>>,
    /// Pending lazy initializer.
    initializer: Option<TokenInitializer>,
    /// Thread currently running the initializer.
    initializing: Option<ThreadId>,
}

/// Thread-safe holder for the current token
///
/// # Invariants
/// - The initializer runs at most once.
/// - No reader observes the state while another thread's initializer runs.
#[derive(Default)]
pub struct TokenStorage {
    /// Guarded token and initializer.
    state: Mutex<StorageState>,
    /// Signalled when an in-flight initializer finishes.
    initialized: Condvar,
}

impl TokenStorage {
    /// Creates empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current token, running a pending initializer first
    #[must_use]
    pub fn token(&self) -> Option<Arc<dyn Token>> {
        self.settle(true).token.clone()
    }

    /// Replaces the current token and discards any pending initializer
    ///
    /// A pending initializer still runs before a non-empty token is stored.
    pub fn set_token(&self, token: Option<Arc<dyn Token>>) {
        let mut state = self.settle(token.is_some());
        state.initializer = None;
        state.token = token;
    }

    /// Installs a lazy initializer, replacing any pending one
    pub fn set_initializer<F>(&self, initializer: F)
    where
        F: FnOnce() -> Option<Arc<dyn Token>> + Send + 'static,
    {
        self.lock().initializer = Some(Box::new(initializer));
    }

    /// Clears the stored token
    pub fn reset(&self) {
        self.set_token(None);
    }

    /// Locks the state once no other thread is initializing.
    ///
    /// With `run_pending`, a pending initializer is run first. The lock is
    /// released while it runs. Calls made from inside the initializer return
    /// immediately with the current state.
    fn settle(&self, run_pending: bool) -> MutexGuard<'_, StorageState> {
        let current = thread::current().id();
        let mut state = self.lock();
        loop {
            let owner = state.initializing;
            match owner {
                Some(owner) if owner == current => return state,
                Some(_) => {
                    state = self.wait(state);
                    continue;
                }
                None => {}
            }
            if !run_pending {
                return state;
            }
            let Some(initializer) = state.initializer.take() else {
                return state;
            };
            state.initializing = Some(current);
            drop(state);

            let running = Initializing { storage: self };
            if let Some(token) = initializer() {
                self.lock().token = Some(token);
            }
            drop(running);
            state = self.lock();
        }
    }

    /// Blocks until an in-flight initializer finishes.
    fn wait<'a>(&self, guard: MutexGuard<'a, StorageState>) -> MutexGuard<'a, StorageState> {
        match self.initialized.wait(guard) {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Locks the state, recovering it if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, StorageState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Marks initialization finished and wakes waiters, even on unwind.
struct Initializing<'a> {
    /// Storage whose initializer is running.
    storage: &'a TokenStorage,
}

impl Drop for Initializing<'_> {
    fn drop(&mut self) {
        self.storage.lock().initializing = None;
        self.storage.initialized.notify_all();
    }
}
