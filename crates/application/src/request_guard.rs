//! Keyed single-flight guard.
//!
//! A guard remembers the key of the in-flight or most recent successful
//! request. Repeating that key is rejected; a new key cancels whatever is
//! in flight. Failed requests release their key so they can be retried.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{CancellationReceiver, CancellationToken};

#[derive(Debug, Default)]
struct GuardState {
    key: Option<String>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

#[derive(Debug, Default)]
pub(crate) struct KeyedRequestGuard {
    state: Mutex<GuardState>,
}

impl KeyedRequestGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `key`, superseding any request in flight under another key.
    pub(crate) fn begin(&self, key: &str) -> ServiceResult<RequestTicket<'_>> {
        let mut state = self.lock();
        if state.key.as_deref() == Some(key) {
            return Err(ServiceError::DuplicateRequest);
        }
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }

        let (token, cancel) = CancellationToken::new();
        state.key = Some(key.to_string());
        state.generation += 1;
        state.in_flight = Some(token);

        Ok(RequestTicket {
            guard: self,
            generation: state.generation,
            cancel,
            settled: false,
        })
    }

    /// Forgets the remembered key and cancels anything in flight.
    pub(crate) fn reset(&self) {
        let mut state = self.lock();
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }
        state.key = None;
        state.generation += 1;
    }

    /// Releases `key` after a completed request whose result was not kept.
    ///
    /// No-op if another request has claimed the guard since.
    pub(crate) fn release(&self, key: &str) {
        let mut state = self.lock();
        if state.in_flight.is_none() && state.key.as_deref() == Some(key) {
            state.key = None;
        }
    }

    /// Records the outcome of a ticket; returns false if it was superseded.
    fn settle(&self, generation: u64, succeeded: bool) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.in_flight = None;
        if !succeeded {
            state.key = None;
        }
        true
    }
}

/// Permission to run one request under a claimed key.
///
/// Dropping an unsettled ticket counts as a failure.
pub(crate) struct RequestTicket<'a> {
    guard: &'a KeyedRequestGuard,
    generation: u64,
    cancel: CancellationReceiver,
    settled: bool,
}

impl RequestTicket<'_> {
    /// Runs `request` until it completes or the ticket is superseded.
    pub(crate) async fn run<T, F>(mut self, request: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        let result = tokio::select! {
            result = request => result,
            () = self.cancel.cancelled() => Err(ServiceError::Cancelled),
        };

        self.settled = true;
        if !self.guard.settle(self.generation, result.is_ok()) {
            return Err(ServiceError::Cancelled);
        }
        result
    }
}

impl Drop for RequestTicket<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.guard.settle(self.generation, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_duplicate_after_success() {
        let guard = KeyedRequestGuard::new();
        let Ok(ticket) = guard.begin("a") else {
            unreachable!("first claim always succeeds");
        };
        assert_eq!(ticket.run(async { Ok(1) }).await, Ok(1));
        assert!(matches!(guard.begin("a"), Err(ServiceError::DuplicateRequest)));
        assert!(guard.begin("b").is_ok());
    }

    #[tokio::test]
    async fn test_failure_releases_key() {
        let guard = KeyedRequestGuard::new();
        if let Ok(ticket) = guard.begin("a") {
            let result: ServiceResult<()> = ticket.run(async { Err(ServiceError::InvalidToken) }).await;
            assert_eq!(result, Err(ServiceError::InvalidToken));
        }
        assert!(guard.begin("a").is_ok());
    }

    #[tokio::test]
    async fn test_dropped_ticket_releases_key() {
        let guard = KeyedRequestGuard::new();
        let ticket = guard.begin("a");
        assert!(ticket.is_ok());
        drop(ticket);
        assert!(guard.begin("a").is_ok());
    }

    #[tokio::test]
    async fn test_new_key_supersedes_in_flight() {
        let guard = KeyedRequestGuard::new();
        let (first, second) = match (guard.begin("a"), guard.begin("b")) {
            (Ok(first), Ok(second)) => (first, second),
            _ => unreachable!("distinct keys are always accepted"),
        };

        let stale = first.run(std::future::pending::<ServiceResult<u8>>()).await;
        assert_eq!(stale, Err(ServiceError::Cancelled));
        assert_eq!(second.run(async { Ok(2) }).await, Ok(2));
        assert!(matches!(guard.begin("b"), Err(ServiceError::DuplicateRequest)));
    }

    #[tokio::test]
    async fn test_reset_forgets_key() {
        let guard = KeyedRequestGuard::new();
        if let Ok(ticket) = guard.begin("a") {
            assert_eq!(ticket.run(async { Ok(()) }).await, Ok(()));
        }
        guard.reset();
        assert!(guard.begin("a").is_ok());
    }

    #[tokio::test]
    async fn test_release_after_success_allows_same_key() {
        let guard = KeyedRequestGuard::new();
        if let Ok(ticket) = guard.begin("a") {
            assert_eq!(ticket.run(async { Ok(()) }).await, Ok(()));
        }
        guard.release("a");
        assert!(guard.begin("a").is_ok());
    }

    #[tokio::test]
    async fn test_release_ignores_other_claims() {
        let guard = KeyedRequestGuard::new();
        if let Ok(ticket) = guard.begin("a") {
            assert_eq!(ticket.run(async { Ok(()) }).await, Ok(()));
        }
        let in_flight = guard.begin("b");
        assert!(in_flight.is_ok());

        guard.release("b");
        guard.release("a");

        assert!(matches!(guard.begin("b"), Err(ServiceError::DuplicateRequest)));
        drop(in_flight);
    }
}
