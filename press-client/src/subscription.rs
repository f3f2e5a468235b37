//! Subscription disposer

use tokio_util::sync::CancellationToken;

/// Handle returned by `subscribe`; cancelling it stops delivery
///
/// `unsubscribe` is idempotent and dropping the handle unsubscribes too.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Subscription with nothing left to deliver
    pub fn closed() -> Self {
        let token = CancellationToken::new();
        token.cancel();
        Self { token }
    }

    pub fn unsubscribe(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("Subscription cancelled");
            self.token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let token = CancellationToken::new();
        let sub = Subscription::new(token.clone());
        assert!(sub.is_active());
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_drop_cancels() {
        let token = CancellationToken::new();
        drop(Subscription::new(token.clone()));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_closed_is_inactive() {
        assert!(!Subscription::closed().is_active());
    }
}
