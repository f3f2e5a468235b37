//! Auth session
//!
//! Observable current-user state. The identity provider itself lives outside
//! the workspace; callers feed the signed-in identity through `sign_in`.

use shared::auth::{UserInfo, UserRole};
use std::sync::Arc;
use tokio::sync::watch;

/// Current-user holder backed by a `watch` channel
#[derive(Debug, Clone)]
pub struct AuthSession {
    tx: Arc<watch::Sender<Option<UserInfo>>>,
    admin_emails: Vec<String>,
}

impl AuthSession {
    /// Anonymous session
    pub fn new(admin_emails: Vec<String>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            admin_emails,
        }
    }

    /// Session with a user already signed in
    pub fn signed_in(user: UserInfo) -> Self {
        let session = Self::new(Vec::new());
        session.tx.send_replace(Some(user));
        session
    }

    /// Record a provider identity as the current user
    pub fn sign_in(&self, uid: &str, display_name: Option<&str>, email: Option<&str>) -> UserInfo {
        let user = UserInfo::from_identity(uid, display_name, email, &self.admin_emails);
        tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
        self.tx.send_replace(Some(user.clone()));
        user
    }

    pub fn sign_out(&self) {
        if self.tx.send_replace(None).is_some() {
            tracing::info!("User signed out");
        }
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.tx.borrow().clone()
    }

    /// Role of the current user, guest when anonymous
    pub fn role(&self) -> UserRole {
        self.tx
            .borrow()
            .as_ref()
            .map(|u| u.role)
            .unwrap_or(UserRole::Guest)
    }

    /// Whether a write-enabling identity is present
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn can_view_protected(&self) -> bool {
        self.role().can_view_protected()
    }

    /// Receiver that observes every sign-in and sign-out
    pub fn subscribe(&self) -> watch::Receiver<Option<UserInfo>> {
        self.tx.subscribe()
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// User-facing message for a sign-in error code
pub fn describe_auth_error(code: &str) -> &'static str {
    match code {
        "auth/invalid-email" => "The email address is invalid.",
        "auth/user-disabled" => "This account has been disabled.",
        "auth/user-not-found" => "No account found with that email.",
        "auth/wrong-password" => "Incorrect password. Please try again.",
        "auth/invalid-credential" => "Invalid email or password.",
        "auth/too-many-requests" => "Too many attempts. Please try again later.",
        "auth/network-request-failed" => "Network error. Check your connection and try again.",
        _ => "Sign-in failed. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session_is_guest() {
        let session = AuthSession::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), UserRole::Guest);
        assert!(!session.can_view_protected());
    }

    #[test]
    fn test_sign_in_maps_admin_emails() {
        let session = AuthSession::new(vec!["boss@shop.test".into()]);
        let user = session.sign_in("u1", Some("Boss"), Some("boss@shop.test"));
        assert_eq!(user.role, UserRole::Admin);
        assert!(session.is_authenticated());

        session.sign_in("u2", None, Some("temp@shop.test"));
        assert_eq!(session.role(), UserRole::Dev);
    }

    #[tokio::test]
    async fn test_subscribers_observe_sign_out() {
        let session = AuthSession::default();
        let mut rx = session.subscribe();
        session.sign_in("u1", None, Some("a@b.test"));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        session.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(describe_auth_error("auth/user-disabled"), "This account has been disabled.");
        assert_eq!(describe_auth_error(""), "Sign-in failed. Please try again.");
    }
}
