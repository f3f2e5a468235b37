//! Identity types
//!
//! The core only asks two questions of an identity: is a write-enabling user
//! present, and may this role view protected screens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Dev,
    #[default]
    Guest,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Dev => "dev",
            UserRole::Guest => "guest",
        }
    }

    /// Admin and dev may open protected views
    pub const fn can_view_protected(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Dev)
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
}

impl UserInfo {
    /// Map a provider identity onto a user
    ///
    /// Emails listed in `admin_emails` (case-insensitive) become admins, every
    /// other signed-in identity is a dev. The display name falls back to the
    /// email, then to "User".
    pub fn from_identity<S: AsRef<str>>(
        uid: impl Into<String>,
        display_name: Option<&str>,
        email: Option<&str>,
        admin_emails: &[S],
    ) -> Self {
        let email = email.unwrap_or_default().trim().to_string();
        let is_admin = !email.is_empty()
            && admin_emails
                .iter()
                .any(|admin| admin.as_ref().trim().eq_ignore_ascii_case(&email));

        let name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| (!email.is_empty()).then(|| email.clone()))
            .unwrap_or_else(|| "User".to_string());

        Self {
            id: uid.into(),
            name,
            email,
            role: if is_admin { UserRole::Admin } else { UserRole::Dev },
        }
    }

    pub fn can_view_protected(&self) -> bool {
        self.role.can_view_protected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMINS: [&str; 1] = ["owner@printshop.test"];

    #[test]
    fn test_admin_email_maps_to_admin() {
        let user = UserInfo::from_identity("u1", Some("Owner"), Some("Owner@PrintShop.test"), &ADMINS);
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.can_view_protected());
    }

    #[test]
    fn test_other_identities_are_devs() {
        let user = UserInfo::from_identity("u2", None, Some("sam@printshop.test"), &ADMINS);
        assert_eq!(user.role, UserRole::Dev);
        assert_eq!(user.name, "sam@printshop.test");
    }

    #[test]
    fn test_guest_cannot_view_protected() {
        assert!(!UserRole::Guest.can_view_protected());
        assert_eq!(UserRole::default(), UserRole::Guest);
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::Dev).unwrap(), "\"dev\"");
    }

    #[test]
    fn test_anonymous_name_fallback() {
        let user = UserInfo::from_identity("u3", Some("  "), None, &ADMINS);
        assert_eq!(user.name, "User");
        assert_eq!(user.role, UserRole::Dev);
    }
}
