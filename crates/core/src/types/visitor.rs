//! Visitor identity for the current render request.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// The visitor a page is being rendered for.
///
/// Derived once per request from the host's session provider and read-only
/// thereafter. An anonymous visitor has no user fields set; a logged-in
/// visitor may still lack `username`/`email` when the profile lookup fails,
/// in which case the identify event is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    /// Whether the current session belongs to a logged-in user.
    pub logged_in: bool,
    /// The logged-in user's ID, if any.
    pub user_id: Option<UserId>,
    /// The logged-in user's username, if the profile resolved.
    pub username: Option<String>,
    /// The logged-in user's email, if the profile resolved.
    pub email: Option<String>,
}

impl Visitor {
    /// An anonymous visitor (not logged in, no identity).
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            logged_in: false,
            user_id: None,
            username: None,
            email: None,
        }
    }
}

/// Profile data resolved for a logged-in user.
///
/// Returned by the host's session provider; feeds the identify event traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
}
