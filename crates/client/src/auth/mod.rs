//! Session verification and credential persistence.
//!
//! [`verify_session`] is the startup check a shell runs before showing
//! authenticated content: it presents the stored bearer credential to the
//! gateway's verify endpoint and reduces the outcome to a [`SessionVerdict`].
//!
//! The check is deliberately best-effort. A client with no stored credential
//! is skipped, not failed, and an unreachable gateway never blocks the user;
//! only an explicit rejection invalidates the session. When that happens the
//! stored credentials are cleared here, but navigating to a login route is
//! the caller's decision (`ClientConfig::login_path` names the route for
//! callers that want one).

mod tokens;

pub use tokens::{TokenKeys, TokenStore};

use tracing::{debug, instrument, warn};

use crate::gateway::{GatewayClient, UserProfile};
use crate::storage::KeyValueStore;

/// Outcome of a startup session check.
#[derive(Debug, Clone)]
pub enum SessionVerdict {
    /// The stored credential is valid.
    Active {
        /// The authenticated user, when the gateway reports one.
        user: Option<UserProfile>,
    },
    /// No credential is stored; nothing to verify. Not an error.
    Skipped,
    /// The gateway could not be reached or answered unintelligibly. The
    /// session is treated as usable; availability wins over enforcement.
    Unreachable,
    /// The gateway rejected the credential. Stored credentials have been
    /// cleared; the caller should send the user to the login route.
    RequiresLogin {
        /// Whether the credential was rejected because it expired.
        expired: bool,
    },
}

impl SessionVerdict {
    /// Whether the caller should navigate to the login route.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::RequiresLogin { .. })
    }

    /// Whether a valid credential was positively confirmed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Verify the stored session credential against the gateway.
///
/// One network round trip, no retry. See the module docs for the outcome
/// policy.
#[instrument(skip(gateway))]
pub async fn verify_session<S: KeyValueStore>(gateway: &GatewayClient<S>) -> SessionVerdict {
    let has_token = match gateway.tokens().access_token() {
        Ok(token) => token.is_some(),
        Err(err) => {
            warn!(error = %err, "Failed to read stored credential; skipping verification");
            false
        }
    };
    if !has_token {
        debug!("No stored credential; skipping verification");
        return SessionVerdict::Skipped;
    }

    match gateway.verify().await {
        Ok(verdict) if verdict.valid => {
            debug!("Stored credential verified");
            SessionVerdict::Active { user: verdict.user }
        }
        Ok(verdict) => {
            if let Err(err) = gateway.tokens().clear() {
                warn!(error = %err, "Failed to clear rejected credentials");
            }
            SessionVerdict::RequiresLogin {
                expired: verdict.expired,
            }
        }
        Err(err) => {
            warn!(error = %err, "Token verification unreachable; not blocking the session");
            SessionVerdict::Unreachable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_predicates() {
        assert!(SessionVerdict::RequiresLogin { expired: true }.requires_login());
        assert!(!SessionVerdict::Skipped.requires_login());
        assert!(!SessionVerdict::Unreachable.requires_login());

        assert!(SessionVerdict::Active { user: None }.is_active());
        assert!(!SessionVerdict::Skipped.is_active());
    }
}
