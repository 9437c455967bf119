//! Wire types for the gateway's JSON API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use starfruit_core::{LineItem, OrderId, ProductId, UserId};

/// Access/refresh token pair returned by the login and refresh endpoints.
///
/// Implements `Debug` manually to redact token values.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer credential attached to authenticated requests.
    pub access_token: String,
    /// Credential used to obtain a fresh access token.
    pub refresh_token: String,
    /// Token scheme, `Bearer` for this gateway.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds, when the gateway reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Body of the token verification endpoint.
///
/// Unlike the rest of the gateway this endpoint does not use the response
/// envelope; the body itself carries the verdict.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    /// Whether the presented credential is valid.
    pub valid: bool,
    /// Whether an invalid credential was rejected because it expired.
    #[serde(default)]
    pub expired: bool,
    /// The authenticated user, when the credential is valid.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User's database ID, when the gateway reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Login name.
    pub username: String,
    /// Email address, when the gateway reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An order as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Order total as computed by the gateway.
    pub total: Decimal,
    /// Fulfillment status (`pending`, `confirmed`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// The ordered items.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product identifier.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Decimal,
    /// Product name, when the gateway joins it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

/// Input line for order creation.
///
/// The gateway prices items itself from the catalog; only identity and
/// quantity are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemInput {
    /// Product identifier.
    pub product_id: ProductId,
    /// Units to order.
    pub quantity: u32,
}

impl From<&LineItem> for OrderItemInput {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.id,
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_debug_redacts_tokens() {
        let pair = TokenPair {
            access_token: "super_secret_access".to_string(),
            refresh_token: "super_secret_refresh".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(3600),
        };

        let debug_output = format!("{pair:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_access"));
        assert!(!debug_output.contains("super_secret_refresh"));
    }

    #[test]
    fn test_token_pair_deserializes_login_payload() {
        let json = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_expires_at": "2026-09-01T00:00:00Z"
        }"#;
        let pair: TokenPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.expires_in, Some(3600));
    }

    #[test]
    fn test_verify_response_defaults() {
        let response: VerifyResponse = serde_json::from_str(r#"{"valid": true}"#).unwrap();
        assert!(response.valid);
        assert!(!response.expired);
        assert!(response.user.is_none());
    }

    #[test]
    fn test_order_item_input_from_line_item() {
        let item = LineItem {
            id: ProductId::new(3),
            name: "A".to_string(),
            price: "1.00".parse().unwrap(),
            description: String::new(),
            quantity: 4,
        };

        let input = OrderItemInput::from(&item);
        assert_eq!(input.product_id, ProductId::new(3));
        assert_eq!(input.quantity, 4);
    }
}
