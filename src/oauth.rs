//! Logout and OAuth authorize URL construction
//!
//! The authorize URL binds the manual browser flow to this run with a fresh
//! CSRF `state` value and an OpenID `nonce`. Both are single-use: generated
//! per invocation, never persisted, never verified on return (the operator
//! watches the browser complete the flow, which is the whole point of the
//! manual checkpoints).

use rand::{distr::Alphanumeric, Rng};

pub const DEFAULT_STATE_LENGTH: usize = 10;
pub const DEFAULT_NONCE_LENGTH: usize = 11;

// Pre-encoded; these never vary per run.
const REDIRECT_URI: &str = "https%3A%2F%2Foauthdebugger.com%2Fdebug";
const SCOPES: &str = "api%20refresh_token%20offline_access%20openid";

/// Generate an unpredictable alphanumeric value of exactly `length` chars.
pub fn fresh_token(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn logout_url(instance_url: &str) -> String {
    format!("{}/secur/logout.jsp", instance_url.trim_end_matches('/'))
}

pub fn authorize_url(instance_url: &str, client_id: &str, state: &str, nonce: &str) -> String {
    format!(
        "{}/services/oauth2/authorize?client_id={}&redirect_uri={}&scope={}&response_type=code&response_mode=query&state={}&nonce={}",
        instance_url.trim_end_matches('/'),
        client_id,
        REDIRECT_URI,
        SCOPES,
        state,
        nonce
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_has_exact_length() {
        assert_eq!(fresh_token(DEFAULT_STATE_LENGTH).len(), 10);
        assert_eq!(fresh_token(DEFAULT_NONCE_LENGTH).len(), 11);
        assert_eq!(fresh_token(32).len(), 32);
    }

    #[test]
    fn test_fresh_token_is_alphanumeric() {
        let token = fresh_token(64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_fresh_tokens_differ_across_invocations() {
        // 62^32 values; a collision here means the generator is broken.
        let a = fresh_token(32);
        let b = fresh_token(32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_logout_url() {
        assert_eq!(
            logout_url("https://acme--dev.my.salesforce.com"),
            "https://acme--dev.my.salesforce.com/secur/logout.jsp"
        );
        assert_eq!(
            logout_url("https://acme--dev.my.salesforce.com/"),
            "https://acme--dev.my.salesforce.com/secur/logout.jsp"
        );
    }

    #[test]
    fn test_authorize_url_carries_all_parameters() {
        let url = authorize_url(
            "https://acme--dev.my.salesforce.com",
            "3MVG9client",
            "stateABC123",
            "nonceXYZ7890",
        );
        assert!(url.starts_with("https://acme--dev.my.salesforce.com/services/oauth2/authorize?"));
        assert!(url.contains("client_id=3MVG9client"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Foauthdebugger.com%2Fdebug"));
        assert!(url.contains("scope=api%20refresh_token%20offline_access%20openid"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("response_mode=query"));
        assert!(url.contains("state=stateABC123"));
        assert!(url.contains("nonce=nonceXYZ7890"));
    }

    #[test]
    fn test_authorize_urls_differ_with_fresh_tokens() {
        let base = "https://acme--dev.my.salesforce.com";
        let first = authorize_url(
            base,
            "app",
            &fresh_token(DEFAULT_STATE_LENGTH),
            &fresh_token(DEFAULT_NONCE_LENGTH),
        );
        let second = authorize_url(
            base,
            "app",
            &fresh_token(DEFAULT_STATE_LENGTH),
            &fresh_token(DEFAULT_NONCE_LENGTH),
        );
        assert_ne!(first, second);
    }
}
