use thiserror::Error;

#[derive(Error, Debug)]
pub enum OAuthError {
    /// The token endpoint responded, but no usable `access_token` came back.
    /// The underlying cause is logged at the call site, not carried here.
    #[error("failed to obtain access token")]
    TokenExchange,

    /// The provider rejected the identity lookup. `code` and `msg` are the
    /// provider's reported values and may be empty when the response body
    /// matched neither the JSONP wrapper nor the error query-string format.
    #[error("identity lookup failed: code={code} msg={msg}")]
    IdentityLookup { code: String, msg: String },

    /// Transport-level failure reaching the provider, kept distinct from the
    /// domain errors so callers can tell "provider said no" from "provider
    /// unreachable".
    #[error("provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_exchange_display() {
        let err = OAuthError::TokenExchange;
        assert_eq!(err.to_string(), "failed to obtain access token");
    }

    #[test]
    fn test_identity_lookup_display() {
        let err = OAuthError::IdentityLookup {
            code: "100016".to_string(),
            msg: "access token check failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "identity lookup failed: code=100016 msg=access token check failed"
        );
    }

    #[test]
    fn test_identity_lookup_display_empty_fields() {
        let err = OAuthError::IdentityLookup {
            code: String::new(),
            msg: String::new(),
        };
        assert_eq!(err.to_string(), "identity lookup failed: code= msg=");
    }

    #[test]
    fn test_from_signing_error() {
        let jwt_err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidToken,
        );
        let err: OAuthError = jwt_err.into();
        assert!(matches!(err, OAuthError::Signing(_)));
    }
}
