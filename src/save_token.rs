use crate::{config::SaveTokenConfig, error::OAuthError};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a save-user token: just the OpenID plus the standard
/// issued-at / expiry pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTokenClaims {
    pub openid: String,
    pub iat: usize,
    pub exp: usize,
}

impl SaveTokenClaims {
    pub fn new(openid: String, expires_in_seconds: u64) -> Self {
        let now = Utc::now().timestamp() as usize;
        Self {
            openid,
            iat: now,
            exp: now + expires_in_seconds as usize,
        }
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        self.exp <= now
    }
}

/// Signs and verifies the short-lived token that carries a resolved OpenID
/// across an intermediate step (e.g. a bind-phone-number form) without
/// server-side session state.
///
/// Tokens are transport, not storage: they hold nothing but the OpenID and
/// expire after the configured window.
#[derive(Clone)]
pub struct SaveTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: u64,
}

impl SaveTokenService {
    pub fn new(config: &SaveTokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.secret.as_ref()),
            expires_in: config.expires_in,
        }
    }

    pub fn generate(&self, openid: &str) -> Result<String, OAuthError> {
        let claims = SaveTokenClaims::new(openid.to_string(), self.expires_in);
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Returns the embedded OpenID, or `None` when the signature is invalid
    /// or the token has expired. Failure here is an expected outcome — the
    /// caller restarts the login flow — so it is not an error.
    pub fn verify(&self, token: &str) -> Option<String> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<SaveTokenClaims>(token, &self.decoding_key, &validation)
            .ok()
            .map(|data| data.claims.openid)
    }
}
