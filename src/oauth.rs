use crate::{config::QqConfig, error::OAuthError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

/// Scope requested on the authorization redirect; grants access to the
/// basic profile endpoints.
const AUTHORIZE_SCOPE: &str = "get_user_info";

#[derive(Debug, Deserialize)]
struct OpenIdResponse {
    openid: String,
}

/// Basic profile returned by the `get_user_info` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub nickname: String,
    #[serde(default)]
    pub gender: String,
    /// 40x40 avatar URL.
    #[serde(default)]
    pub figureurl_qq_1: String,
    /// 100x100 avatar URL; only present for accounts that have one.
    #[serde(default)]
    pub figureurl_qq_2: String,
}

/// Client for the QQ Connect authorization-code flow.
///
/// Holds only the application credentials and a reqwest client; nothing is
/// mutated after construction, so one instance can be shared freely across
/// request handlers.
#[derive(Clone)]
pub struct QqOAuthClient {
    config: QqConfig,
    http_client: Client,
}

impl QqOAuthClient {
    pub fn new(config: QqConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    /// URL to redirect the browser to for the authorization step, using the
    /// configured default state.
    pub fn authorization_url(&self) -> String {
        self.authorization_url_with_state(&self.config.state)
    }

    /// Same as [`authorization_url`](Self::authorization_url) with a
    /// per-request state, e.g. the path to return to after login.
    pub fn authorization_url_with_state(&self, state: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state)
            .append_pair("scope", AUTHORIZE_SCOPE)
            .finish();

        format!("{}?{}", self.config.authorize_url, query)
    }

    /// Exchange the authorization code from the callback redirect for an
    /// access token. Single attempt, no retry.
    ///
    /// The token endpoint answers with a URL-encoded form body
    /// (`access_token=..&expires_in=..`), not JSON.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http_client
            .get(&self.config.token_url)
            .query(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let body = response.text().await?;

        match form_field(&body, "access_token") {
            Some(access_token) => {
                tracing::debug!("obtained access token from code exchange");
                Ok(access_token)
            }
            None => {
                tracing::error!(body = %body, "token endpoint response had no access_token");
                Err(OAuthError::TokenExchange)
            }
        }
    }

    /// Resolve an access token to the user's stable OpenID.
    ///
    /// The endpoint answers with a JSONP-style body,
    /// `callback( {"client_id":"..","openid":".."} );`. On any shape
    /// mismatch the body is re-read as the provider's alternate error
    /// query-string (`code=..&msg=..`).
    pub async fn openid(&self, access_token: &str) -> Result<String, OAuthError> {
        let response = self
            .http_client
            .get(&self.config.openid_url)
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        let body = response.text().await?;

        match parse_openid_body(&body) {
            Some(openid) => {
                tracing::debug!("resolved access token to openid");
                Ok(openid)
            }
            None => {
                let (code, msg) = parse_error_body(&body);
                tracing::error!(%code, %msg, "openid endpoint returned an error response");
                Err(OAuthError::IdentityLookup { code, msg })
            }
        }
    }

    /// Fetch the user's basic profile. Requires the OpenID resolved by
    /// [`openid`](Self::openid).
    pub async fn user_info(
        &self,
        access_token: &str,
        openid: &str,
    ) -> Result<UserInfo, OAuthError> {
        let response = self
            .http_client
            .get(&self.config.user_info_url)
            .query(&[
                ("access_token", access_token),
                ("oauth_consumer_key", self.config.client_id.as_str()),
                ("openid", openid),
            ])
            .send()
            .await?;

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "user info response was not JSON");
            OAuthError::IdentityLookup {
                code: String::new(),
                msg: String::new(),
            }
        })?;

        // Errors come back as JSON with a non-zero `ret` and a `msg`.
        let ret = value.get("ret").and_then(Value::as_i64).unwrap_or(0);
        if ret != 0 {
            let msg = value
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            tracing::error!(ret, %msg, "user info endpoint returned an error");
            return Err(OAuthError::IdentityLookup {
                code: ret.to_string(),
                msg,
            });
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::error!(error = %e, "user info response missing expected fields");
            OAuthError::IdentityLookup {
                code: String::new(),
                msg: String::new(),
            }
        })
    }
}

/// First value under `key` in a URL-encoded form body.
fn form_field(body: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Unwrap the JSONP envelope and extract the `openid` field. Returns None
/// when the body does not match the known wrapper or carries no openid.
fn parse_openid_body(body: &str) -> Option<String> {
    let json = unwrap_jsonp(body)?;
    let response: OpenIdResponse = serde_json::from_str(json).ok()?;
    Some(response.openid)
}

/// Strip the fixed `callback( ... );` wrapper. The provider sometimes puts a
/// newline between the closing paren and the semicolon, so trailing
/// whitespace is tolerated at each boundary.
fn unwrap_jsonp(body: &str) -> Option<&str> {
    let inner = body.trim().strip_prefix("callback(")?;
    let inner = inner.strip_suffix(';')?.trim_end();
    let inner = inner.strip_suffix(')')?;
    Some(inner.trim())
}

/// Read `code` and `msg` out of the provider's error query-string. Either
/// field is empty when absent, so a body in neither expected format yields
/// an error with empty fields rather than a panic.
fn parse_error_body(body: &str) -> (String, String) {
    let mut code = String::new();
    let mut msg = String::new();

    for (key, value) in form_urlencoded::parse(body.trim().as_bytes()) {
        match &*key {
            "code" => code = value.into_owned(),
            "msg" => msg = value.into_owned(),
            _ => {}
        }
    }

    (code, msg)
}
