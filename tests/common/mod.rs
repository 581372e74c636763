use qq_connect::{config::Config, oauth::QqOAuthClient, save_token::SaveTokenService};

/// Test harness wiring a client and token service to a mock provider.
pub struct TestHarness {
    #[allow(dead_code)]
    pub config: Config,
    pub client: QqOAuthClient,
    pub save_tokens: SaveTokenService,
}

impl TestHarness {
    /// Build a harness whose endpoints all point at `base_url`, typically a
    /// wiremock server standing in for graph.qq.com.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Config::default();
        config.qq.client_id = "test-client-id".to_string();
        config.qq.client_secret = "test-client-secret".to_string();
        config.qq.redirect_uri = "http://localhost:3000/oauth_callback".to_string();
        config.qq.state = "next".to_string();
        config.qq.authorize_url = format!("{}/oauth2.0/authorize", base_url);
        config.qq.token_url = format!("{}/oauth2.0/token", base_url);
        config.qq.openid_url = format!("{}/oauth2.0/me", base_url);
        config.qq.user_info_url = format!("{}/user/get_user_info", base_url);
        config.token.secret = "test-secret-123".to_string();

        let client = QqOAuthClient::new(config.qq.clone());
        let save_tokens = SaveTokenService::new(&config.token);

        Self {
            config,
            client,
            save_tokens,
        }
    }
}
