pub mod config;
pub mod error;
pub mod oauth;
pub mod save_token;

pub use config::Config;
pub use error::OAuthError;
pub use oauth::{QqOAuthClient, UserInfo};
pub use save_token::SaveTokenService;
