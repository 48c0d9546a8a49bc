use std::env;

use url::Url;

use crate::{
    auth_storage::{LocalTokenStorage, TokenStorage},
    browser_open, token_claims, API_SERVER_URL_ENV, AUTH_CLIENT_TYPE, DEFAULT_API_SERVER_URL,
};

#[derive(Debug, Clone)]
pub(crate) struct AuthConfig {
    pub(crate) api_server_url: String,
}

impl AuthConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            api_server_url: normalize_api_server_url(
                &env::var(API_SERVER_URL_ENV)
                    .unwrap_or_else(|_| DEFAULT_API_SERVER_URL.to_string()),
                DEFAULT_API_SERVER_URL,
            ),
        }
    }
}

pub(crate) fn normalize_api_server_url(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback.trim_end_matches('/').to_string();
    }

    match Url::parse(trimmed) {
        Ok(parsed) => parsed.to_string().trim_end_matches('/').to_string(),
        Err(_) => fallback.trim_end_matches('/').to_string(),
    }
}

/// GitHub OAuth session management against the Bifrost API server. This is
/// the implementation behind the host bridge's `check_and_start_login`
/// callable.
#[derive(Debug)]
pub(crate) struct AuthService<S> {
    config: AuthConfig,
    storage: S,
}

pub(crate) type HostAuthService = AuthService<LocalTokenStorage>;

impl HostAuthService {
    pub(crate) fn from_env() -> Result<Self, String> {
        Ok(Self::new(AuthConfig::from_env(), LocalTokenStorage::new()?))
    }
}

impl<S> AuthService<S>
where
    S: TokenStorage,
{
    pub(crate) fn new(config: AuthConfig, storage: S) -> Self {
        Self { config, storage }
    }

    /// GitHub OAuth entry URL on the API server.
    pub(crate) fn auth_url(&self) -> Result<String, String> {
        let mut auth_url =
            Url::parse(&format!("{}/v1/user/auth/github", self.config.api_server_url))
                .map_err(|error| format!("Failed to build auth URL: {error}"))?;
        auth_url
            .query_pairs_mut()
            .append_pair("client_type", AUTH_CLIENT_TYPE);
        Ok(auth_url.to_string())
    }

    /// Persists the token carried by an OAuth callback URL.
    pub(crate) fn handle_callback(&self, callback_url: &str) -> Result<(), String> {
        let parsed = Url::parse(callback_url)
            .map_err(|error| format!("Failed to parse callback URL: {error}"))?;

        let token = parsed
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| "No token found in callback URL.".to_string())?;

        self.storage
            .save_token(&token)
            .map_err(|error| format!("Failed to save token: {error}"))
    }

    /// Reports whether a live session token is stored. An expired token is
    /// deleted and surfaces as an error so the UI can name the cause; the
    /// next bootstrap run then starts a fresh login.
    pub(crate) fn is_authenticated(&self) -> Result<bool, String> {
        let Some(token) = self.storage.load_token()? else {
            return Ok(false);
        };

        if token_claims::token_is_expired(&token, chrono::Utc::now().timestamp())? {
            self.storage
                .delete_token()
                .map_err(|error| format!("Failed to delete expired token: {error}"))?;
            return Err("token expired".to_string());
        }
        Ok(true)
    }

    pub(crate) fn logout(&self) -> Result<(), String> {
        self.storage.delete_token()
    }

    pub(crate) fn auth_token(&self) -> Result<Option<String>, String> {
        self.storage
            .load_token()
            .map_err(|error| format!("Failed to get token: {error}"))
    }

    fn start_login_with<F>(&self, open_url: F) -> Result<(), String>
    where
        F: Fn(&str) -> Result<(), String>,
    {
        let authenticated = self
            .is_authenticated()
            .map_err(|error| format!("Failed to check authentication status: {error}"))?;
        if authenticated {
            return Ok(());
        }

        let auth_url = self
            .auth_url()
            .map_err(|error| format!("Failed to get auth URL: {error}"))?;
        open_url(&auth_url).map_err(|error| format!("Failed to open browser: {error}"))
    }

    /// The bridge's one callable: check the stored session and start a login
    /// if needed. Opening the login page counts as success; the OAuth result
    /// arrives later through the `bifrost://auth/callback` deep link.
    pub(crate) fn check_and_start_login(&self) -> Result<(), String> {
        self.check_and_start_login_with(browser_open::open_in_system_browser)
    }

    fn check_and_start_login_with<F>(&self, open_url: F) -> Result<(), String>
    where
        F: Fn(&str) -> Result<(), String>,
    {
        let authenticated = self
            .is_authenticated()
            .map_err(|error| format!("Failed to check authentication status: {error}"))?;
        if !authenticated {
            return self.start_login_with(open_url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, sync::Mutex};

    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    use super::{normalize_api_server_url, AuthConfig, AuthService};
    use crate::auth_storage::TokenStorage;

    #[derive(Default)]
    struct MemoryTokenStorage {
        token: Mutex<Option<String>>,
    }

    impl MemoryTokenStorage {
        fn with_token(token: &str) -> Self {
            Self {
                token: Mutex::new(Some(token.to_string())),
            }
        }

        fn stored(&self) -> Option<String> {
            self.token.lock().expect("storage lock").clone()
        }
    }

    impl TokenStorage for MemoryTokenStorage {
        fn save_token(&self, token: &str) -> Result<(), String> {
            *self.token.lock().expect("storage lock") = Some(token.to_string());
            Ok(())
        }

        fn load_token(&self) -> Result<Option<String>, String> {
            Ok(self
                .token
                .lock()
                .expect("storage lock")
                .clone()
                .filter(|token| !token.is_empty()))
        }

        fn delete_token(&self) -> Result<(), String> {
            *self.token.lock().expect("storage lock") = None;
            Ok(())
        }
    }

    fn service_with(storage: MemoryTokenStorage) -> AuthService<MemoryTokenStorage> {
        AuthService::new(
            AuthConfig {
                api_server_url: "https://api.is-an.ai".to_string(),
            },
            storage,
        )
    }

    fn token_with_exp(exp: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({ "exp": exp }).to_string());
        format!("header.{payload}.signature")
    }

    fn live_token() -> String {
        token_with_exp(chrono::Utc::now().timestamp() + 3600)
    }

    #[test]
    fn auth_url_carries_the_client_type() {
        let service = service_with(MemoryTokenStorage::default());
        assert_eq!(
            service.auth_url().expect("auth url"),
            "https://api.is-an.ai/v1/user/auth/github?client_type=bifrost-client"
        );
    }

    #[test]
    fn normalize_api_server_url_strips_trailing_slash_and_falls_back() {
        assert_eq!(
            normalize_api_server_url("https://api.is-an.ai/", "https://api.is-an.ai"),
            "https://api.is-an.ai"
        );
        assert_eq!(
            normalize_api_server_url("  ", "https://api.is-an.ai"),
            "https://api.is-an.ai"
        );
        assert_eq!(
            normalize_api_server_url("not a url", "https://api.is-an.ai"),
            "https://api.is-an.ai"
        );
    }

    #[test]
    fn handle_callback_persists_the_token_from_the_query() {
        let service = service_with(MemoryTokenStorage::default());
        service
            .handle_callback("bifrost://auth/callback?token=jwt-value")
            .expect("handle callback");
        assert_eq!(service.storage.stored(), Some("jwt-value".to_string()));
    }

    #[test]
    fn handle_callback_without_a_token_is_an_error() {
        let service = service_with(MemoryTokenStorage::default());
        let error = service
            .handle_callback("bifrost://auth/callback?state=abc")
            .unwrap_err();
        assert!(error.contains("No token found"));
    }

    #[test]
    fn check_and_start_login_skips_login_with_a_live_token() {
        let service = service_with(MemoryTokenStorage::with_token(&live_token()));
        service
            .check_and_start_login_with(|_| panic!("login must not start when authenticated"))
            .expect("check with live token");
    }

    #[test]
    fn check_and_start_login_opens_the_auth_url_without_a_token() {
        let service = service_with(MemoryTokenStorage::default());
        let opened = RefCell::new(Vec::new());

        service
            .check_and_start_login_with(|url| {
                opened.borrow_mut().push(url.to_string());
                Ok(())
            })
            .expect("check without token");

        let opened = opened.into_inner();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].contains("/v1/user/auth/github"));
        assert!(opened[0].contains("client_type=bifrost-client"));
    }

    #[test]
    fn check_and_start_login_surfaces_and_deletes_an_expired_token() {
        let service = service_with(MemoryTokenStorage::with_token(&token_with_exp(1_000)));

        let error = service
            .check_and_start_login_with(|_| panic!("login must not start on an expired token"))
            .unwrap_err();
        assert!(error.contains("token expired"));
        assert_eq!(service.storage.stored(), None, "expired token is deleted");
    }

    #[test]
    fn check_and_start_login_reports_a_failed_browser_launch() {
        let service = service_with(MemoryTokenStorage::default());
        let error = service
            .check_and_start_login_with(|_| Err("no browser available".to_string()))
            .unwrap_err();
        assert!(error.contains("Failed to open browser"));
    }

    #[test]
    fn logout_deletes_the_stored_token() {
        let service = service_with(MemoryTokenStorage::with_token(&live_token()));
        service.logout().expect("logout");
        assert_eq!(service.storage.stored(), None);
    }

    #[test]
    fn auth_token_returns_the_stored_token() {
        let token = live_token();
        let service = service_with(MemoryTokenStorage::with_token(&token));
        assert_eq!(service.auth_token().expect("auth token"), Some(token));
    }
}
