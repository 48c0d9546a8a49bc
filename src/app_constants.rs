pub(crate) const MAIN_WINDOW_LABEL: &str = "main";

pub(crate) const DEFAULT_API_SERVER_URL: &str = "https://api.is-an.ai";
pub(crate) const API_SERVER_URL_ENV: &str = "BIFROST_API_SERVER_URL";
pub(crate) const ROOT_DIR_ENV: &str = "BIFROST_ROOT";

pub(crate) const AUTH_CLIENT_TYPE: &str = "bifrost-client";
pub(crate) const AUTH_CALLBACK_PREFIX: &str = "bifrost://auth/callback";
pub(crate) const AUTH_TOKEN_FILE: &str = "auth.json";
pub(crate) const AUTH_FALLBACK_MESSAGE: &str = "Authentication failed";

pub(crate) const BOOTSTRAP_POLL_INTERVAL_ENV: &str = "BIFROST_BOOTSTRAP_POLL_MS";
pub(crate) const DEFAULT_BOOTSTRAP_POLL_INTERVAL_MS: u64 = 100;
pub(crate) const MIN_BOOTSTRAP_POLL_INTERVAL_MS: u64 = 10;

pub(crate) const BOOTSTRAP_STATE_EVENT: &str = "bifrost://bootstrap-state";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
