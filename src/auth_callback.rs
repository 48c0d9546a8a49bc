use tauri::{AppHandle, Manager};

use crate::{main_window, HostBridgeState, AUTH_CALLBACK_PREFIX};

pub(crate) fn is_auth_callback_url(url: &str) -> bool {
    url.starts_with(AUTH_CALLBACK_PREFIX)
}

/// Picks the OAuth callback out of a second instance's argv, if present.
pub(crate) fn find_callback_url(args: &[String]) -> Option<&String> {
    args.iter().find(|arg| is_auth_callback_url(arg))
}

/// Handles a `bifrost://auth/callback` URL delivered by the OS: persists the
/// token and brings the (reloaded) main window back to front. Other URLs are
/// ignored.
pub(crate) fn handle_auth_callback<F>(app_handle: &AppHandle, raw_url: &str, log: F)
where
    F: Fn(&str),
{
    if !is_auth_callback_url(raw_url) {
        return;
    }

    let bridge = app_handle.state::<HostBridgeState>();
    let Some(service) = bridge.handle() else {
        log("auth callback dropped: auth bridge is not installed yet");
        return;
    };

    match service.handle_callback(raw_url) {
        Ok(()) => {
            log("auth callback handled, session token stored");
            main_window::show_main_window(app_handle, &log);
            main_window::reload_main_window(app_handle, &log);
        }
        Err(error) => log(&format!("failed to handle auth callback: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{find_callback_url, is_auth_callback_url};

    #[test]
    fn is_auth_callback_url_matches_the_callback_prefix() {
        assert!(is_auth_callback_url("bifrost://auth/callback?token=jwt"));
        assert!(!is_auth_callback_url("bifrost://other/path"));
        assert!(!is_auth_callback_url("https://api.is-an.ai/auth/callback"));
    }

    #[test]
    fn find_callback_url_scans_second_instance_args() {
        let args = vec![
            "/usr/bin/bifrost-desktop".to_string(),
            "bifrost://auth/callback?token=jwt".to_string(),
        ];
        assert_eq!(
            find_callback_url(&args).map(String::as_str),
            Some("bifrost://auth/callback?token=jwt")
        );
    }

    #[test]
    fn find_callback_url_is_none_without_a_callback_arg() {
        let args = vec!["/usr/bin/bifrost-desktop".to_string(), "--flag".to_string()];
        assert_eq!(find_callback_url(&args), None);
    }
}
