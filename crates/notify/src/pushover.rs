//! Pushover notifier.
//!
//! `POST {api_url}` with form fields `user`, `token`, `message`. The response
//! body is never read; a non-2xx status is logged and swallowed. Only a
//! failure to reach the endpoint at all is returned to the caller.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use vitae_core::error::NotifyError;
use vitae_core::notifier::Notifier;

/// Notifier request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Pushover credentials and endpoint.
#[derive(Clone)]
pub struct PushoverConfig {
    /// User key (empty when not configured)
    pub user: String,
    /// Application token (empty when not configured)
    pub token: String,
    /// Messages endpoint
    pub api_url: String,
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("user", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl From<&vitae_config::NotifierConfig> for PushoverConfig {
    fn from(config: &vitae_config::NotifierConfig) -> Self {
        Self {
            user: config.user.clone().unwrap_or_default(),
            token: config.token.clone().unwrap_or_default(),
            api_url: config.api_url.clone(),
        }
    }
}

/// Sends one-line messages to the operator's phone.
pub struct PushoverNotifier {
    config: PushoverConfig,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(config: PushoverConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn from_config(config: &vitae_config::AppConfig) -> Result<Self, NotifyError> {
        Self::new(PushoverConfig::from(&config.notifier))
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn push(&self, message: &str) -> Result<(), NotifyError> {
        info!("Push: {message}");

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&[
                ("user", self.config.user.as_str()),
                ("token", self.config.token.as_str()),
                ("message", message),
            ])
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Push delivered");
        } else {
            warn!(status = status.as_u16(), "Push rejected by notification service");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Form, Router, http::StatusCode, routing::post};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn spawn_endpoint(status: StatusCode) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let seen_handler = seen.clone();
        let app = Router::new().route(
            "/1/messages.json",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let seen = seen_handler.clone();
                async move {
                    seen.lock().unwrap().push(form);
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/1/messages.json"), seen)
    }

    fn notifier(api_url: String, user: &str, token: &str) -> PushoverNotifier {
        PushoverNotifier::new(PushoverConfig {
            user: user.into(),
            token: token.into(),
            api_url,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_form_payload() {
        let (url, seen) = spawn_endpoint(StatusCode::OK).await;
        let notifier = notifier(url, "u-123", "t-456");

        notifier.push("Recording interest from Sam").await.unwrap();

        let forms = seen.lock().unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0]["user"], "u-123");
        assert_eq!(forms[0]["token"], "t-456");
        assert_eq!(forms[0]["message"], "Recording interest from Sam");
    }

    #[tokio::test]
    async fn rejected_delivery_is_not_an_error() {
        let (url, seen) = spawn_endpoint(StatusCode::BAD_REQUEST).await;
        let notifier = notifier(url, "", "");

        assert!(notifier.push("hello").await.is_ok());
        // Empty credentials are still sent
        assert_eq!(seen.lock().unwrap()[0]["user"], "");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let notifier = notifier("http://127.0.0.1:9/1/messages.json".into(), "u", "t");
        let err = notifier.push("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }

    #[test]
    fn config_from_app_config_defaults_to_empty_credentials() {
        let app = vitae_config::AppConfig::default();
        let config = PushoverConfig::from(&app.notifier);
        assert!(config.user.is_empty());
        assert!(config.token.is_empty());
        assert!(config.api_url.contains("api.pushover.net"));
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = PushoverConfig {
            user: "secret-user".into(),
            token: "secret-token".into(),
            api_url: "https://api.pushover.net/1/messages.json".into(),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-user"));
        assert!(!debug.contains("secret-token"));
    }
}
