//! Shared helpers for the router integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::Map;
use tower::ServiceExt;
use wisp_api::config::ApiConfig;
use wisp_api::services::cookies::{ACCESS_COOKIE, USER_COOKIE, user_cookie};
use wisp_api::{AppState, router};
use wisp_core::config::{ClientRegistration, DashboardConfig, ProviderEndpoints};
use wisp_core::models::auth::{TokenPair, UserProfile};
use wisp_core::oauth::{IdentityProvider, OAuthError};
use wisp_core::settings::SettingsClient;

pub const AUTHORIZE_URL: &str = "https://discord.example/oauth2/authorize";

pub fn registration() -> ClientRegistration {
    ClientRegistration {
        client_id: "abc".into(),
        client_secret: "shh".into(),
        redirect_uri: "https://x/cb".into(),
        scope: vec!["identify".into(), "guilds".into()],
        permissions: "8".into(),
    }
}

pub fn config(registration: ClientRegistration, settings_api_url: &str) -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        dashboard: DashboardConfig {
            registration,
            endpoints: ProviderEndpoints {
                authorize_url: AUTHORIZE_URL.into(),
                token_url: "https://discord.example/oauth2/token".into(),
                api_base_url: "https://discord.example/api".into(),
            },
            bot_token: Some("bot-token-xyz".into()),
            settings_api_url: settings_api_url.into(),
            request_timeout: Duration::from_secs(2),
        },
        landing_path: "/dashboard".into(),
    }
}

pub fn state(config: ApiConfig, provider: Arc<dyn IdentityProvider>) -> AppState {
    let settings = SettingsClient::new(
        &config.dashboard.settings_api_url,
        config.dashboard.request_timeout,
    )
    .expect("settings client");
    AppState {
        config: Arc::new(config),
        provider,
        settings,
    }
}

/// Provider double that counts calls and fails on demand.
#[derive(Default)]
pub struct FakeProvider {
    pub exchanges: AtomicUsize,
    pub profile_fetches: AtomicUsize,
    pub codes: Mutex<Vec<String>>,
    pub fail_exchange: bool,
    pub fail_profile: bool,
}

impl FakeProvider {
    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn profile_fetches(&self) -> usize {
        self.profile_fetches.load(Ordering::SeqCst)
    }

    /// Codes passed to `exchange_code`, in call order.
    pub fn codes(&self) -> Vec<String> {
        self.codes.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn exchange_code(
        &self,
        _registration: &ClientRegistration,
        code: &str,
    ) -> Result<TokenPair, OAuthError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.codes.lock().unwrap().push(code.to_string());
        if self.fail_exchange {
            return Err(OAuthError::TokenExchange("HTTP 400 Bad Request".into()));
        }
        Ok(TokenPair {
            access_token: format!("access-for-{code}"),
            refresh_token: "refresh-1".into(),
            token_type: "Bearer".into(),
            expires_in: Some(604800),
            scope: Some("identify guilds".into()),
        })
    }

    async fn fetch_current_user(&self, _access_token: &str) -> Result<UserProfile, OAuthError> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile {
            return Err(OAuthError::ProfileFetch("HTTP 401 Unauthorized".into()));
        }
        Ok(profile())
    }
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: "42".into(),
        username: "mod".into(),
        global_name: Some("The Mod".into()),
        avatar: Some("a1b2c3".into()),
        extra: Map::new(),
    }
}

/// `Cookie` header value for a logged-in browser.
pub fn session_cookie_header(access_token: &str) -> String {
    let user = user_cookie(&profile()).expect("user cookie");
    format!(
        "{USER_COOKIE}={}; {ACCESS_COOKIE}={access_token}",
        user.value()
    )
}

pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_session(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, session_cookie_header("at"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json_with_session(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, session_cookie_header("at"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

pub fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie").to_string())
        .collect()
}

pub fn build(provider: Arc<FakeProvider>) -> Router {
    router(state(config(registration(), "http://127.0.0.1:9/api"), provider))
}
