//! Login flow through the router: authorize redirect, callback, session,
//! logout.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{StatusCode, header};
use common::*;
use mockito::{Matcher, Server};
use wisp_api::router;
use wisp_api::services::cookies::decode_user_cookie;
use wisp_core::config::ProviderEndpoints;
use wisp_core::oauth::DiscordProvider;

#[tokio::test]
async fn authorize_redirects_to_consent_screen() {
    let app = build(Arc::new(FakeProvider::default()));

    let resp = send(app, get("/auth/discord")).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(
        resp.headers()[header::LOCATION],
        "https://discord.example/oauth2/authorize?client_id=abc&redirect_uri=https%3A%2F%2Fx%2Fcb&response_type=code&scope=identify%20guilds&permissions=8"
    );
}

#[tokio::test]
async fn login_alias_behaves_like_authorize() {
    let app = build(Arc::new(FakeProvider::default()));
    let resp = send(app, get("/login")).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(AUTHORIZE_URL));
}

#[tokio::test]
async fn authorize_without_client_id_is_configuration_error() {
    let mut registration = registration();
    registration.client_id = String::new();
    let provider = Arc::new(FakeProvider::default());
    let app = router(state(config(registration, "http://127.0.0.1:9/api"), provider));

    let resp = send(app, get("/auth/discord")).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(header::LOCATION).is_none());
    assert_eq!(json_body(resp).await["error"], "Server configuration error");
}

#[tokio::test]
async fn callback_without_code_is_rejected_before_any_call() {
    for uri in [
        "/auth/discord/callback",
        "/auth/discord/callback?code=",
        "/auth/discord/callback?error=access_denied&error_description=denied",
    ] {
        let provider = Arc::new(FakeProvider::default());
        let resp = send(build(provider.clone()), get(uri)).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(set_cookies(&resp).is_empty());
        assert_eq!(
            json_body(resp).await["error"],
            "No authorization code provided"
        );
        assert_eq!(provider.exchanges(), 0);
        assert_eq!(provider.profile_fetches(), 0);
    }
}

#[tokio::test]
async fn unparseable_callback_query_is_a_json_missing_code() {
    let provider = Arc::new(FakeProvider::default());
    let resp = send(
        build(provider.clone()),
        get("/auth/discord/callback?code=a&code=b"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(
        json_body(resp).await["error"],
        "No authorization code provided"
    );
    assert_eq!(provider.exchanges(), 0);
}

#[tokio::test]
async fn code_reaches_the_provider_unchanged() {
    let provider = Arc::new(FakeProvider::default());
    let resp = send(
        build(provider.clone()),
        get("/auth/discord/callback?code=%20good%20"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(provider.codes(), vec![" good "]);
}

#[tokio::test]
async fn unusable_landing_path_sets_no_cookies() {
    let mut config = config(registration(), "http://127.0.0.1:9/api");
    config.landing_path = "/dash\nboard".into();
    let provider = Arc::new(FakeProvider::default());
    let app = router(state(config, provider.clone()));

    let resp = send(app, get("/auth/discord/callback?code=good")).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(json_body(resp).await["error"], "Internal server error");
}

#[tokio::test]
async fn failed_exchange_sets_no_cookies_and_skips_profile() {
    let provider = Arc::new(FakeProvider {
        fail_exchange: true,
        ..Default::default()
    });
    let resp = send(
        build(provider.clone()),
        get("/auth/discord/callback?code=stale"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(
        json_body(resp).await["error"],
        "Failed to exchange authorization code"
    );
    assert_eq!(provider.exchanges(), 1);
    assert_eq!(provider.profile_fetches(), 0);
}

#[tokio::test]
async fn failed_profile_fetch_sets_no_cookies() {
    let provider = Arc::new(FakeProvider {
        fail_profile: true,
        ..Default::default()
    });
    let resp = send(
        build(provider.clone()),
        get("/auth/discord/callback?code=good"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookies(&resp).is_empty());
    assert_eq!(json_body(resp).await["error"], "Failed to fetch user data");
    assert_eq!(provider.profile_fetches(), 1);
}

#[tokio::test]
async fn successful_callback_sets_three_cookies_and_redirects() {
    let provider = Arc::new(FakeProvider::default());
    let resp = send(
        build(provider.clone()),
        get("/auth/discord/callback?code=good"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/dashboard");

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 3, "{cookies:?}");
    for cookie in &cookies {
        assert!(cookie.contains("HttpOnly"), "{cookie}");
        assert!(cookie.contains("Secure"), "{cookie}");
        assert!(cookie.contains("SameSite=Lax"), "{cookie}");
        assert!(cookie.contains("Path=/"), "{cookie}");
    }
    assert!(cookies.iter().any(|c| c.starts_with("access_token=access-for-good;")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=refresh-1;")));

    let user = cookies
        .iter()
        .find_map(|c| c.strip_prefix("user="))
        .and_then(|rest| rest.split(';').next())
        .expect("user cookie");
    let profile = decode_user_cookie(user).expect("decodes");
    assert_eq!(profile.id, "42");
}

#[tokio::test]
async fn callback_against_provider_endpoints() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("code".into(), "real-code".into()),
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("redirect_uri".into(), "https://x/cb".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"at","token_type":"Bearer","refresh_token":"rt","expires_in":604800}"#)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/users/@me")
        .match_header("authorization", "Bearer at")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"7","username":"admin","avatar":null,"locale":"en-US"}"#)
        .create_async()
        .await;

    let provider = DiscordProvider::new(
        ProviderEndpoints::at(&server.url()),
        Duration::from_secs(2),
    )
    .expect("provider");
    let app = router(state(
        config(registration(), "http://127.0.0.1:9/api"),
        Arc::new(provider),
    ));

    let resp = send(app, get("/auth/discord/callback?code=real-code")).await;

    token.assert_async().await;
    me.assert_async().await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=at;")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=rt;")));
}

#[tokio::test]
async fn provider_rejection_surfaces_as_exchange_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/users/@me")
        .expect(0)
        .create_async()
        .await;

    let provider = DiscordProvider::new(
        ProviderEndpoints::at(&server.url()),
        Duration::from_secs(2),
    )
    .expect("provider");
    let app = router(state(
        config(registration(), "http://127.0.0.1:9/api"),
        Arc::new(provider),
    ));

    let resp = send(app, get("/auth/discord/callback?code=used")).await;

    me.assert_async().await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Failed to exchange authorization code");
    assert!(!body.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn session_requires_cookies() {
    let resp = send(build(Arc::new(FakeProvider::default())), get("/auth/session")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "Not authenticated");
}

#[tokio::test]
async fn session_returns_the_logged_in_user() {
    let resp = send(
        build(Arc::new(FakeProvider::default())),
        get_with_session("/auth/session"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["user"]["id"], "42");
    assert_eq!(body["displayName"], "The Mod");
    assert_eq!(
        body["avatarUrl"],
        "https://cdn.discordapp.com/avatars/42/a1b2c3.png"
    );
}

#[tokio::test]
async fn logout_clears_all_session_cookies() {
    let resp = send(
        build(Arc::new(FakeProvider::default())),
        get_with_session("/auth/logout"),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 3);
    for name in ["user=", "access_token=", "refresh_token="] {
        let cookie = cookies
            .iter()
            .find(|c| c.starts_with(name))
            .expect("cleared cookie");
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }
}

#[tokio::test]
async fn health_is_public() {
    let resp = send(build(Arc::new(FakeProvider::default())), get("/api/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], wisp_core::version());
}
