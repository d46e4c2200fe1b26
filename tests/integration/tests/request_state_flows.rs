//! Request-state integration tests.

use std::time::Duration;

use axum::http::HeaderMap;
use lidp_integration_tests::{peer, returned_cookies, TestEnv};
use lidp_session::{
    AuthenticatedUser, HttpRequest, RequestState, RequestStateManager, SessionManager,
    REQUEST_STATE_COOKIE, SESSION_COOKIE,
};
use serde::{Deserialize, Serialize};

/// Minimal stand-in for a SAML `AuthnRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AuthnRequest {
    id: String,
    issuer: String,
    force_authn: bool,
}

fn authn_request() -> AuthnRequest {
    AuthnRequest {
        id: "_8e8dc5f69a98cc4c1ff3427e5ce34606fd672f91e6".to_string(),
        issuer: "https://sp.example.com/metadata".to_string(),
        force_authn: false,
    }
}

async fn save(env: &TestEnv, manager: &RequestStateManager, relay: &str) -> anyhow::Result<HeaderMap> {
    let mut response = HeaderMap::new();
    manager
        .save_state(&mut response, env.store.as_ref(), &authn_request(), relay)
        .await?;
    Ok(returned_cookies(&response))
}

async fn load(
    env: &TestEnv,
    manager: &RequestStateManager,
    cookies: &HeaderMap,
) -> Option<RequestState<AuthnRequest>> {
    let request = HttpRequest::new(cookies, peer("10.0.0.5:443"));
    manager.load_state(&request, env.store.as_ref()).await
}

async fn state_round_trip(env: &TestEnv) -> anyhow::Result<()> {
    let manager = RequestStateManager::new();
    let cookies = save(env, &manager, "https://sp.example.com/app").await?;

    let state = load(env, &manager, &cookies).await;
    assert_eq!(
        state,
        Some(RequestState {
            authn_request: authn_request(),
            relay_state: "https://sp.example.com/app".to_string(),
        })
    );

    // Loading does not consume the state.
    assert_eq!(load(env, &manager, &cookies).await, state);
    Ok(())
}

async fn state_without_cookie(env: &TestEnv) -> anyhow::Result<()> {
    let manager = RequestStateManager::new();
    save(env, &manager, "relay").await?;

    assert!(load(env, &manager, &HeaderMap::new()).await.is_none());
    Ok(())
}

async fn state_expires(env: &TestEnv) -> anyhow::Result<()> {
    let manager = RequestStateManager::new().ttl(Duration::from_millis(300));
    let cookies = save(env, &manager, "relay").await?;

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(load(env, &manager, &cookies).await.is_none());
    Ok(())
}

/// A full federated round trip: state is saved before the redirect, loaded
/// on return, and the user gets a session alongside it.
async fn federated_sign_in(env: &TestEnv) -> anyhow::Result<()> {
    let states = RequestStateManager::new();
    let sessions = SessionManager::new();

    let mut response = HeaderMap::new();
    states
        .save_state(&mut response, env.store.as_ref(), &authn_request(), "inbox")
        .await?;

    // Return leg from the external identity step.
    let cookies = returned_cookies(&response);
    let request = HttpRequest::new(&cookies, peer("10.0.0.5:443"));
    let state: RequestState<AuthnRequest> = states
        .load_state(&request, env.store.as_ref())
        .await
        .ok_or_else(|| anyhow::anyhow!("request state lost across redirect"))?;
    assert_eq!(state.relay_state, "inbox");

    let user = AuthenticatedUser::new("bob", "10.0.0.5".parse()?);
    sessions
        .create_session(&mut response, env.store.as_ref(), &user)
        .await;

    let cookies = returned_cookies(&response);
    let header = cookies
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(header.contains(&format!("{REQUEST_STATE_COOKIE}=")));
    assert!(header.contains(&format!("{SESSION_COOKIE}=")));

    let request = HttpRequest::new(&cookies, peer("10.0.0.5:444"));
    let resolved: Option<AuthenticatedUser> =
        sessions.resolve_session(&request, env.store.as_ref()).await;
    assert_eq!(resolved, Some(user));
    Ok(())
}

#[tokio::test]
async fn test_local_state_round_trip() -> anyhow::Result<()> {
    state_round_trip(&TestEnv::local().await?).await
}

#[tokio::test]
async fn test_local_state_without_cookie() -> anyhow::Result<()> {
    state_without_cookie(&TestEnv::local().await?).await
}

#[tokio::test]
async fn test_local_state_expires() -> anyhow::Result<()> {
    state_expires(&TestEnv::local().await?).await
}

#[tokio::test]
async fn test_local_federated_sign_in() -> anyhow::Result<()> {
    federated_sign_in(&TestEnv::local().await?).await
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_redis_state_round_trip() -> anyhow::Result<()> {
    state_round_trip(&TestEnv::redis().await?).await
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_redis_state_without_cookie() -> anyhow::Result<()> {
    state_without_cookie(&TestEnv::redis().await?).await
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_redis_state_expires() -> anyhow::Result<()> {
    state_expires(&TestEnv::redis().await?).await
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_redis_federated_sign_in() -> anyhow::Result<()> {
    federated_sign_in(&TestEnv::redis().await?).await
}
