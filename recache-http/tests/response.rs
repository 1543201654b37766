//! Cached response model: construction, re-stamping, redirect history
//! flattening, expiry derivations, and serialization round-trips.

use bytes::Bytes;
use chrono::{TimeDelta, Utc};
use http::{HeaderMap, HeaderValue, StatusCode};
use recache_http::{CachedRequest, CachedResponse, LiveResponse};

fn live_response(url: &str, body: &'static [u8]) -> LiveResponse {
    let request = http::Request::builder()
        .method("GET")
        .uri(url)
        .body(Bytes::new())
        .unwrap();
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert("etag", HeaderValue::from_static("\"v1\""));
    LiveResponse {
        url: url.to_owned(),
        headers,
        body: Bytes::from_static(body),
        request: CachedRequest::from_request(&request),
        ..Default::default()
    }
}

fn redirect_response(url: &str, location: &str) -> LiveResponse {
    let mut response = live_response(url, b"");
    response.status = StatusCode::MOVED_PERMANENTLY;
    response
        .headers
        .insert("location", HeaderValue::from_str(location).unwrap());
    response
}

#[test]
fn from_response_copies_the_observable_surface() {
    let cached = CachedResponse::from_response(&live_response("https://site.com/a", b"hello"), None);
    assert_eq!(cached.status(), StatusCode::OK);
    assert_eq!(cached.url(), "https://site.com/a");
    assert_eq!(cached.body().as_ref(), b"hello");
    assert_eq!(cached.size(), 5);
    assert_eq!(cached.encoding(), Some("utf-8"));
    assert_eq!(cached.reason(), Some("OK"));
    assert!(cached.from_cache());
    assert!(cached.cache_key().is_none());
}

#[test]
fn restamp_changes_only_expiration_and_key() {
    let mut cached =
        CachedResponse::from_response(&live_response("https://site.com/a", b"hello"), None);
    cached.set_cache_key("GET:https://site.com/a".into());

    let expires = Utc::now() + TimeDelta::seconds(60);
    let restamped = cached.restamp(Some(expires));

    assert_eq!(restamped.expires(), Some(expires));
    assert!(restamped.cache_key().is_none());
    assert_eq!(restamped.status(), cached.status());
    assert_eq!(restamped.headers(), cached.headers());
    assert_eq!(restamped.body(), cached.body());
    assert_eq!(restamped.history().len(), cached.history().len());
    assert_eq!(restamped.created_at(), cached.created_at());
}

#[test]
fn redirect_history_is_flattened_one_level() {
    let mut terminal = live_response("https://site.com/final", b"done");
    let mut first_hop = redirect_response("https://site.com/a", "/b");
    // Give a hop its own history; it must not survive the copy.
    first_hop.history = vec![redirect_response("https://site.com/z", "/a")];
    terminal.history = vec![first_hop, redirect_response("https://site.com/b", "/final")];

    let cached = CachedResponse::from_response(&terminal, None);
    assert_eq!(cached.history().len(), 2);
    for entry in cached.history() {
        assert!(entry.history().is_empty());
    }
}

#[test]
fn a_redirect_itself_keeps_no_history() {
    let mut hop = redirect_response("https://site.com/a", "/b");
    hop.history = vec![redirect_response("https://site.com/z", "/a")];
    let cached = CachedResponse::from_response(&hop, None);
    assert!(cached.history().is_empty());
}

#[test]
fn zero_expiration_is_immediately_expired() {
    let mut cached =
        CachedResponse::from_response(&live_response("https://site.com/a", b"x"), None);
    assert!(!cached.is_expired());
    assert_eq!(cached.ttl(), None);

    let expired_now = cached.reset_expiration(Some(&recache_core::Expiration::DoNotCache));
    assert!(expired_now);
    assert!(cached.is_expired());
    assert_eq!(cached.ttl(), None);
}

#[test]
fn ttl_counts_down_to_expiration() {
    let mut cached =
        CachedResponse::from_response(&live_response("https://site.com/a", b"x"), None);
    let expired_now = cached.reset_expiration(Some(&recache_core::Expiration::Seconds(60)));
    assert!(!expired_now);
    let ttl = cached.ttl().unwrap();
    assert!((58..=60).contains(&ttl));
}

#[test]
fn next_request_is_materialized_from_the_snapshot() {
    let next = http::Request::builder()
        .method("GET")
        .uri("https://site.com/b")
        .body(Bytes::new())
        .unwrap();
    let mut response = redirect_response("https://site.com/a", "/b");
    response.next = Some(CachedRequest::from_request(&next));

    let cached = CachedResponse::from_response(&response, None);
    let prepared = cached.next().unwrap();
    assert_eq!(prepared.uri(), "https://site.com/b");
    assert_eq!(prepared.method(), "GET");

    let terminal = CachedResponse::from_response(&live_response("https://site.com/b", b""), None);
    assert!(terminal.next().is_none());
}

#[test]
fn cookies_are_captured_from_set_cookie_headers() {
    let mut response = live_response("https://site.com/a", b"");
    response
        .headers
        .append("set-cookie", HeaderValue::from_static("session=abc123; Path=/"));
    response
        .headers
        .append("set-cookie", HeaderValue::from_static("theme=dark"));

    let cached = CachedResponse::from_response(&response, None);
    let cookies = cached.cookies();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].name, "session");
    assert_eq!(cookies[0].value, "abc123");
    assert_eq!(cookies[1].name, "theme");
    assert_eq!(cookies[1].value, "dark");
}

#[test]
fn json_round_trip_then_rehydrate() {
    let expires = Utc::now() + TimeDelta::seconds(300);
    let cached = CachedResponse::from_response(
        &live_response("https://site.com/a", b"payload"),
        Some(expires),
    );

    let serialized = serde_json::to_vec(&cached).unwrap();
    let restored: CachedResponse = serde_json::from_slice(&serialized).unwrap();

    assert_eq!(restored.status(), cached.status());
    assert_eq!(restored.headers(), cached.headers());
    assert_eq!(restored.body(), cached.body());
    assert_eq!(restored.expires(), cached.expires());
    assert_eq!(restored.url(), cached.url());
    // The key is never serialized; the store stamps it after reading.
    assert!(restored.cache_key().is_none());

    let rehydrated = restored.rehydrate();
    assert_eq!(rehydrated.status(), StatusCode::OK);
    assert_eq!(rehydrated.headers(), cached.headers());
    assert_eq!(rehydrated.body().as_ref(), b"payload");
}

#[test]
fn rehydrate_restores_the_protocol_version() {
    let mut live = live_response("https://site.com/a", b"x");
    live.version = "HTTP/2.0".to_owned();
    let cached = CachedResponse::from_response(&live, None);
    assert_eq!(cached.rehydrate().version(), http::Version::HTTP_2);

    let default = CachedResponse::from_response(&live_response("https://site.com/a", b"x"), None);
    assert_eq!(default.rehydrate().version(), http::Version::HTTP_11);
}

#[test]
fn not_cached_synthesizes_a_504() {
    let request = http::Request::builder()
        .method("GET")
        .uri("https://site.com/missing")
        .body(Bytes::new())
        .unwrap();
    let response = CachedResponse::not_cached(CachedRequest::from_request(&request));
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.reason(), Some("Not Cached"));
    assert_eq!(response.url(), "https://site.com/missing");
    assert_eq!(response.size(), 0);
}
