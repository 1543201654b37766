//! Policy engine behavior: expiration precedence, read/write gating,
//! and revalidation decisions.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue};
use recache_core::{
    CacheActions, CacheKey, CacheSettings, CachedEntry, Expiration, HasHeaders, REFRESH_HEADER,
    RequestOverrides, UrlPatterns,
};

fn request(headers: &[(&str, &str)]) -> http::Request<Bytes> {
    let mut builder = http::Request::builder()
        .method("GET")
        .uri("https://site.com/api/resource");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Bytes::new()).unwrap()
}

fn actions_for(
    headers: &[(&str, &str)],
    settings: &CacheSettings,
    overrides: &RequestOverrides,
) -> CacheActions {
    let mut request = request(headers);
    CacheActions::from_request(
        CacheKey::from_request(&request),
        &mut request,
        settings,
        overrides,
    )
}

struct FakeEntry {
    headers: HeaderMap,
    expired: bool,
}

impl FakeEntry {
    fn new(headers: &[(&str, &str)], expired: bool) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(
                http::header::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        FakeEntry {
            headers: map,
            expired,
        }
    }
}

impl HasHeaders for FakeEntry {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl CachedEntry for FakeEntry {
    fn is_expired(&self) -> bool {
        self.expired
    }
}

#[test]
fn request_max_age_wins_over_session_default() {
    let settings = CacheSettings {
        cache_control: true,
        expire_after: Some(Expiration::Seconds(60)),
        ..Default::default()
    };
    let actions = actions_for(
        &[("cache-control", "max-age=360")],
        &settings,
        &RequestOverrides::default(),
    );
    assert_eq!(actions.expire_after(), Some(&Expiration::Seconds(360)));
}

#[test]
fn expiration_precedence_chain() {
    let mut patterns = UrlPatterns::new();
    patterns.insert("site.com/api", Expiration::Seconds(30));
    let settings = CacheSettings {
        cache_control: false,
        expire_after: Some(Expiration::Seconds(60)),
        urls_expire_after: patterns,
    };

    // Per-request override beats URL patterns and the session default.
    let actions = actions_for(&[], &settings, &RequestOverrides::default().expire_after(10));
    assert_eq!(actions.expire_after(), Some(&Expiration::Seconds(10)));

    // URL pattern beats the session default.
    let actions = actions_for(&[], &settings, &RequestOverrides::default());
    assert_eq!(actions.expire_after(), Some(&Expiration::Seconds(30)));

    // Session default applies when nothing else matches.
    let bare = CacheSettings {
        expire_after: Some(Expiration::Seconds(60)),
        ..Default::default()
    };
    let actions = actions_for(&[], &bare, &RequestOverrides::default());
    assert_eq!(actions.expire_after(), Some(&Expiration::Seconds(60)));
}

#[test]
fn no_store_skips_read_and_write() {
    let actions = actions_for(
        &[("cache-control", "no-store")],
        &CacheSettings::default(),
        &RequestOverrides::default(),
    );
    assert!(actions.skip_write());
    assert!(actions.skip_read());
}

#[test]
fn zero_expiration_disables_caching_without_cache_control() {
    let settings = CacheSettings {
        cache_control: false,
        expire_after: Some(Expiration::DoNotCache),
        ..Default::default()
    };
    let actions = actions_for(&[], &settings, &RequestOverrides::default());
    assert!(actions.skip_write());
    assert!(actions.skip_read());
}

#[test]
fn zero_session_expiration_ignored_with_cache_control() {
    // With header semantics enabled, only a request max-age=0 can skip
    // the write at this stage; the session default is settled later.
    let settings = CacheSettings {
        cache_control: true,
        expire_after: Some(Expiration::DoNotCache),
        ..Default::default()
    };
    let actions = actions_for(&[], &settings, &RequestOverrides::default());
    assert!(!actions.skip_write());

    let actions = actions_for(&[("cache-control", "max-age=0")], &settings, &RequestOverrides::default());
    assert!(actions.skip_write());
}

#[test]
fn only_if_cached_from_header_or_override() {
    let settings = CacheSettings::default();
    let actions = actions_for(
        &[("cache-control", "only-if-cached")],
        &settings,
        &RequestOverrides::default(),
    );
    assert!(actions.only_if_cached());

    let actions = actions_for(&[], &settings, &RequestOverrides::default().only_if_cached());
    assert!(actions.only_if_cached());
}

#[test]
fn no_cache_requests_revalidation() {
    let actions = actions_for(
        &[("cache-control", "no-cache")],
        &CacheSettings::default(),
        &RequestOverrides::default(),
    );
    assert!(actions.revalidate());
}

#[test]
fn refresh_signal_header_is_consumed() {
    let mut request = request(&[(REFRESH_HEADER, "true")]);
    let actions = CacheActions::from_request(
        CacheKey::from_request(&request),
        &mut request,
        &CacheSettings::default(),
        &RequestOverrides::default(),
    );
    assert!(actions.skip_read());
    assert!(!actions.skip_write());
    assert!(!request.headers().contains_key(REFRESH_HEADER));
}

#[test]
fn refresh_override_skips_read() {
    let actions = actions_for(
        &[],
        &CacheSettings::default(),
        &RequestOverrides::default().refresh(),
    );
    assert!(actions.skip_read());
}

#[test]
fn revalidates_expired_entry_with_validator() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(&[("etag", "\"abc\"")], true);
    actions.update_from_cached_response(Some(&entry));
    assert!(actions.revalidate());
    assert_eq!(
        actions.validation_headers().get("if-none-match").unwrap(),
        "\"abc\""
    );
    assert!(!actions.validation_headers().contains_key("if-modified-since"));
}

#[test]
fn revalidation_sets_both_conditional_headers() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(
        &[
            ("etag", "\"abc\""),
            ("last-modified", "Fri, 01 Jan 2021 00:00:00 GMT"),
        ],
        true,
    );
    actions.update_from_cached_response(Some(&entry));
    assert_eq!(
        actions
            .validation_headers()
            .get("if-modified-since")
            .unwrap(),
        "Fri, 01 Jan 2021 00:00:00 GMT"
    );
}

#[test]
fn fresh_entry_without_trigger_is_not_revalidated() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(&[("etag", "\"abc\"")], false);
    actions.update_from_cached_response(Some(&entry));
    assert!(!actions.revalidate());
    assert!(actions.validation_headers().is_empty());
}

#[test]
fn expired_entry_without_validator_cannot_revalidate() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(&[], true);
    actions.update_from_cached_response(Some(&entry));
    assert!(!actions.revalidate());
}

#[test]
fn cached_no_cache_directive_triggers_revalidation() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(
        &[("etag", "\"abc\""), ("cache-control", "no-cache")],
        false,
    );
    actions.update_from_cached_response(Some(&entry));
    assert!(actions.revalidate());
}

#[test]
fn must_revalidate_with_zero_max_age_triggers_revalidation() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(
        &[
            ("etag", "\"abc\""),
            ("cache-control", "must-revalidate, max-age=0"),
        ],
        false,
    );
    actions.update_from_cached_response(Some(&entry));
    assert!(actions.revalidate());

    // must-revalidate alone (non-zero max-age) is not a trigger.
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let entry = FakeEntry::new(
        &[
            ("etag", "\"abc\""),
            ("cache-control", "must-revalidate, max-age=60"),
        ],
        false,
    );
    actions.update_from_cached_response(Some(&entry));
    assert!(!actions.revalidate());
}

#[test]
fn response_max_age_overrides_provisional_expiration() {
    let settings = CacheSettings {
        cache_control: true,
        expire_after: Some(Expiration::Seconds(60)),
        ..Default::default()
    };
    let mut actions = actions_for(&[], &settings, &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert("cache-control", HeaderValue::from_static("max-age=360"));
    actions.update_from_response(Some(&headers));
    assert_eq!(actions.expire_after(), Some(&Expiration::Seconds(360)));
}

#[test]
fn response_expires_header_is_used_when_no_max_age() {
    let settings = CacheSettings::with_cache_control();
    let mut actions = actions_for(&[], &settings, &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert(
        "expires",
        HeaderValue::from_static("Tue, 01 Jan 2030 00:00:00 GMT"),
    );
    actions.update_from_response(Some(&headers));
    assert_eq!(
        actions.expire_after(),
        Some(&Expiration::HttpDate("Tue, 01 Jan 2030 00:00:00 GMT".to_owned()))
    );
    assert!(actions.expires().is_some());
}

#[test]
fn immutable_response_never_expires() {
    let settings = CacheSettings::with_cache_control();
    let mut actions = actions_for(&[], &settings, &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert(
        "cache-control",
        HeaderValue::from_static("immutable, max-age=60"),
    );
    actions.update_from_response(Some(&headers));
    assert_eq!(actions.expire_after(), Some(&Expiration::NeverExpire));
    assert_eq!(actions.expires(), None);
}

#[test]
fn zero_ttl_with_validator_is_still_written() {
    let settings = CacheSettings::with_cache_control();
    let mut actions = actions_for(&[], &settings, &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert("cache-control", HeaderValue::from_static("max-age=0"));
    headers.insert("etag", HeaderValue::from_static("\"abc\""));
    actions.update_from_response(Some(&headers));
    assert!(!actions.skip_write());
}

#[test]
fn zero_ttl_without_validator_skips_write() {
    let settings = CacheSettings::with_cache_control();
    let mut actions = actions_for(&[], &settings, &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert("cache-control", HeaderValue::from_static("max-age=0"));
    actions.update_from_response(Some(&headers));
    assert!(actions.skip_write());
}

#[test]
fn response_no_store_without_validator_skips_write() {
    let settings = CacheSettings::with_cache_control();
    let mut actions = actions_for(&[], &settings, &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    actions.update_from_response(Some(&headers));
    assert!(actions.skip_write());
}

#[test]
fn request_no_store_is_remembered_at_response_time() {
    let settings = CacheSettings::with_cache_control();
    let mut actions = actions_for(
        &[("cache-control", "no-store")],
        &settings,
        &RequestOverrides::default(),
    );
    let headers = HeaderMap::new();
    actions.update_from_response(Some(&headers));
    assert!(actions.skip_write());
}

#[test]
fn response_update_is_a_noop_without_cache_control() {
    let mut actions = actions_for(&[], &CacheSettings::default(), &RequestOverrides::default());
    let mut headers = HeaderMap::new();
    headers.insert("cache-control", HeaderValue::from_static("max-age=360"));
    actions.update_from_response(Some(&headers));
    assert_eq!(actions.expire_after(), None);
}
