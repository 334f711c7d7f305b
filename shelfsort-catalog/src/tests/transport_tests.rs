use super::*;
use crate::scripted::{RecordingSleeper, ScriptedBackend};
use chrono::TimeZone;

fn transport(backend: &ScriptedBackend, sleeper: &RecordingSleeper) -> Transport {
    Transport::new(backend.clone()).with_sleeper(sleeper.clone())
}

#[test]
fn three_unavailable_then_success_retries_exactly_three_times() {
    let backend = ScriptedBackend::new();
    for _ in 0..3 {
        backend.push(HttpResponse::new(503, "busy").with_retry_after("2"));
    }
    backend.push(HttpResponse::new(200, "{}"));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    let resp = t.send(&HttpRequest::get("/oauth/identity")).unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(t.stats().retries, 3);
    assert_eq!(t.stats().requests, 4);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2); 3]);
}

#[test]
fn exhausted_retries_report_last_status() {
    let backend = ScriptedBackend::new();
    for _ in 0..5 {
        backend.push(HttpResponse::new(503, "").with_retry_after("1"));
    }
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    let err = t.send(&HttpRequest::get("/x")).unwrap_err();
    match err {
        CatalogError::TransientApiFailure {
            last_status,
            attempts,
        } => {
            assert_eq!(last_status, Some(503));
            assert_eq!(attempts, 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // No sleep after the final attempt.
    assert_eq!(sleeper.sleeps().len(), 4);
    assert_eq!(backend.requests().len(), 5);
}

#[test]
fn unauthorized_is_not_retried() {
    let backend = ScriptedBackend::new();
    backend.push(HttpResponse::new(401, "{\"message\": \"You must authenticate\"}"));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    let err = t.send(&HttpRequest::get("/oauth/identity")).unwrap_err();
    assert!(err.is_auth());
    assert!(!err.is_transient());
    assert_eq!(backend.requests().len(), 1);
    assert!(sleeper.sleeps().is_empty());
}

#[test]
fn rate_limited_without_header_uses_plain_backoff() {
    let backend = ScriptedBackend::new();
    backend.push_status(429);
    backend.push_status(429);
    backend.push(HttpResponse::new(200, "{}"));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    t.send(&HttpRequest::get("/x")).unwrap();
    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[test]
fn server_errors_get_bounded_jitter() {
    let backend = ScriptedBackend::new();
    backend.push_status(500);
    backend.push_network_error("connection reset");
    backend.push(HttpResponse::new(200, "{}"));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    t.send(&HttpRequest::get("/x")).unwrap();
    let sleeps = sleeper.sleeps();
    assert_eq!(sleeps.len(), 2);
    assert!(sleeps[0] >= Duration::from_secs(1));
    assert!(sleeps[0] <= Duration::from_millis(1250));
    assert!(sleeps[1] >= Duration::from_secs(2));
    assert!(sleeps[1] <= Duration::from_millis(2250));
}

#[test]
fn low_budget_pauses_after_success() {
    let backend = ScriptedBackend::new();
    backend.push(HttpResponse::new(200, "{}").with_remaining(1));
    backend.push(HttpResponse::new(200, "{}").with_remaining(30));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    t.send(&HttpRequest::get("/a")).unwrap();
    assert_eq!(t.remaining_budget(), Some(1));
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2)]);

    t.send(&HttpRequest::get("/b")).unwrap();
    assert_eq!(t.remaining_budget(), Some(30));
    assert_eq!(t.stats().budget_pauses, 1);
}

#[test]
fn backoff_is_capped() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff(0), Duration::from_secs(1));
    assert_eq!(policy.backoff(3), Duration::from_secs(8));
    assert_eq!(policy.backoff(4), Duration::from_secs(10));
    assert_eq!(policy.backoff(40), Duration::from_secs(10));
}

#[test]
fn retry_after_accepts_seconds_and_dates() {
    let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
    assert_eq!(parse_retry_after("3", now), Some(Duration::from_secs(3)));
    assert_eq!(parse_retry_after(" 0.5 ", now), Some(Duration::from_millis(500)));
    assert_eq!(
        parse_retry_after("Wed, 21 Oct 2015 07:28:30 GMT", now),
        Some(Duration::from_secs(30))
    );
    assert_eq!(
        parse_retry_after("Wed, 21 Oct 2015 07:27:00 GMT", now),
        Some(Duration::ZERO)
    );
    assert_eq!(parse_retry_after("-4", now), None);
    assert_eq!(parse_retry_after("soon", now), None);
}

#[test]
fn retry_after_out_of_range_is_ignored() {
    let now = Utc::now();
    assert_eq!(parse_retry_after("1e20", now), None);
    assert_eq!(parse_retry_after("inf", now), None);
    assert_eq!(parse_retry_after("NaN", now), None);
}

#[test]
fn huge_retry_after_falls_back_to_backoff() {
    let backend = ScriptedBackend::new();
    backend.push(HttpResponse::new(429, "").with_retry_after("1e20"));
    backend.push(HttpResponse::new(200, "{}"));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    t.send(&HttpRequest::get("/x")).unwrap();
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1)]);
}

#[test]
fn server_wait_is_capped() {
    let backend = ScriptedBackend::new();
    backend.push(HttpResponse::new(503, "").with_retry_after("86400"));
    backend.push(HttpResponse::new(200, "{}"));
    let sleeper = RecordingSleeper::new();
    let mut t = transport(&backend, &sleeper);

    t.send(&HttpRequest::get("/x")).unwrap();
    assert_eq!(sleeper.sleeps(), vec![RetryPolicy::default().max_server_wait]);
}

/// Fires the token the first time it is asked to sleep.
struct CancellingSleeper(CancelToken);

impl Sleeper for CancellingSleeper {
    fn sleep(&self, _duration: Duration, _cancel: &CancelToken) {
        self.0.cancel();
    }
}

#[test]
fn cancel_during_retry_wait_stops_the_request() {
    let backend = ScriptedBackend::new();
    backend.push(HttpResponse::new(429, "").with_retry_after("30"));
    backend.push(HttpResponse::new(200, "{}"));
    let cancel = CancelToken::new();
    let mut t = Transport::new(backend.clone()).with_sleeper(CancellingSleeper(cancel.clone()));
    t.set_cancel(cancel);

    let err = t.send(&HttpRequest::get("/x")).unwrap_err();
    assert!(matches!(err, CatalogError::Cancelled));
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(t.stats().retries, 0);
}

#[test]
fn cancelled_token_skips_retry_sleep() {
    let backend = ScriptedBackend::new();
    backend.push_status(500);
    let sleeper = RecordingSleeper::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut t = transport(&backend, &sleeper);
    t.set_cancel(cancel);

    let err = t.send(&HttpRequest::get("/x")).unwrap_err();
    assert!(matches!(err, CatalogError::Cancelled));
    assert!(sleeper.sleeps().is_empty());
}

#[test]
fn thread_sleeper_returns_early_when_cancelled() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let started = std::time::Instant::now();
    ThreadSleeper.sleep(Duration::from_secs(30), &cancel);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn error_body_is_truncated() {
    let backend = ScriptedBackend::new();
    backend.push(HttpResponse::new(400, "x".repeat(500)));
    let mut t = transport(&backend, &RecordingSleeper::new());

    match t.send(&HttpRequest::get("/x")).unwrap_err() {
        CatalogError::AuthOrRequest { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message.len(), 200);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
