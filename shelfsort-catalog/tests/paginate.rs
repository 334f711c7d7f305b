use serde_json::{Value, json};

use shelfsort_catalog::{
    CatalogClient, CatalogError, FetchRequest, HttpResponse, RecordingSleeper, ScriptedBackend,
    Transport, fetch_all,
};
use shelfsort_core::CancelToken;

fn release(id: u64, artist: &str, title: &str) -> Value {
    json!({
        "id": id,
        "basic_information": {
            "id": id,
            "title": title,
            "year": 1970,
            "artists": [{"name": artist, "join": ""}],
            "formats": [{"name": "Vinyl", "qty": "1", "descriptions": ["LP"]}],
            "labels": [{"name": "Label", "catno": "CAT-1"}]
        }
    })
}

fn page(releases: Vec<Value>, page: u32, pages: u32) -> Value {
    json!({
        "pagination": {"page": page, "pages": pages, "per_page": 2, "items": 0},
        "releases": releases
    })
}

fn client(backend: &ScriptedBackend) -> CatalogClient {
    CatalogClient::from_transport(
        Transport::new(backend.clone()).with_sleeper(RecordingSleeper::new()),
    )
}

fn request(per_page: u32, max_pages: Option<u32>) -> FetchRequest {
    FetchRequest {
        folder_id: 0,
        per_page,
        max_pages,
    }
}

#[test]
fn short_page_ends_the_walk_and_keeps_order() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"username": "crate digger"}));
    backend.push_json(page(vec![release(1, "A", "One"), release(2, "B", "Two")], 1, 9));
    backend.push_json(page(vec![release(3, "C", "Three")], 2, 9));

    let mut progress = Vec::new();
    let collection = fetch_all(
        &mut client(&backend),
        &request(2, None),
        &CancelToken::new(),
        |p| progress.push((p.page, p.items_on_page)),
    )
    .unwrap();

    let ids: Vec<u64> = collection.items.iter().map(|i| i.release_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(collection.username, "crate digger");
    assert_eq!(collection.pages_fetched, 2);
    assert_eq!(progress, vec![(1, 2), (2, 1)]);

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].path, "/oauth/identity");
    assert_eq!(
        requests[1].path,
        "/users/crate%20digger/collection/folders/0/releases"
    );
    assert_eq!(requests[2].query_value("page"), Some("2"));
    assert_eq!(requests[2].query_value("per_page"), Some("2"));
    assert_eq!(requests[2].query_value("sort"), Some("artist"));
}

#[test]
fn pagination_metadata_ends_the_walk() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"username": "u"}));
    backend.push_json(page(vec![release(1, "A", "One"), release(2, "B", "Two")], 1, 1));

    let collection = fetch_all(
        &mut client(&backend),
        &request(2, None),
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();
    assert_eq!(collection.items.len(), 2);
    assert_eq!(backend.requests().len(), 2);
}

#[test]
fn max_pages_caps_the_walk() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"username": "u"}));
    backend.push_json(page(vec![release(1, "A", "One"), release(2, "B", "Two")], 1, 5));
    backend.push_json(page(vec![release(3, "C", "Three"), release(4, "D", "Four")], 2, 5));

    let collection = fetch_all(
        &mut client(&backend),
        &request(2, Some(1)),
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();
    assert_eq!(collection.items.len(), 2);
    assert_eq!(backend.pending(), 1);
}

#[test]
fn failed_page_fails_the_whole_fetch() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"username": "u"}));
    backend.push_json(page(vec![release(1, "A", "One"), release(2, "B", "Two")], 1, 3));
    backend.push(HttpResponse::new(403, "forbidden"));

    let err = fetch_all(
        &mut client(&backend),
        &request(2, None),
        &CancelToken::new(),
        |_| {},
    )
    .unwrap_err();
    assert!(err.is_auth());
}

#[test]
fn cancellation_is_checked_before_each_page() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"username": "u"}));
    backend.push_json(page(vec![release(1, "A", "One"), release(2, "B", "Two")], 1, 3));
    backend.push_json(page(vec![release(3, "C", "Three"), release(4, "D", "Four")], 2, 3));

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let err = fetch_all(&mut client(&backend), &request(2, None), &cancel, |_| {
        trigger.cancel()
    })
    .unwrap_err();
    assert!(matches!(err, CatalogError::Cancelled));
    assert_eq!(backend.requests().len(), 2);
}

#[test]
fn undecodable_body_is_a_decode_error() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"username": "u"}));
    backend.push(HttpResponse::new(200, "<html>maintenance</html>"));

    let err = fetch_all(
        &mut client(&backend),
        &request(2, None),
        &CancelToken::new(),
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }));
}

#[test]
fn release_price_handles_missing_listings() {
    let backend = ScriptedBackend::new();
    backend.push_json(json!({"lowest_price": 24.99, "num_for_sale": 3}));
    backend.push_json(json!({"lowest_price": null, "num_for_sale": 0}));
    backend.push_json(json!({"lowest_price": 10.0, "num_for_sale": 2, "blocked_from_sale": true}));

    let mut c = client(&backend);
    let price = c.release_price(1, "EUR").unwrap().unwrap();
    assert_eq!(price.minor_units, 2499);
    assert_eq!(price.currency, "EUR");
    assert!(c.release_price(2, "EUR").unwrap().is_none());
    assert!(c.release_price(3, "EUR").unwrap().is_none());
    assert_eq!(backend.requests()[0].query_value("curr_abbr"), Some("EUR"));
}
