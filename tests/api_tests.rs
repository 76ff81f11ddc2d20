mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use common::{sample_puzzle, solution};
use connections_server::{
    hint::{HintGenerator, INVALID_LEVEL_GUIDANCE},
    server::{routes, AppState, RETRY_MESSAGE, SUCCESS_MESSAGE},
    store::MemoryStore,
    PuzzleShape,
};
use serde_json::{json, Value};

fn state() -> AppState {
    let store = MemoryStore::new(
        vec![sample_puzzle("2024-01-01"), sample_puzzle("2024-02-01")],
        &PuzzleShape::default(),
    );

    AppState {
        store: Arc::new(store),
        hints: Arc::new(HintGenerator::templates_only()),
    }
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(routes),
        )
        .await
    };
}

#[actix_web::test]
async fn puzzle_endpoint_returns_all_words() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/puzzle/2024-01-01").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["date"], "2024-01-01");
    assert_eq!(body["id"], 7);
    assert_eq!(body["title"], "Sample");

    let mut words: Vec<String> = serde_json::from_value(body["words"].clone()).unwrap();
    let mut expected = sample_puzzle("2024-01-01").all_words();
    words.sort();
    expected.sort();
    assert_eq!(words, expected);
}

#[actix_web::test]
async fn latest_resolves_to_newest_puzzle() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/puzzle/latest").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["date"], "2024-02-01");
}

#[actix_web::test]
async fn random_serves_one_of_the_stored_puzzles() {
    let app = app!();
    for _ in 0..10 {
        let req = test::TestRequest::get().uri("/api/puzzle/random").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let date = body["date"].as_str().unwrap();
        assert!(["2024-01-01", "2024-02-01"].contains(&date), "{date}");
        assert_eq!(body["words"].as_array().unwrap().len(), 16);
    }
}

#[actix_web::test]
async fn unknown_date_is_not_found() {
    let app = app!();
    for uri in ["/api/puzzle/1999-01-01", "/api/puzzle/garbage"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let req = test::TestRequest::post()
        .uri("/api/submit/1999-01-01")
        .set_json(json!({ "submission": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn archive_lists_newest_first() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/puzzles").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, ["2024-02-01", "2024-01-01"]);
}

#[actix_web::test]
async fn correct_submission_is_congratulated() {
    let app = app!();
    let mut groups = solution(&sample_puzzle("2024-01-01"));
    groups.reverse();

    let req = test::TestRequest::post()
        .uri("/api/submit/2024-01-01")
        .set_json(json!({ "submission": groups }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "correct": true, "message": SUCCESS_MESSAGE }));
}

#[actix_web::test]
async fn wrong_or_malformed_submission_is_rejected_politely() {
    let app = app!();

    for submission in [
        json!([["BASS", "PIKE", "SOLE", "MARS"]]),
        json!("not a list"),
        json!([1, {"a": 2}, [null, 3]]),
        Value::Null,
    ] {
        let req = test::TestRequest::post()
            .uri("/api/submit/2024-01-01")
            .set_json(json!({ "submission": submission }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "correct": false, "message": RETRY_MESSAGE }));
    }
}

#[actix_web::test]
async fn malformed_groups_do_not_hide_correct_ones() {
    let app = app!();
    let mut groups: Vec<Value> = solution(&sample_puzzle("2024-01-01"))
        .into_iter()
        .map(|group| json!(group))
        .collect();
    groups.insert(1, json!(42));
    groups.push(json!([]));

    let req = test::TestRequest::post()
        .uri("/api/submit/2024-01-01")
        .set_json(json!({ "submission": groups }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["correct"], true);
}

#[actix_web::test]
async fn padded_group_is_not_counted_as_correct() {
    let app = app!();
    let mut groups: Vec<Value> = solution(&sample_puzzle("2024-01-01"))
        .into_iter()
        .map(|group| json!(group))
        .collect();
    groups[2] = json!(["FLOP", "RIVER", "TELL", "BLIND", 7, null]);

    let req = test::TestRequest::post()
        .uri("/api/submit/2024-01-01")
        .set_json(json!({ "submission": groups }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "correct": false, "message": RETRY_MESSAGE }));
}

#[actix_web::test]
async fn hint_endpoint_serves_levels() {
    let app = app!();

    for level in ["beginner", "intermediate", "advanced"] {
        let req = test::TestRequest::post()
            .uri("/api/hint/2024-01-01")
            .set_json(json!({ "level": level }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let hint = body["hint"].as_str().unwrap();
        assert!(!hint.is_empty());
        assert_ne!(hint, INVALID_LEVEL_GUIDANCE);
    }
}

#[actix_web::test]
async fn hint_endpoint_defaults_and_guides() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/hint/latest")
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_ne!(body["hint"], INVALID_LEVEL_GUIDANCE);

    let req = test::TestRequest::post()
        .uri("/api/hint/latest")
        .set_json(json!({ "level": "expert" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["hint"], INVALID_LEVEL_GUIDANCE);
}

#[actix_web::test]
async fn health_reports_puzzle_count() {
    let app = app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["puzzles"], 2);
    assert_eq!(body["hint_completion"], false);
}
