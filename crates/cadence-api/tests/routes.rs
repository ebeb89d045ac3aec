use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cadence_api::routes::router;
use cadence_api::state::AppStateInner;
use cadence_db::Database;
use cadence_types::models::{ContentSchedule, ScheduleType};

fn schedule(id: &str, channel: &str) -> ContentSchedule {
    ContentSchedule {
        id: id.into(),
        channel_id: Some(channel.into()),
        name: "Morning".into(),
        schedule_type: ScheduleType::Daily,
        posts_per_timeframe: 1,
        preferred_days: None,
        preferred_times: Some(vec!["09:00".into()]),
        emoji: None,
        color: None,
    }
}

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    db.insert_channel("chan-a", "A").unwrap();
    db.insert_schedule(&schedule("s1", "chan-a")).unwrap();
    router(Arc::new(AppStateInner { db }))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn virtual_posts_are_listed_in_camel_case() {
    let app = app();
    let (status, body) = send(
        &app,
        get("/virtual-posts?channelIds=chan-a&fromDate=2026-01-01&toDate=2026-01-02"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["date"], "2026-01-01T09:00:00Z");
    assert_eq!(posts[0]["isVirtual"], true);
    assert_eq!(posts[0]["status"], "draft");
    assert_eq!(posts[0]["scheduleId"], "s1");
    assert_eq!(posts[0]["channelId"], "chan-a");
    assert_eq!(posts[0]["schedule"]["name"], "Morning");
    assert_eq!(posts[0]["targetChannelIds"], serde_json::json!(["chan-a"]));
}

#[tokio::test]
async fn empty_channel_list_yields_nothing() {
    let (status, body) = send(
        &app(),
        get("/virtual-posts?fromDate=2026-01-01&toDate=2026-01-02"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn bad_dates_are_a_bad_request() {
    let (status, body) = send(
        &app(),
        get("/virtual-posts?channelIds=chan-a&fromDate=soon&toDate=2026-01-02"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = send(
        &app(),
        get("/virtual-posts?channelIds=chan-a&fromDate=2026-02-01&toDate=2026-01-01"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn slot_preview_lists_raw_slots() {
    let (status, body) = send(
        &app(),
        get("/schedules/s1/slots?fromDate=2026-01-01&toDate=2026-01-03"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scheduleId"], "s1");
    assert_eq!(
        body["slots"],
        serde_json::json!([
            "2026-01-01T09:00:00Z",
            "2026-01-02T09:00:00Z",
            "2026-01-03T09:00:00Z"
        ])
    );
}

#[tokio::test]
async fn slot_preview_for_unknown_schedule_is_not_found() {
    let (status, body) = send(
        &app(),
        get("/schedules/nope/slots?fromDate=2026-01-01&toDate=2026-01-03"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn skipping_hides_the_slot_and_unskipping_restores_it() {
    let app = app();
    let listing = "/virtual-posts?channelIds=chan-a&fromDate=2026-01-01&toDate=2026-01-03";
    let skip = r#"{"date":"2026-01-02T09:00:00Z"}"#;

    let (status, body) = send(&app, post_json("/schedules/s1/skips", skip)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["scheduleId"], "s1");

    let (status, _) = send(&app, post_json("/schedules/s1/skips", skip)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get(listing)).await;
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-01-01T09:00:00Z", "2026-01-03T09:00:00Z"]);

    let (status, _) = send(
        &app,
        delete("/schedules/s1/skips?date=2026-01-02T09:00:00Z"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, get(listing)).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = send(
        &app,
        delete("/schedules/s1/skips?date=2026-01-02T09:00:00Z"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn skipping_on_unknown_schedule_is_not_found() {
    let (status, _) = send(
        &app(),
        post_json("/schedules/ghost/skips", r#"{"date":"2026-01-02T09:00:00Z"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn skipping_with_bad_date_is_a_bad_request() {
    let (status, body) = send(
        &app(),
        post_json("/schedules/s1/skips", r#"{"date":"tomorrow"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_query_parameters_return_error_body() {
    let (status, body) = send(&app(), get("/virtual-posts?channelIds=chan-a&fromDate=2026-01-01")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("toDate"));

    let (status, body) = send(&app(), get("/schedules/s1/slots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send(&app(), delete("/schedules/s1/skips")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_skip_body_returns_error_body() {
    let (status, body) = send(&app(), post_json("/schedules/s1/skips", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn oversized_window_is_a_bad_request() {
    let (status, body) = send(
        &app(),
        get("/virtual-posts?channelIds=chan-a&fromDate=0001-01-01&toDate=9999-12-31"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = send(
        &app(),
        get("/schedules/s1/slots?fromDate=-262143-01-01&toDate=2026-01-01"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sub_millisecond_skip_is_rejected_and_slot_survives() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json("/schedules/s1/skips", r#"{"date":"2026-01-01T09:00:00.000500Z"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (_, body) = send(
        &app,
        get("/virtual-posts?channelIds=chan-a&fromDate=2026-01-01&toDate=2026-01-01"),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
