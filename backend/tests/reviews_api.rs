//! End-to-end review and vote endpoints over the in-memory store.

mod support;

use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use support::{Api, ids_at};

async fn create_review(api: &Api, film_id: i64, user_id: i64, content: &str) -> i64 {
    let (status, body) = api
        .post_json(
            "/reviews",
            json!({
                "content": content,
                "isPositive": true,
                "userId": user_id,
                "filmId": film_id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create review: {body}");
    body["reviewId"].as_i64().expect("review id")
}

async fn useful(api: &Api, review_id: i64) -> Value {
    let (status, body) = api.get(&format!("/reviews/{review_id}")).await;
    assert_eq!(status, StatusCode::OK);
    body["useful"].clone()
}

#[rstest]
#[actix_web::test]
async fn new_review_starts_neutral() {
    let api = Api::new();
    let film = api.create_film("Alien").await;
    let ann = api.create_user("ann").await;

    let (status, body) = api
        .post_json(
            "/reviews",
            json!({"content": "Tense", "isPositive": true, "userId": ann, "filmId": film}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reviewId"], 1);
    assert_eq!(body["useful"], 0);
    assert_eq!(body["filmId"], film);
}

#[rstest]
#[actix_web::test]
async fn review_for_missing_film_is_not_found() {
    let api = Api::new();
    let ann = api.create_user("ann").await;

    let (status, body) = api
        .post_json(
            "/reviews",
            json!({"content": "Lost", "isPositive": false, "userId": ann, "filmId": 7}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn a_second_vote_replaces_the_first() {
    let api = Api::new();
    let film = api.create_film("Alien").await;
    let ann = api.create_user("ann").await;
    let bob = api.create_user("bob").await;
    let review = create_review(&api, film, ann, "Tense").await;

    api.put(&format!("/reviews/{review}/like/{bob}")).await;
    assert_eq!(useful(&api, review).await, 1);

    api.put(&format!("/reviews/{review}/dislike/{bob}")).await;
    assert_eq!(useful(&api, review).await, -1);

    let (status, _) = api.delete(&format!("/reviews/{review}/dislike/{bob}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(useful(&api, review).await, 0);
}

#[rstest]
#[actix_web::test]
async fn listing_orders_by_usefulness_and_honours_count() {
    let api = Api::new();
    let alien = api.create_film("Alien").await;
    let heat = api.create_film("Heat").await;
    let ann = api.create_user("ann").await;
    let bob = api.create_user("bob").await;
    let first = create_review(&api, alien, ann, "Slow burn").await;
    let second = create_review(&api, alien, bob, "Classic").await;
    let other = create_review(&api, heat, ann, "Great shootout").await;
    api.put(&format!("/reviews/{second}/like/{ann}")).await;

    let (status, body) = api.get(&format!("/reviews?filmId={alien}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids_at(&body, "reviewId"), vec![second, first]);

    let (_, body) = api.get("/reviews?count=2").await;
    assert_eq!(ids_at(&body, "reviewId"), vec![second, first]);

    let (_, body) = api.get("/reviews").await;
    assert!(ids_at(&body, "reviewId").contains(&other));

    let (status, _) = api.get("/reviews?count=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn update_keeps_author_and_film() {
    let api = Api::new();
    let film = api.create_film("Alien").await;
    let ann = api.create_user("ann").await;
    let review = create_review(&api, film, ann, "Tense").await;

    let (status, body) = api
        .put_json(
            "/reviews",
            json!({"reviewId": review, "content": "Terrifying", "isPositive": false}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["content"], "Terrifying");
    assert_eq!(body["isPositive"], false);
    assert_eq!(body["userId"], ann);
    assert_eq!(body["filmId"], film);
}

#[rstest]
#[actix_web::test]
async fn review_lifecycle_appears_in_author_feed() {
    let api = Api::new();
    let film = api.create_film("Alien").await;
    let ann = api.create_user("ann").await;
    let bob = api.create_user("bob").await;
    let review = create_review(&api, film, ann, "Tense").await;
    api.clock.advance_seconds(1);
    api.put_json(
        "/reviews",
        json!({"reviewId": review, "content": "Still tense", "isPositive": true}),
    )
    .await;
    api.put(&format!("/reviews/{review}/like/{bob}")).await;
    api.clock.advance_seconds(1);
    let (status, _) = api.delete(&format!("/reviews/{review}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, feed) = api.get(&format!("/users/{ann}/feed")).await;
    let operations: Vec<&str> = feed
        .as_array()
        .expect("events")
        .iter()
        .map(|event| {
            assert_eq!(event["eventType"], "REVIEW");
            assert_eq!(event["entityId"], review);
            event["operation"].as_str().expect("operation")
        })
        .collect();
    assert_eq!(operations, vec!["ADD", "UPDATE", "REMOVE"]);

    let (_, bob_feed) = api.get(&format!("/users/{bob}/feed")).await;
    assert_eq!(bob_feed, json!([]));

    let (status, _) = api.get(&format!("/reviews/{review}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
