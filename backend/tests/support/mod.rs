//! Shared harness for integration tests.
//!
//! HTTP suites drive the [`Api`] below; Diesel adapter suites provision
//! databases through [`embedded_postgres`] and build rows from
//! [`film_draft`] and [`user_draft`].
//!
//! Integration tests compile as separate crates under `backend/tests/`, so the
//! wiring below mirrors what the server binary does for in-memory storage:
//! one [`MemoryStore`] behind every repository port, a frozen
//! [`MutableClock`] and the full route table from
//! [`backend::inbound::http::configure`].
#![allow(dead_code, reason = "each test crate uses a subset of the harness")]

pub mod embedded_postgres;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use backend::Trace;
use backend::domain::{
    CatalogueService, FeedRecorder, FilmDraft, FilmService, GenreId, RatingId, ReviewService,
    UserDraft, UserService,
};
use backend::inbound::http::configure;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::MemoryStore;
use backend::test_support::MutableClock;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

/// Instant the harness clock starts at.
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid start instant")
}

/// A running API over a fresh in-memory store.
pub struct Api {
    state: web::Data<HttpState>,
    pub clock: Arc<MutableClock>,
}

impl Api {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(start_instant()));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let store = Arc::new(MemoryStore::new());
        let recorder = FeedRecorder::new(Arc::clone(&store), Arc::clone(&dyn_clock));

        let films = Arc::new(FilmService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            recorder.clone(),
        ));
        let users = Arc::new(UserService::new(
            Arc::clone(&store),
            recorder.clone(),
            dyn_clock,
        ));
        let reviews = Arc::new(ReviewService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            recorder,
        ));
        let state = HttpState::new(HttpStatePorts {
            films: films.clone(),
            films_query: films,
            users: users.clone(),
            users_query: users,
            reviews: reviews.clone(),
            reviews_query: reviews,
            catalogue: Arc::new(CatalogueService::new(store)),
        });

        Self {
            state: web::Data::new(state),
            clock,
        }
    }

    /// Serve one request; the body is `Value::Null` when empty.
    pub async fn send(&self, request: TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .app_data(self.state.clone())
                .configure(configure),
        )
        .await;
        let res = test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(TestRequest::get().uri(uri)).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(TestRequest::post().uri(uri).set_json(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(TestRequest::put().uri(uri).set_json(body)).await
    }

    pub async fn put(&self, uri: &str) -> (StatusCode, Value) {
        self.send(TestRequest::put().uri(uri)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(TestRequest::delete().uri(uri)).await
    }

    /// Create a user with `login` and return its id.
    pub async fn create_user(&self, login: &str) -> i64 {
        let (status, body) = self
            .post_json(
                "/users",
                json!({
                    "email": format!("{login}@example.com"),
                    "login": login,
                    "birthday": "1990-01-01"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user: {body}");
        body["id"].as_i64().expect("user id")
    }

    /// Create a G-rated film called `name` and return its id.
    pub async fn create_film(&self, name: &str) -> i64 {
        let (status, body) = self.post_json("/films", film_body(name)).await;
        assert_eq!(status, StatusCode::CREATED, "create film: {body}");
        body["id"].as_i64().expect("film id")
    }

    pub async fn like(&self, film_id: i64, user_id: i64) {
        let (status, body) = self.put(&format!("/films/{film_id}/like/{user_id}")).await;
        assert_eq!(status, StatusCode::OK, "like: {body}");
    }
}

/// A valid film payload.
pub fn film_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "A film",
        "releaseDate": "2000-01-01",
        "duration": 100,
        "mpa": {"id": 1},
        "genres": [{"id": 1}]
    })
}

/// Ids from a JSON array of entities.
pub fn ids(body: &Value) -> Vec<i64> {
    ids_at(body, "id")
}

/// Values of `key` from a JSON array of objects.
pub fn ids_at(body: &Value, key: &str) -> Vec<i64> {
    body.as_array()
        .expect("JSON array")
        .iter()
        .map(|item| item[key].as_i64().expect("numeric id"))
        .collect()
}

/// A G-rated comedy draft, as stored by the repositories.
pub fn film_draft(name: &str) -> FilmDraft {
    FilmDraft {
        id: None,
        name: name.to_owned(),
        description: "A film".to_owned(),
        release_date: NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid release date"),
        duration: 100,
        mpa: Some(RatingId::new(1)),
        genres: vec![GenreId::new(1)],
    }
}

/// A user draft with an email derived from `login`.
pub fn user_draft(login: &str) -> UserDraft {
    UserDraft {
        id: None,
        email: format!("{login}@example.com"),
        login: login.to_owned(),
        name: None,
        birthday: NaiveDate::from_ymd_opt(1990, 1, 1),
    }
}
