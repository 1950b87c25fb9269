//! Integration tests for `DieselFilmRepository` against embedded PostgreSQL.
//!
//! Each test gets its own migrated database, so identifiers start from one
//! and no rows leak between tests.

mod support;

use backend::domain::ports::{
    FilmRepository, FilmRepositoryError, ReviewRepository, UserRepository,
};
use backend::domain::{FilmId, GenreId, RatingId, ReviewDraft, UserId};
use backend::outbound::persistence::{
    DieselFilmRepository, DieselReviewRepository, DieselUserRepository,
};
use rstest::{fixture, rstest};

use support::embedded_postgres::{TestDatabase, test_database};
use support::{film_draft, user_draft};

#[fixture]
fn database() -> Option<TestDatabase> {
    test_database()
}

fn repositories(db: &TestDatabase) -> (DieselFilmRepository, DieselUserRepository) {
    (
        DieselFilmRepository::new(db.pool()),
        DieselUserRepository::new(db.pool()),
    )
}

#[rstest]
fn allocated_ids_increase_from_one(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let first = films.create(&film_draft("Alien")).await.expect("create");
        let second = films.create(&film_draft("Aliens")).await.expect("create");
        assert_eq!(first.id, FilmId::new(1));
        assert_eq!(second.id, FilmId::new(2));

        let listed: Vec<FilmId> = films
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|film| film.id)
            .collect();
        assert_eq!(listed, vec![first.id, second.id]);
    });
}

#[rstest]
fn stored_film_resolves_catalogue_entries(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let mut draft = film_draft("Alien");
        draft.genres = vec![GenreId::new(4), GenreId::new(2), GenreId::new(4)];
        let created = films.create(&draft).await.expect("create");

        assert_eq!(created.mpa.as_ref().map(|rating| rating.name.as_str()), Some("G"));
        let genres: Vec<(i64, &str)> = created
            .genres
            .iter()
            .map(|genre| (genre.id.get(), genre.name.as_str()))
            .collect();
        assert_eq!(genres, vec![(2, "Drama"), (4, "Thriller")]);
        assert!(created.likes.is_empty());

        let fetched = films.find_by_id(created.id).await.expect("find");
        assert_eq!(fetched, Some(created));
    });
}

#[rstest]
fn film_without_rating_or_genres_round_trips(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let mut draft = film_draft("Untitled");
        draft.mpa = None;
        draft.genres.clear();
        let created = films.create(&draft).await.expect("create");
        assert_eq!(created.mpa, None);
        assert!(created.genres.is_empty());
        assert_eq!(films.find_by_id(created.id).await.expect("find"), Some(created));
    });
}

#[rstest]
#[case::rating(Some(99), 1)]
#[case::genre(Some(1), 99)]
fn unknown_catalogue_entry_rolls_back_the_insert(
    database: Option<TestDatabase>,
    #[case] rating: Option<i64>,
    #[case] genre: i64,
) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let mut draft = film_draft("Orphan");
        draft.mpa = rating.map(RatingId::new);
        draft.genres = vec![GenreId::new(genre)];
        let err = films.create(&draft).await.expect_err("unknown reference");
        assert!(
            matches!(err, FilmRepositoryError::UnknownReference { .. }),
            "unexpected error: {err:?}"
        );
        assert!(films.list().await.expect("list").is_empty());
    });
}

#[rstest]
fn update_replaces_fields_and_keeps_likes(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, users) = repositories(&db);

    db.block_on(async {
        let film = films.create(&film_draft("Alien")).await.expect("create");
        let ripley = users.create(&user_draft("ripley")).await.expect("user");
        films.add_like(film.id, ripley.id).await.expect("like");

        let mut draft = film_draft("Alien: Director's Cut");
        draft.duration = 116;
        draft.genres = vec![GenreId::new(4)];
        let updated = films.update(film.id, &draft).await.expect("update");

        assert_eq!(updated.name, "Alien: Director's Cut");
        assert_eq!(updated.duration, 116);
        let genre_ids: Vec<GenreId> = updated.genres.iter().map(|genre| genre.id).collect();
        assert_eq!(genre_ids, vec![GenreId::new(4)]);
        assert!(updated.likes.contains(&ripley.id));
    });
}

#[rstest]
fn updating_unknown_film_is_not_found(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let err = films
            .update(FilmId::new(42), &film_draft("Ghost"))
            .await
            .expect_err("missing film");
        assert_eq!(err, FilmRepositoryError::not_found(FilmId::new(42)));
    });
}

#[rstest]
fn likes_are_idempotent_and_removable(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, users) = repositories(&db);

    db.block_on(async {
        let film = films.create(&film_draft("Alien")).await.expect("create");
        let ripley = users.create(&user_draft("ripley")).await.expect("user");

        films.add_like(film.id, ripley.id).await.expect("first like");
        films.add_like(film.id, ripley.id).await.expect("repeated like");
        let liked = films.find_by_id(film.id).await.expect("find").expect("film");
        assert_eq!(liked.like_count(), 1);

        films.remove_like(film.id, ripley.id).await.expect("unlike");
        films.remove_like(film.id, ripley.id).await.expect("repeated unlike");
        let unliked = films.find_by_id(film.id).await.expect("find").expect("film");
        assert!(unliked.likes.is_empty());
    });
}

#[rstest]
fn likes_need_a_known_film_and_user(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let film = films.create(&film_draft("Alien")).await.expect("create");

        let err = films
            .add_like(film.id, UserId::new(9))
            .await
            .expect_err("unknown user");
        assert!(
            matches!(err, FilmRepositoryError::UnknownReference { .. }),
            "unexpected error: {err:?}"
        );

        let err = films
            .add_like(FilmId::new(9), UserId::new(1))
            .await
            .expect_err("unknown film");
        assert_eq!(err, FilmRepositoryError::not_found(FilmId::new(9)));
    });
}

#[rstest]
fn explicit_id_moves_the_sequence_past_it(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, _) = repositories(&db);

    db.block_on(async {
        let mut draft = film_draft("Imported");
        draft.id = Some(FilmId::new(10));
        let imported = films.create(&draft).await.expect("explicit id");
        assert_eq!(imported.id, FilmId::new(10));

        let next = films.create(&film_draft("Fresh")).await.expect("allocated id");
        assert_eq!(next.id, FilmId::new(11));

        let err = films.create(&draft).await.expect_err("id reused");
        assert_eq!(err, FilmRepositoryError::duplicate(FilmId::new(10)));
    });
}

#[rstest]
fn deleting_a_film_cascades_likes_and_reviews(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let (films, users) = repositories(&db);
    let reviews = DieselReviewRepository::new(db.pool());

    db.block_on(async {
        let film = films.create(&film_draft("Alien")).await.expect("create");
        let ripley = users.create(&user_draft("ripley")).await.expect("user");
        films.add_like(film.id, ripley.id).await.expect("like");
        let review = reviews
            .create(&ReviewDraft {
                id: None,
                film_id: film.id,
                user_id: ripley.id,
                content: "Tense".to_owned(),
                is_positive: true,
            })
            .await
            .expect("review");

        films.delete(film.id).await.expect("delete");

        assert_eq!(films.find_by_id(film.id).await.expect("find"), None);
        assert_eq!(reviews.find_by_id(review.id).await.expect("find review"), None);
        assert!(users.find_by_id(ripley.id).await.expect("find user").is_some());

        let err = films.delete(film.id).await.expect_err("already gone");
        assert_eq!(err, FilmRepositoryError::not_found(film.id));
    });
}
