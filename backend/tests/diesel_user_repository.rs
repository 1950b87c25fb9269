//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Email uniqueness and friendship cascades are enforced by the schema, so
//! these only hold up against a real database.

mod support;

use backend::domain::ports::{
    FilmRepository, ReviewRepository, UserRepository, UserRepositoryError,
};
use backend::domain::{ReviewDraft, ReviewVote, UserId};
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

#[rstest]
fn created_user_round_trips_with_login_as_fallback_name(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let ann = users.create(&user_draft("ann")).await.expect("create");
        assert_eq!(ann.id, UserId::new(1));
        assert_eq!(ann.name, "ann");
        assert!(ann.friends.is_empty());

        let fetched = users.find_by_id(ann.id).await.expect("find");
        assert_eq!(fetched, Some(ann));
        assert_eq!(users.find_by_id(UserId::new(2)).await.expect("find"), None);
    });
}

#[rstest]
fn duplicate_email_is_reported_as_taken(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        users.create(&user_draft("ann")).await.expect("create");

        let mut clash = user_draft("ann2");
        clash.email = "ann@example.com".to_owned();
        let err = users.create(&clash).await.expect_err("taken on create");
        assert_eq!(err, UserRepositoryError::email_taken("ann@example.com"));

        let bob = users.create(&user_draft("bob")).await.expect("create");
        let mut moved = user_draft("bob");
        moved.email = "ann@example.com".to_owned();
        let err = users.update(bob.id, &moved).await.expect_err("taken on update");
        assert_eq!(err, UserRepositoryError::email_taken("ann@example.com"));

        let emails: Vec<String> = users
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|user| user.email)
            .collect();
        assert_eq!(emails, vec!["ann@example.com", "bob@example.com"]);
    });
}

#[rstest]
fn update_changes_profile_and_keeps_friends(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let ann = users.create(&user_draft("ann")).await.expect("create");
        let bob = users.create(&user_draft("bob")).await.expect("create");
        users.add_friend(ann.id, bob.id).await.expect("befriend");

        let mut draft = user_draft("ann");
        draft.email = "ann@new.example".to_owned();
        draft.name = Some("Ann".to_owned());
        let updated = users.update(ann.id, &draft).await.expect("update");

        assert_eq!(updated.email, "ann@new.example");
        assert_eq!(updated.name, "Ann");
        assert!(updated.friends.contains(&bob.id));
    });
}

#[rstest]
fn updating_unknown_user_is_not_found(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let err = users
            .update(UserId::new(5), &user_draft("ghost"))
            .await
            .expect_err("missing user");
        assert_eq!(err, UserRepositoryError::not_found(UserId::new(5)));
    });
}

#[rstest]
fn friendship_is_directed_and_idempotent(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let ann = users.create(&user_draft("ann")).await.expect("create");
        let bob = users.create(&user_draft("bob")).await.expect("create");

        users.add_friend(ann.id, bob.id).await.expect("befriend");
        users.add_friend(ann.id, bob.id).await.expect("befriend again");

        let friends: Vec<UserId> = users
            .friends_of(ann.id)
            .await
            .expect("friends")
            .into_iter()
            .map(|user| user.id)
            .collect();
        assert_eq!(friends, vec![bob.id]);
        assert!(users.friends_of(bob.id).await.expect("friends").is_empty());

        users.remove_friend(ann.id, bob.id).await.expect("unfriend");
        users.remove_friend(ann.id, bob.id).await.expect("unfriend again");
        assert!(users.friends_of(ann.id).await.expect("friends").is_empty());
    });
}

#[rstest]
fn befriending_unknown_user_names_them(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let ann = users.create(&user_draft("ann")).await.expect("create");

        let err = users
            .add_friend(ann.id, UserId::new(99))
            .await
            .expect_err("unknown friend");
        assert_eq!(err, UserRepositoryError::not_found(UserId::new(99)));

        let err = users
            .add_friend(UserId::new(98), ann.id)
            .await
            .expect_err("unknown user");
        assert_eq!(err, UserRepositoryError::not_found(UserId::new(98)));
    });
}

#[rstest]
fn explicit_id_moves_the_sequence_past_it(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let mut imported = user_draft("imported");
        imported.id = Some(UserId::new(5));
        assert_eq!(users.create(&imported).await.expect("explicit").id, UserId::new(5));

        let next = users.create(&user_draft("fresh")).await.expect("allocated");
        assert_eq!(next.id, UserId::new(6));

        let mut reused = user_draft("reused");
        reused.id = Some(UserId::new(5));
        let err = users.create(&reused).await.expect_err("id reused");
        assert_eq!(err, UserRepositoryError::duplicate(UserId::new(5)));
    });
}

#[rstest]
fn deleting_a_user_cascades_friendships_likes_and_votes(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let users = DieselUserRepository::new(db.pool());
    let films = DieselFilmRepository::new(db.pool());
    let reviews = DieselReviewRepository::new(db.pool());

    db.block_on(async {
        let ann = users.create(&user_draft("ann")).await.expect("create");
        let bob = users.create(&user_draft("bob")).await.expect("create");
        let film = films.create(&film_draft("Alien")).await.expect("film");
        users.add_friend(ann.id, bob.id).await.expect("befriend");
        users.add_friend(bob.id, ann.id).await.expect("befriend back");
        films.add_like(film.id, bob.id).await.expect("like");
        let review = reviews
            .create(&ReviewDraft {
                id: None,
                film_id: film.id,
                user_id: ann.id,
                content: "Tense".to_owned(),
                is_positive: true,
            })
            .await
            .expect("review");
        reviews
            .cast_vote(review.id, bob.id, ReviewVote::Useful)
            .await
            .expect("vote");

        users.delete(bob.id).await.expect("delete");

        assert_eq!(users.find_by_id(bob.id).await.expect("find"), None);
        let ann_now = users.find_by_id(ann.id).await.expect("find").expect("ann");
        assert!(ann_now.friends.is_empty());
        let film_now = films.find_by_id(film.id).await.expect("find").expect("film");
        assert!(film_now.likes.is_empty());
        let review_now = reviews.find_by_id(review.id).await.expect("find").expect("review");
        assert_eq!(review_now.useful, 0);

        let err = users.delete(bob.id).await.expect_err("already gone");
        assert_eq!(err, UserRepositoryError::not_found(bob.id));
    });
}
