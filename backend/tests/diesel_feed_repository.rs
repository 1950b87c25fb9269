//! Integration tests for `DieselFeedRepository` against embedded PostgreSQL.

mod support;

use backend::domain::ports::{FeedRepository, UserRepository};
use backend::domain::{EventType, FeedEvent, NewFeedEvent, Operation, UserId};
use backend::outbound::persistence::{DieselFeedRepository, DieselUserRepository};
use chrono::TimeDelta;
use rstest::{fixture, rstest};

use support::embedded_postgres::{TestDatabase, test_database};
use support::{start_instant, user_draft};

#[fixture]
fn database() -> Option<TestDatabase> {
    test_database()
}

fn event(user: i64, offset: TimeDelta, event_type: EventType, entity_id: i64) -> NewFeedEvent {
    NewFeedEvent {
        timestamp: start_instant() + offset,
        user_id: UserId::new(user),
        event_type,
        operation: Operation::Add,
        entity_id,
    }
}

fn entities(events: &[FeedEvent]) -> Vec<i64> {
    events.iter().map(|event| event.entity_id).collect()
}

#[rstest]
fn appended_events_round_trip_with_increasing_ids(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let feed = DieselFeedRepository::new(db.pool());

    db.block_on(async {
        let first = feed
            .append(&event(1, TimeDelta::zero(), EventType::Like, 10))
            .await
            .expect("append");
        let mut removal = event(1, TimeDelta::seconds(1), EventType::Review, 3);
        removal.operation = Operation::Remove;
        let second = feed.append(&removal).await.expect("append");

        assert!(first.event_id < second.event_id);
        assert_eq!(second.operation, Operation::Remove);
        assert_eq!(second.timestamp, start_instant() + TimeDelta::seconds(1));
        assert_eq!(
            feed.list_for_user(UserId::new(1)).await.expect("list"),
            vec![first, second]
        );
    });
}

#[rstest]
fn events_list_oldest_first_per_user(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let feed = DieselFeedRepository::new(db.pool());

    db.block_on(async {
        for (offset, entity) in [(120, 3), (0, 1), (60, 2)] {
            feed.append(&event(1, TimeDelta::seconds(offset), EventType::Like, entity))
                .await
                .expect("append");
        }
        feed.append(&event(2, TimeDelta::seconds(30), EventType::Friend, 1))
            .await
            .expect("append");

        let ann = feed.list_for_user(UserId::new(1)).await.expect("list");
        assert_eq!(entities(&ann), vec![1, 2, 3]);
        let bob = feed.list_for_user(UserId::new(2)).await.expect("list");
        assert_eq!(entities(&bob), vec![1]);
        assert!(feed.list_for_user(UserId::new(3)).await.expect("list").is_empty());
    });
}

#[rstest]
fn simultaneous_events_keep_append_order(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let feed = DieselFeedRepository::new(db.pool());

    db.block_on(async {
        for entity in [5, 4, 6] {
            feed.append(&event(1, TimeDelta::zero(), EventType::Like, entity))
                .await
                .expect("append");
        }
        let listed = feed.list_for_user(UserId::new(1)).await.expect("list");
        assert_eq!(entities(&listed), vec![5, 4, 6]);
    });
}

#[rstest]
fn events_outlive_the_user_they_mention(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let feed = DieselFeedRepository::new(db.pool());
    let users = DieselUserRepository::new(db.pool());

    db.block_on(async {
        let ann = users.create(&user_draft("ann")).await.expect("user");
        feed.append(&event(ann.id.get(), TimeDelta::zero(), EventType::Friend, 2))
            .await
            .expect("append");

        users.delete(ann.id).await.expect("delete");
        let listed = feed.list_for_user(ann.id).await.expect("list");
        assert_eq!(entities(&listed), vec![2]);
    });
}
