//! Activity feed events and the recorder services use to append them.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ports::FeedRepository;
use super::repository_errors::map_feed_error;
use super::{Error, EventId, UserId};

/// What kind of entity an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Like,
    Review,
    Friend,
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Add,
    Remove,
    Update,
}

/// Error returned when a stored event label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed label `{0}`")]
pub struct ParseFeedLabelError(String);

macro_rules! feed_label {
    ($ty:ident { $($variant:ident => $label:literal),* $(,)? }) => {
        impl $ty {
            /// Stable upper-case label used on the wire and in storage.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }
        }

        impl FromStr for $ty {
            type Err = ParseFeedLabelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok(Self::$variant),)*
                    other => Err(ParseFeedLabelError(other.to_owned())),
                }
            }
        }
    };
}

feed_label!(EventType {
    Like => "LIKE",
    Review => "REVIEW",
    Friend => "FRIEND",
});

feed_label!(Operation {
    Add => "ADD",
    Remove => "REMOVE",
    Update => "UPDATE",
});

/// An event awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedEvent {
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub event_type: EventType,
    pub operation: Operation,
    pub entity_id: i64,
}

/// A recorded event. The timestamp travels as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEvent {
    pub event_id: EventId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub event_type: EventType,
    pub operation: Operation,
    pub entity_id: i64,
}

impl FeedEvent {
    /// Attach an identifier to a pending event.
    #[must_use]
    pub fn from_new(event_id: EventId, event: NewFeedEvent) -> Self {
        let NewFeedEvent {
            timestamp,
            user_id,
            event_type,
            operation,
            entity_id,
        } = event;
        Self {
            event_id,
            timestamp,
            user_id,
            event_type,
            operation,
            entity_id,
        }
    }
}

/// Order events by timestamp, then identifier.
pub fn sort_chronologically(events: &mut [FeedEvent]) {
    events.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.event_id.cmp(&b.event_id))
    });
}

/// Stamps events with the current time and appends them to the feed.
pub struct FeedRecorder<E> {
    feed: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<E> Clone for FeedRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<E: FeedRepository> FeedRecorder<E> {
    /// Create a recorder writing to `feed` with timestamps from `clock`.
    pub fn new(feed: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self { feed, clock }
    }

    /// Append an event for `user_id`.
    pub async fn record(
        &self,
        user_id: UserId,
        event_type: EventType,
        operation: Operation,
        entity_id: i64,
    ) -> Result<FeedEvent, Error> {
        let event = NewFeedEvent {
            timestamp: self.clock.utc(),
            user_id,
            event_type,
            operation,
            entity_id,
        };
        let stored = self.feed.append(&event).await.map_err(map_feed_error)?;
        debug!(
            user_id = %user_id,
            event_type = event_type.as_str(),
            operation = operation.as_str(),
            entity_id,
            "feed event recorded"
        );
        Ok(stored)
    }

    /// A user's events, oldest first.
    pub async fn events_for(&self, user_id: UserId) -> Result<Vec<FeedEvent>, Error> {
        let mut events = self
            .feed
            .list_for_user(user_id)
            .await
            .map_err(map_feed_error)?;
        sort_chronologically(&mut events);
        Ok(events)
    }
}
