//! User entities.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Input payload for registering or replacing a user.
///
/// `name` falls back to `login` during validation when absent or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub id: Option<UserId>,
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl UserDraft {
    /// The display name to store, defaulting to the login.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.login.as_str(),
        }
    }
}

/// A registered user with their outgoing friendships merged in.
///
/// Friendship is directed: `friends` lists the users this user has added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub friends: BTreeSet<UserId>,
}
