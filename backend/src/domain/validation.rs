//! Fail-fast domain rules for films, users and reviews.
//!
//! Rules run in a fixed order and stop at the first violation. The HTTP
//! adapter performs its own batch validation of request shapes before these
//! run; these rules are the authority for what the store accepts.

use chrono::NaiveDate;
use serde_json::json;

use super::{Error, FilmDraft, MAX_DESCRIPTION_CHARS, UserDraft, earliest_release_date};

/// Film rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilmValidationError {
    #[error("film name must not be empty")]
    EmptyName,
    #[error("film description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("release date must not be before {earliest}")]
    ReleaseDateTooEarly { earliest: NaiveDate },
    #[error("film duration must be positive")]
    NonPositiveDuration,
}

impl FilmValidationError {
    /// The offending request field, in camelCase.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::DescriptionTooLong { .. } => "description",
            Self::ReleaseDateTooEarly { .. } => "releaseDate",
            Self::NonPositiveDuration => "duration",
        }
    }
}

/// User rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain @")]
    EmailMissingAt,
    #[error("login must not be empty")]
    EmptyLogin,
    #[error("login must not contain whitespace")]
    LoginContainsWhitespace,
    #[error("birthday must not be in the future")]
    BirthdayInFuture,
    #[error("a user cannot befriend themselves")]
    SelfFriendship,
}

impl UserValidationError {
    /// The offending request field, in camelCase.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmailMissingAt => "email",
            Self::EmptyLogin | Self::LoginContainsWhitespace => "login",
            Self::BirthdayInFuture => "birthday",
            Self::SelfFriendship => "friendId",
        }
    }
}

/// Review rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("review content must not be blank")]
    BlankContent,
}

impl ReviewValidationError {
    /// The offending request field, in camelCase.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::BlankContent => "content",
        }
    }
}

fn field_error(field: &'static str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

impl From<FilmValidationError> for Error {
    fn from(value: FilmValidationError) -> Self {
        field_error(value.field(), value.to_string())
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        field_error(value.field(), value.to_string())
    }
}

impl From<ReviewValidationError> for Error {
    fn from(value: ReviewValidationError) -> Self {
        field_error(value.field(), value.to_string())
    }
}

/// Check a film draft: name, description length, release date, duration.
pub fn validate_film(draft: &FilmDraft) -> Result<(), FilmValidationError> {
    if draft.name.trim().is_empty() {
        return Err(FilmValidationError::EmptyName);
    }
    if draft.description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(FilmValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_CHARS,
        });
    }
    let earliest = earliest_release_date();
    if draft.release_date < earliest {
        return Err(FilmValidationError::ReleaseDateTooEarly { earliest });
    }
    if draft.duration <= 0 {
        return Err(FilmValidationError::NonPositiveDuration);
    }
    Ok(())
}

/// Check a user draft against `today` and fill in the display name.
///
/// A birthday equal to `today` is accepted; one day later is not.
pub fn validate_user(mut draft: UserDraft, today: NaiveDate) -> Result<UserDraft, UserValidationError> {
    if draft.email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    if !draft.email.contains('@') {
        return Err(UserValidationError::EmailMissingAt);
    }
    if draft.login.is_empty() {
        return Err(UserValidationError::EmptyLogin);
    }
    if draft.login.chars().any(char::is_whitespace) {
        return Err(UserValidationError::LoginContainsWhitespace);
    }
    draft.name = Some(draft.effective_name().to_owned());
    if draft.birthday.is_some_and(|birthday| birthday > today) {
        return Err(UserValidationError::BirthdayInFuture);
    }
    Ok(draft)
}

/// Check review content.
pub fn validate_review_content(content: &str) -> Result<(), ReviewValidationError> {
    if content.trim().is_empty() {
        return Err(ReviewValidationError::BlankContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn film() -> FilmDraft {
        FilmDraft {
            id: None,
            name: "Nosferatu".into(),
            description: "A vampire arrives in Wisborg".into(),
            release_date: date(1922, 3, 4),
            duration: 94,
            mpa: None,
            genres: Vec::new(),
        }
    }

    #[fixture]
    fn user() -> UserDraft {
        UserDraft {
            id: None,
            email: "grace@example.com".into(),
            login: "grace".into(),
            name: None,
            birthday: Some(date(1906, 12, 9)),
        }
    }

    #[fixture]
    fn today() -> NaiveDate {
        date(2024, 6, 1)
    }

    #[rstest]
    fn accepts_valid_film(film: FilmDraft) {
        assert_eq!(validate_film(&film), Ok(()));
    }

    #[rstest]
    fn accepts_first_screening_date(mut film: FilmDraft) {
        film.release_date = date(1895, 12, 28);
        assert_eq!(validate_film(&film), Ok(()));
    }

    #[rstest]
    #[case::blank_name(|f: &mut FilmDraft| f.name = "  ".into(), "name")]
    #[case::long_description(|f: &mut FilmDraft| f.description = "x".repeat(201), "description")]
    #[case::too_early(|f: &mut FilmDraft| f.release_date = date(1800, 1, 1), "releaseDate")]
    #[case::zero_duration(|f: &mut FilmDraft| f.duration = 0, "duration")]
    #[case::negative_duration(|f: &mut FilmDraft| f.duration = -5, "duration")]
    fn rejects_invalid_film(
        mut film: FilmDraft,
        #[case] mutate: fn(&mut FilmDraft),
        #[case] field: &str,
    ) {
        mutate(&mut film);
        let err = validate_film(&film).expect_err("film should be rejected");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn film_rules_stop_at_first_violation(mut film: FilmDraft) {
        film.name = String::new();
        film.duration = 0;
        assert_eq!(validate_film(&film), Err(FilmValidationError::EmptyName));
    }

    #[rstest]
    fn description_limit_counts_characters(mut film: FilmDraft) {
        film.description = "é".repeat(MAX_DESCRIPTION_CHARS);
        assert_eq!(validate_film(&film), Ok(()));
    }

    #[rstest]
    fn fills_blank_name_with_login(mut user: UserDraft, today: NaiveDate) {
        user.name = Some(" ".into());
        let valid = validate_user(user, today).expect("valid user");
        assert_eq!(valid.name.as_deref(), Some("grace"));
    }

    #[rstest]
    #[case::empty_email(|u: &mut UserDraft| u.email = String::new(), UserValidationError::EmptyEmail)]
    #[case::no_at(|u: &mut UserDraft| u.email = "grace.example.com".into(), UserValidationError::EmailMissingAt)]
    #[case::empty_login(|u: &mut UserDraft| u.login = String::new(), UserValidationError::EmptyLogin)]
    #[case::spaced_login(|u: &mut UserDraft| u.login = "grace h".into(), UserValidationError::LoginContainsWhitespace)]
    #[case::tomorrow(|u: &mut UserDraft| u.birthday = Some(date(2024, 6, 2)), UserValidationError::BirthdayInFuture)]
    fn rejects_invalid_user(
        mut user: UserDraft,
        today: NaiveDate,
        #[case] mutate: fn(&mut UserDraft),
        #[case] expected: UserValidationError,
    ) {
        mutate(&mut user);
        assert_eq!(validate_user(user, today), Err(expected));
    }

    #[rstest]
    fn accepts_birthday_today(mut user: UserDraft, today: NaiveDate) {
        user.birthday = Some(today);
        assert!(validate_user(user, today).is_ok());
    }

    #[rstest]
    #[case("", false)]
    #[case(" \t", false)]
    #[case("Gripping", true)]
    fn review_content_must_not_be_blank(#[case] content: &str, #[case] ok: bool) {
        assert_eq!(validate_review_content(content).is_ok(), ok);
    }

    #[rstest]
    fn converts_into_invalid_request_with_field() {
        let err: Error = FilmValidationError::NonPositiveDuration.into();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details(), Some(&json!({ "field": "duration" })));
    }

    #[rstest]
    #[case(FilmValidationError::DescriptionTooLong { max: 200 }.into(), "film description must be at most 200 characters")]
    #[case(FilmValidationError::ReleaseDateTooEarly { earliest: earliest_release_date() }.into(), "release date must not be before 1895-12-28")]
    #[case(UserValidationError::EmailMissingAt.into(), "email must contain @")]
    #[case(UserValidationError::SelfFriendship.into(), "a user cannot befriend themselves")]
    #[case(ReviewValidationError::BlankContent.into(), "review content must not be blank")]
    fn violations_render_readable_messages(#[case] err: Error, #[case] message: &str) {
        assert_eq!(err.message(), message);
    }
}
