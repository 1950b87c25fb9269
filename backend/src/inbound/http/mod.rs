//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers depend only on the driving ports in [`state::HttpState`].
//! [`configure`] registers every API route together with the extractor error
//! handlers, so servers and tests mount an identical surface.

pub mod catalogue;
pub mod error;
pub mod films;
pub mod health;
pub mod reviews;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the REST API on `cfg`.
///
/// Fixed segments such as `/films/popular` are registered before
/// `/films/{id}` so they are not captured by the identifier route.
///
/// # Examples
/// ```
/// use actix_web::App;
///
/// let _app = App::new().configure(backend::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(validation::path_error_handler))
        .service(films::list_films)
        .service(films::create_film)
        .service(films::update_film)
        .service(films::popular_films)
        .service(films::common_films)
        .service(films::search_films)
        .service(films::get_film)
        .service(films::delete_film)
        .service(films::add_like)
        .service(films::remove_like)
        .service(films::recommendations)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::get_user)
        .service(users::delete_user)
        .service(users::list_friends)
        .service(users::common_friends)
        .service(users::add_friend)
        .service(users::remove_friend)
        .service(users::feed)
        .service(reviews::list_reviews)
        .service(reviews::create_review)
        .service(reviews::update_review)
        .service(reviews::get_review)
        .service(reviews::delete_review)
        .service(reviews::add_useful_vote)
        .service(reviews::remove_useful_vote)
        .service(reviews::add_not_useful_vote)
        .service(reviews::remove_not_useful_vote)
        .service(catalogue::list_genres)
        .service(catalogue::get_genre)
        .service(catalogue::list_ratings)
        .service(catalogue::get_rating);
}
