//! Builders wiring repositories into domain services and HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    CatalogueRepository, FeedRepository, FilmRepository, ReviewRepository, UserRepository,
};
use backend::domain::{CatalogueService, FeedRecorder, FilmService, ReviewService, UserService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselFeedRepository, DieselFilmRepository,
    DieselReviewRepository, DieselUserRepository,
};

use super::ServerConfig;

/// One implementation per repository port.
struct Repositories<F, U, R, E, C> {
    films: Arc<F>,
    users: Arc<U>,
    reviews: Arc<R>,
    feed: Arc<E>,
    catalogue: Arc<C>,
}

impl Repositories<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            films: Arc::clone(&store),
            users: Arc::clone(&store),
            reviews: Arc::clone(&store),
            feed: Arc::clone(&store),
            catalogue: store,
        }
    }
}

impl
    Repositories<
        DieselFilmRepository,
        DieselUserRepository,
        DieselReviewRepository,
        DieselFeedRepository,
        DieselCatalogueRepository,
    >
{
    fn postgres(pool: &DbPool) -> Self {
        Self {
            films: Arc::new(DieselFilmRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
            feed: Arc::new(DieselFeedRepository::new(pool.clone())),
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
        }
    }
}

fn wire<F, U, R, E, C>(repos: Repositories<F, U, R, E, C>, clock: Arc<dyn Clock>) -> HttpState
where
    F: FilmRepository + 'static,
    U: UserRepository + 'static,
    R: ReviewRepository + 'static,
    E: FeedRepository + 'static,
    C: CatalogueRepository + 'static,
{
    let Repositories {
        films,
        users,
        reviews,
        feed,
        catalogue,
    } = repos;
    let recorder = FeedRecorder::new(feed, Arc::clone(&clock));

    let film_service = Arc::new(FilmService::new(
        Arc::clone(&films),
        Arc::clone(&users),
        Arc::clone(&catalogue),
        recorder.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&users),
        recorder.clone(),
        clock,
    ));
    let review_service = Arc::new(ReviewService::new(reviews, films, users, recorder));

    HttpState::new(HttpStatePorts {
        films: film_service.clone(),
        films_query: film_service,
        users: user_service.clone(),
        users_query: user_service,
        reviews: review_service.clone(),
        reviews_query: review_service,
        catalogue: Arc::new(CatalogueService::new(catalogue)),
    })
}

/// Build HTTP state over PostgreSQL when a pool is configured, otherwise over
/// a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => wire(Repositories::postgres(pool), clock),
        None => wire(Repositories::memory(), clock),
    }
}
