//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueQuery, FilmCommand, FilmQuery, ReviewCommand, ReviewQuery, UserCommand, UserQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub films: Arc<dyn FilmCommand>,
    pub films_query: Arc<dyn FilmQuery>,
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub films: Arc<dyn FilmCommand>,
    pub films_query: Arc<dyn FilmQuery>,
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
}

impl HttpState {
    /// Construct state from the bundled ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{
    ///     CatalogueService, FeedRecorder, FilmService, ReviewService, UserService,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::MemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let feed = FeedRecorder::new(store.clone(), Arc::new(DefaultClock));
    /// let films = Arc::new(FilmService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     feed.clone(),
    /// ));
    /// let users = Arc::new(UserService::new(store.clone(), feed.clone(), Arc::new(DefaultClock)));
    /// let reviews = Arc::new(ReviewService::new(store.clone(), store.clone(), store.clone(), feed));
    /// let state = HttpState::new(HttpStatePorts {
    ///     films: films.clone(),
    ///     films_query: films,
    ///     users: users.clone(),
    ///     users_query: users,
    ///     reviews: reviews.clone(),
    ///     reviews_query: reviews,
    ///     catalogue: Arc::new(CatalogueService::new(store)),
    /// });
    /// # let _ = state;
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            films,
            films_query,
            users,
            users_query,
            reviews,
            reviews_query,
            catalogue,
        } = ports;
        Self {
            films,
            films_query,
            users,
            users_query,
            reviews,
            reviews_query,
            catalogue,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
