//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::{App, test, web};

use crate::Trace;
use crate::domain::ports::{
    MockCatalogueQuery, MockFilmCommand, MockFilmQuery, MockReviewCommand, MockReviewQuery,
    MockUserCommand, MockUserQuery,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mock driving ports; unconfigured mocks panic when called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub films: MockFilmCommand,
    pub films_query: MockFilmQuery,
    pub users: MockUserCommand,
    pub users_query: MockUserQuery,
    pub reviews: MockReviewCommand,
    pub reviews_query: MockReviewQuery,
    pub catalogue: MockCatalogueQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            films: Arc::new(self.films),
            films_query: Arc::new(self.films_query),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            reviews: Arc::new(self.reviews),
            reviews_query: Arc::new(self.reviews_query),
            catalogue: Arc::new(self.catalogue),
        })
    }
}

/// Serve one request against the full route table backed by `ports`.
pub(crate) async fn send(ports: MockPorts, request: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(ports.into_state()))
            .configure(configure),
    )
    .await;
    test::call_service(&app, request.to_request()).await
}
