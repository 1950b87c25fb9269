//! Cinegraph backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, rules and ports;
//! [`inbound`] adapts HTTP requests onto the driving ports; [`outbound`]
//! implements the repository ports in memory and on PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
