// Module layout (Clean Architecture style)
// - bootstrap: configuration and service wiring
// - infrastructure: Postgres and in-memory store adapters
// - presentation: HTTP handlers and routing
// - application: access policy, error taxonomy, ports and use cases
// - domain: documents and roles

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
