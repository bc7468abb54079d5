//! Infrastructure services

mod query_service;

pub use query_service::{QueryAnswer, QueryService, QueryServiceBuilder, QueryServiceTrait};
