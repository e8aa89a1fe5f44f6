pub mod config;
pub mod graphql;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod validation;
