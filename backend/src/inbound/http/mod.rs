//! HTTP inbound adapter exposing the REST endpoints.

pub mod accounts;
pub mod allergies;
pub mod auth;
pub mod cors;
pub mod dishes;
pub mod dto;
pub mod error;
pub mod health;
pub mod ingredients;
pub mod pending;
pub mod restaurants;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod users;
pub mod validation;

pub use error::ApiResult;
