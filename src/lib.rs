// Library exports for Quire
// Integration tests build the router and seed users through these modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod id;
pub mod posts;
pub mod routes;
pub mod state;
