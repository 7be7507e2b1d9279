pub mod app;
pub mod articles;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod relations;
pub mod state;
pub mod store;
pub mod users;
mod validation;
