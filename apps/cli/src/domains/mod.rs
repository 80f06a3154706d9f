pub mod auth;
pub mod collection;
pub mod config;
pub mod export;
pub mod favorite;
pub mod plaque;
pub mod route;
pub mod search;
pub mod stats;
pub mod visit;
