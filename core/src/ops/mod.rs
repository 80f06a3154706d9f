//! Operations over the plaque dataset and user data

pub mod collections;
pub mod export;
pub mod favorites;
pub mod routes;
pub mod search;
pub mod stats;
pub mod visits;
