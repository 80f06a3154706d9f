//! Core domain models
//!
//! Plaques are a read-only reference dataset. Everything a user creates
//! (collections, visits, favorites, routes) is stored separately and refers
//! to plaques by id.

pub mod collection;
pub mod favorite;
pub mod geo;
pub mod plaque;
pub mod route;
pub mod visit;

// Re-export commonly used types
pub use collection::{Collection, CollectionValidationError};
pub use favorite::Favorite;
pub use geo::{haversine_km, Coordinates};
pub use plaque::{DatasetError, Plaque, PlaqueId, PlaqueIndex};
pub use route::{Route, RoutePoint};
pub use visit::Visit;

/// User id used when nobody is signed in
pub const LOCAL_USER_ID: &str = "local";
