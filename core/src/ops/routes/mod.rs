//! Walking routes between plaques

pub mod cache;
pub mod format;
pub mod optimize;
pub mod service;
pub mod walking;

use thiserror::Error;
use uuid::Uuid;

use crate::{domain::PlaqueId, store::StoreError};

pub use format::{format_distance, format_duration};
pub use optimize::optimize_order;
pub use service::{CreateRouteInput, RoutePlan, RouteService, UpdateRouteInput};
pub use walking::{
	DirectionsProvider, Segment, SegmentSource, WalkingDistanceService, WalkingRoute,
};

/// Fewest stops a route can have
pub const MIN_ROUTE_POINTS: usize = 2;

#[derive(Debug, Error)]
pub enum RouteError {
	#[error("route not found: {0}")]
	NotFound(Uuid),
	#[error("route {0} belongs to another user")]
	NotOwner(Uuid),
	#[error("route name is required")]
	EmptyName,
	#[error("a route needs at least {MIN_ROUTE_POINTS} plaques")]
	TooFewPoints,
	#[error("unknown plaque {0}")]
	UnknownPlaque(PlaqueId),
	#[error("plaque {0} has no coordinates and can't be routed to")]
	MissingCoordinates(PlaqueId),
	#[error(transparent)]
	Store(#[from] StoreError),
}
