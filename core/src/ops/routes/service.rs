//! Saved routes

use std::sync::Arc;

use chrono::Utc;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{
	optimize::optimize_order,
	walking::{WalkingDistanceService, WalkingRoute},
	RouteError, MIN_ROUTE_POINTS,
};
use crate::{
	domain::{PlaqueId, PlaqueIndex, Route, RoutePoint},
	store::{self, DocumentStore, ROUTES},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRouteInput {
	pub name: String,
	pub description: Option<String>,
	pub plaque_ids: Vec<PlaqueId>,
	/// Reorder stops for a shorter walk, keeping the first one
	#[serde(default)]
	pub optimize: bool,
}

/// Fields left as `None` are unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRouteInput {
	pub name: Option<String>,
	pub description: Option<String>,
	pub plaque_ids: Option<Vec<PlaqueId>>,
	#[serde(default)]
	pub optimize: bool,
}

/// Stops in walking order plus the walk between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
	pub points: Vec<RoutePoint>,
	pub walking: WalkingRoute,
}

pub struct RouteService {
	store: Arc<dyn DocumentStore>,
	index: Arc<PlaqueIndex>,
	walking: Arc<WalkingDistanceService>,
}

impl RouteService {
	pub fn new(
		store: Arc<dyn DocumentStore>,
		index: Arc<PlaqueIndex>,
		walking: Arc<WalkingDistanceService>,
	) -> Self {
		Self {
			store,
			index,
			walking,
		}
	}

	/// Resolves stops and measures the walk without saving anything
	pub async fn plan(&self, plaque_ids: &[PlaqueId], optimize: bool) -> Result<RoutePlan, RouteError> {
		let mut points = self.resolve_points(plaque_ids)?;

		if optimize {
			let coordinates: Vec<_> = points.iter().map(RoutePoint::coordinates).collect();
			let order = optimize_order(&coordinates);
			points = order.into_iter().map(|i| points[i]).collect();
		}

		for (order, point) in points.iter_mut().enumerate() {
			point.order = order as u32;
		}

		let coordinates: Vec<_> = points.iter().map(RoutePoint::coordinates).collect();
		let walking = self.walking.route(&coordinates).await;

		Ok(RoutePlan { points, walking })
	}

	fn resolve_points(&self, plaque_ids: &[PlaqueId]) -> Result<Vec<RoutePoint>, RouteError> {
		let points = plaque_ids
			.iter()
			.unique()
			.map(|&id| {
				let plaque = self.index.get(id).ok_or(RouteError::UnknownPlaque(id))?;
				let coords = plaque
					.coordinates()
					.ok_or(RouteError::MissingCoordinates(id))?;
				Ok(RoutePoint {
					plaque_id: id,
					lat: coords.lat,
					lng: coords.lng,
					order: 0,
				})
			})
			.collect::<Result<Vec<_>, RouteError>>()?;

		if points.len() < MIN_ROUTE_POINTS {
			return Err(RouteError::TooFewPoints);
		}

		Ok(points)
	}

	pub async fn create(&self, user_id: &str, input: CreateRouteInput) -> Result<Route, RouteError> {
		let name = validated_name(&input.name)?;
		let plan = self.plan(&input.plaque_ids, input.optimize).await?;

		let now = Utc::now();
		let route = Route {
			id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			name,
			description: pq_utils::non_blank(input.description.as_deref()).map(str::to_string),
			points: plan.points,
			total_distance: plan.walking.total_distance_km,
			total_duration: plan.walking.total_duration_min,
			is_public: false,
			created_at: now,
			updated_at: now,
		};

		store::put_doc(&*self.store, ROUTES, &route.id.to_string(), &route).await?;
		info!(route_id = %route.id, stops = route.points.len(), "Created route");
		Ok(route)
	}

	pub async fn get(&self, user_id: &str, id: Uuid) -> Result<Route, RouteError> {
		let route: Route = store::get_doc(&*self.store, ROUTES, &id.to_string())
			.await?
			.ok_or(RouteError::NotFound(id))?;

		if route.user_id != user_id {
			return Err(RouteError::NotOwner(id));
		}
		Ok(route)
	}

	/// Newest first
	pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Route>, RouteError> {
		let mut routes: Vec<Route> = store::list_docs(&*self.store, ROUTES)
			.await?
			.into_iter()
			.filter(|r: &Route| r.user_id == user_id)
			.collect();

		routes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
		Ok(routes)
	}

	pub async fn update(
		&self,
		user_id: &str,
		id: Uuid,
		input: UpdateRouteInput,
	) -> Result<Route, RouteError> {
		let mut route = self.get(user_id, id).await?;

		if let Some(name) = input.name {
			route.name = validated_name(&name)?;
		}
		if let Some(description) = input.description {
			route.description = pq_utils::non_blank(Some(&description)).map(str::to_string);
		}

		let plaque_ids = input
			.plaque_ids
			.or_else(|| input.optimize.then(|| route.plaque_ids()));
		if let Some(plaque_ids) = plaque_ids {
			let plan = self.plan(&plaque_ids, input.optimize).await?;
			route.points = plan.points;
			route.total_distance = plan.walking.total_distance_km;
			route.total_duration = plan.walking.total_duration_min;
		}

		route.is_public = false;
		route.updated_at = Utc::now();

		store::put_doc(&*self.store, ROUTES, &id.to_string(), &route).await?;
		Ok(route)
	}

	pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), RouteError> {
		self.get(user_id, id).await?;
		self.store.delete(ROUTES, &id.to_string()).await?;
		info!(route_id = %id, "Deleted route");
		Ok(())
	}
}

fn validated_name(name: &str) -> Result<String, RouteError> {
	pq_utils::non_blank(Some(name))
		.map(|n| n.trim().to_string())
		.ok_or(RouteError::EmptyName)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{config::RoutingConfig, domain::Plaque, store::MemoryStore};

	fn service() -> RouteService {
		let index = PlaqueIndex::new(vec![
			Plaque::new(1, "Big Ben").with_coordinates(51.5007, -0.1246),
			Plaque::new(2, "British Museum").with_coordinates(51.5194, -0.1270),
			Plaque::new(3, "Trafalgar Square").with_coordinates(51.5080, -0.1281),
			Plaque::new(4, "Somewhere unknown"),
		]);

		RouteService::new(
			Arc::new(MemoryStore::default()),
			Arc::new(index),
			Arc::new(WalkingDistanceService::from_config(&RoutingConfig::default())),
		)
	}

	#[tokio::test]
	async fn create_measures_and_keeps_route_private() {
		let service = service();
		let route = service
			.create(
				"u1",
				CreateRouteInput {
					name: " Westminster ".to_string(),
					plaque_ids: vec![1, 2, 3],
					optimize: true,
					..Default::default()
				},
			)
			.await
			.expect("route created");

		assert_eq!(route.name, "Westminster");
		assert_eq!(route.plaque_ids(), vec![1, 3, 2]);
		assert_eq!(
			route.points.iter().map(|p| p.order).collect::<Vec<_>>(),
			vec![0, 1, 2]
		);
		assert!(route.total_distance > 0.0);
		assert!(!route.is_public);

		let stored = service.get("u1", route.id).await.expect("stored");
		assert_eq!(stored.plaque_ids(), route.plaque_ids());
		assert!(matches!(
			service.get("u2", route.id).await,
			Err(RouteError::NotOwner(_))
		));
	}

	#[tokio::test]
	async fn rejects_unroutable_plaques() {
		let service = service();
		assert!(matches!(
			service.plan(&[1, 4], false).await,
			Err(RouteError::MissingCoordinates(4))
		));
		assert!(matches!(
			service.plan(&[1, 99], false).await,
			Err(RouteError::UnknownPlaque(99))
		));
		assert!(matches!(
			service.plan(&[1, 1], false).await,
			Err(RouteError::TooFewPoints)
		));
	}

	#[tokio::test]
	async fn update_replans_when_stops_change() {
		let service = service();
		let route = service
			.create(
				"u1",
				CreateRouteInput {
					name: "Short".to_string(),
					plaque_ids: vec![1, 3],
					..Default::default()
				},
			)
			.await
			.expect("route created");

		let updated = service
			.update(
				"u1",
				route.id,
				UpdateRouteInput {
					plaque_ids: Some(vec![1, 3, 2]),
					..Default::default()
				},
			)
			.await
			.expect("route updated");

		assert_eq!(updated.name, "Short");
		assert_eq!(updated.points.len(), 3);
		assert!(updated.total_distance > route.total_distance);

		service.delete("u1", route.id).await.expect("deleted");
		assert!(service.list_for_user("u1").await.expect("listed").is_empty());
	}
}
