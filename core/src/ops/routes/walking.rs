//! Walking distances between plaques
//!
//! Segments come from the directions provider when one is configured and
//! answers, otherwise from a straight-line estimate. Provider answers are
//! cached; estimates are not, so a later call can still get the real route.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use pq_directions::{walking, RequestConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::cache::LruCache;
use crate::{
	config::RoutingConfig,
	domain::{haversine_km, Coordinates},
};

type SegmentKey = ((i64, i64), (i64, i64));

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
	async fn walking(
		&self,
		from: Coordinates,
		to: Coordinates,
	) -> Result<walking::Response, pq_directions::Error>;
}

#[async_trait]
impl DirectionsProvider for RequestConfig {
	async fn walking(
		&self,
		from: Coordinates,
		to: Coordinates,
	) -> Result<walking::Response, pq_directions::Error> {
		walking::exec(self, from.into(), to.into()).await
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSource {
	Mapbox,
	Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
	pub from: Coordinates,
	pub to: Coordinates,
	pub distance_km: f64,
	pub duration_min: f64,
	pub geometry: Vec<Coordinates>,
	#[serde(default)]
	pub instructions: Vec<String>,
	pub source: SegmentSource,
}

impl Segment {
	fn from_response(from: Coordinates, to: Coordinates, response: walking::Response) -> Self {
		Self {
			from,
			to,
			distance_km: response.distance / 1000.0,
			duration_min: response.duration / 60.0,
			geometry: response.geometry.into_iter().map(Into::into).collect(),
			instructions: response.instructions,
			source: SegmentSource::Mapbox,
		}
	}

	/// Straight line at walking pace
	pub fn estimate(from: Coordinates, to: Coordinates, walking_speed_kmh: f64) -> Self {
		let distance_km = haversine_km(from, to);
		Self {
			from,
			to,
			distance_km,
			duration_min: distance_km / walking_speed_kmh * 60.0,
			geometry: vec![from, to],
			instructions: Vec::new(),
			source: SegmentSource::Estimated,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkingRoute {
	pub segments: Vec<Segment>,
	pub total_distance_km: f64,
	pub total_duration_min: f64,
	pub geometry: Vec<Coordinates>,
}

impl WalkingRoute {
	fn from_segments(segments: Vec<Segment>) -> Self {
		let mut geometry: Vec<Coordinates> = Vec::new();
		for segment in &segments {
			let skip_joint = usize::from(geometry.last() == segment.geometry.first());
			geometry.extend(segment.geometry.iter().skip(skip_joint));
		}

		Self {
			total_distance_km: segments.iter().map(|s| s.distance_km).sum(),
			total_duration_min: segments.iter().map(|s| s.duration_min).sum(),
			segments,
			geometry,
		}
	}

	/// True when at least one segment is a straight-line estimate
	pub fn is_estimated(&self) -> bool {
		self.segments
			.iter()
			.any(|s| s.source == SegmentSource::Estimated)
	}
}

pub struct WalkingDistanceService {
	provider: Option<Arc<dyn DirectionsProvider>>,
	cache: Mutex<LruCache<SegmentKey, Segment>>,
	request_delay: Duration,
	walking_speed_kmh: f64,
}

impl WalkingDistanceService {
	pub fn new(provider: Option<Arc<dyn DirectionsProvider>>, config: &RoutingConfig) -> Self {
		Self {
			provider,
			cache: Mutex::new(LruCache::new(config.cache_capacity)),
			request_delay: Duration::from_millis(config.request_delay_ms),
			walking_speed_kmh: config.walking_speed_kmh,
		}
	}

	/// Uses Mapbox when a token is configured, estimates otherwise
	pub fn from_config(config: &RoutingConfig) -> Self {
		let provider = pq_utils::non_blank(config.mapbox_token.as_deref()).map(|token| {
			Arc::new(RequestConfig::new(token).with_api_url(&config.api_url))
				as Arc<dyn DirectionsProvider>
		});

		if provider.is_none() {
			debug!("No Mapbox token configured, walking distances will be estimated");
		}

		Self::new(provider, config)
	}

	pub fn has_provider(&self) -> bool {
		self.provider.is_some()
	}

	pub async fn segment(&self, from: Coordinates, to: Coordinates) -> Segment {
		self.fetch_segment(from, to, &mut false).await
	}

	/// Walks consecutive pairs one at a time, pausing between provider calls
	pub async fn route(&self, points: &[Coordinates]) -> WalkingRoute {
		if points.len() < 2 {
			return WalkingRoute::default();
		}

		let mut called_provider = false;
		let mut segments = Vec::with_capacity(points.len() - 1);
		for pair in points.windows(2) {
			segments.push(self.fetch_segment(pair[0], pair[1], &mut called_provider).await);
		}

		WalkingRoute::from_segments(segments)
	}

	async fn fetch_segment(
		&self,
		from: Coordinates,
		to: Coordinates,
		called_provider: &mut bool,
	) -> Segment {
		let key = (from.cache_key(), to.cache_key());
		if key.0 == key.1 {
			return Segment::estimate(from, to, self.walking_speed_kmh);
		}

		if let Some(hit) = self.cache.lock().await.get(&key) {
			debug!(?from, ?to, "Walking segment cache hit");
			return hit;
		}

		let Some(provider) = &self.provider else {
			return Segment::estimate(from, to, self.walking_speed_kmh);
		};

		if *called_provider {
			tokio::time::sleep(self.request_delay).await;
		}
		*called_provider = true;

		match provider.walking(from, to).await {
			Ok(response) => {
				let segment = Segment::from_response(from, to, response);
				self.cache.lock().await.put(key, segment.clone());
				segment
			}
			Err(e) => {
				warn!(?from, ?to, %e, "Walking directions failed, using straight-line estimate");
				Segment::estimate(from, to, self.walking_speed_kmh)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use pq_directions::LngLat;

	use super::*;

	struct FixedProvider {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl DirectionsProvider for FixedProvider {
		async fn walking(
			&self,
			from: Coordinates,
			to: Coordinates,
		) -> Result<walking::Response, pq_directions::Error> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(walking::Response {
				distance: 1200.0,
				duration: 900.0,
				geometry: vec![LngLat::from(from), LngLat::from(to)],
				instructions: vec!["Head north".to_string()],
			})
		}
	}

	struct FailingProvider;

	#[async_trait]
	impl DirectionsProvider for FailingProvider {
		async fn walking(
			&self,
			_from: Coordinates,
			_to: Coordinates,
		) -> Result<walking::Response, pq_directions::Error> {
			Err(pq_directions::Error::NoRoute {
				code: "NoRoute".to_string(),
				message: None,
			})
		}
	}

	const BIG_BEN: Coordinates = Coordinates {
		lat: 51.5007,
		lng: -0.1246,
	};
	const TRAFALGAR: Coordinates = Coordinates {
		lat: 51.5080,
		lng: -0.1281,
	};
	const BRITISH_MUSEUM: Coordinates = Coordinates {
		lat: 51.5194,
		lng: -0.1270,
	};

	fn fixed() -> Arc<FixedProvider> {
		Arc::new(FixedProvider {
			calls: AtomicUsize::new(0),
		})
	}

	#[tokio::test]
	async fn provider_answers_are_cached() {
		let provider = fixed();
		let service = WalkingDistanceService::new(
			Some(Arc::clone(&provider) as Arc<dyn DirectionsProvider>),
			&RoutingConfig::default(),
		);

		let first = service.segment(BIG_BEN, TRAFALGAR).await;
		let second = service.segment(BIG_BEN, TRAFALGAR).await;

		assert_eq!(first, second);
		assert_eq!(first.source, SegmentSource::Mapbox);
		assert_eq!(first.distance_km, 1.2);
		assert_eq!(first.duration_min, 15.0);
		assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn failures_fall_back_to_estimate() {
		let service = WalkingDistanceService::new(
			Some(Arc::new(FailingProvider)),
			&RoutingConfig::default(),
		);

		let segment = service.segment(BIG_BEN, TRAFALGAR).await;
		assert_eq!(segment.source, SegmentSource::Estimated);
		assert_eq!(segment.distance_km, haversine_km(BIG_BEN, TRAFALGAR));
		assert!((segment.duration_min - segment.distance_km / 5.0 * 60.0).abs() < 1e-9);
		assert_eq!(segment.geometry, vec![BIG_BEN, TRAFALGAR]);
	}

	#[tokio::test]
	async fn no_provider_means_estimates() {
		let service = WalkingDistanceService::from_config(&RoutingConfig::default());
		assert!(!service.has_provider());

		let route = service.route(&[BIG_BEN, TRAFALGAR, BRITISH_MUSEUM]).await;
		assert_eq!(route.segments.len(), 2);
		assert!(route.is_estimated());
		assert_eq!(route.geometry, vec![BIG_BEN, TRAFALGAR, BRITISH_MUSEUM]);
	}

	#[tokio::test(start_paused = true)]
	async fn pauses_between_provider_calls_only() {
		let provider = fixed();
		let service = WalkingDistanceService::new(
			Some(Arc::clone(&provider) as Arc<dyn DirectionsProvider>),
			&RoutingConfig::default(),
		);

		service.segment(BIG_BEN, TRAFALGAR).await;

		// First pair is cached, so the second pair is the only call and isn't delayed
		let start = tokio::time::Instant::now();
		let route = service.route(&[BIG_BEN, TRAFALGAR, BRITISH_MUSEUM]).await;
		assert_eq!(start.elapsed(), Duration::ZERO);
		assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
		assert_eq!(route.total_distance_km, 2.4);
		assert_eq!(route.total_duration_min, 30.0);

		let start = tokio::time::Instant::now();
		service.route(&[TRAFALGAR, BIG_BEN, BRITISH_MUSEUM]).await;
		assert_eq!(start.elapsed(), Duration::from_millis(300));
		assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
	}

	#[tokio::test]
	async fn fewer_than_two_points_is_empty() {
		let service = WalkingDistanceService::from_config(&RoutingConfig::default());
		assert_eq!(service.route(&[BIG_BEN]).await, WalkingRoute::default());
	}
}
