//! Thin client for the Mapbox Directions API.
//!
//! Only the walking profile is used. Every call is a single
//! origin/destination pair; multi-stop routes are assembled by the caller one
//! segment at a time.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.mapbox.com";

pub struct RequestConfig {
	pub client: reqwest::Client,
	pub api_url: String,
	pub access_token: String,
}

impl RequestConfig {
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			api_url: DEFAULT_API_URL.to_string(),
			access_token: access_token.into(),
		}
	}

	pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
		self.api_url = api_url.into().trim_end_matches('/').to_string();
		self
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("directions request failed: {0}")]
	Request(#[source] reqwest::Error),
	#[error("no walking route found <code='{code}'>{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
	NoRoute {
		code: String,
		message: Option<String>,
	},
}

/// Request URLs carry the access token, so they never make it into the error
impl From<reqwest::Error> for Error {
	fn from(e: reqwest::Error) -> Self {
		Self::Request(e.without_url())
	}
}

/// A longitude/latitude pair, in the order Mapbox expects it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
	pub lng: f64,
	pub lat: f64,
}

impl LngLat {
	pub fn new(lng: f64, lat: f64) -> Self {
		Self { lng, lat }
	}
}

pub mod walking {
	use super::*;

	#[derive(Debug, Clone, PartialEq, Serialize)]
	pub struct Response {
		/// Metres
		pub distance: f64,
		/// Seconds
		pub duration: f64,
		pub geometry: Vec<LngLat>,
		pub instructions: Vec<String>,
	}

	#[derive(Deserialize)]
	struct RawResponse {
		code: String,
		#[serde(default)]
		message: Option<String>,
		#[serde(default)]
		routes: Vec<RawRoute>,
	}

	#[derive(Deserialize)]
	struct RawRoute {
		distance: f64,
		duration: f64,
		geometry: RawGeometry,
		#[serde(default)]
		legs: Vec<RawLeg>,
	}

	#[derive(Deserialize)]
	struct RawGeometry {
		coordinates: Vec<[f64; 2]>,
	}

	#[derive(Deserialize)]
	struct RawLeg {
		#[serde(default)]
		steps: Vec<RawStep>,
	}

	#[derive(Deserialize)]
	struct RawStep {
		maneuver: RawManeuver,
	}

	#[derive(Deserialize)]
	struct RawManeuver {
		#[serde(default)]
		instruction: String,
	}

	pub fn url(config: &RequestConfig, from: LngLat, to: LngLat) -> String {
		format!(
			"{}/directions/v5/mapbox/walking/{},{};{},{}?geometries=geojson&overview=full&steps=true&access_token={}",
			config.api_url, from.lng, from.lat, to.lng, to.lat, config.access_token
		)
	}

	pub async fn exec(config: &RequestConfig, from: LngLat, to: LngLat) -> Result<Response, Error> {
		debug!(?from, ?to, "Requesting walking directions");

		let raw = config
			.client
			.get(url(config, from, to))
			.send()
			.await
			.and_then(|r| r.error_for_status())?
			.json::<RawResponse>()
			.await?;

		parse(raw)
	}

	pub fn parse_body(body: &str) -> Result<Response, Error> {
		let raw = serde_json::from_str::<RawResponse>(body).map_err(|e| Error::NoRoute {
			code: "InvalidResponse".to_string(),
			message: Some(e.to_string()),
		})?;

		parse(raw)
	}

	fn parse(raw: RawResponse) -> Result<Response, Error> {
		let RawResponse {
			code,
			message,
			routes,
		} = raw;

		if code != "Ok" {
			return Err(Error::NoRoute { code, message });
		}

		let Some(route) = routes.into_iter().next() else {
			return Err(Error::NoRoute {
				code,
				message: Some("response contained no routes".to_string()),
			});
		};

		Ok(Response {
			distance: route.distance,
			duration: route.duration,
			geometry: route
				.geometry
				.coordinates
				.into_iter()
				.map(|[lng, lat]| LngLat { lng, lat })
				.collect(),
			instructions: route
				.legs
				.into_iter()
				.flat_map(|leg| leg.steps)
				.map(|step| step.maneuver.instruction)
				.filter(|instruction| !instruction.is_empty())
				.collect(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_walking_url_with_lng_first() {
		let config = RequestConfig::new("tok").with_api_url("http://localhost:9000/");
		let url = walking::url(
			&config,
			LngLat::new(-0.1246, 51.5007),
			LngLat::new(-0.1278, 51.5074),
		);

		assert_eq!(
			url,
			"http://localhost:9000/directions/v5/mapbox/walking/-0.1246,51.5007;-0.1278,51.5074?geometries=geojson&overview=full&steps=true&access_token=tok"
		);
	}

	#[test]
	fn parses_first_route() {
		let body = r#"{
			"code": "Ok",
			"routes": [{
				"distance": 812.4,
				"duration": 601.0,
				"geometry": {"type": "LineString", "coordinates": [[-0.12, 51.50], [-0.13, 51.51]]},
				"legs": [{"steps": [
					{"maneuver": {"instruction": "Head north on Whitehall"}},
					{"maneuver": {"instruction": "You have arrived"}}
				]}]
			}]
		}"#;

		let response = walking::parse_body(body).expect("valid response");
		assert_eq!(response.distance, 812.4);
		assert_eq!(response.duration, 601.0);
		assert_eq!(response.geometry.len(), 2);
		assert_eq!(response.geometry[1], LngLat::new(-0.13, 51.51));
		assert_eq!(response.instructions.len(), 2);
	}

	#[test]
	fn non_ok_code_is_no_route() {
		let body = r#"{"code": "NoRoute", "message": "No route found", "routes": []}"#;

		match walking::parse_body(body) {
			Err(Error::NoRoute { code, message }) => {
				assert_eq!(code, "NoRoute");
				assert_eq!(message.as_deref(), Some("No route found"));
			}
			other => panic!("expected NoRoute, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn request_errors_hide_the_access_token() {
		// Nothing listens on the discard port
		let config = RequestConfig::new("pk.SECRET_TOKEN_123").with_api_url("http://127.0.0.1:9");

		let err = walking::exec(&config, LngLat::new(-0.12, 51.5), LngLat::new(-0.13, 51.51))
			.await
			.expect_err("connection refused");

		assert!(matches!(err, Error::Request(_)));
		assert!(!err.to_string().contains("SECRET_TOKEN_123"), "{err}");
		assert!(!format!("{err:?}").contains("SECRET_TOKEN_123"), "{err:?}");
	}

	#[test]
	fn ok_without_routes_is_no_route() {
		let body = r#"{"code": "Ok", "routes": []}"#;
		assert!(matches!(
			walking::parse_body(body),
			Err(Error::NoRoute { .. })
		));
	}
}
