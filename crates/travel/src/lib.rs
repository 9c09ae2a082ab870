//! Travel estimation for the nearby proximity engine.
//!
//! This crate provides:
//! - Mode-based speed model with an hour-of-day traffic table
//! - Duration and ETA estimates
//! - Straight-line route building with turn-by-turn directions
//! - Greedy nearest-neighbor waypoint ordering
//! - Circular isochrone approximation
//!
//! # Example
//!
//! ```
//! use nearby_geo::Coordinate;
//! use nearby_travel::{RouteBuilder, TravelMode};
//!
//! let origin = Coordinate::new(24.7136, 46.6753).unwrap();
//! let destination = Coordinate::new(24.7743, 46.7386).unwrap();
//!
//! let route = RouteBuilder::default()
//!     .build_route(&origin, &destination, &[], TravelMode::Driving, 12)
//!     .unwrap();
//! assert!(route.distance_km > 9.0 && route.distance_km < 10.0);
//! assert_eq!(route.path.first(), Some(&origin));
//! ```

mod error;
mod estimate;
mod profile;
pub mod isochrone;
pub mod route;
pub mod waypoints;

pub use error::{Result, TravelError, TravelErrorCode};
pub use estimate::TravelTimeEstimator;
pub use isochrone::{isochrone, isochrone_ring};
pub use profile::{TravelMode, TravelProfile};
pub use route::{CompassDirection, DirectionStep, Route, RouteBuilder};
pub use waypoints::{optimize_waypoints, path_distance};
