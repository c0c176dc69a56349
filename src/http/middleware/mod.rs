//! Request middleware.

pub mod in_flight;

pub use in_flight::{route_label, track_in_flight, RequestGuard, RequestTracker, UNMATCHED_ROUTE};
