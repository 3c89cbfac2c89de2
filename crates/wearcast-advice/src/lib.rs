//! Recommendations for Wearcast
//!
//! Turns a weather reading plus the user's thresholds into umbrella, jacket,
//! gloves and scarf decisions, and drives the search lifecycle that produces
//! the reading.

pub mod controller;
pub mod error_mapping;
pub mod recommend;

pub use controller::{lookup, Controller, SearchState, SearchTicket, Snapshot};
pub use recommend::{evaluate, Item, Recommendation};
