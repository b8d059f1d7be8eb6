//! Control-plane access.
//!
//! Reconciliation only sees the two traits below; [`LightsailClient`] is the
//! real implementation.

pub mod lightsail;

pub use lightsail::LightsailClient;

use crate::error::ApiError;
use crate::types::{PortRule, PortState};

/// Read the current firewall state of an instance.
pub trait FetchPortStates {
    fn fetch_port_states(&self, instance: &str) -> Result<Vec<PortState>, ApiError>;
}

/// Replace the whole firewall rule set of an instance in one call.
pub trait ReplacePortStates {
    fn replace_port_states(&self, instance: &str, rules: &[PortRule]) -> Result<(), ApiError>;
}
