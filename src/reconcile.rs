//! Comparison of current and desired firewall state, and construction of
//! the replacement rule set.
//!
//! The control plane replaces all rules of an instance in one call, so a
//! single divergent port range means the whole set is resubmitted.

use serde::Serialize;

use crate::api::{FetchPortStates, ReplacePortStates};
use crate::config::{CidrSetting, DesiredConfig};
use crate::error::ApiError;
use crate::types::{AddressFamily, PortRule, PortState};

const FAMILIES: [AddressFamily; 2] = [AddressFamily::Ipv4, AddressFamily::Ipv6];

/// Whether one family of one port range differs from what is wanted.
///
/// An unset family is left alone and never diverges.
pub fn family_diverges(current: &[String], desired: &CidrSetting) -> bool {
    match desired {
        CidrSetting::Unset => false,
        CidrSetting::Clear => !current.is_empty(),
        CidrSetting::Allow(cidr) => !(current.len() == 1 && current[0] == *cidr),
    }
}

pub fn state_diverges(state: &PortState, config: &DesiredConfig) -> bool {
    FAMILIES
        .iter()
        .any(|&family| family_diverges(state.cidrs(family), config.cidr(family)))
}

fn desired_cidrs(current: &[String], desired: &CidrSetting) -> Vec<String> {
    match desired {
        CidrSetting::Unset => current.to_vec(),
        CidrSetting::Clear => Vec::new(),
        CidrSetting::Allow(cidr) => vec![cidr.clone()],
    }
}

pub fn desired_rule(state: &PortState, config: &DesiredConfig) -> PortRule {
    PortRule {
        from_port: state.from_port,
        to_port: state.to_port,
        protocol: state.protocol,
        cidrs4: desired_cidrs(&state.cidrs4, &config.cidr4),
        cidrs6: desired_cidrs(&state.cidrs6, &config.cidr6),
        cidr_list_aliases: state.cidr_list_aliases.clone(),
    }
}

/// What happened to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    UpToDate,
    DryRun,
    Applied,
}

/// Current state of an instance next to the rule set it should have.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub current: Vec<PortState>,
    pub desired: Vec<PortRule>,
    /// Index into `current` of every port range that differs.
    pub divergent: Vec<usize>,
}

impl Plan {
    pub fn new(current: Vec<PortState>, config: &DesiredConfig) -> Self {
        let divergent = current
            .iter()
            .enumerate()
            .filter(|(_, state)| state_diverges(state, config))
            .map(|(idx, _)| idx)
            .collect();
        let desired = current
            .iter()
            .map(|state| desired_rule(state, config))
            .collect();

        Plan {
            current,
            desired,
            divergent,
        }
    }

    /// Fetch the instance's current state and plan against it.
    pub fn fetch(client: &impl FetchPortStates, config: &DesiredConfig) -> Result<Self, ApiError> {
        let current = client.fetch_port_states(&config.instance)?;
        log::info!(
            "fetched {} port range(s) for {}:{}",
            current.len(),
            config.region,
            config.instance
        );
        Ok(Plan::new(current, config))
    }

    pub fn update_required(&self) -> bool {
        !self.divergent.is_empty()
    }

    pub fn should_submit(&self, config: &DesiredConfig) -> bool {
        self.update_required() || config.force
    }

    /// Submit the desired rule set if needed and allowed.
    pub fn apply(
        &self,
        client: &impl ReplacePortStates,
        config: &DesiredConfig,
    ) -> Result<Outcome, ApiError> {
        if !self.should_submit(config) {
            log::info!("firewall of {} already matches", config.instance);
            return Ok(Outcome::UpToDate);
        }
        if config.dry_run {
            log::info!("dry-run: skipping submission of {} rule(s)", self.desired.len());
            return Ok(Outcome::DryRun);
        }
        if self.desired.is_empty() {
            log::warn!(
                "{} has no port ranges; submitting an empty rule set",
                config.instance
            );
        }

        client.replace_port_states(&config.instance, &self.desired)?;
        log::info!(
            "replaced {} rule(s) on {}:{}",
            self.desired.len(),
            config.region,
            config.instance
        );
        Ok(Outcome::Applied)
    }
}
