use serde::Serialize;

use crate::config::DesiredConfig;
use crate::reconcile::{Outcome, Plan};
use crate::types::{PortRule, PortState};

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub region: &'a str,
    pub instance: &'a str,
    pub ipv4: String,
    pub ipv6: String,
    pub update_required: bool,
    pub forced: bool,
    pub outcome: Outcome,
    pub current: &'a [PortState],
    pub desired: &'a [PortRule],
}

impl<'a> Report<'a> {
    pub fn new(config: &'a DesiredConfig, plan: &'a Plan, outcome: Outcome) -> Self {
        Report {
            region: &config.region,
            instance: &config.instance,
            ipv4: config.cidr4.to_string(),
            ipv6: config.cidr6.to_string(),
            update_required: plan.update_required(),
            forced: config.force,
            outcome,
            current: &plan.current,
            desired: &plan.desired,
        }
    }
}

pub fn print_report(report: &Report<'_>) {
    let json = serde_json::to_string_pretty(report).expect("Failed to serialize to JSON");
    println!("{json}");
}
