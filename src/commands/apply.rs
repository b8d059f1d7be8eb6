//! Fetch, compare, report and (maybe) replace an instance's firewall rules.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::LightsailClient;
use crate::config::DesiredConfig;
use crate::output::json::{self, Report};
use crate::output::table;
use crate::reconcile::{Outcome, Plan};

pub fn execute(config: &DesiredConfig) -> Result<()> {
    let client = LightsailClient::new(config).context("Failed to set up the Lightsail client")?;

    let plan = Plan::fetch(&client, config).with_context(|| {
        format!(
            "Failed to read firewall rules of {}:{}",
            config.region, config.instance
        )
    })?;

    if config.json {
        let outcome = apply_plan(&plan, &client, config)?;
        json::print_report(&Report::new(config, &plan, outcome));
        return Ok(());
    }

    println!(
        "Current firewall rules for {}:",
        format!("{}:{}", config.region, config.instance).bold()
    );
    table::print_current(&plan.current, &plan.divergent);

    if !plan.should_submit(config) {
        println!("{}", "No update required.".green());
        return Ok(());
    }

    if !plan.update_required() {
        println!("{}", "Rules already match; forcing update.".yellow());
    }
    println!("Updating firewall IPv4 CIDRs to match {}", config.cidr4.to_string().cyan());
    println!("Updating firewall IPv6 CIDRs to match {}", config.cidr6.to_string().cyan());
    table::print_desired(&plan.desired);

    let outcome = apply_plan(&plan, &client, config)?;

    match outcome {
        Outcome::DryRun => println!("{}", "Dry-run: no update performed.".yellow()),
        Outcome::Applied => println!("{} Firewall updated", "✓".green()),
        Outcome::UpToDate => {}
    }

    Ok(())
}

fn apply_plan(plan: &Plan, client: &LightsailClient, config: &DesiredConfig) -> Result<Outcome> {
    plan.apply(client, config).with_context(|| {
        format!(
            "Failed to update firewall rules of {}:{}",
            config.region, config.instance
        )
    })
}
