use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::types::{PortRule, PortState, PortStatus};

/// Print the rules currently on the instance, highlighting divergent ranges.
pub fn print_current(states: &[PortState], divergent: &[usize]) {
    if states.is_empty() {
        println!("{}", "No port ranges found".yellow());
        return;
    }

    let has_aliases = states.iter().any(|s| !s.cidr_list_aliases.is_empty());

    let mut table = Table::new();
    let mut headers = vec!["PORT", "PROTO", "STATE", "IPv4", "IPv6"];
    if has_aliases {
        headers.push("ALIASES");
    }
    table.set_header(headers);

    for (idx, state) in states.iter().enumerate() {
        let row_color = if divergent.contains(&idx) {
            Color::Yellow
        } else {
            Color::Reset
        };
        let state_cell = match state.state {
            Some(PortStatus::Open) => Cell::new("open").fg(Color::Green),
            Some(PortStatus::Closed) => Cell::new("closed").fg(Color::Red),
            None => Cell::new("-"),
        };

        let mut row = vec![
            Cell::new(state.port_range()).fg(Color::Cyan),
            Cell::new(state.protocol),
            state_cell,
            Cell::new(join_cidrs(&state.cidrs4)).fg(row_color),
            Cell::new(join_cidrs(&state.cidrs6)).fg(row_color),
        ];
        if has_aliases {
            row.push(Cell::new(join_cidrs(&state.cidr_list_aliases)));
        }
        table.add_row(row);
    }

    println!("{table}");

    if !divergent.is_empty() {
        println!(
            "\n{} of {} port range(s) differ",
            divergent.len().to_string().yellow().bold(),
            states.len()
        );
    }
}

/// Print the rule set that will be submitted.
pub fn print_desired(rules: &[PortRule]) {
    if rules.is_empty() {
        println!("{}", "Empty rule set: every port will be closed".red());
        return;
    }

    let has_aliases = rules.iter().any(|r| !r.cidr_list_aliases.is_empty());

    let mut table = Table::new();
    let mut headers = vec![
        Cell::new("PORT").add_attribute(Attribute::Bold),
        Cell::new("PROTO").add_attribute(Attribute::Bold),
        Cell::new("IPv4").add_attribute(Attribute::Bold),
        Cell::new("IPv6").add_attribute(Attribute::Bold),
    ];
    if has_aliases {
        headers.push(Cell::new("ALIASES").add_attribute(Attribute::Bold));
    }
    table.set_header(headers);

    for rule in rules {
        let mut row = vec![
            Cell::new(rule.port_range()).fg(Color::Cyan),
            Cell::new(rule.protocol),
            Cell::new(join_cidrs(&rule.cidrs4)).fg(Color::Green),
            Cell::new(join_cidrs(&rule.cidrs6)).fg(Color::Green),
        ];
        if has_aliases {
            row.push(Cell::new(join_cidrs(&rule.cidr_list_aliases)));
        }
        table.add_row(row);
    }

    println!("{table}");
}

fn join_cidrs(cidrs: &[String]) -> String {
    if cidrs.is_empty() {
        "-".to_string()
    } else {
        cidrs.join(", ")
    }
}
