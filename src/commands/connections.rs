use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use super::print_json;
use crate::core::system_monitor::{
    socket_table, ConnectionFilter, NetworkConnection, ProtocolFilter, MAX_CONNECTIONS,
};
use crate::core::Config;

pub fn execute(matches: &ArgMatches, config: &Config) -> Result<()> {
    let filter = build_filter(matches)?;
    let limit = row_limit(matches, config);

    let all = socket_table().context("Failed to list network connections")?;
    let connections = filter.apply(&all, limit);

    if matches.get_flag("json") {
        return print_json(&connections);
    }

    if connections.is_empty() {
        println!("{}", "No matching connections.".yellow());
        return Ok(());
    }

    print_table(&connections);
    println!();
    println!(
        "{}",
        format!("{} of {} sockets shown", connections.len(), all.len()).dimmed()
    );
    Ok(())
}

pub fn build_filter(matches: &ArgMatches) -> Result<ConnectionFilter> {
    let protocol = match matches.get_one::<String>("protocol") {
        Some(protocol) => protocol.parse::<ProtocolFilter>()?,
        None => ProtocolFilter::All,
    };

    Ok(ConnectionFilter {
        protocol,
        listening_only: matches.get_flag("listening"),
        text: matches
            .get_one::<String>("filter")
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    })
}

/// `--limit` or the configured limit, never above the hard cap
pub fn row_limit(matches: &ArgMatches, config: &Config) -> usize {
    matches
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(config.connection_limit)
        .min(MAX_CONNECTIONS)
}

fn print_table(connections: &[NetworkConnection]) {
    println!(
        "{}",
        format!(
            "{:<5} {:<46} {:<46} {:<12} {:>7}",
            "PROTO", "LOCAL", "REMOTE", "STATE", "PID"
        )
        .bold()
    );

    for conn in connections {
        let state = if conn.is_listening() {
            format!("{:<12}", conn.state).green()
        } else {
            format!("{:<12}", conn.state).normal()
        };
        println!(
            "{:<5} {:<46} {:<46} {} {:>7}",
            conn.protocol.to_string(),
            conn.local_addr.to_string(),
            conn.remote_display(),
            state,
            conn.pid
                .map(|pid| pid.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}
