use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use super::print_json;
use crate::core::system_monitor::{
    MetricsCollector, ProcessInfo, ProcessQuery, ProcessSort, MAX_PROCESSES,
};
use crate::core::Config;
use crate::ui::formatters::{format_bytes, truncate_value};

pub fn execute(matches: &ArgMatches, config: &Config) -> Result<()> {
    let query = build_query(matches, config)?;

    let mut collector = MetricsCollector::new();
    collector.warm_up();
    let processes = query.apply(&collector.processes());

    if matches.get_flag("json") {
        return print_json(&processes);
    }

    if processes.is_empty() {
        println!("{}", "No matching processes.".yellow());
        return Ok(());
    }

    print_table(&processes, query.sort);
    Ok(())
}

pub fn build_query(matches: &ArgMatches, config: &Config) -> Result<ProcessQuery> {
    let sort = match matches.get_one::<String>("sort") {
        Some(sort) => sort.parse::<ProcessSort>()?,
        None => config.default_sort,
    };

    Ok(ProcessQuery {
        sort,
        filter: matches
            .get_one::<String>("filter")
            .cloned()
            .unwrap_or_default(),
        limit: matches
            .get_one::<usize>("limit")
            .copied()
            .unwrap_or(config.process_limit)
            .min(MAX_PROCESSES),
    })
}

fn print_table(processes: &[ProcessInfo], sort: ProcessSort) {
    println!(
        "{}",
        format!(
            "{:>7}  {:<28} {:>7} {:>7} {:>10}  {}",
            "PID", "NAME", "CPU%", "MEM%", "MEMORY", "STATUS"
        )
        .bold()
    );

    for process in processes {
        println!(
            "{:>7}  {:<28} {:>7.1} {:>7.1} {:>10}  {}",
            process.pid.to_string().cyan(),
            truncate_value(&process.name, 25),
            process.cpu_percent,
            process.memory_percent,
            format_bytes(process.memory_bytes),
            process.status.dimmed()
        );
    }

    println!();
    println!(
        "{}",
        format!("{} processes, sorted by {}", processes.len(), sort.label()).dimmed()
    );
}
