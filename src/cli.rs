use clap::{value_parser, Arg, ArgAction, Command};

/// Build the `sysdash` command line
pub fn build_cli() -> Command {
    Command::new("sysdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive system monitor: CPU, memory, disks, network, processes and sensors")
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("MS")
                .help("Refresh interval in milliseconds (250-60000)")
                .value_parser(value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .value_name("THEME")
                .help("Colour theme")
                .value_parser(["classic", "fluent"])
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("monitor").about("Open the interactive dashboard (default)"))
        .subcommand(
            Command::new("snapshot")
                .about("Print one system overview snapshot")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("processes")
                .about("List processes")
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .value_name("COLUMN")
                        .help("Sort column")
                        .value_parser(["cpu", "memory", "name", "pid"]),
                )
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .value_name("TEXT")
                        .help("Name substring or exact PID"),
                )
                .arg(limit_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("connections")
                .about("List TCP and UDP sockets")
                .arg(
                    Arg::new("protocol")
                        .short('p')
                        .long("protocol")
                        .value_name("PROTO")
                        .help("Protocol filter")
                        .value_parser(["all", "tcp", "udp"])
                        .default_value("all"),
                )
                .arg(
                    Arg::new("listening")
                        .short('l')
                        .long("listening")
                        .help("Only listening sockets")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .value_name("TEXT")
                        .help("PID, port, or address and state substring"),
                )
                .arg(limit_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("hardware")
                .about("Show CPU, memory, disk and network hardware")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("sensors")
                .about("Show temperatures and battery")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("kill")
                .about("Terminate a process")
                .arg(
                    Arg::new("pid")
                        .help("Process ID")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Kill immediately instead of asking the process to exit")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change saved settings")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the current settings"))
                .subcommand(
                    Command::new("set")
                        .about("Change one setting")
                        .arg(Arg::new("key").help("Setting name").required(true))
                        .arg(Arg::new("value").help("New value").required(true)),
                )
                .subcommand(Command::new("reset").about("Restore the default settings"))
                .subcommand(Command::new("path").about("Print the settings file location")),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON instead of text")
        .action(ArgAction::SetTrue)
}

fn limit_arg() -> Arg {
    Arg::new("limit")
        .short('n')
        .long("limit")
        .value_name("N")
        .help("Maximum number of rows")
        .value_parser(value_parser!(usize))
}
