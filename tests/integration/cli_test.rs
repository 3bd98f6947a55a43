use sysdash::cli::build_cli;

#[test]
fn test_every_subcommand_parses() {
    let cases: &[&[&str]] = &[
        &["sysdash"],
        &["sysdash", "monitor"],
        &["sysdash", "snapshot", "--json"],
        &["sysdash", "processes", "-s", "memory", "-n", "10"],
        &["sysdash", "connections", "--protocol", "tcp", "-l"],
        &["sysdash", "hardware"],
        &["sysdash", "sensors", "--json"],
        &["sysdash", "kill", "1234", "--force"],
        &["sysdash", "config", "set", "theme", "fluent"],
        &["sysdash", "config", "path"],
    ];

    for args in cases {
        assert!(
            build_cli().try_get_matches_from(*args).is_ok(),
            "failed to parse {:?}",
            args
        );
    }
}

#[test]
fn test_config_requires_subcommand() {
    assert!(build_cli()
        .try_get_matches_from(["sysdash", "config"])
        .is_err());
}

#[test]
fn test_kill_requires_pid() {
    assert!(build_cli().try_get_matches_from(["sysdash", "kill"]).is_err());
}

#[test]
fn test_unknown_theme_rejected() {
    assert!(build_cli()
        .try_get_matches_from(["sysdash", "--theme", "neon"])
        .is_err());
}
