// Integration tests module

mod integration {
    mod cli_test;
    mod collector_test;
    mod config_test;
    mod connections_test;
    mod dashboard_test;
}
