mod launcher;

fn main() -> std::process::ExitCode {
    launcher::launch("db-server", |c| &c.db_server, server::run_database)
}
