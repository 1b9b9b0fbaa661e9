mod launcher;

fn main() -> std::process::ExitCode {
    launcher::launch("memory-server", |c| &c.server, server::run_memory)
}
