use clap::Parser;
use bandsig::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    bandsig::logging::init_logging();
    run(Cli::parse())
}
