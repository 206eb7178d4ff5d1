use clap::Parser;
use fundsim::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
