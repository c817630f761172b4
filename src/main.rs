use clap::Parser;

use svtarray::cli::{run, Cli};
use svtarray::utils::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.verbosity);
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
