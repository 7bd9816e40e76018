//! Command line entry point

mod cli;

use backport::options::CliArgs;
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    cli::init_tracing(args.verbose);

    if let Err(err) = cli::run(args).await {
        cli::print_error(&err);
        std::process::exit(1);
    }
}
