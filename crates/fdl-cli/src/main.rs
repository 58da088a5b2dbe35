//! fdl CLI - format, check and lint FDL UI documents

mod cli;

use clap::Parser;

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }
    builder.format_timestamp(None).init();
}

fn main() {
    let cli_args = cli::Cli::parse();
    init_logging(cli_args.verbose);

    match cli::run(cli_args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
