use clap::{ColorChoice, Parser};
use colored::Colorize;
use log::{error, info};
use m3u8_fetcher::{Args, CaptureOptions, Logger, Outcome};
use std::{
    io::{IsTerminal, stdout},
    process,
};

fn run(args: Args) -> anyhow::Result<bool> {
    Logger::init(args.verbose)?;

    let options = CaptureOptions::default();

    match m3u8_fetcher::capture(&args.url, &options)? {
        Outcome::Found(url) => {
            info!("Captured {} -> {}", url, options.output.display());
            info!("Done. Matching request captured.");
            Ok(true)
        }
        Outcome::NotFound(_) => {
            error!("No matching .m3u8 request found.");
            Ok(false)
        }
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // Wrong arity must exit with 1 before any browser is launched.
        Err(e) => {
            let _ = e.print();
            process::exit(m3u8_fetcher::usage_exit_code(&e));
        }
    };

    colored::control::set_override(match args.color {
        ColorChoice::Always => true,
        ColorChoice::Auto => stdout().is_terminal(),
        ColorChoice::Never => false,
    });

    match run(args) {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}: {:#}", "error".bold().red(), e);
            process::exit(1);
        }
    }
}
