// src/bin/cli.rs
use card_scrape::cli;
use color_eyre::eyre::Report;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run().map_err(Report::msg)
}
