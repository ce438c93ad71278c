mod app;
mod cli;
mod commands;
mod config;
mod keys;
mod pdf;
mod presentation;
mod render;
mod theme;
mod viewer;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
