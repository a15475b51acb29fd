mod config;
mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = config::Args::parse();
    platform::run_app(args)
}
