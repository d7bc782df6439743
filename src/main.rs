use anyhow::Context;
use clap::Parser;

use rocketpath::args::RocketPathArgs;
use rocketpath::config;
use rocketpath::demos;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = RocketPathArgs::parse();

    let mut config = demos::preset(args.demo);
    if let Some(path) = &args.config {
        config = config::load_overlay(path, config)?;
    }
    config.validate().context("invalid demo configuration")?;
    log::info!("starting {:?}", args.demo);

    if args.headless {
        demos::headless::run(config, args.frames, args.fps)?;
        Ok(())
    } else {
        demos::windowed::run(config)
    }
}
