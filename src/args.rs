use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Demos {
    /// Stretched circle in front of the planet, driven by scrolling.
    Orbit,
    /// Rising spiral spline, driven by scrolling.
    Spiral,
    /// Closed spline through five waypoints, driven by the clock.
    Waypoints,
}

#[derive(Parser, Debug)]
#[clap(version, about = "Flies a rocket along a generated path")]
pub struct RocketPathArgs {
    #[clap(value_enum)]
    pub demo: Demos,

    /// TOML file merged over the demo's built in settings.
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run without a window, scrolling the page from top to bottom.
    #[clap(long)]
    pub headless: bool,

    /// Frames to run in headless mode.
    #[clap(long, default_value_t = 600)]
    pub frames: u32,

    /// Frame rate of the headless clock.
    #[clap(long, default_value_t = 60)]
    pub fps: u32,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Demos, RocketPathArgs};

    #[test]
    fn defaults() {
        let args = RocketPathArgs::parse_from(["rocketpath", "orbit"]);
        assert_eq!(Demos::Orbit, args.demo);
        assert!(!args.headless);
        assert!(args.config.is_none());
        assert_eq!(600, args.frames);
        assert_eq!(60, args.fps);
    }

    #[test]
    fn headless_flags() {
        let args = RocketPathArgs::parse_from([
            "rocketpath",
            "waypoints",
            "--headless",
            "--frames",
            "30",
            "--config",
            "overlay.toml",
        ]);
        assert_eq!(Demos::Waypoints, args.demo);
        assert!(args.headless);
        assert_eq!(30, args.frames);
        assert_eq!(Some("overlay.toml".into()), args.config);
        assert!(RocketPathArgs::try_parse_from(["rocketpath", "comet"]).is_err());
    }
}
