use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// Runs RGB crossfade light shows on three PWM channels.
#[derive(Parser, Debug)]
#[command(name = "lightshow", version, about)]
pub struct Cli {
    /// Interpolation steps per fade
    #[arg(long, default_value_t = rgb_crossfade::DEFAULT_RESOLUTION, global = true)]
    pub resolution: u32,

    /// Pin driving the red channel
    #[arg(long, default_value_t = 27, global = true)]
    pub red_pin: u8,

    /// Pin driving the green channel
    #[arg(long, default_value_t = 4, global = true)]
    pub green_pin: u8,

    /// Pin driving the blue channel
    #[arg(long, default_value_t = 17, global = true)]
    pub blue_pin: u8,

    /// LED shares a common anode (inverted duty cycle)
    #[arg(long, global = true)]
    pub common_anode: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve light shows over HTTP
    Serve(ServeArgs),
    /// Run a hue-cycle show and exit
    Show(ShowArgs),
    /// Fade to a named color and exit
    Fade(FadeArgs),
    /// List the named colors
    Colors,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host IP address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Host port
    #[arg(short, long, default_value_t = 80)]
    pub port: u16,

    /// Duration of one show pass when a request gives none, in seconds
    #[arg(long, default_value = "2", value_parser = parse_period)]
    pub period: Duration,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Number of passes over the hue wheel
    #[arg(short, long, default_value_t = 1)]
    pub iterations: u32,

    /// Duration of one pass, in seconds
    #[arg(long, default_value = "5", value_parser = parse_period)]
    pub period: Duration,
}

#[derive(Args, Debug)]
pub struct FadeArgs {
    /// Named color (see `lightshow colors`)
    pub color: String,

    /// Fade duration, in seconds
    #[arg(long, default_value = "2", value_parser = parse_period)]
    pub period: Duration,

    /// How long to hold the color before switching off and exiting, in seconds
    #[arg(long, default_value = "0", value_parser = parse_period)]
    pub hold: Duration,
}

/// Parses a non-negative number of seconds.
pub fn parse_period(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds).map_err(|err| format!("invalid period `{value}`: {err}"))
}
