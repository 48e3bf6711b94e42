//! `lightshow`: drives an RGB LED through crossfades from the command line or over HTTP.

mod args;
mod backend;
mod routes;
mod server;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rgb_crossfade::{
    ChannelMap, CrossfadeEngine, Polarity, PwmRgbSink, SharedEngine, Show, StdDelay, colors,
};

use args::{Cli, Command};
use backend::SimulatedPwm;

pub type Sink = PwmRgbSink<SimulatedPwm, SimulatedPwm, SimulatedPwm>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Command::Colors = cli.command {
        for (name, color) in colors::NAMED {
            println!(
                "{name:<12} r={:>5.1} g={:>5.1} b={:>5.1}",
                color.red, color.green, color.blue
            );
        }
        return Ok(());
    }

    let mut engine = build_engine(&cli)?;

    match cli.command {
        Command::Serve(args) => {
            let shared = SharedEngine::new(engine);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            let served = runtime.block_on(server::serve(shared.clone(), &args));
            shared.close();
            // Waits for in-flight fades, which stop at their next step once closed.
            drop(runtime);

            match shared.release() {
                Ok(_) => info!("PWM channels released"),
                Err(err) => warn!("engine still shared at exit: {}", err),
            }
            served
        }
        Command::Show(args) => {
            let show = Show::<{ colors::HUE_CYCLE.len() }>::hue_cycle(args.iterations, args.period)?;
            engine.play(&show, None)?;
            engine.release()?;
            Ok(())
        }
        Command::Fade(args) => {
            let target = colors::by_name(&args.color)
                .with_context(|| format!("unknown color `{}`", args.color))?;
            engine.fade_to(target, args.period)?;
            info!("holding {:?} for {:?}", engine.current_color(), args.hold);
            std::thread::sleep(args.hold);
            engine.release()?;
            Ok(())
        }
        Command::Colors => Ok(()),
    }
}

fn build_engine(cli: &Cli) -> Result<CrossfadeEngine<Sink, StdDelay>> {
    let map = ChannelMap::new(cli.red_pin, cli.green_pin, cli.blue_pin)?;
    let polarity = if cli.common_anode {
        Polarity::CommonAnode
    } else {
        Polarity::CommonCathode
    };
    let sink = PwmRgbSink::open(map, polarity, SimulatedPwm::new)?;
    let engine = CrossfadeEngine::new(sink, StdDelay, cli.resolution)?;
    info!(
        "engine ready: {} steps per fade, pins r={} g={} b={}",
        engine.resolution().get(),
        cli.red_pin,
        cli.green_pin,
        cli.blue_pin
    );
    Ok(engine)
}
