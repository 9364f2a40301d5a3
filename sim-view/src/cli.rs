//! Command-line options for the viewer.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "transpiration_sim")]
#[command(about = "Interactive plant transpiration particle simulator", long_about = None)]
#[command(version)]
pub struct Args {
    /// Initial air temperature in °C
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(i32).range(15..=35))]
    pub temperature: i32,

    /// Initial relative humidity in percent
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    pub humidity: i32,

    /// Initial light intensity in percent
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    pub light: i32,

    /// Seed for particle randomness; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON scene config (origins, exit line, attribute ranges)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by `-v`/`-q`, if either was given.
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        match self.verbose {
            0 if self.quiet => Some(log::LevelFilter::Error),
            0 => None,
            1 => Some(log::LevelFilter::Info),
            2 => Some(log::LevelFilter::Debug),
            _ => Some(log::LevelFilter::Trace),
        }
    }
}
