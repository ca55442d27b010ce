/// drift3d terminal background
///
/// Runs the ambient wireframe scene as colored ASCII in the terminal.
/// Controls:
///   - Q/ESC: Quit
use clap::{Parser, ValueEnum};
use drift3d_core::{DeviceTier, SceneConfig};
use drift3d_terminal::{AppOptions, TerminalApp};
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Mobile,
    Tablet,
    Desktop,
}

impl From<TierArg> for DeviceTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Mobile => DeviceTier::Mobile,
            TierArg::Tablet => DeviceTier::Tablet,
            TierArg::Desktop => DeviceTier::Desktop,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "drift3d-terminal")]
#[command(about = "Ambient 3D wireframe background rendered in the terminal")]
struct Args {
    /// Force a device tier instead of classifying by terminal width
    #[arg(long, value_enum)]
    tier: Option<TierArg>,

    /// Seed for scene randomness (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Hide the status line
    #[arg(long)]
    no_status: bool,

    /// JSON file overriding scene settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> io::Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let json = std::fs::read_to_string(path)?;
    SceneConfig::from_json(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let options = AppOptions {
        tier: args.tier.map(DeviceTier::from),
        seed,
        fps: args.fps,
        show_status: !args.no_status,
        config: load_config(args.config.as_ref())?,
    };

    let mut app = TerminalApp::new(options)?;
    app.run()
}
