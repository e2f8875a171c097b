//! Xescrow preview
//!
//! Plays the landing intro on a simulated clock and prints one line per frame.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use xescrow_animation::AnimationScheduler;
use xescrow_intro::{
    logging, rng, FrameSnapshot, IntroConfig, LandingPage, RenderingEnvironment, StaticAssets,
};

#[derive(Parser)]
#[command(name = "xescrow-preview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Play the Xescrow landing intro headlessly", long_about = None)]
struct Cli {
    /// Seed for particle generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the intro defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per simulated second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// How long to play, in simulated milliseconds
    #[arg(long, default_value_t = 5000)]
    duration_ms: u64,

    /// Render as the server would (no particles, no timer)
    #[arg(long)]
    server: bool,

    /// Print full frame snapshots as JSON lines
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_with_default("debug");
    } else {
        logging::init();
    }

    if cli.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let config = match &cli.config {
        Some(path) => IntroConfig::load(path)
            .with_context(|| format!("loading intro config from {}", path.display()))?,
        None => IntroConfig::default(),
    };

    let env = if cli.server {
        RenderingEnvironment::Server
    } else {
        RenderingEnvironment::Client
    };

    let mut source = match cli.seed {
        Some(seed) => rng::seeded(seed),
        None => rng::from_entropy(),
    };

    let scheduler = AnimationScheduler::new();
    let mut page = LandingPage::mount(
        env,
        &config,
        &scheduler.handle(),
        &StaticAssets::default(),
        &mut source,
    )
    .context("mounting landing page")?;
    info!(?env, seed = ?cli.seed, "preview started");

    let step_ms = (1000 / u64::from(cli.fps)).max(1);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut last_phase = page.phase();

    loop {
        let frame = page.frame();
        if frame.phase != last_phase {
            info!(time_ms = frame.time_ms, phase = ?frame.phase, "phase changed");
            last_phase = frame.phase;
        }
        write_frame(&mut out, &frame, cli.json)?;

        if frame.time_ms >= cli.duration_ms {
            break;
        }
        scheduler.advance(step_ms.min(cli.duration_ms - frame.time_ms));
    }

    out.flush().context("flushing output")?;
    page.unmount();
    info!(phase = ?last_phase, "preview finished");
    Ok(())
}

fn write_frame(out: &mut impl Write, frame: &FrameSnapshot, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, frame).context("encoding frame")?;
        writeln!(out)?;
        return Ok(());
    }

    let logo = frame
        .intro
        .as_ref()
        .map(|c| format!(" logo={:.2} glow={}", c.logo_scale, c.title_glow.to_css()))
        .unwrap_or_default();
    writeln!(
        out,
        "t={:>6}ms phase={:<8} particles={:>3} ambient={:>2} content={:.2} overlay={:.2}{}",
        frame.time_ms,
        format!("{:?}", frame.phase).to_lowercase(),
        frame.particles.len(),
        frame.ambient.len(),
        frame.gate.opacity,
        frame.gate.overlay_opacity,
        logo,
    )?;
    Ok(())
}
