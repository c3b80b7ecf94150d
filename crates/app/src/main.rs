mod svg;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use waveview_core::{FrameHost, FrameToken, Size, TickOutcome, ViewConfig, WaveView};

use crate::svg::SvgSurface;

fn main() -> waveview_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            waves,
            ticks,
            tick_ms,
            pause_after,
            config,
            dump,
        } => run(
            waves,
            ticks,
            tick_ms,
            pause_after,
            config.as_deref(),
            dump.as_deref(),
        ),
        Commands::Snapshot {
            waves,
            ticks,
            width,
            height,
            output,
            config,
        } => snapshot(waves, ticks, width, height, &output, config.as_deref()),
    }
}

/// Host-side frame loop. Delivers whatever callback the view last asked
/// for; a cancelled callback is simply never delivered.
#[derive(Debug, Default)]
struct HeadlessHost {
    pending: Option<FrameToken>,
    redraws: usize,
}

impl FrameHost for HeadlessHost {
    fn schedule_frame(&mut self, token: FrameToken) {
        self.pending = Some(token);
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }

    fn request_redraw(&mut self) -> bool {
        self.redraws += 1;
        true
    }
}

impl HeadlessHost {
    fn deliver(&mut self, view: &mut WaveView, dt: f64) -> TickOutcome {
        match self.pending.take() {
            Some(token) => view.on_tick(token, dt, self),
            None => TickOutcome::Ignored,
        }
    }
}

fn load_config(path: Option<&Path>) -> waveview_core::Result<ViewConfig> {
    match path {
        Some(path) => ViewConfig::load(path),
        None => Ok(ViewConfig::default()),
    }
}

fn run(
    waves: usize,
    ticks: usize,
    tick_ms: u64,
    pause_after: Option<usize>,
    config: Option<&Path>,
    dump: Option<&Path>,
) -> waveview_core::Result<()> {
    let mut view = WaveView::new(load_config(config)?);
    view.add_default_waves(waves, 0)?;
    tracing::info!(waves, ticks, tick_ms, "starting animation");

    let mut host = HeadlessHost::default();
    let dt = tick_ms as f64 / 1000.0;
    view.start_animation(&mut host);

    for tick in 0..ticks {
        if pause_after == Some(tick) {
            view.pause_animation(&mut host);
            tracing::info!(tick, "host moved to background");
            for _ in 0..3 {
                host.deliver(&mut view, dt);
            }
            view.resume_animation(&mut host);
            tracing::info!(tick, "host returned to foreground");
        }

        host.deliver(&mut view, dt);
    }

    for (layer, wave) in view.stack().iter().enumerate() {
        tracing::info!(
            layer,
            phase = wave.phase(),
            angular_velocity = wave.angular_velocity(),
            "final phase"
        );
    }
    tracing::info!(redraws = host.redraws, "animation finished");

    if let Some(path) = dump {
        std::fs::write(path, view.snapshot_json()?)?;
        tracing::info!(path = %path.display(), "wrote state dump");
    }
    Ok(())
}

fn snapshot(
    waves: usize,
    ticks: usize,
    width: f64,
    height: Option<f64>,
    output: &Path,
    config: Option<&Path>,
) -> waveview_core::Result<()> {
    let mut view = WaveView::new(load_config(config)?);
    view.add_default_waves(waves, 0)?;

    let height = height.unwrap_or_else(|| view.preferred_height().ceil().max(1.0));
    let mut host = HeadlessHost::default();
    view.start_animation(&mut host);
    for _ in 0..ticks {
        host.deliver(&mut view, 1.0 / 60.0);
    }

    let mut surface = SvgSurface::new(Size::new(width, height));
    view.render(&mut surface);
    std::fs::write(output, surface.finish())?;
    tracing::info!(?output, width, height, "snapshot written");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Layered sine-wave animation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the animation through a simulated foreground/background cycle.
    Run {
        /// Number of default waves to stack.
        #[arg(short, long, default_value_t = 3)]
        waves: usize,
        /// Frames to deliver while in the foreground.
        #[arg(short, long, default_value_t = 120)]
        ticks: usize,
        /// Elapsed time carried by each frame.
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
        /// Send the host to the background before this frame.
        #[arg(long)]
        pause_after: Option<usize>,
        /// JSON view configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the final animation state and waves as JSON.
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Advance the animation and write the current frame as SVG.
    Snapshot {
        #[arg(short, long, default_value_t = 3)]
        waves: usize,
        /// Frames (at 60 fps) to advance before capturing.
        #[arg(short, long, default_value_t = 0)]
        ticks: usize,
        #[arg(long, default_value_t = 1080.0)]
        width: f64,
        /// Defaults to the height that fits every wave.
        #[arg(long)]
        height: Option<f64>,
        /// Path of the SVG file to write.
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
