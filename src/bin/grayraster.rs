//! grayraster - headless frame driver.
//!
//! Renders frames into an off-screen framebuffer and prints a terminal
//! preview of the last one.
//!
//! Run: `grayraster mandelbrot --frames 30`

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use grayraster::compute::{PoolMode, ScanlineEngine};
use grayraster::config::RenderConfig;
use grayraster::framebuffer::Framebuffer;
use grayraster::geometry::{load_line_drawing, load_polygon_drawing, Drawing, Matrix2, Point2};
use grayraster::output::{RecordingSurface, TerminalEncoder, TerminalMode};
use grayraster::render::{
    draw_line, fill_drawing, outline_drawing, stroke_drawing, ActiveEdgeFill, NaiveFill, PolygonFiller, Stroker,
};

/// grayraster: software rasterization into a grayscale framebuffer
#[derive(Parser, Debug)]
#[command(name = "grayraster")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Headless grayscale rasterization demos", long_about = None)]
struct Cli {
    /// Config file path (defaults to <config dir>/grayraster/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Framebuffer width (overrides config)
    #[arg(long)]
    width: Option<u32>,

    /// Framebuffer height (overrides config)
    #[arg(long)]
    height: Option<u32>,

    /// Number of frames (overrides config)
    #[arg(short, long)]
    frames: Option<u32>,

    /// Preview width in characters (0 disables the preview)
    #[arg(long, default_value = "80")]
    preview: u32,

    /// Use Unicode half blocks for the preview
    #[arg(long)]
    unicode: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Zoom into the Mandelbrot set on the row-parallel engine
    Mandelbrot {
        /// Worker count (0 = host parallelism; overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Worker pool strategy (overrides config)
        #[arg(long, value_enum)]
        pool: Option<PoolArg>,
    },

    /// Radial Bresenham lines every 10 degrees
    Starburst,

    /// Fill and outline a polygon drawing, rotating it each frame
    Polygons {
        /// Polygon-set file (count, then vertex count and `x y` lines per polygon)
        file: PathBuf,

        /// Uniform scale applied on load
        #[arg(short, long, default_value = "1.0")]
        scale: f64,

        /// Fill engine
        #[arg(long, value_enum, default_value = "active-edge")]
        engine: EngineArg,

        /// Outline thickness in pixels (1 = Bresenham)
        #[arg(long, default_value = "1.0")]
        thickness: f64,

        /// Rotation per frame in degrees
        #[arg(long, default_value = "5.0")]
        spin: f64,
    },

    /// Draw a line-segment file (`x1 y1 x2 y2` per line)
    Lines {
        /// Line file
        file: PathBuf,

        /// Uniform scale applied on load
        #[arg(short, long, default_value = "1.0")]
        scale: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PoolArg {
    Persistent,
    Scoped,
}

impl From<PoolArg> for PoolMode {
    fn from(arg: PoolArg) -> Self {
        match arg {
            PoolArg::Persistent => Self::Persistent,
            PoolArg::Scoped => Self::Scoped,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EngineArg {
    Naive,
    ActiveEdge,
}

type Fb = Framebuffer<RecordingSurface>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("{}x{}, {} frame(s)", config.width, config.height, config.frames);

    let mut fb = Framebuffer::with_surface(config.width, config.height, RecordingSurface::new())?;
    let started = Instant::now();

    match &cli.command {
        Command::Mandelbrot { workers, pool } => {
            let engine = ScanlineEngine::new(
                pool.map_or(config.pool, PoolMode::from),
                workers.unwrap_or(config.workers),
            )?;
            for frame in 0..config.frames {
                let view = config.mandelbrot.view(frame, config.width, config.height)?;
                engine.render(&mut fb, &view)?;
            }
        }
        Command::Starburst => {
            for _ in 0..config.frames {
                starburst(&mut fb);
            }
        }
        Command::Polygons { file, scale, engine, thickness, spin } => {
            let drawing = load_polygon_drawing(file, *scale)?;
            info!("loaded {} polygon(s) from {}", drawing.polygons().len(), file.display());
            let mut naive = NaiveFill::new();
            let mut active = ActiveEdgeFill::new();
            let mut stroker = Stroker::new();
            for frame in 0..config.frames {
                let xfm = fit(&drawing, &fb) * spin_about_center(&fb, f64::from(frame) * spin.to_radians());
                match engine {
                    EngineArg::Naive => leaf(&mut fb, &mut naive, &mut stroker, &drawing, &xfm, *thickness),
                    EngineArg::ActiveEdge => leaf(&mut fb, &mut active, &mut stroker, &drawing, &xfm, *thickness),
                }
            }
        }
        Command::Lines { file, scale } => {
            let drawing = load_line_drawing(file, *scale)?;
            info!("loaded {} line(s) from {}", drawing.loose_lines().len(), file.display());
            let xfm = fit(&drawing, &fb);
            for _ in 0..config.frames {
                let mut session = fb.session();
                session.clear(0);
                outline_drawing(&mut *session, &drawing, &xfm, 255);
            }
        }
    }

    report(&fb, started.elapsed(), config.frames);

    if cli.preview > 0 {
        let mode = if cli.unicode { TerminalMode::UnicodeHalfBlock } else { TerminalMode::Ascii };
        TerminalEncoder::new().mode(mode).width(cli.preview).print(&fb);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<RenderConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::load_or_default(
            dirs::config_dir().map(|p| p.join("grayraster/config.yaml")).unwrap_or_default(),
        ),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    config.validate()?;
    Ok(config)
}

fn starburst(fb: &mut Fb) {
    let (cx, cy) = (fb.width() as i32 / 2, fb.height() as i32 / 2);
    let radius = f64::from((cx.min(cy) - 1).max(0));
    let center = Point2::new(f64::from(cx), f64::from(cy));
    let mut session = fb.session();
    session.clear(0);
    for degrees in (0..360).step_by(10) {
        let (x, y) = center.radial_move(radius, f64::from(degrees).to_radians()).round();
        draw_line(&mut *session, cx, cy, x, y, 255);
    }
}

/// Fill on a light background, then outline in black.
fn leaf<F: PolygonFiller>(
    fb: &mut Fb,
    filler: &mut F,
    stroker: &mut Stroker,
    drawing: &Drawing,
    xfm: &Matrix2,
    thickness: f64,
) {
    let mut session = fb.session();
    session.clear(192);
    fill_drawing(&mut *session, filler, drawing, xfm, 255);
    if thickness > 1.0 {
        stroke_drawing(&mut *session, stroker, drawing, xfm, thickness, 0);
    } else {
        outline_drawing(&mut *session, drawing, xfm, 0);
    }
}

/// Scale and center `drawing` into the buffer with a 5% margin.
fn fit(drawing: &Drawing, fb: &Fb) -> Matrix2 {
    let bound = drawing.bound();
    if bound.is_empty() {
        return Matrix2::IDENTITY;
    }
    let (w, h) = (f64::from(fb.width()), f64::from(fb.height()));
    let scale = 0.9 * (w / bound.width()).min(h / bound.height());
    let mid = bound.midpoint();
    Matrix2::translation(Point2::ORIGIN - mid)
        * Matrix2::scaling(scale)
        * Matrix2::translation(Point2::new(w / 2.0, h / 2.0) - Point2::ORIGIN)
}

fn spin_about_center(fb: &Fb, theta: f64) -> Matrix2 {
    Matrix2::rotation_about(Point2::new(f64::from(fb.width()) / 2.0, f64::from(fb.height()) / 2.0), theta)
}

fn report(fb: &Fb, elapsed: Duration, frames: u32) {
    let commits = fb.surface().commits();
    let per_frame = elapsed / frames.max(1);
    info!("{} commit(s), last {:?}, {per_frame:?} per frame", commits.len(), fb.surface().last_commit());
}
