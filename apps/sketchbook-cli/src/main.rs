use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use sketchbook_assets::{FallbackKind, TextureCache};
use sketchbook_common::{SketchbookConfig, SplitMix64};
use sketchbook_fractal::{MAX_DEPTH, SierpinskiSketch};
use sketchbook_input::{Action, ActionState};
use sketchbook_polyhedra::{BOB_LIMIT, PolyhedraSketch};
use sketchbook_pong::PongGame;
use sketchbook_render::{DebugTextRenderer, Frame, Renderer, Sketch};
use sketchbook_solar::{Catalog, SolarSketch};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shapes or draws printed in a frame dump unless `--dump` asks for all.
const DUMP_LIMIT: usize = 12;

#[derive(Parser)]
#[command(name = "sketchbook-cli", about = "Run sketches headless and check their invariants")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Simulate pong and check the ball and paddles stay on the canvas
    Pong {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Print one JSON snapshot per tick
        #[arg(long)]
        json: bool,
        /// Hold random paddle keys, reshuffled every 45 ticks
        #[arg(long)]
        random_input: bool,
    },
    /// Build the Sierpinski triangle and check the cutout count
    Sierpinski {
        /// Recursion depth (0 to 8)
        #[arg(short, long)]
        depth: Option<u32>,
    },
    /// Animate the polyhedra and check the bobbing range
    Polyhedra {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
    },
    /// Build and animate the solar system
    Solar {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Print every draw of the final frame
        #[arg(long)]
        dump: bool,
        /// Resolve every texture and print the cache report as JSON
        #[arg(long)]
        textures: bool,
    },
    /// Print the effective configuration as YAML
    Config {
        /// Configuration file to load (defaults when omitted)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config =
        SketchbookConfig::load_or_default(cli.config.as_deref()).context("loading configuration")?;

    tracing::debug!(
        assets = %config.assets_dir.display(),
        seed = config.seed,
        "configuration ready"
    );

    let output = match cli.command {
        Commands::Info => info(),
        Commands::Pong {
            frames,
            json,
            random_input,
        } => run_pong(&config, frames, json, random_input)?,
        Commands::Sierpinski { depth } => run_sierpinski(&config, depth)?,
        Commands::Polyhedra { frames } => run_polyhedra(&config, frames)?,
        Commands::Solar {
            frames,
            dump,
            textures,
        } => run_solar(&config, frames, dump, textures)?,
        Commands::Config { path } => {
            let config = match path {
                Some(p) => SketchbookConfig::load(&p)
                    .with_context(|| format!("loading {}", p.display()))?,
                None => config,
            };
            serde_yaml::to_string(&config)?
        }
    };
    print!("{output}");

    Ok(())
}

fn info() -> String {
    let mut out = format!("sketchbook-cli v{}\n", env!("CARGO_PKG_VERSION"));
    for line in [
        sketchbook_common::crate_info(),
        sketchbook_input::crate_info(),
        sketchbook_assets::crate_info(),
        sketchbook_render::crate_info(),
        sketchbook_pong::crate_info(),
        sketchbook_fractal::crate_info(),
        sketchbook_solar::crate_info(),
        sketchbook_polyhedra::crate_info(),
    ] {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn dump(frame: &Frame, full: bool) -> String {
    let renderer = if full {
        DebugTextRenderer::new()
    } else {
        DebugTextRenderer::with_limit(DUMP_LIMIT)
    };
    renderer.render(frame)
}

fn run_pong(config: &SketchbookConfig, frames: u64, json: bool, random_input: bool) -> Result<String> {
    let mut game = PongGame::new(&config.pong);
    let mut rng = SplitMix64::new(config.seed);
    let mut input = ActionState::new();
    let paddle_actions = [
        Action::LeftPaddleUp,
        Action::LeftPaddleDown,
        Action::RightPaddleUp,
        Action::RightPaddleDown,
    ];
    let dt = config.tick_interval() as f32;
    let mut out = String::new();
    tracing::info!(frames, random_input, "simulating pong");

    for tick in 0..frames {
        if random_input && tick % 45 == 0 {
            input.clear();
            for action in paddle_actions {
                if rng.next_f32() < 0.5 {
                    input.press(action);
                }
            }
        }
        game.tick(dt, &input);
        if json {
            writeln!(out, "{}", serde_json::to_string(&game.snapshot())?)?;
        }
        if !game.in_bounds() {
            tracing::error!(tick, "pong left the canvas");
            bail!("pong left the canvas at tick {tick}: {:?}", game.snapshot());
        }
    }

    tracing::info!(ticks = game.ticks(), "pong stayed in bounds");
    if !json {
        out.push_str(&dump(&game.frame(game.size().aspect()), false));
        writeln!(out, "{}", game.status())?;
        writeln!(out, "in bounds for {frames} ticks: OK")?;
    }
    Ok(out)
}

fn run_sierpinski(config: &SketchbookConfig, depth: Option<u32>) -> Result<String> {
    let mut sketch = SierpinskiSketch::new(&config.sierpinski);
    if let Some(depth) = depth {
        ensure!(depth <= MAX_DEPTH, "depth {depth} exceeds the maximum of {MAX_DEPTH}");
        sketch.set_depth(depth);
    }
    tracing::info!(depth = sketch.depth(), "building sierpinski triangle");
    let expected = (3usize.pow(sketch.depth()) - 1) / 2;
    ensure!(
        sketch.cutouts().len() == expected,
        "depth {} produced {} cutouts, expected {expected}",
        sketch.depth(),
        sketch.cutouts().len()
    );

    tracing::info!(cutouts = expected, "cutout count matches");
    let mut out = dump(&sketch.frame(1.0), false);
    writeln!(out, "{}", sketch.status())?;
    writeln!(out, "cutouts: {expected}: OK")?;
    Ok(out)
}

fn run_polyhedra(config: &SketchbookConfig, frames: u64) -> Result<String> {
    let mut sketch = PolyhedraSketch::new(&config.polyhedra);
    let assets = sketch.scene_assets();
    if let Err((key, e)) = assets.validate() {
        bail!("mesh {} is invalid: {e}", key.0);
    }

    tracing::info!(frames, objects = sketch.objects().len(), "animating polyhedra");
    let dt = config.tick_interval() as f32;
    let input = ActionState::new();
    let mut highest = f32::MIN;
    for _ in 0..frames {
        sketch.tick(dt, &input);
        for object in sketch.objects() {
            highest = highest.max(object.height());
        }
    }
    // One step past the limit is allowed before the direction flips.
    ensure!(
        highest <= BOB_LIMIT + 0.05,
        "an object rose to {highest}, above the bob limit {BOB_LIMIT}"
    );
    tracing::info!(highest, "bobbing stayed within range");

    let mut out = String::new();
    for (object, mesh) in sketch.objects().iter().zip(&assets.meshes) {
        writeln!(
            out,
            "{:<13} {:>3} vertices {:>3} indices  height {:+.3}",
            object.name,
            mesh.vertex_count(),
            mesh.index_count(),
            object.height()
        )?;
    }
    out.push_str(&dump(&sketch.frame(16.0 / 9.0), false));
    writeln!(out, "{}", sketch.status())?;
    Ok(out)
}

fn run_solar(config: &SketchbookConfig, frames: u64, full: bool, textures: bool) -> Result<String> {
    let catalog = Catalog::load_or_builtin(config.solar.catalog.as_deref())
        .context("loading planet catalog")?;
    let mut sketch = SolarSketch::new(&catalog, &config.solar, config.seed);
    tracing::info!(frames, planets = catalog.planets.len(), "simulating solar system");

    let system = sketch.system();
    ensure!(
        system.planets().len() == catalog.planets.len(),
        "built {} planets from a catalog of {}",
        system.planets().len(),
        catalog.planets.len()
    );
    ensure!(
        system.moon_count() == catalog.total_moons() as usize,
        "built {} moons, catalog lists {}",
        system.moon_count(),
        catalog.total_moons()
    );
    ensure!(
        system.asteroid_count() == config.solar.asteroids as usize,
        "built {} asteroids, configured {}",
        system.asteroid_count(),
        config.solar.asteroids
    );
    if let Err((key, e)) = system.assets().validate() {
        bail!("mesh {} is invalid: {e}", key.0);
    }

    let radii: Vec<f32> = system
        .planets()
        .iter()
        .map(|p| system.position_of(p.body).length())
        .collect();

    let dt = config.tick_interval() as f32;
    let input = ActionState::new();
    for _ in 0..frames {
        sketch.tick(dt, &input);
    }

    let system = sketch.system();
    for (planet, before) in system.planets().iter().zip(&radii) {
        let after = system.position_of(planet.body).length();
        ensure!(
            (after - before).abs() < 1e-3,
            "{} drifted from orbit radius {before} to {after}",
            planet.name
        );
    }

    tracing::info!(ticks = sketch.ticks(), "orbit radii stable");
    let mut out = dump(&sketch.frame(16.0 / 9.0), full);
    writeln!(out, "{}", sketch.status())?;
    writeln!(out, "orbit radii stable over {frames} ticks: OK")?;

    if textures {
        let assets = system.assets();
        let mut cache = TextureCache::new(&config.assets_dir);
        for path in assets.texture_paths() {
            cache.load_or_fallback(path, FallbackKind::Albedo);
        }
        let missing = cache.missing().count();
        if missing > 0 {
            tracing::warn!(
                missing,
                root = %cache.root().display(),
                "textures missing, fallbacks used"
            );
        }
        writeln!(out, "{}", cache.report_json()?)?;
        writeln!(out, "textures loaded: {}, missing: {missing}", cache.len())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn info_lists_every_crate() {
        let text = info();
        for name in ["common", "input", "assets", "render", "pong", "fractal", "solar", "polyhedra"] {
            assert!(text.contains(&format!("sketchbook-{name}")), "{name} missing");
        }
    }

    #[test]
    fn pong_runs_with_random_input() {
        let out = run_pong(&SketchbookConfig::default(), 2_000, false, true).unwrap();
        assert!(out.contains("Canvas 600x300"));
        assert!(out.contains("OK"));
    }

    #[test]
    fn pong_json_is_one_line_per_tick() {
        let out = run_pong(&SketchbookConfig::default(), 5, true, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[4].starts_with("{\"tick\":5"));
    }

    #[test]
    fn sierpinski_depths() {
        let config = SketchbookConfig::default();
        assert!(run_sierpinski(&config, None).unwrap().contains("cutouts: 13"));
        assert!(run_sierpinski(&config, Some(0)).unwrap().contains("cutouts: 0"));
        assert!(run_sierpinski(&config, Some(9)).is_err());
    }

    #[test]
    fn polyhedra_report() {
        let out = run_polyhedra(&SketchbookConfig::default(), 300).unwrap();
        assert!(out.contains("dodecahedron"));
        assert!(out.contains(" 60 vertices 108 indices"));
    }

    #[test]
    fn solar_keeps_orbits() {
        let out = run_solar(&SketchbookConfig::default(), 120, false, false).unwrap();
        assert!(out.contains("orbit radii stable"));
        assert!(out.contains("more"));
    }

    #[test]
    fn solar_texture_report_lists_missing_files() {
        let mut config = SketchbookConfig::default();
        config.assets_dir = "/nonexistent/images".into();
        let out = run_solar(&config, 1, true, true).unwrap();
        assert!(out.contains("\"missing\""));
        assert!(out.contains("space.jpg"));
        let summary = out.lines().last().unwrap();
        assert!(summary.starts_with("textures loaded: "));
        assert!(!summary.ends_with("missing: 0"));
    }
}
