use anyhow::{Context, Result};
use clap::ValueEnum;
use sketchbook_common::SketchbookConfig;
use sketchbook_fractal::SierpinskiSketch;
use sketchbook_polyhedra::PolyhedraSketch;
use sketchbook_pong::PongGame;
use sketchbook_render::Sketch;
use sketchbook_solar::{Catalog, SolarSketch};

/// The sketches the desktop host can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SketchKind {
    Pong,
    Sierpinski,
    Solar,
    Polyhedra,
}

impl SketchKind {
    pub fn title(self) -> &'static str {
        match self {
            SketchKind::Pong => "Pong",
            SketchKind::Sierpinski => "Sierpinski Triangle",
            SketchKind::Solar => "Solar System",
            SketchKind::Polyhedra => "Polyhedra",
        }
    }
}

/// Construct the chosen sketch from configuration.
pub fn build(kind: SketchKind, config: &SketchbookConfig) -> Result<Box<dyn Sketch>> {
    let sketch: Box<dyn Sketch> = match kind {
        SketchKind::Pong => Box::new(PongGame::new(&config.pong)),
        SketchKind::Sierpinski => Box::new(SierpinskiSketch::new(&config.sierpinski)),
        SketchKind::Solar => {
            let catalog = Catalog::load_or_builtin(config.solar.catalog.as_deref())
                .context("loading planet catalog")?;
            Box::new(SolarSketch::new(&catalog, &config.solar, config.seed))
        }
        SketchKind::Polyhedra => Box::new(PolyhedraSketch::new(&config.polyhedra)),
    };
    tracing::info!(sketch = sketch.name(), "sketch created");
    Ok(sketch)
}
