// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction and plays
// the part of the display sink: it reads a saved drawing,
// hands it to a PredictionSession and prints what comes back.
//
//   1. `predict`   — classify a drawing
//   2. `rasterize` — print the occupancy grid only
//   3. `inspect`   — load a model and print its shape
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, InspectArgs, PredictArgs, RasterizeArgs};

use crate::application::prediction_session::{PredictionSession, SessionConfig};
use crate::data::pixel_loader::PixelDumpFile;
use crate::domain::grid::OccupancyGrid;
use crate::domain::prediction::{Outcome, PredictionResult};
use crate::domain::traits::DrawingSurface;

const BAR_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "doodle-digits",
    version = "0.1.0",
    about = "Rasterize a hand-drawn digit and classify it with a linear softmax model."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching subcommand; this layer only routes and prints.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Predict(args)   => self.run_predict(args),
            Commands::Rasterize(args) => self.run_rasterize(args),
            Commands::Inspect(args)   => self.run_inspect(args),
        }
    }

    fn run_predict(&self, args: &PredictArgs) -> Result<()> {
        let config  = SessionConfig::from(args);
        let session = PredictionSession::from_config(&config)?;
        let surface = PixelDumpFile::new(&args.image);

        tracing::info!("Classifying '{}' with model '{}'", args.image, config.model_location);

        let (grid, outcome) = classify(&session, &surface, args.show_grid)
            .with_context(|| format!("Cannot classify '{}'", args.image))?;
        if let Some(grid) = grid {
            print!("{grid}");
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            return Ok(());
        }

        match outcome {
            Outcome::Prediction(result) => print_probabilities(&result),
            Outcome::Skipped            => println!("Nothing drawn, prediction skipped."),
        }
        Ok(())
    }

    fn run_rasterize(&self, args: &RasterizeArgs) -> Result<()> {
        let session = PredictionSession::from_config(&SessionConfig::from(args))?;
        let buffer  = PixelDumpFile::new(&args.image)
            .snapshot()
            .with_context(|| format!("Cannot read drawing '{}'", args.image))?;

        let grid = session.rasterize(&buffer)?;
        print!("{grid}");
        println!("{} of {} cells set", grid.occupied_count(), grid.size() * grid.size());
        Ok(())
    }

    fn run_inspect(&self, args: &InspectArgs) -> Result<()> {
        let session = PredictionSession::from_config(&SessionConfig::from(args))?;
        let model   = session
            .preload()
            .with_context(|| format!("Cannot load model '{}'", args.model))?;

        println!("Model:    {}", args.model);
        println!("Classes:  {}", model.classes());
        println!("Features: {}", model.features());
        println!("Epoch:    {}", model.epoch());
        Ok(())
    }
}

/// Classify the surface. With `with_grid` the surface is read once and
/// the returned grid is the one the classifier saw.
fn classify(
    session:   &PredictionSession,
    surface:   &dyn DrawingSurface,
    with_grid: bool,
) -> crate::domain::error::Result<(Option<OccupancyGrid>, Outcome)> {
    if !with_grid {
        return Ok((None, session.submit_from(surface)?));
    }
    let buffer  = surface.snapshot()?;
    let grid    = session.rasterize(&buffer)?;
    let outcome = session.submit(&buffer)?;
    Ok((Some(grid), outcome))
}

fn print_probabilities(result: &PredictionResult) {
    println!(
        "\nPrediction: {} ({:.1}%)\n",
        result.argmax(),
        result.confidence() * 100.0
    );
    for (digit, &p) in result.probabilities().iter().enumerate() {
        let bar = "#".repeat((p * BAR_WIDTH as f32).round() as usize);
        println!("  {digit}  {p:.4}  {bar}");
    }
}
