// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags:
//
//   predict   — classify a saved drawing
//   rasterize — show the occupancy grid a drawing turns into
//   inspect   — load a model and print its shape
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::prediction_session::SessionConfig;
use crate::domain::grid::{GRID_SIZE, MAX_GRID_SIZE};
use crate::domain::model::NUM_CLASSES;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a drawing with a linear model
    Predict(PredictArgs),

    /// Print the occupancy grid a drawing rasterizes to
    Rasterize(RasterizeArgs),

    /// Load a model and print its shape and epoch
    Inspect(InspectArgs),
}

/// Grid settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Side length of the occupancy grid
    #[arg(long, default_value_t = GRID_SIZE, value_parser = grid_size_parser())]
    pub grid_size: usize,

    /// Sample one point per cell without spreading ink to neighbours
    #[arg(long)]
    pub no_dilate: bool,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Pixel dump (JSON) of the drawing
    #[arg(long)]
    pub image: String,

    /// Model document: a file path or an http(s) URL
    #[arg(long, default_value = "model.json")]
    pub model: String,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also print the rasterized grid
    #[arg(long)]
    pub show_grid: bool,
}

#[derive(Args, Debug)]
pub struct RasterizeArgs {
    /// Pixel dump (JSON) of the drawing
    #[arg(long)]
    pub image: String,

    #[command(flatten)]
    pub grid: GridArgs,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Model document: a file path or an http(s) URL
    #[arg(long, default_value = "model.json")]
    pub model: String,

    /// Side length of the occupancy grid the model was trained on
    #[arg(long, default_value_t = GRID_SIZE, value_parser = grid_size_parser())]
    pub grid_size: usize,
}

/// Accepts 1..=MAX_GRID_SIZE so grid_size² can never overflow.
fn grid_size_parser() -> clap::builder::RangedU64ValueParser<usize> {
    clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_GRID_SIZE as u64)
}

/// The application layer never sees clap types.
impl From<&PredictArgs> for SessionConfig {
    fn from(a: &PredictArgs) -> Self {
        SessionConfig {
            grid_size:      a.grid.grid_size,
            classes:        NUM_CLASSES,
            dilate:         !a.grid.no_dilate,
            model_location: a.model.clone(),
        }
    }
}

impl From<&RasterizeArgs> for SessionConfig {
    fn from(a: &RasterizeArgs) -> Self {
        SessionConfig {
            grid_size: a.grid.grid_size,
            dilate:    !a.grid.no_dilate,
            ..SessionConfig::default()
        }
    }
}

impl From<&InspectArgs> for SessionConfig {
    fn from(a: &InspectArgs) -> Self {
        SessionConfig {
            grid_size:      a.grid_size,
            model_location: a.model.clone(),
            ..SessionConfig::default()
        }
    }
}
