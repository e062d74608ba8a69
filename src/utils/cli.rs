use crate::{
    core::coordinator::CoordinatorConfig,
    image::size::TargetSize,
    utils::error::{AppError, AppResult},
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Downsample an image and optionally write the result
    #[command(name = "resolve")]
    Resolve(ResolveArgs),
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path, file:// URI or http(s):// URL of the source image
    pub locator: String,

    /// Target width in points
    #[arg(short = 'W', long)]
    pub width: Option<f64>,

    /// Target height in points
    #[arg(short = 'H', long)]
    pub height: Option<f64>,

    /// Points to pixels factor
    #[arg(short, long, default_value_t = 1.0)]
    pub scale: f64,

    /// Where to write the downsampled image
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of concurrent resolves to issue for the same image
    #[arg(short, long, default_value_t = 1)]
    pub repeat: usize,

    /// Maximum number of cached images (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub count_limit: usize,

    /// Maximum total cached bytes (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub cost_limit: usize,
}

impl ResolveArgs {
    pub fn target_size(&self) -> AppResult<TargetSize> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }

        match (self.width, self.height) {
            (Some(width), Some(height)) => Ok(TargetSize::size(width, height, self.scale)),
            (Some(width), None) => Ok(TargetSize::width(width, self.scale)),
            (None, Some(height)) => Ok(TargetSize::height(height, self.scale)),
            (None, None) => Err(AppError::InvalidArgument(
                "at least one of --width or --height is required".into(),
            )),
        }
    }

    pub fn callers(&self) -> usize {
        self.repeat.max(1)
    }

    pub fn config(&self) -> CoordinatorConfig {
        CoordinatorConfig::new(self.count_limit, self.cost_limit)
    }
}
