/// objview - view Wavefront OBJ models in the terminal
///
/// Every file given on the command line is loaded, normalized into the unit
/// cube and drawn in the same view. Controls:
///   - Arrows / WASD, E/R, mouse drag: Rotate
///   - H/J/K/L, U/O: Move
///   - +/-, mouse wheel: Scale
///   - C: Center, N: Normalize
///   - Tab: Cycle the selected model
///   - Q/ESC: Quit

use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use objview_core::load_obj;
use objview_terminal::{TerminalApp, ViewerConfig};

#[derive(Parser)]
#[command(name = "objview")]
#[command(about = "Interactive terminal viewer for Wavefront OBJ models")]
#[command(version)]
struct Cli {
    /// OBJ files to display.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Degrees per rotation key press or dragged cell.
    #[arg(long, default_value_t = ViewerConfig::default().rotate_step)]
    rotate_step: f64,

    /// Model units per move key press.
    #[arg(long, default_value_t = ViewerConfig::default().move_step)]
    move_step: f64,

    /// Scale factor per zoom step.
    #[arg(long, default_value_t = ViewerConfig::default().zoom_step)]
    zoom_step: f64,

    /// Target frames per second.
    #[arg(long, default_value_t = ViewerConfig::default().fps,
          value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,
}

impl Cli {
    fn config(&self) -> ViewerConfig {
        ViewerConfig {
            rotate_step: self.rotate_step,
            move_step: self.move_step,
            zoom_step: self.zoom_step,
            fps: self.fps,
        }
    }
}

fn is_obj(path: &std::path::Path) -> bool {
    path.extension().map_or(false, |ext| ext == "obj")
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Some(path) = cli.files.iter().find(|path| !is_obj(path)) {
        eprintln!("{} is not an .obj file", path.display());
        eprintln!("Usage: objview [OPTIONS] <FILE>.obj...");
        return Ok(ExitCode::FAILURE);
    }

    let mut models = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match load_obj(path) {
            Ok(model) => models.push(model),
            Err(err) => {
                eprintln!("Cannot parse file {}: {}", path.display(), err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    info!("Loaded {} model(s)", models.len());

    let mut app = TerminalApp::new(models, cli.config())?;
    app.run()?;

    Ok(ExitCode::SUCCESS)
}
