//! Level probe
//!
//! Loads a level bitstring into a grid shape and reports what the collision
//! layer sees: occupancy, solid rows and whether a corner-to-corner probe
//! segment hits anything.
//!
//! Usage: `level_probe <level.txt> [config.toml|config.ron]`

use std::process::ExitCode;

use collision2d::foundation::logging;
use collision2d::prelude::*;
use log::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("usage: level_probe <level.txt> [config.toml|config.ron]")]
    Usage,

    #[error("failed to read level {path}: {source}")]
    Level {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collision(#[from] CollisionError),
}

fn load_config(path: Option<&str>) -> Result<CollisionConfig, ProbeError> {
    let config = match path {
        Some(path) => {
            info!("Loading collision config from {path}");
            CollisionConfig::load_from_file(path)?
        }
        None => CollisionConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn probe(level_path: &str, config: &CollisionConfig) -> Result<(), ProbeError> {
    let source = std::fs::read_to_string(level_path).map_err(|source| ProbeError::Level {
        path: level_path.to_string(),
        source,
    })?;

    let grid = GridShape::from_bitstring_with_config(&source, 1.0, 1.0, config)?;
    let (columns, rows) = (grid.columns(), grid.rows());
    info!(
        "Level {}: {}x{} cells, {} occupied",
        level_path,
        columns,
        rows,
        grid.occupied_count()
    );
    if columns == 0 || rows == 0 {
        warn!("Level {level_path} is empty");
        return Ok(());
    }

    let solid_rows = (0..rows as i32)
        .filter(|&y| grid.check_row(0, y, columns as i32, Reduction::All))
        .count();
    info!("{solid_rows} solid row(s)");

    let diagonal = Segment::new(vec2(0.0, 0.0), vec2(columns as f32, rows as f32));
    let first_hit = grid
        .cells_on_segment(Vec2::zeros(), &diagonal)
        .find(|&(x, y)| grid.cell(x, y));
    let level = Shape::Grid(grid);
    let hit = collision_query::collide_segment(&level.to_world_space(None), &diagonal)?;
    match first_hit {
        Some((x, y)) => info!("Diagonal probe hit: {hit}, first occupied cell ({x}, {y})"),
        None => info!("Diagonal probe hit: {hit}"),
    }
    Ok(())
}

fn run(args: &[String]) -> Result<(), ProbeError> {
    let level_path = args.get(1).ok_or(ProbeError::Usage)?;
    let config = load_config(args.get(2).map(String::as_str))?;
    info!("Validation: {:?}", config.validation);
    probe(level_path, &config)
}

fn main() -> ExitCode {
    logging::init_with_default("info");

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
