//! A command line viewer of a terramap world.

use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use terramap::chunk::WorldBounds;
use terramap::map::WorldMap;
use terramap::view::Camera;

pub mod config;
pub mod render;

use config::{ConfigError, ViewArgs};


pub fn main() -> ExitCode {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }

}

fn run() -> Result<(), ConfigError> {

    let view = ViewArgs::parse(std::env::args().skip(1))?;
    let bounds = WorldBounds::DEFAULT;
    let mut map = WorldMap::new(bounds);

    if config::preload() {
        let workers = config::workers()?;
        info!("preloading {} chunks with {workers} workers", bounds.chunk_count());
        map.preload(workers);
    }

    let mut camera = Camera::new(view.camera.unwrap_or_else(|| bounds.center()));
    camera.set_zoom(view.zoom);

    let start = Instant::now();
    let visible = map.visible(&camera, view.viewport);
    info!("{} visible chunks resolved in {:?}", visible.len(), start.elapsed());

    let stats = map.cache().stats();
    info!("cache: {} chunks, {} generated in {:?}, {} hits, {} void",
        map.cache().len(), stats.generated, stats.generate_duration, stats.hits, stats.void_hits);

    print!("{}", render::render_overview(&visible));
    print!("{}", render::render_summary(&visible));

    Ok(())

}
