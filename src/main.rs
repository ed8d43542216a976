//! Native carousel window
//!
//! Usage: `scroll-carousel [config.toml|config.json]`

use anyhow::{Context, Result};
use scroll_carousel::{load_config, CarouselConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("[main] Loading config from {}", path);
            load_config(&path).with_context(|| format!("loading {path}"))?
        }
        None => CarouselConfig::default(),
    };

    scroll_carousel::native::run(config)
}
