use tracing::info;
use tracing_subscriber::EnvFilter;

use torus_life::record::INOTIFY_INFO_SIZE;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Size {}", INOTIFY_INFO_SIZE);
}
