use clap::Parser;
use radar::config;
use radar::gui::app::{AppInit, AppModel};
use radar::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;
use sweep::RandomField;

#[derive(Parser, Debug)]
#[command(name = "radar", version, about = "Rotating radar sweep over a field of markers")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of markers to scatter (overrides the config file)
    #[arg(short, long)]
    markers: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => {
            let path = config::get_config_path()?;
            if let Err(e) = config::write_default_config(&path) {
                log::warn!("Could not write default config: {}", e);
            }
            path
        }
    };

    let mut config = config::load_or_default(&config_path);
    if let Some(count) = args.markers {
        config.scene.marker_count = count;
    }
    let radar = config.build_radar(&mut RandomField::default())?;
    log::info!(
        "Starting radar with {} categories and {} markers",
        radar.categories().len(),
        radar.field().len()
    );

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx);

    let app = RelmApp::new("org.radarscope.radar").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        radar,
        notify: config.notify,
        config_path,
        marker_override: args.markers,
        events: rx,
    });

    Ok(())
}
