use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use wayfarer::config::Config;
use wayfarer::console::{self, Command, LogMapView};
use wayfarer::engine::{Collaborators, Engine};
use wayfarer::error::{unexpected_error, Error};
use wayfarer::external::{ConfiguredPosition, NominatimGeocoder, OsrmRouteEstimator};
use wayfarer::store::FileStorage;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wayfarer=info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let (map, clicks) = LogMapView::new();
    let collaborators = Collaborators {
        position: Arc::new(ConfiguredPosition::new(config.position)),
        geocoder: Arc::new(NominatimGeocoder::new(&config)?),
        router: Arc::new(OsrmRouteEstimator::new(&config)?),
        storage: Box::new(FileStorage::new(&config.storage_dir)?),
        map: Box::new(map),
    };

    let engine = Engine::new(config, collaborators);

    let events = engine.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Some(line) = console::render_event(&event) {
                println!("{}", line);
            }
        }
    });

    engine.start().await;
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.map_err(|_| unexpected_error())? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                println!("! {}", err);
                continue;
            }
        };

        match console::execute(&engine, &clicks, command).await {
            Ok(output) => output.iter().for_each(|line| println!("{}", line)),
            Err(err) => println!("! {}", err),
        }
    }

    engine.shutdown().await;

    Ok(())
}
