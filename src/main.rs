use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ferroboard::{
    api,
    config::BoardConfig,
    models::{RefreshMode, Station, StationInfo},
    refresh::Refresher,
    render::{self, BucketLabels},
    widget::WidgetProjection,
};

#[derive(Parser)]
#[command(name = "ferroboard")]
#[command(about = "Real-time departure boards for the Belgrano Norte line")]
struct Cli {
    /// Upstream departures page (overrides FERROBOARD_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the board and widget over HTTP, refreshing in the background
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Station the board starts on
        #[arg(short, long)]
        station: Option<Station>,

        /// Seconds between silent board refreshes
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Station the widget follows (defaults to the board's station)
        #[arg(long)]
        widget_station: Option<Station>,

        /// Seconds between widget refreshes
        #[arg(long)]
        widget_interval_secs: Option<u64>,
    },
    /// Fetch and print the board for a station once
    Board {
        station: Station,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fetch and print the next departure in each direction once
    Widget {
        station: Station,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List stations and their upstream codes
    Stations,
}

/// Initialize tracing to stderr so stdout stays clean for board output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ferroboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn positive_secs(secs: Option<u64>, default: Duration) -> Duration {
    secs.filter(|s| *s > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = BoardConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    let labels = BucketLabels {
        inbound: config.inbound_label.clone(),
        outbound: config.outbound_label.clone(),
    };

    match cli.command {
        Some(Commands::Serve {
            port,
            station,
            interval_secs,
            widget_station,
            widget_interval_secs,
        }) => {
            if let Some(station) = station {
                config.station = station;
            }
            let refresh_interval = positive_secs(interval_secs, config.refresh_interval);
            let widget_interval =
                positive_secs(widget_interval_secs, config.widget_refresh_interval);
            serve(&config, port, refresh_interval, widget_station, widget_interval).await?;
        }
        Some(Commands::Board { station, json }) => {
            let refresher = Refresher::from_config(&config)?;
            let result = refresher.refresh(station, RefreshMode::Visible).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::render_board(&result, &labels));
            }
        }
        Some(Commands::Widget { station, json }) => {
            let widget = WidgetProjection::from_config(&config, station)?;
            let snapshot = widget.refresh().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render::render_widget(&snapshot, &labels));
            }
        }
        Some(Commands::Stations) => {
            for info in Station::ALL.into_iter().map(StationInfo::from) {
                println!("{:>4}  {:<22} {}", info.code, info.name, info.slug);
            }
        }
        None => {
            let refresh_interval = config.refresh_interval;
            let widget_interval = config.widget_refresh_interval;
            serve(&config, 3000, refresh_interval, None, widget_interval).await?;
        }
    }

    Ok(())
}

async fn serve(
    config: &BoardConfig,
    port: u16,
    refresh_interval: Duration,
    widget_station: Option<Station>,
    widget_interval: Duration,
) -> anyhow::Result<()> {
    let board = Arc::new(Refresher::from_config(config)?);
    let widget = Arc::new(WidgetProjection::from_config(
        config,
        widget_station.unwrap_or(config.station),
    )?);

    board.spawn_auto_refresh(refresh_interval);
    widget.spawn(widget_interval);

    let app = api::create_router(api::AppState::new(board, widget));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!(
        "ferroboard listening on http://127.0.0.1:{} (board: {}, every {}s)",
        port,
        config.station,
        refresh_interval.as_secs()
    );

    axum::serve(listener, app).await?;
    Ok(())
}
