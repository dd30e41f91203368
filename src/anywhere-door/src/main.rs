//! Anywhere Door — AI-powered travel planning funnel.
//!
//! Main entry point that wires the wizard controller, capture services, and
//! voice bridge, then starts the server.

use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use door_api::rest::AppState;
use door_api::ApiServer;
use door_core::config::AppConfig;
use door_core::event_bus::{EventSink, LogSink};
use door_core::notify::{LogNotifier, Notifier};
use door_outbound::{HttpTransport, ReverseGeocoder, WebhookClient, WebhookTransport};
use door_planner::{CaptureService, TripService};
use door_voice_bridge::{VoiceBridge, VoiceWidgetConfig};
use door_wizard::WizardController;

#[derive(Parser, Debug)]
#[command(name = "anywhere-door")]
#[command(about = "AI-powered travel planning funnel")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "ANYWHERE_DOOR__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "ANYWHERE_DOOR__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Trip-planner webhook URL (overrides config)
    #[arg(long, env = "ANYWHERE_DOOR__WEBHOOK__TRIP_PLANNER_URL")]
    trip_webhook: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anywhere_door=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Anywhere Door starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(url) = cli.trip_webhook {
        config.webhook.trip_planner_url = url;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        trip_webhook = %config.webhook.trip_planner_url,
        "Configuration loaded"
    );

    // The embed credentials ship to the page; a malformed pair means the
    // widget will never come up, so flag it at startup.
    let widget = VoiceWidgetConfig::from_credentials(&config.widget);
    if let Err(e) = widget.validate() {
        warn!(error = %e, "Voice widget embed configuration is invalid");
    }

    let event_sink: Arc<dyn EventSink> = Arc::new(LogSink);
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let transport: Arc<dyn WebhookTransport> =
        Arc::new(HttpTransport::new(config.webhook.timeout_ms)?);
    let webhooks = Arc::new(WebhookClient::new(transport));
    let geocoder = Arc::new(ReverseGeocoder::new(config.geocode.clone())?);

    let controller = Arc::new(WizardController::new().with_event_sink(event_sink.clone()));
    let capture = Arc::new(
        CaptureService::new(
            webhooks.clone(),
            notifier.clone(),
            config.webhook.user_details_url.clone(),
        )
        .with_event_sink(event_sink.clone()),
    );
    let trips = Arc::new(
        TripService::new(
            webhooks.clone(),
            notifier.clone(),
            config.webhook.trip_planner_url.clone(),
        )
        .with_event_sink(event_sink.clone()),
    );

    // Single consumer for everything the widget sends inbound.
    let (voice, _voice_task) = VoiceBridge::new(webhooks.clone(), config.webhook.voice_url.clone())
        .with_notifier(notifier.clone())
        .with_event_sink(event_sink.clone())
        .spawn(64);

    let state = AppState {
        controller,
        capture,
        trips,
        geocoder,
        voice,
        node_id: config.node_id.clone(),
        start_time: Instant::now(),
    };

    let api_server = ApiServer::new(config.clone(), state);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Anywhere Door is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
