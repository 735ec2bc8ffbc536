//! Maplink diagnostics CLI.
//!
//! Small tool for checking connectivity against a basemap service: whether
//! the font endpoint answers, which glyph URL clients would resolve, and
//! what the service catalogue advertises.

mod commands;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::error;

use maplink::client::{LicenseSource, SharedLicense, StaticClientFactory};
use maplink::http::{AsyncHttpClient, AsyncReqwestClient};
use maplink::service::BasemapService;
use maplink::settings::BasemapSettings;

#[derive(Parser)]
#[command(name = "maplink", version, about = "Basemap service connectivity diagnostics")]
struct Cli {
    /// Root URL of the basemap service.
    #[arg(long)]
    service_url: String,

    /// Font library URL template with {fontstack} and {range} placeholders.
    /// Defaults to <service-url>/fonts/{fontstack}/{range}.
    #[arg(long)]
    font_url: Option<String>,

    /// Path prefix for locally served fallback URLs.
    #[arg(long, default_value = "")]
    base_path: String,

    /// Active license id sent to the service.
    #[arg(long)]
    license: Option<String>,

    /// Treat the remote service as disabled.
    #[arg(long)]
    disabled: bool,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service status: enablement, font access, glyph URL, catalogue.
    Status,

    /// Probe the remote font endpoint; the exit code reflects reachability.
    Probe,

    /// Print the glyph URL template clients should use.
    Glyphs,
}

impl Cli {
    fn settings(&self) -> BasemapSettings {
        let font_url = self.font_url.clone().unwrap_or_else(|| {
            format!(
                "{}/fonts/{{fontstack}}/{{range}}",
                self.service_url.trim_end_matches('/')
            )
        });
        BasemapSettings::new(self.service_url.clone(), font_url)
            .with_enabled(!self.disabled)
            .with_base_path(self.base_path.clone())
    }

    fn license(&self) -> Arc<dyn LicenseSource> {
        match &self.license {
            Some(id) => Arc::new(SharedLicense::with_id(id.clone())),
            None => Arc::new(SharedLicense::new()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    maplink::logging::init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let http: Arc<dyn AsyncHttpClient> =
        match AsyncReqwestClient::with_timeout(Duration::from_secs(cli.timeout)) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!(error = %e, "Failed to set up HTTP client");
                return ExitCode::FAILURE;
            }
        };
    let factory = Arc::new(StaticClientFactory::new(
        settings.service_origin.clone(),
        Arc::clone(&http),
    ));
    let service = BasemapService::new(settings, factory, cli.license(), http);

    match cli.command {
        Commands::Status => commands::status(&service).await,
        Commands::Probe => commands::probe(&service).await,
        Commands::Glyphs => commands::glyphs(&service).await,
    }
}
