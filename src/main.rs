//! localneo — local development server for NEO routing manifests.
//!
//! ```text
//! neo-app.json ──▶ manifest ──▶ routing (resolver + credentials)
//!                                   │
//!                                   ▼
//!                        RouteTable { proxies, mounts }
//!                                   │
//!                                   ▼
//! request ──▶ cookie rewrite ──▶ proxy match ──▶ static mounts
//!                                                    │ miss
//!                                                    ▼
//!                                     directory listing / sandbox / 404
//! ```

use std::path::PathBuf;
use std::process::Command;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use localneo::config::{self, ServeOptions};
use localneo::http::DevServer;
use localneo::manifest;
use localneo::routing::{CredentialSnapshot, RouteTable};

#[derive(Parser, Debug)]
#[command(name = "localneo")]
#[command(about = "Serve a NEO application locally from its routing manifest", version)]
struct Cli {
    /// Options file (TOML). Every option has a default, so the file may be absent.
    #[arg(short, long, default_value = "localneo.toml")]
    config: PathBuf,

    /// Routing manifest.
    #[arg(short, long, default_value = "neo-app.json")]
    manifest: PathBuf,

    /// Listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Project root the static root and templates are resolved against.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Static root, relative to the base directory.
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Index document served for directory requests.
    #[arg(long)]
    index: Option<String>,

    /// Component id substituted into the sandbox page.
    #[arg(long)]
    component: Option<String>,

    /// SAPUI5 version pin for the `sapui5` service route.
    #[arg(long = "sap-ui5")]
    sap_ui5: Option<String>,

    /// Serve over https.
    #[arg(long)]
    secure: bool,

    /// Open the browser once the server is listening.
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "localneo=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut options = config::load_options(&cli.config)?;
    apply_cli_overrides(&mut options, &cli);

    tracing::info!(
        port = options.port,
        base = %options.static_root().display(),
        secure = options.secure,
        "configuration loaded"
    );
    if options.sap_ui5.is_empty() {
        tracing::info!("SAPUI5 version not specified, latest will be used");
    } else {
        tracing::debug!(version = %options.sap_ui5, "SAPUI5 version pinned");
    }

    let manifest = manifest::load_manifest(&cli.manifest)?;

    // DEST_* material may live in a project-local .env file.
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    let credentials = CredentialSnapshot::capture();
    let table = RouteTable::build(&manifest, &options, &credentials);

    tracing::info!(
        proxies = table.proxies.len(),
        mounts = table.mounts.len(),
        "route table resolved"
    );

    let listener = TcpListener::bind(("localhost", options.port)).await?;

    if options.open {
        let url = format!(
            "{}://localhost:{}/{}",
            options.scheme(),
            options.port,
            options.index
        );
        tracing::info!(%url, "opening browser");
        open_in_browser(&url);
    }

    let server = DevServer::new(options, table)?;
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn apply_cli_overrides(options: &mut ServeOptions, cli: &Cli) {
    if let Some(port) = cli.port {
        options.port = port;
    }
    if let Some(base_dir) = &cli.base_dir {
        options.base_dir = base_dir.clone();
    }
    if let Some(base_path) = &cli.base_path {
        options.base_path = base_path.clone();
    }
    if let Some(index) = &cli.index {
        options.index = index.clone();
    }
    if let Some(component) = &cli.component {
        options.component = component.clone();
    }
    if let Some(sap_ui5) = &cli.sap_ui5 {
        options.sap_ui5 = sap_ui5.clone();
    }
    if cli.secure {
        options.secure = true;
    }
    if cli.open {
        options.open = true;
    }
}

/// Best-effort: a browser that fails to open is a warning, not an error.
fn open_in_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = "xdg-open";

    if let Err(error) = Command::new(opener).arg(url).spawn() {
        tracing::warn!(%error, %url, "could not open browser");
    }
}
