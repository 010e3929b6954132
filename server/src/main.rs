use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// Serve related-book queries over HTTP.
#[derive(Parser, Debug)]
#[command(name = "server")]
struct Args {
    /// Directory holding books.json and meta.json; created on first write
    #[arg(long, env = "BOOKRANK_CATALOG", default_value = "./catalog")]
    catalog: String,
    /// Address to listen on
    #[arg(long, env = "BOOKRANK_HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "BOOKRANK_PORT", default_value_t = 8080)]
    port: u16,
}

impl Args {
    fn listen_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app = server::build_app(args.catalog.clone())
        .with_context(|| format!("loading catalog from {}", args.catalog))?;

    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, catalog = %args.catalog, "server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c, shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let args = Args::try_parse_from(["server"]).unwrap();
        assert_eq!(args.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn accepts_ipv6_hosts() {
        let args = Args::try_parse_from(["server", "--host", "::1", "--port", "9000", "--catalog", "/tmp/books"]).unwrap();
        assert_eq!(args.listen_addr().to_string(), "[::1]:9000");
        assert_eq!(args.catalog, "/tmp/books");
    }

    #[test]
    fn rejects_hostnames() {
        assert!(Args::try_parse_from(["server", "--host", "localhost"]).is_err());
    }
}
