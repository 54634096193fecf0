//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that open both stores
//! and wire them into a running [`MatcherTools`] handler.

use crate::config::MatcherConfig;
use crate::db::{self, StoreKind};
use crate::tools::MatcherTools;
use anyhow::Result;
use rmcp::ServiceExt;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

type SharedStore = Arc<Mutex<Connection>>;

/// Shared setup: open the person and trait stores.
fn setup_shared_state(config: MatcherConfig) -> Result<(SharedStore, SharedStore, Arc<MatcherConfig>)> {
    let persons_path = config.resolved_persons_db();
    let traits_path = config.resolved_traits_db();

    let persons = db::open_database(&persons_path, StoreKind::Persons)?;
    let traits = db::open_database(&traits_path, StoreKind::Traits)?;
    tracing::info!(
        persons = %persons_path.display(),
        traits = %traits_path.display(),
        combine = %config.scoring.combine,
        "stores ready"
    );

    Ok((
        Arc::new(Mutex::new(persons)),
        Arc::new(Mutex::new(traits)),
        Arc::new(config),
    ))
}

/// Start the MCP server with the transport named in config.
pub async fn serve(config: MatcherConfig) -> Result<()> {
    match config.server.transport.as_str() {
        "stdio" => serve_stdio(config).await,
        "http" | "sse" => serve_http(config).await,
        other => anyhow::bail!("unknown transport: {other}. Supported: stdio, http"),
    }
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MatcherConfig) -> Result<()> {
    tracing::info!("starting traits-matcher MCP server on stdio");

    let (persons, traits, config) = setup_shared_state(config)?;

    let tools = MatcherTools::new(persons, traits, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
pub async fn serve_http(config: MatcherConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting traits-matcher MCP server on HTTP");

    let (persons, traits, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || {
            Ok(MatcherTools::new(
                persons.clone(),
                traits.clone(),
                config.clone(),
            ))
        },
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
