use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod mcp_handler;
mod session;
mod use_cases;

use mcp_handler::{MCPHandler, stdio};
use session::Session;
use use_cases::{DrawUseCase, HistoryUseCase};

#[tokio::main]
async fn main() -> Result<()> {
    let config = megasena::config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Let's check your Mega-Sena numbers.");

    let session = Arc::new(Session::new(config));

    let draw_use_case = DrawUseCase::new(Arc::clone(&session));
    let history_use_case = HistoryUseCase::new(Arc::clone(&session));

    let handler = MCPHandler::new(Arc::new(draw_use_case), Arc::new(history_use_case));

    let (reader, writer) = stdio();

    handler.serve(reader, writer).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    Ok(())
}
