// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A tiny in-process demo: wires up tracing, builds a block manager
//! over the built-in plug-in library, assembles a small graph, and
//! prints its status. No network transport — that surface stays out
//! of scope for this workspace (spec.md §1).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use streamtools_core::{Clock, LogBus, SystemClock};
use streamtools_manager::{BlockLibrary, BlockManager};
use streamtools_wire::{CreateBlockRequest, CreateConnectionRequest};

#[derive(Parser, Debug)]
#[command(name = "streamtools", about = "Run a small streaming dataflow demo graph")]
struct Cli {
    /// Message payload to push through the demo graph.
    #[arg(long, default_value = "42")]
    value: i64,
}

fn built_in_library() -> BlockLibrary {
    let mut lib = BlockLibrary::new();
    lib.register(streamtools_blocks::identity::KIND, streamtools_blocks::identity::factory);
    lib.register(streamtools_blocks::record::KIND, streamtools_blocks::record::factory);
    lib.register(streamtools_blocks::count::KIND, streamtools_blocks::count::factory);
    lib.register(streamtools_blocks::tolog::KIND, streamtools_blocks::tolog::factory);
    lib.register(streamtools_blocks::filter::KIND, streamtools_blocks::filter::factory);
    lib
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let (log, mut log_rx, _ui_rx) = LogBus::new();
    tokio::spawn(async move {
        while let Some(record) = log_rx.recv().await {
            tracing::info!(block_id = %record.id, kind = ?record.kind, data = %record.data, "log");
        }
    });

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let manager = BlockManager::new(built_in_library(), log, clock);

    let source = manager
        .create(Some(CreateBlockRequest { id: "source".into(), kind: streamtools_blocks::identity::KIND.into(), rule: None, position: None }))
        .await
        .context("creating source block")?;
    let sink = manager
        .create(Some(CreateBlockRequest { id: "sink".into(), kind: streamtools_blocks::record::KIND.into(), rule: None, position: None }))
        .await
        .context("creating sink block")?;
    manager
        .connect(Some(CreateConnectionRequest {
            id: "source-to-sink".into(),
            from_id: source.id.to_string(),
            to_id: sink.id.to_string(),
            to_route: "in".into(),
        }))
        .await
        .context("wiring source to sink")?;

    manager.send(source.id.as_str(), "in", serde_json::json!(cli.value)).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let last = manager.query(sink.id.as_str(), "last").await.context("querying sink")?;
    println!("sink last value: {last}");

    let status = manager.status_blocks().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
