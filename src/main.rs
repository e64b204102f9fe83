// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Binary entry point: configuration, tracing, and server startup.

use std::process;

use badgecast::{AppState, Error, Settings, serve, spawn_cache_sweeper};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::parse();
    if let Err(err) = run(settings).await {
        error!("{err}");
        process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), Error> {
    let (state, cache) = AppState::from_settings(&settings)?;

    if let Some(interval) = settings.cache_sweep_interval() {
        spawn_cache_sweeper(cache, interval);
    }

    serve(&settings, state).await
}
