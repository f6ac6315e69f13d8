/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{path::PathBuf, sync::Arc};
use anyhow::Result;
use clap::Parser;
use lazy_static::lazy_static;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use globewall_common::{datetime::system_clock, store::{LocalStore, PrefsStore}};
use globewall_sync::{
    config::{GlobeWallConfig, default_prefs_path},
    console::{CONSOLE_HELP, ConsoleCmd, parse_console_cmd},
    display::DisplayTopology,
    manager::{ManagerHandle, spawn_manager},
    provider::HttpDataProvider,
    renderer::{LogFactory, RecordingFactory, SurfaceFactory},
};

/// run the globe wallpaper engine with surfaces that render to the log
#[derive(Parser,Debug)]
#[command(version, about)]
struct CliOpts {
    /// RON config file (defaults are used if not set)
    #[arg(short,long)]
    config: Option<PathBuf>,

    /// JSON file with persisted preferences (default: <config-dir>/globewall/prefs.json)
    #[arg(short,long)]
    prefs: Option<PathBuf>,

    /// comma separated list of display names, the first one is the main display
    #[arg(short,long, default_value="main")]
    displays: String,

    /// record render updates in memory instead of logging them
    #[arg(long)]
    headless: bool,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::parse();
}

#[tokio::main]
async fn main()->Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .try_init();

    let config = match &ARGS.config {
        Some(path) => GlobeWallConfig::load(path)?,
        None => GlobeWallConfig::default()
    };

    let prefs = match ARGS.prefs.clone().or_else( default_prefs_path) {
        Some(path) => PrefsStore::open(&path),
        None => { warn!("no config dir, preferences will not be persisted"); PrefsStore::in_memory() }
    };

    let factory: Box<dyn SurfaceFactory> = if ARGS.headless { Box::new( RecordingFactory::new()) } else { Box::new( LogFactory) };
    let provider = Arc::new( HttpDataProvider::new( config.providers.clone())?);
    let topology = DisplayTopology::from_list( &ARGS.displays);

    let (hmgr, jh) = spawn_manager( Arc::new(config), prefs, LocalStore::new(), factory, provider, system_clock(), topology);
    info!("globewall running, type 'help' for commands");

    tokio::select! {
        res = process_console( hmgr.clone()) => { if let Err(e) = res { error!("console error: {}", e) } }
        _ = tokio::signal::ctrl_c() => { info!("interrupted") }
    }

    hmgr.terminate().await?;
    jh.await?;
    Ok(())
}

async fn process_console (hmgr: ManagerHandle)->Result<()> {
    let mut lines = BufReader::new( tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_console_cmd(&line) {
            Ok(Some(ConsoleCmd::Manager(cmd))) => hmgr.send(cmd).await?,
            Ok(Some(ConsoleCmd::System(event))) => hmgr.system_event(event).await?,
            Ok(Some(ConsoleCmd::Status)) => {
                let status = hmgr.status().await?;
                println!("{:#?}", status);
            }
            Ok(Some(ConsoleCmd::Help)) => println!("{}", CONSOLE_HELP),
            Ok(Some(ConsoleCmd::Quit)) => break,
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}
