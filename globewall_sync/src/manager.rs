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

//! the surface manager owns the shared state and the set of surfaces. It is the only place where
//! user commands, system events, scheduler ticks and relayed data come together, and it runs as a
//! single task so that all of them are processed in order

use std::sync::Arc;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug,error,info};
use globewall_common::{
    datetime::{Clock, SharedClock},
    geo::Location,
    store::{LocalStore, PrefsStore},
    terminator::TerminatorPair,
};

use crate::{
    config::GlobeWallConfig,
    display::{DisplayId, DisplayTopology},
    errors::{GlobeWallError, Result},
    lifecycle::{LifecycleController, LifecycleState, SystemEvent},
    msg::{DataKind, RelayEnvelope, SurfaceCmd},
    prefs::{self, Layer, SharedState, UnitSystem, ZoomLevel},
    provider::SharedProvider,
    relay::{DataRelayBus, RelayStats},
    renderer::SurfaceFactory,
    scheduler::BackgroundScheduler,
    surface::{SurfaceContext, SurfaceHandle, SurfaceSeed, spawn_surface},
};

/// user commands (the menu)
#[derive(Debug,Clone)]
pub enum ManagerCmd {
    SetLocation(Location),
    SetMapToken(String),
    SetPollenKey(String),
    SetUnitSystem(UnitSystem),
    SetZoom(ZoomLevel),
    SetLayer(Layer,bool),
    SetPaused(bool),
    CreateSurfaces(DisplayTopology),
    RebuildSurfaces(DisplayTopology),
}

#[derive(Debug)]
pub enum ManagerMsg {
    Cmd(ManagerCmd),
    System(SystemEvent),
    Relay(RelayEnvelope),
    BackgroundTick,
    ClockTick,
    Status(oneshot::Sender<ManagerStatus>),
    Terminate,
}

impl From<ManagerCmd> for ManagerMsg {
    fn from (cmd: ManagerCmd)->Self { ManagerMsg::Cmd(cmd) }
}

impl From<SystemEvent> for ManagerMsg {
    fn from (event: SystemEvent)->Self { ManagerMsg::System(event) }
}

#[derive(Debug,Clone,PartialEq)]
pub struct SurfaceStatus {
    pub index: usize,
    pub display: DisplayId,
    pub is_primary: bool,
    pub generation: u64,
    pub running: bool,
}

#[derive(Debug,Clone)]
pub struct ManagerStatus {
    pub state: SharedState,
    pub lifecycle: LifecycleState,
    pub generation: u64,
    pub surfaces: Vec<SurfaceStatus>,
    pub scheduler_running: bool,
    pub relay: Vec<(DataKind,RelayStats)>,
}

impl ManagerStatus {
    pub fn relay_stats (&self, kind: DataKind)->RelayStats {
        self.relay.iter().find( |(k,_)| *k == kind).map( |(_,s)| *s).unwrap_or_default()
    }
}

pub struct SurfaceManager {
    config: Arc<GlobeWallConfig>,
    state: SharedState,
    prefs_store: PrefsStore,
    factory: Box<dyn SurfaceFactory>,
    ctx: SurfaceContext,

    topology: DisplayTopology,
    surfaces: Vec<SurfaceHandle>,
    generation: u64,
    terminator: Option<Arc<TerminatorPair>>,

    scheduler: BackgroundScheduler,
    lifecycle: LifecycleController,
    relay: DataRelayBus,
}

impl SurfaceManager {
    pub fn new (config: Arc<GlobeWallConfig>, prefs_store: PrefsStore, cache: LocalStore, factory: Box<dyn SurfaceFactory>,
                provider: SharedProvider, clock: SharedClock, hself: AsyncSender<ManagerMsg>)->Self
    {
        let state = SharedState::load( &prefs_store);
        info!("initial state: units={}, location={:?}, map token {}, pollen key {}",
              state.prefs.unit_system, state.location.as_ref().map( |l| l.name.as_str()),
              if state.prefs.map_token.is_empty() { "missing" } else { "set" },
              if state.prefs.pollen_key.is_empty() { "missing" } else { "set" });

        let scheduler = BackgroundScheduler::new( config.background_interval, config.clock_interval);
        let ctx = SurfaceContext { config: config.clone(), provider, clock, cache, manager: hself };

        SurfaceManager {
            config, state, prefs_store, factory, ctx,
            topology: DisplayTopology::default(),
            surfaces: Vec::new(),
            generation: 0,
            terminator: None,
            scheduler,
            lifecycle: LifecycleController::new(),
            relay: DataRelayBus::new(),
        }
    }

    pub fn state (&self)->&SharedState { &self.state }

    pub fn surfaces (&self)->&[SurfaceHandle] { &self.surfaces }

    fn primary (&self)->Option<&SurfaceHandle> {
        self.surfaces.iter().find( |s| s.is_primary)
    }

    fn broadcast (&self, cmd: SurfaceCmd) {
        for surface in &self.surfaces {
            surface.try_send( cmd.clone());
        }
    }

    fn send_to_primary (&self, cmd: SurfaceCmd) {
        if let Some(primary) = self.primary() {
            primary.try_send(cmd);
        }
    }

    fn seed (&self)->SurfaceSeed {
        SurfaceSeed {
            prefs: self.state.prefs.clone(),
            location: self.state.effective_location( &self.config.default_location),
            paused: self.state.paused,
            terminator: self.terminator.clone(),
        }
    }

    /* #region surfaces */

    /// one surface per display, the first one being the primary. Existing surfaces are torn down first
    pub fn create_surfaces (&mut self, topology: DisplayTopology) {
        self.teardown_surfaces();
        self.generation += 1;

        let seed = self.seed();
        for display_id in &topology.displays {
            let index = self.surfaces.len();
            match self.factory.create_renderer( index, display_id) {
                Ok(renderer) => {
                    let handle = spawn_surface( index, display_id.clone(), self.generation, seed.clone(), renderer, self.ctx.clone());
                    self.surfaces.push(handle);
                }
                Err(e) => error!("failed to create renderer for display {}: {}", display_id, e)
            }
        }

        info!("created {} surfaces for displays {} (generation {})", self.surfaces.len(), topology, self.generation);
        self.topology = topology;
    }

    /// topology changed: discard all surfaces (and whatever they fetched) and start over
    pub fn rebuild_surfaces (&mut self, topology: DisplayTopology) {
        info!("rebuilding surfaces for displays {}", topology);
        self.create_surfaces(topology);
    }

    fn teardown_surfaces (&mut self) {
        for surface in self.surfaces.drain(..) {
            surface.terminate();
        }
    }

    /* #endregion surfaces */

    /* #region user commands */

    pub fn handle_cmd (&mut self, cmd: ManagerCmd) {
        match cmd {
            ManagerCmd::SetLocation(loc) => self.set_location(loc),
            ManagerCmd::SetMapToken(token) => self.set_map_token(token),
            ManagerCmd::SetPollenKey(key) => self.set_pollen_key(key),
            ManagerCmd::SetUnitSystem(units) => self.set_unit_system(units),
            ManagerCmd::SetZoom(zoom) => self.set_zoom(zoom),
            ManagerCmd::SetLayer(layer, enabled) => self.set_layer_toggle( layer, enabled),
            ManagerCmd::SetPaused(paused) => self.set_paused(paused),
            ManagerCmd::CreateSurfaces(topology) => self.create_surfaces(topology),
            ManagerCmd::RebuildSurfaces(topology) => self.rebuild_surfaces(topology),
        }
    }

    pub fn set_location (&mut self, loc: Location) {
        prefs::persist_location( &mut self.prefs_store, &loc);
        self.state.location = Some( loc.clone());
        self.broadcast( SurfaceCmd::SetLocation(loc));
    }

    pub fn set_map_token (&mut self, token: String) {
        let token = token.trim().to_string();
        prefs::persist_str( &mut self.prefs_store, prefs::MAP_TOKEN_KEY, &token);
        self.state.prefs.map_token = token.clone();
        self.broadcast( SurfaceCmd::SetMapToken(token));
    }

    pub fn set_pollen_key (&mut self, key: String) {
        let key = key.trim().to_string();
        prefs::persist_str( &mut self.prefs_store, prefs::POLLEN_KEY_KEY, &key);
        self.state.prefs.pollen_key = key.clone();
        self.broadcast( SurfaceCmd::SetPollenKey(key));
    }

    pub fn set_unit_system (&mut self, units: UnitSystem) {
        prefs::persist_str( &mut self.prefs_store, prefs::UNIT_SYSTEM_KEY, units.as_str());
        self.state.prefs.unit_system = units;
        self.broadcast( SurfaceCmd::SetUnitSystem(units));
    }

    pub fn set_zoom (&mut self, zoom: ZoomLevel) {
        self.state.prefs.zoom = zoom;
        self.broadcast( SurfaceCmd::SetZoom(zoom));
    }

    pub fn set_layer_toggle (&mut self, layer: Layer, enabled: bool) {
        self.state.prefs.toggles.set( layer, enabled);
        self.broadcast( SurfaceCmd::SetLayer( layer, enabled));
    }

    pub fn set_paused (&mut self, paused: bool) {
        if self.lifecycle.set_paused(paused) {
            self.apply_pause(paused);
        }
    }

    /* #endregion user commands */

    /* #region lifecycle */

    pub fn handle_system_event (&mut self, event: SystemEvent) {
        match event {
            SystemEvent::DisplaysChanged(topology) => self.rebuild_surfaces(topology),
            event => {
                if let Some(state) = self.lifecycle.on_event(&event) {
                    self.apply_pause( state == LifecycleState::Paused);
                }
            }
        }
    }

    fn apply_pause (&mut self, paused: bool) {
        self.state.paused = paused;

        if paused {
            self.scheduler.stop();
            self.broadcast( SurfaceCmd::SetPaused(true));
        } else {
            self.broadcast( SurfaceCmd::SetPaused(false));
            // the sun moved while we were paused, but nothing here needs the network
            self.publish_terminators();
            self.scheduler.resume( &self.ctx.manager);
        }
    }

    /* #endregion lifecycle */

    /* #region scheduled tasks */

    pub fn start (&mut self) {
        if !self.state.paused {
            self.scheduler.start( &self.ctx.manager);
        }
    }

    pub fn run_background_tasks (&mut self) {
        if self.state.paused { return }

        let toggles = self.state.prefs.toggles;
        if toggles.flights { self.send_to_primary( SurfaceCmd::RefreshFlights) }
        if toggles.weather_radar { self.send_to_primary( SurfaceCmd::RefreshRadar) }
        self.send_to_primary( SurfaceCmd::RefreshStaleWeather);

        self.publish_terminators();
    }

    pub fn clock_tick (&mut self) {
        if self.state.paused { return }
        self.broadcast( SurfaceCmd::ClockTick);
    }

    fn publish_terminators (&mut self) {
        let now = self.ctx.clock.now();
        let pair = Arc::new( TerminatorPair::compute( &now, self.config.twilight_offset, self.config.night_offset));
        debug!("sub-solar point {:.2},{:.2}", pair.twilight.sun.lat, pair.twilight.sun.lon);
        self.terminator = Some( pair.clone());
        self.broadcast( SurfaceCmd::SetTerminator(pair));
    }

    /* #endregion scheduled tasks */

    pub fn relay (&mut self, envelope: RelayEnvelope) {
        self.relay.relay( envelope, &self.surfaces, self.generation);
    }

    pub fn status (&self)->ManagerStatus {
        let kinds = [DataKind::Flights, DataKind::Weather, DataKind::Allergy, DataKind::RadarTileUrl];
        ManagerStatus {
            state: self.state.clone(),
            lifecycle: self.lifecycle.state(),
            generation: self.generation,
            surfaces: self.surfaces.iter().map( |s| SurfaceStatus {
                index: s.index, display: s.display.clone(), is_primary: s.is_primary, generation: s.generation, running: s.is_running()
            }).collect(),
            scheduler_running: self.scheduler.is_running(),
            relay: kinds.into_iter().map( |k| (k, self.relay.stats(k))).collect(),
        }
    }

    pub fn shutdown (&mut self) {
        self.scheduler.stop();
        self.teardown_surfaces();
        info!("surface manager shut down");
    }

    pub async fn run (mut self, rx: AsyncReceiver<ManagerMsg>) {
        self.start();

        while let Ok(msg) = rx.recv().await {
            match msg {
                ManagerMsg::Cmd(cmd) => self.handle_cmd(cmd),
                ManagerMsg::System(event) => self.handle_system_event(event),
                ManagerMsg::Relay(envelope) => self.relay(envelope),
                ManagerMsg::BackgroundTick => self.run_background_tasks(),
                ManagerMsg::ClockTick => self.clock_tick(),
                ManagerMsg::Status(tx) => { let _ = tx.send( self.status()); }
                ManagerMsg::Terminate => break,
            }
        }

        self.shutdown();
    }
}

/* #region handle **********************************************************************************/

/// what the menu, the OS event source and tests talk to
#[derive(Clone)]
pub struct ManagerHandle {
    tx: AsyncSender<ManagerMsg>,
}

impl ManagerHandle {
    pub async fn send (&self, msg: impl Into<ManagerMsg>)->Result<()> {
        self.tx.send( msg.into()).await.map_err( |e| GlobeWallError::ChannelClosed( e.to_string()))
    }

    pub async fn set_location (&self, loc: Location)->Result<()> { self.send( ManagerCmd::SetLocation(loc)).await }
    pub async fn set_map_token (&self, token: impl ToString)->Result<()> { self.send( ManagerCmd::SetMapToken( token.to_string())).await }
    pub async fn set_pollen_key (&self, key: impl ToString)->Result<()> { self.send( ManagerCmd::SetPollenKey( key.to_string())).await }
    pub async fn set_unit_system (&self, units: UnitSystem)->Result<()> { self.send( ManagerCmd::SetUnitSystem(units)).await }
    pub async fn set_zoom (&self, zoom: ZoomLevel)->Result<()> { self.send( ManagerCmd::SetZoom(zoom)).await }
    pub async fn set_layer_toggle (&self, layer: Layer, enabled: bool)->Result<()> { self.send( ManagerCmd::SetLayer( layer, enabled)).await }
    pub async fn set_paused (&self, paused: bool)->Result<()> { self.send( ManagerCmd::SetPaused(paused)).await }
    pub async fn rebuild_surfaces (&self, topology: DisplayTopology)->Result<()> { self.send( ManagerCmd::RebuildSurfaces(topology)).await }
    pub async fn system_event (&self, event: SystemEvent)->Result<()> { self.send(event).await }

    pub async fn status (&self)->Result<ManagerStatus> {
        let (tx, rx) = oneshot::channel();
        self.send( ManagerMsg::Status(tx)).await?;
        rx.await.map_err( |_| GlobeWallError::ChannelClosed("status query".into()))
    }

    pub async fn terminate (&self)->Result<()> {
        self.send( ManagerMsg::Terminate).await
    }
}

/// create the manager with surfaces for `topology` and start it
pub fn spawn_manager (config: Arc<GlobeWallConfig>, prefs_store: PrefsStore, cache: LocalStore, factory: Box<dyn SurfaceFactory>,
                      provider: SharedProvider, clock: SharedClock, topology: DisplayTopology)->(ManagerHandle, JoinHandle<()>)
{
    let (tx, rx) = kanal::bounded_async::<ManagerMsg>( config.channel_bound.max(16));
    let mut manager = SurfaceManager::new( config, prefs_store, cache, factory, provider, clock, tx.clone());
    manager.create_surfaces(topology);

    let jh = tokio::spawn( manager.run(rx));
    (ManagerHandle { tx }, jh)
}

/* #endregion handle */
