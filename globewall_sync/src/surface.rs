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

//! one wallpaper surface per display.
//!
//! Each surface runs as its own task that owns its renderer and processes a single mailbox, so
//! everything a surface does is sequential. Network fetches run as separate tasks that report back
//! through the same mailbox. Only the primary surface fetches. Whatever it fetched is posted to the
//! manager which relays it to all surfaces, including the primary itself which ignores it.

use std::{future::Future, sync::Arc};
use chrono::{DateTime,Utc};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::AbortHandle;
use tracing::{debug,error,info,warn};
use globewall_common::{
    datetime::{Clock, SharedClock, elapsed_secs},
    geo::{Location, normalize_180},
    store::LocalStore,
    terminator::TerminatorPair,
};

use crate::{
    allergy::AllergyData,
    clock::clock_face,
    config::GlobeWallConfig,
    display::DisplayId,
    errors::GlobeWallError,
    flights::FlightSet,
    manager::ManagerMsg,
    msg::{FetchResult, RelayEnvelope, RelayMsg, SurfaceCmd, SurfaceMsg, SurfaceTick},
    prefs::{Layer, SharedPrefs, UnitSystem},
    provider::SharedProvider,
    renderer::{PlaceholderSlot, RenderUpdate, SurfaceRenderer},
    timer::TaskTimer,
    weather::{self, WeatherSnapshot},
};

pub const MAP_TOKEN_PLACEHOLDER: &str = "Waiting for map token…";
pub const POLLEN_KEY_PLACEHOLDER: &str = "Waiting for pollen API key…";

/// the complete state a new surface starts with
#[derive(Debug,Clone)]
pub struct SurfaceSeed {
    pub prefs: SharedPrefs,
    pub location: Location,
    pub paused: bool,
    pub terminator: Option<Arc<TerminatorPair>>,
}

impl SurfaceSeed {
    /// the seed as a command sequence, which is replayed into each new surface
    pub fn commands (&self)->Vec<SurfaceCmd> {
        let p = &self.prefs;
        let mut cmds = vec![
            SurfaceCmd::SetMapToken( p.map_token.clone()),
            SurfaceCmd::SetPollenKey( p.pollen_key.clone()),
            SurfaceCmd::SetUnitSystem( p.unit_system),
            SurfaceCmd::SetLocation( self.location.clone()),
            SurfaceCmd::SetZoom( p.zoom),
        ];
        for layer in Layer::ALL {
            cmds.push( SurfaceCmd::SetLayer( layer, p.toggles.get(layer)));
        }
        cmds.push( SurfaceCmd::SetPaused( self.paused));
        if let Some(t) = &self.terminator {
            cmds.push( SurfaceCmd::SetTerminator( t.clone()));
        }
        cmds
    }
}

/// everything a surface needs that is not its own state
#[derive(Clone)]
pub struct SurfaceContext {
    pub config: Arc<GlobeWallConfig>,
    pub provider: SharedProvider,
    pub clock: SharedClock,
    pub cache: LocalStore,
    pub manager: AsyncSender<ManagerMsg>,
}

/* #region handle **********************************************************************************/

/// the manager side of a running surface
pub struct SurfaceHandle {
    pub index: usize,
    pub display: DisplayId,
    pub is_primary: bool,
    pub generation: u64,
    tx: AsyncSender<SurfaceMsg>,
    task: AbortHandle,
}

impl SurfaceHandle {
    /// fire-and-forget delivery. Returns false if the message was dropped because the surface is
    /// gone or its mailbox is full
    pub fn try_send (&self, msg: impl Into<SurfaceMsg>)->bool {
        match self.tx.try_send( msg.into()) {
            Ok(true) => true,
            Ok(false) => { warn!("surface {} mailbox full, message dropped", self.index); false }
            Err(_) => { debug!("surface {} closed, message dropped", self.index); false }
        }
    }

    pub fn is_running (&self)->bool {
        !self.task.is_finished() && !self.tx.is_closed()
    }

    /// stop the surface right away. Pending messages and in-flight fetch results are dropped
    pub fn terminate (&self) {
        let _ = self.tx.try_send( SurfaceMsg::Terminate);
        let _ = self.tx.close();
        self.task.abort();
    }
}

/// create the surface task. The seed is applied synchronously before the task starts, then replayed
/// as commands ahead of anything else in the mailbox
pub fn spawn_surface (index: usize, display_id: DisplayId, generation: u64, seed: SurfaceSeed,
                      renderer: Box<dyn SurfaceRenderer>, ctx: SurfaceContext)->SurfaceHandle
{
    let is_primary = index == 0;
    let seed_cmds = seed.commands();
    let bound = ctx.config.channel_bound.max( seed_cmds.len() + 16);
    let (tx, rx) = kanal::bounded_async::<SurfaceMsg>(bound);

    let agent = SurfaceAgent::new( index, is_primary, generation, seed, renderer, ctx, tx.clone());
    for cmd in seed_cmds {
        let _ = tx.try_send( SurfaceMsg::Cmd(cmd));
    }

    let jh = tokio::spawn( agent.run(rx));
    info!("created surface {} on display {} (primary={}, generation={})", index, display_id, is_primary, generation);

    SurfaceHandle { index, display: display_id, is_primary, generation, tx, task: jh.abort_handle() }
}

/* #endregion handle */

/// failed fetches keep the last good data. Only non-transient failures are errors
fn log_fetch_error (what: &str, e: &GlobeWallError) {
    if e.is_transient() { warn!("{} fetch failed: {}", what, e) } else { error!("{} fetch failed: {}", what, e) }
}

/* #region agent ***********************************************************************************/

/// requests that are currently running, keyed by what they were asked for
#[derive(Default)]
struct InFlight {
    flights: bool,
    radar: bool,
    weather: Option<(Location,UnitSystem)>,
    allergy: Option<Location>,
}

pub struct SurfaceAgent {
    index: usize,
    is_primary: bool,
    generation: u64,

    ctx: SurfaceContext,
    hself: AsyncSender<SurfaceMsg>,
    renderer: Box<dyn SurfaceRenderer>,

    prefs: SharedPrefs,
    location: Location,
    paused: bool,

    flights: Option<Arc<FlightSet>>,
    weather: Option<Arc<WeatherSnapshot>>,
    allergy: Option<Arc<AllergyData>>,
    radar_url: Option<String>,
    terminator: Option<Arc<TerminatorPair>>,

    center_lon: f64,
    spin_origin_lon: f64,
    spin_started: DateTime<Utc>,

    flight_timer: TaskTimer,
    spin_timer: TaskTimer,
    in_flight: InFlight,
}

impl SurfaceAgent {
    fn new (index: usize, is_primary: bool, generation: u64, seed: SurfaceSeed,
            renderer: Box<dyn SurfaceRenderer>, ctx: SurfaceContext, hself: AsyncSender<SurfaceMsg>)->Self
    {
        let now = ctx.clock.now();
        let lon = seed.location.lon;

        SurfaceAgent {
            index, is_primary, generation, ctx, hself, renderer,
            prefs: seed.prefs,
            location: seed.location,
            paused: seed.paused,
            flights: None,
            weather: None,
            allergy: None,
            radar_url: None,
            terminator: seed.terminator,
            center_lon: lon,
            spin_origin_lon: lon,
            spin_started: now,
            flight_timer: TaskTimer::new( format!("surface-{}-flights", index)),
            spin_timer: TaskTimer::new( format!("surface-{}-spin", index)),
            in_flight: InFlight::default(),
        }
    }

    async fn run (mut self, rx: AsyncReceiver<SurfaceMsg>) {
        self.load_content();

        while let Ok(msg) = rx.recv().await {
            match msg {
                SurfaceMsg::Cmd(cmd) => self.handle_cmd(cmd),
                SurfaceMsg::Relay(msg) => self.handle_relay(msg),
                SurfaceMsg::Tick(tick) => self.handle_tick(tick),
                SurfaceMsg::FetchDone(res) => self.handle_fetch_done(res),
                SurfaceMsg::Terminate => break,
            }
        }

        self.flight_timer.disarm();
        self.spin_timer.disarm();
        debug!("surface {} terminated", self.index);
    }

    //--- state predicates

    fn map_ready (&self)->bool { !self.prefs.map_token.is_empty() }

    fn pollen_ready (&self)->bool { !self.prefs.pollen_key.is_empty() }

    fn can_fetch (&self)->bool { self.is_primary && !self.paused }

    fn is_visible (&self, layer: Layer)->bool {
        self.prefs.toggles.get(layer) && (!layer.needs_map() || self.map_ready())
    }

    fn render (&mut self, update: RenderUpdate) {
        self.renderer.render(update);
    }

    /// initial content of a new surface. Cached weather can be shown right away, everything else
    /// has to be fetched (primary) or relayed (secondaries)
    fn load_content (&mut self) {
        let now = self.ctx.clock.now();

        self.render( RenderUpdate::Paused { paused: self.paused });
        self.render( RenderUpdate::Location { location: self.location.clone() });
        self.render( RenderUpdate::Zoom { zoom: self.prefs.zoom });
        self.render( RenderUpdate::GlobeCenter { lon: self.center_lon });
        self.render_layer_state();

        let terminator = match &self.terminator {
            Some(t) => t.clone(),
            None => Arc::new( TerminatorPair::compute( &now, self.ctx.config.twilight_offset, self.ctx.config.night_offset))
        };
        self.terminator = Some( terminator.clone());
        self.render( RenderUpdate::Terminator { terminator });

        if let Some(cached) = weather::read_cached( &self.ctx.cache, self.prefs.unit_system) {
            if cached.matches( &self.location, self.prefs.unit_system) {
                self.show_weather( Arc::new(cached));
            }
        }
        self.render_clock();
        self.update_animations();

        if self.can_fetch() {
            self.ensure_weather();
            self.refresh_layers();
        }
    }

    /// placeholders and layer visibility, derived from toggles and credentials
    fn render_layer_state (&mut self) {
        let globe_msg = if self.map_ready() { None } else { Some( MAP_TOKEN_PLACEHOLDER.to_string()) };
        self.render( RenderUpdate::Placeholder { slot: PlaceholderSlot::Globe, message: globe_msg });

        let allergy_msg = if self.prefs.toggles.pollen && !self.pollen_ready() { Some( POLLEN_KEY_PLACEHOLDER.to_string()) } else { None };
        self.render( RenderUpdate::Placeholder { slot: PlaceholderSlot::Allergy, message: allergy_msg });

        for layer in Layer::ALL {
            let visible = self.is_visible(layer);
            self.render( RenderUpdate::LayerVisibility { layer, visible });
        }
    }

    fn render_clock (&mut self) {
        let face = clock_face( &self.ctx.clock.now(), self.weather.as_deref());
        self.render( RenderUpdate::Clock { face });
    }

    /// primary fetches for all enabled layers that have their credentials
    fn refresh_layers (&mut self) {
        if self.is_visible( Layer::Flights) { self.fetch_flights() }
        if self.is_visible( Layer::WeatherRadar) { self.fetch_radar() }
        if self.prefs.toggles.pollen && self.pollen_ready() { self.fetch_allergy() }
    }

    /* #region commands */

    fn handle_cmd (&mut self, cmd: SurfaceCmd) {
        match cmd {
            SurfaceCmd::SetLocation(loc) => self.set_location(loc),
            SurfaceCmd::SetMapToken(token) => self.set_map_token(token),
            SurfaceCmd::SetPollenKey(key) => self.set_pollen_key(key),
            SurfaceCmd::SetUnitSystem(units) => self.set_unit_system(units),
            SurfaceCmd::SetZoom(zoom) => {
                if zoom != self.prefs.zoom {
                    self.prefs.zoom = zoom;
                    self.render( RenderUpdate::Zoom { zoom });
                }
            }
            SurfaceCmd::SetLayer(layer, enabled) => self.set_layer( layer, enabled),
            SurfaceCmd::SetPaused(paused) => self.set_paused(paused),
            SurfaceCmd::SetTerminator(terminator) => {
                self.terminator = Some( terminator.clone());
                if !self.paused { self.render( RenderUpdate::Terminator { terminator }) }
            }
            SurfaceCmd::ClockTick => {
                if !self.paused { self.render_clock() }
            }
            SurfaceCmd::RefreshFlights => {
                if self.can_fetch() && self.is_visible( Layer::Flights) { self.fetch_flights() }
            }
            SurfaceCmd::RefreshRadar => {
                if self.can_fetch() && self.is_visible( Layer::WeatherRadar) { self.fetch_radar() }
            }
            SurfaceCmd::RefreshStaleWeather => {
                if self.can_fetch() { self.ensure_weather() }
            }
        }
    }

    fn set_location (&mut self, loc: Location) {
        if loc == self.location { return }

        self.location = loc;
        let now = self.ctx.clock.now();
        self.center_lon = self.location.lon;
        self.spin_origin_lon = self.location.lon;
        self.spin_started = now;

        self.render( RenderUpdate::Location { location: self.location.clone() });
        self.render( RenderUpdate::GlobeCenter { lon: self.center_lon });

        if let Some(cached) = weather::read_cached( &self.ctx.cache, self.prefs.unit_system) {
            if cached.matches( &self.location, self.prefs.unit_system) {
                self.show_weather( Arc::new(cached));
            }
        }

        if self.can_fetch() {
            self.ensure_weather();
            if self.prefs.toggles.pollen && self.pollen_ready() { self.fetch_allergy() }
        }
    }

    fn set_map_token (&mut self, token: String) {
        if token == self.prefs.map_token { return }

        let was_ready = self.map_ready();
        self.prefs.map_token = token;
        self.render_layer_state();
        self.update_animations();

        if !was_ready && self.map_ready() {
            self.show_layer_data();
            if self.can_fetch() {
                if self.is_visible( Layer::Flights) { self.fetch_flights() }
                if self.is_visible( Layer::WeatherRadar) { self.fetch_radar() }
            }
        }
    }

    fn set_pollen_key (&mut self, key: String) {
        if key == self.prefs.pollen_key { return }

        let was_ready = self.pollen_ready();
        self.prefs.pollen_key = key;
        self.render_layer_state();

        if !was_ready && self.pollen_ready() && self.prefs.toggles.pollen && self.can_fetch() {
            self.fetch_allergy();
        }
    }

    fn set_unit_system (&mut self, units: UnitSystem) {
        if units == self.prefs.unit_system { return }
        self.prefs.unit_system = units;

        if let Some(cached) = weather::read_cached( &self.ctx.cache, units) {
            if cached.matches( &self.location, units) {
                self.show_weather( Arc::new(cached));
            }
        }
        if self.can_fetch() { self.ensure_weather() }
    }

    fn set_layer (&mut self, layer: Layer, enabled: bool) {
        if !self.prefs.toggles.set( layer, enabled) { return }

        self.render_layer_state();
        self.update_animations();

        if enabled {
            self.show_layer_data();
            if self.can_fetch() {
                match layer {
                    Layer::Flights => if self.map_ready() { self.fetch_flights() }
                    Layer::WeatherRadar => if self.map_ready() { self.fetch_radar() }
                    Layer::Pollen => if self.pollen_ready() { self.fetch_allergy() }
                    Layer::Labels | Layer::Spin => {}
                }
            }
        }
    }

    fn set_paused (&mut self, paused: bool) {
        if paused == self.paused { return }

        self.paused = paused;
        self.render( RenderUpdate::Paused { paused });
        self.update_animations();

        if !paused {
            if let Some(terminator) = self.terminator.clone() {
                self.render( RenderUpdate::Terminator { terminator });
            }
            self.render_clock();
            if self.can_fetch() { self.ensure_weather() }
        }
    }

    /// re-render data we already have for layers that just became visible
    fn show_layer_data (&mut self) {
        if self.is_visible( Layer::Flights) && !self.paused {
            self.render_flight_frame();
        }
        if self.is_visible( Layer::WeatherRadar) {
            if let Some(url) = self.radar_url.clone() { self.render( RenderUpdate::RadarTiles { url }) }
        }
        if self.prefs.toggles.pollen {
            if let Some(data) = self.allergy.clone() { self.render( RenderUpdate::Allergy { data }) }
        }
    }

    /* #endregion commands */

    /* #region animation loops */

    /// run animation timers exactly while their layer is visible and we are not paused
    fn update_animations (&mut self) {
        let run_flights = !self.paused && self.is_visible( Layer::Flights);
        if run_flights {
            if !self.flight_timer.is_armed() {
                let interval = self.ctx.config.flight_render_interval;
                self.flight_timer.arm( self.hself.clone(), interval, true, || SurfaceMsg::Tick( SurfaceTick::FlightFrame));
            }
        } else {
            self.flight_timer.disarm();
        }

        let run_spin = !self.paused && self.is_visible( Layer::Spin);
        if run_spin {
            if !self.spin_timer.is_armed() {
                self.spin_origin_lon = self.center_lon;
                self.spin_started = self.ctx.clock.now();
                let interval = self.ctx.config.spin_frame_interval;
                self.spin_timer.arm( self.hself.clone(), interval, false, || SurfaceMsg::Tick( SurfaceTick::SpinFrame));
            }
        } else if self.spin_timer.is_armed() {
            self.spin_timer.disarm();
            self.center_lon = self.spin_lon( &self.ctx.clock.now());
        }
    }

    fn spin_lon (&self, now: &DateTime<Utc>)->f64 {
        normalize_180( self.spin_origin_lon + self.ctx.config.spin_speed * elapsed_secs( now, &self.spin_started))
    }

    fn handle_tick (&mut self, tick: SurfaceTick) {
        if self.paused { return }

        match tick {
            SurfaceTick::FlightFrame => {
                if self.is_visible( Layer::Flights) { self.render_flight_frame() }
            }
            SurfaceTick::SpinFrame => {
                if self.is_visible( Layer::Spin) {
                    self.center_lon = self.spin_lon( &self.ctx.clock.now());
                    self.render( RenderUpdate::GlobeCenter { lon: self.center_lon });
                }
            }
        }
    }

    fn render_flight_frame (&mut self) {
        if let Some(set) = &self.flights {
            let positions = set.positions_at( &self.ctx.clock.now());
            self.render( RenderUpdate::Flights { positions: Arc::new(positions) });
        }
    }

    /* #endregion animation loops */

    /* #region fetching (primary only) */

    fn spawn_fetch<F> (&self, fut: F) where F: Future<Output=FetchResult> + Send + 'static {
        let hself = self.hself.clone();
        tokio::spawn( async move {
            let res = fut.await;
            let _ = hself.send( SurfaceMsg::FetchDone(res)).await; // surface might be gone by now
        });
    }

    /// show fresh cached weather, or fetch it if there is none
    fn ensure_weather (&mut self) {
        let units = self.prefs.unit_system;
        let now = self.ctx.clock.now();

        if let Some(cached) = weather::fresh_cached( &self.ctx.cache, &self.location, units, &now, self.ctx.config.weather_ttl) {
            if self.weather.as_deref() != Some(&cached) {
                let snapshot = Arc::new(cached);
                self.show_weather( snapshot.clone());
                self.post_relay( RelayMsg::Weather(snapshot));
            }
            return
        }

        if let Some((loc,u)) = &self.in_flight.weather {
            if *u == units && loc.is_same_place( &self.location) { return }
        }
        self.fetch_weather();
    }

    fn fetch_weather (&mut self) {
        let location = self.location.clone();
        let unit_system = self.prefs.unit_system;
        self.in_flight.weather = Some( (location.clone(), unit_system));

        let provider = self.ctx.provider.clone();
        let clock = self.ctx.clock.clone();
        debug!("surface {} fetching weather for {} ({})", self.index, location, unit_system);

        self.spawn_fetch( async move {
            let result = provider.fetch_weather( &location, unit_system).await.map( |report| WeatherSnapshot {
                location: location.clone(), unit_system, timestamp: clock.now(), report
            });
            FetchResult::Weather { location, unit_system, result }
        });
    }

    fn fetch_flights (&mut self) {
        if self.in_flight.flights { return }
        self.in_flight.flights = true;

        let provider = self.ctx.provider.clone();
        let clock = self.ctx.clock.clone();
        let bbox = self.ctx.config.flight_bbox;
        let max_flights = self.ctx.config.max_flights;

        self.spawn_fetch( async move {
            let res = provider.fetch_flights( bbox, max_flights).await
                .map( |flights| FlightSet { fetched_at: clock.now(), flights });
            FetchResult::Flights(res)
        });
    }

    fn fetch_radar (&mut self) {
        if self.in_flight.radar { return }
        self.in_flight.radar = true;

        let provider = self.ctx.provider.clone();
        self.spawn_fetch( async move {
            FetchResult::Radar( provider.fetch_radar_tile_url().await)
        });
    }

    fn fetch_allergy (&mut self) {
        if let Some(loc) = &self.in_flight.allergy {
            if loc.is_same_place( &self.location) { return }
        }
        let location = self.location.clone();
        self.in_flight.allergy = Some( location.clone());

        let provider = self.ctx.provider.clone();
        let api_key = self.prefs.pollen_key.clone();

        self.spawn_fetch( async move {
            let (aq, pollen) = tokio::join!( provider.fetch_air_quality( &location), provider.fetch_pollen( &location, &api_key));
            if let Err(e) = &aq { log_fetch_error( "air quality", e) }
            if let Err(e) = &pollen { log_fetch_error( "pollen", e) }

            let data = AllergyData { location: location.clone(), air_quality: aq.ok(), pollen: pollen.ok() };
            FetchResult::Allergy { location, data }
        });
    }

    fn handle_fetch_done (&mut self, res: FetchResult) {
        match res {
            FetchResult::Flights(res) => {
                self.in_flight.flights = false;
                match res {
                    Ok(set) => {
                        info!("fetched {} flights", set.len());
                        let set = Arc::new(set);
                        self.show_flights( set.clone());
                        self.post_relay( RelayMsg::Flights(set));
                    }
                    Err(e) => log_fetch_error( "flight", &e)
                }
            }

            FetchResult::Weather { location, unit_system, result } => {
                if let Some((loc,u)) = &self.in_flight.weather {
                    if *u == unit_system && loc.is_same_place(&location) { self.in_flight.weather = None }
                }

                if unit_system != self.prefs.unit_system || !location.is_same_place( &self.location) {
                    debug!("discarding weather for outdated request {} ({})", location, unit_system);
                    if self.in_flight.weather.is_none() && self.can_fetch() { self.ensure_weather() }
                    return
                }

                match result {
                    Ok(snapshot) => {
                        info!("fetched weather for {}", snapshot.location);
                        if let Err(e) = weather::write_cached( &self.ctx.cache, &snapshot) {
                            warn!("failed to cache weather: {}", e);
                        }
                        let snapshot = Arc::new(snapshot);
                        self.show_weather( snapshot.clone());
                        self.post_relay( RelayMsg::Weather(snapshot));
                    }
                    Err(e) => log_fetch_error( "weather", &e)
                }
            }

            FetchResult::Allergy { location, data } => {
                if self.in_flight.allergy.as_ref().map( |l| l.is_same_place(&location)).unwrap_or(false) {
                    self.in_flight.allergy = None;
                }

                if !location.is_same_place( &self.location) {
                    debug!("discarding allergy data for outdated location {}", location);
                    if self.in_flight.allergy.is_none() && self.can_fetch() && self.prefs.toggles.pollen && self.pollen_ready() {
                        self.fetch_allergy();
                    }
                    return
                }

                let data = Arc::new(data);
                self.show_allergy( data.clone());
                self.post_relay( RelayMsg::Allergy(data));
            }

            FetchResult::Radar(res) => {
                self.in_flight.radar = false;
                match res {
                    Ok(url) => {
                        self.show_radar( url.clone());
                        self.post_relay( RelayMsg::RadarTileUrl(url));
                    }
                    Err(e) => log_fetch_error( "radar", &e)
                }
            }
        }
    }

    fn post_relay (&self, msg: RelayMsg) {
        let kind = msg.kind();
        let envelope = RelayEnvelope { source: self.index, generation: self.generation, msg };
        match self.ctx.manager.try_send( ManagerMsg::Relay(envelope)) {
            Ok(true) => debug!("surface {} posted {}", self.index, kind),
            Ok(false) => warn!("manager mailbox full, {} relay dropped", kind),
            Err(_) => debug!("manager gone, {} relay dropped", kind),
        }
    }

    /* #endregion fetching */

    /* #region received data */

    /// relayed data. The primary produced it and already shows it
    fn handle_relay (&mut self, msg: RelayMsg) {
        if self.is_primary {
            debug!("primary ignores relayed {}", msg.kind());
            return
        }

        match msg {
            RelayMsg::Flights(set) => self.show_flights(set),
            RelayMsg::Weather(snapshot) => {
                if snapshot.matches( &self.location, self.prefs.unit_system) {
                    self.show_weather(snapshot);
                } else {
                    debug!("surface {} ignores weather for {} ({})", self.index, snapshot.location, snapshot.unit_system);
                }
            }
            RelayMsg::Allergy(data) => {
                if data.location.is_same_place( &self.location) { self.show_allergy(data) }
            }
            RelayMsg::RadarTileUrl(url) => self.show_radar(url),
        }
    }

    fn show_flights (&mut self, set: Arc<FlightSet>) {
        self.flights = Some(set);
        if self.is_visible( Layer::Flights) && !self.paused {
            self.render_flight_frame();
        }
    }

    fn show_weather (&mut self, snapshot: Arc<WeatherSnapshot>) {
        self.weather = Some( snapshot.clone());
        self.render( RenderUpdate::Weather { snapshot });
        self.render_clock();
    }

    fn show_allergy (&mut self, data: Arc<AllergyData>) {
        self.allergy = Some( data.clone());
        if self.prefs.toggles.pollen {
            self.render( RenderUpdate::Allergy { data });
        }
    }

    fn show_radar (&mut self, url: String) {
        self.radar_url = Some( url.clone());
        if self.is_visible( Layer::WeatherRadar) {
            self.render( RenderUpdate::RadarTiles { url });
        }
    }

    /* #endregion received data */
}

/* #endregion agent */
