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

//! the boundary to whatever draws a surface. Surfaces only ever hand out declarative state
//! updates, so applying the same update twice leaves a renderer in the same state

use std::{collections::HashMap, sync::{Arc,Mutex}};
use serde::{Serialize,Deserialize};
use tracing::{debug,info};
use globewall_common::{geo::Location, terminator::TerminatorPair};

use crate::{
    allergy::{AllergyData, aqi_category, pollen_category},
    clock::ClockFace,
    display::DisplayId,
    errors::Result,
    flights::FlightPosition,
    prefs::{Layer, ZoomLevel},
    weather::{WeatherSnapshot, condition_label},
};

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
#[serde(rename_all="camelCase")]
pub enum PlaceholderSlot {
    /// the whole map (no map token)
    Globe,
    /// the pollen/air quality panel (no pollen key)
    Allergy,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(tag="type", rename_all="camelCase")]
pub enum RenderUpdate {
    Location { location: Location },
    Zoom { zoom: ZoomLevel },
    LayerVisibility { layer: Layer, visible: bool },
    /// `None` removes the placeholder
    Placeholder { slot: PlaceholderSlot, message: Option<String> },
    Weather { snapshot: Arc<WeatherSnapshot> },
    Allergy { data: Arc<AllergyData> },
    RadarTiles { url: String },
    Flights { positions: Arc<Vec<FlightPosition>> },
    Terminator { terminator: Arc<TerminatorPair> },
    Clock { face: ClockFace },
    GlobeCenter { lon: f64 },
    Paused { paused: bool },
}

pub trait SurfaceRenderer: Send + 'static {
    fn render (&mut self, update: RenderUpdate);
}

/// creates the renderer for a surface on a given display
pub trait SurfaceFactory: Send + 'static {
    fn create_renderer (&mut self, index: usize, display: &DisplayId)->Result<Box<dyn SurfaceRenderer>>;
}

/* #region recording renderer **********************************************************************/

/// the accumulated declarative state of a surface
#[derive(Debug,Clone,PartialEq,Default)]
pub struct RenderSnapshot {
    pub location: Option<Location>,
    pub zoom: Option<ZoomLevel>,
    pub visible: HashMap<Layer,bool>,
    pub placeholders: HashMap<PlaceholderSlot,String>,
    pub weather: Option<Arc<WeatherSnapshot>>,
    pub allergy: Option<Arc<AllergyData>>,
    pub radar_tiles: Option<String>,
    pub flights: Option<Arc<Vec<FlightPosition>>>,
    pub terminator: Option<Arc<TerminatorPair>>,
    pub clock: Option<ClockFace>,
    pub center_lon: Option<f64>,
    pub paused: bool,
}

impl RenderSnapshot {
    pub fn apply (&mut self, update: &RenderUpdate) {
        match update {
            RenderUpdate::Location { location } => self.location = Some(location.clone()),
            RenderUpdate::Zoom { zoom } => self.zoom = Some(*zoom),
            RenderUpdate::LayerVisibility { layer, visible } => { self.visible.insert( *layer, *visible); }
            RenderUpdate::Placeholder { slot, message } => match message {
                Some(msg) => { self.placeholders.insert( *slot, msg.clone()); }
                None => { self.placeholders.remove(slot); }
            }
            RenderUpdate::Weather { snapshot } => self.weather = Some(snapshot.clone()),
            RenderUpdate::Allergy { data } => self.allergy = Some(data.clone()),
            RenderUpdate::RadarTiles { url } => self.radar_tiles = Some(url.clone()),
            RenderUpdate::Flights { positions } => self.flights = Some(positions.clone()),
            RenderUpdate::Terminator { terminator } => self.terminator = Some(terminator.clone()),
            RenderUpdate::Clock { face } => self.clock = Some(face.clone()),
            RenderUpdate::GlobeCenter { lon } => self.center_lon = Some(*lon),
            RenderUpdate::Paused { paused } => self.paused = *paused,
        }
    }

    pub fn is_visible (&self, layer: Layer)->bool {
        self.visible.get(&layer).copied().unwrap_or(false)
    }
}

#[derive(Debug,Default)]
pub struct Recording {
    pub snapshot: RenderSnapshot,
    pub updates: Vec<RenderUpdate>,
}

/// a headless renderer that just keeps the state it was told to show. Readers access it through a
/// cloned [`RecordingHandle`]
#[derive(Debug,Clone,Default)]
pub struct RecordingHandle(Arc<Mutex<Recording>>);

impl RecordingHandle {
    pub fn snapshot (&self)->RenderSnapshot {
        self.with( |r| r.snapshot.clone())
    }

    pub fn update_count (&self)->usize {
        self.with( |r| r.updates.len())
    }

    pub fn count_updates<F> (&self, f: F)->usize where F: Fn(&RenderUpdate)->bool {
        self.with( |r| r.updates.iter().filter( |u| f(u)).count())
    }

    pub fn with<F,R> (&self, f: F)->R where F: FnOnce(&Recording)->R {
        let rec = self.0.lock().unwrap_or_else( |e| e.into_inner());
        f(&rec)
    }
}

pub struct RecordingRenderer {
    recording: RecordingHandle
}

impl RecordingRenderer {
    pub fn new()->(Self,RecordingHandle) {
        let recording = RecordingHandle::default();
        (RecordingRenderer { recording: recording.clone() }, recording)
    }
}

impl SurfaceRenderer for RecordingRenderer {
    fn render (&mut self, update: RenderUpdate) {
        let mut rec = self.recording.0.lock().unwrap_or_else( |e| e.into_inner());
        rec.snapshot.apply(&update);
        rec.updates.push(update);
    }
}

/// creates recording renderers and remembers their handles in creation order
#[derive(Clone,Default)]
pub struct RecordingFactory {
    created: Arc<Mutex<Vec<(usize,DisplayId,RecordingHandle)>>>
}

impl RecordingFactory {
    pub fn new()->Self { RecordingFactory::default() }

    /// all renderers created so far, including the ones of torn down surfaces
    pub fn created (&self)->Vec<(usize,DisplayId,RecordingHandle)> {
        self.created.lock().unwrap_or_else( |e| e.into_inner()).clone()
    }

    /// the most recently created renderer for the given surface index
    pub fn latest (&self, index: usize)->Option<RecordingHandle> {
        self.created().into_iter().rev().find( |(i,_,_)| *i == index).map( |(_,_,h)| h)
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create_renderer (&mut self, index: usize, display: &DisplayId)->Result<Box<dyn SurfaceRenderer>> {
        let (renderer, handle) = RecordingRenderer::new();
        self.created.lock().unwrap_or_else( |e| e.into_inner()).push( (index, display.clone(), handle));
        Ok( Box::new(renderer) )
    }
}

/* #endregion recording renderer */

/* #region log renderer ****************************************************************************/

/// renders to the log, mostly to watch the engine without a display
pub struct LogRenderer {
    label: String,
}

impl LogRenderer {
    pub fn new (index: usize, display: &DisplayId)->Self {
        LogRenderer { label: format!("surface-{}@{}", index, display) }
    }
}

impl SurfaceRenderer for LogRenderer {
    fn render (&mut self, update: RenderUpdate) {
        let label = &self.label;
        match update {
            RenderUpdate::Location { location } => info!("{label}: location {}", location),
            RenderUpdate::Zoom { zoom } => info!("{label}: zoom {:?} ({})", zoom, zoom.level()),
            RenderUpdate::LayerVisibility { layer, visible } => info!("{label}: layer {:?} visible={}", layer, visible),
            RenderUpdate::Placeholder { slot, message } => info!("{label}: placeholder {:?} {:?}", slot, message),
            RenderUpdate::Weather { snapshot } => {
                let days: Vec<&str> = snapshot.report.daily.iter().map( |d| d.weather_code.map( condition_label).unwrap_or("--")).collect();
                info!("{label}: weather {} [{}]", snapshot.summary(), days.join(","))
            }
            RenderUpdate::Allergy { data } => {
                let aqi = data.air_quality.as_ref().and_then( |aq| aq.us_aqi);
                let pollen = data.pollen.as_ref().and_then( |p| p.max_index());
                info!("{label}: allergy aqi={:?} ({}), pollen={:?} ({})",
                    aqi, aqi.map(aqi_category).unwrap_or("--"), pollen, pollen.map(pollen_category).unwrap_or("--"))
            }
            RenderUpdate::RadarTiles { url } => info!("{label}: radar tiles {}", url),
            RenderUpdate::Flights { positions } => debug!("{label}: {} flight positions", positions.len()),
            RenderUpdate::Terminator { terminator } => info!("{label}: terminator, sun at {:.2},{:.2}",
                terminator.twilight.sun.lat, terminator.twilight.sun.lon),
            RenderUpdate::Clock { face } => info!("{label}: {} ({})", face.text, face.timezone),
            RenderUpdate::GlobeCenter { lon } => debug!("{label}: center lon {:.2}", lon),
            RenderUpdate::Paused { paused } => info!("{label}: paused={}", paused),
        }
    }
}

#[derive(Default)]
pub struct LogFactory;

impl SurfaceFactory for LogFactory {
    fn create_renderer (&mut self, index: usize, display: &DisplayId)->Result<Box<dyn SurfaceRenderer>> {
        Ok( Box::new( LogRenderer::new( index, display)) )
    }
}

/* #endregion log renderer */
