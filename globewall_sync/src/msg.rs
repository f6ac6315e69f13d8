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

//! the messages that flow between the manager and its surfaces

use std::{fmt, sync::Arc};
use serde::{Serialize,Deserialize};
use globewall_common::{geo::Location, terminator::TerminatorPair};

use crate::{
    allergy::AllergyData,
    errors::Result,
    flights::FlightSet,
    prefs::{Layer, UnitSystem, ZoomLevel},
    weather::WeatherSnapshot,
};

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
#[serde(rename_all="camelCase")]
pub enum DataKind {
    Flights,
    Weather,
    Allergy,
    RadarTileUrl,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataKind::Flights => "flights",
            DataKind::Weather => "weather",
            DataKind::Allergy => "allergy",
            DataKind::RadarTileUrl => "radarTileUrl",
        };
        write!(f, "{}", s)
    }
}

/// data the primary surface fetched and all other surfaces receive. The external (JSON) form is
/// `{"kind": <kind>, "payload": <data>}`, in-process delivery only clones the Arcs
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(tag="kind", content="payload", rename_all="camelCase")]
pub enum RelayMsg {
    Flights(Arc<FlightSet>),
    Weather(Arc<WeatherSnapshot>),
    Allergy(Arc<AllergyData>),
    RadarTileUrl(String),
}

impl RelayMsg {
    pub fn kind (&self)->DataKind {
        match self {
            RelayMsg::Flights(_) => DataKind::Flights,
            RelayMsg::Weather(_) => DataKind::Weather,
            RelayMsg::Allergy(_) => DataKind::Allergy,
            RelayMsg::RadarTileUrl(_) => DataKind::RadarTileUrl,
        }
    }

    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string(self)? )
    }

    pub fn from_json (s: &str)->Result<Self> {
        Ok( serde_json::from_str(s)? )
    }
}

/// a relay message posted by a surface, tagged with where it came from
#[derive(Debug,Clone)]
pub struct RelayEnvelope {
    pub source: usize,
    /// surface generation of the source, bumped with each rebuild
    pub generation: u64,
    pub msg: RelayMsg,
}

/// commands the manager injects into surfaces. All of them are idempotent
#[derive(Debug,Clone)]
pub enum SurfaceCmd {
    SetLocation(Location),
    SetMapToken(String),
    SetPollenKey(String),
    SetUnitSystem(UnitSystem),
    SetZoom(ZoomLevel),
    SetLayer(Layer,bool),
    SetPaused(bool),
    SetTerminator(Arc<TerminatorPair>),
    ClockTick,
    /// primary only: re-fetch the flight feed
    RefreshFlights,
    /// primary only: re-fetch the latest radar frame
    RefreshRadar,
    /// primary only: re-fetch weather if the cached snapshot has expired
    RefreshStaleWeather,
}

/// internal timer ticks of a surface
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum SurfaceTick {
    FlightFrame,
    SpinFrame,
}

/// completed network fetch, sent back to the surface that started it
#[derive(Debug)]
pub enum FetchResult {
    Flights(Result<FlightSet>),
    Weather { location: Location, unit_system: UnitSystem, result: Result<WeatherSnapshot> },
    Allergy { location: Location, data: AllergyData },
    Radar(Result<String>),
}

#[derive(Debug)]
pub enum SurfaceMsg {
    Cmd(SurfaceCmd),
    Relay(RelayMsg),
    Tick(SurfaceTick),
    FetchDone(FetchResult),
    Terminate,
}

impl From<SurfaceCmd> for SurfaceMsg {
    fn from (cmd: SurfaceCmd)->Self { SurfaceMsg::Cmd(cmd) }
}

impl From<RelayMsg> for SurfaceMsg {
    fn from (msg: RelayMsg)->Self { SurfaceMsg::Relay(msg) }
}

impl From<SurfaceTick> for SurfaceMsg {
    fn from (tick: SurfaceTick)->Self { SurfaceMsg::Tick(tick) }
}

impl From<FetchResult> for SurfaceMsg {
    fn from (res: FetchResult)->Self { SurfaceMsg::FetchDone(res) }
}
