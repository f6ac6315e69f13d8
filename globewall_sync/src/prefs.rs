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

//! user preferences shared by all surfaces, and their persisted subset

use std::{fmt, str::FromStr};
use serde::{Serialize,Deserialize};
use tracing::warn;
use globewall_common::{geo::Location, store::PrefsStore};

use crate::errors::{GlobeWallError, Result, parse_error};

// keys of persisted scalars
pub const LAST_LAT_KEY: &str = "last-location-lat";
pub const LAST_LON_KEY: &str = "last-location-lon";
pub const LAST_NAME_KEY: &str = "last-location-name";
pub const UNIT_SYSTEM_KEY: &str = "unit-system";
pub const MAP_TOKEN_KEY: &str = "mapbox-access-token";
pub const POLLEN_KEY_KEY: &str = "google-pollen-api-key";

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash,Default)]
#[serde(rename_all="lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric
}

impl UnitSystem {
    /// "metric" is metric, everything else is imperial
    pub fn normalize (s: &str)->Self {
        if s.trim().eq_ignore_ascii_case("metric") { UnitSystem::Metric } else { UnitSystem::Imperial }
    }

    pub fn as_str (&self)->&'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub fn temperature_unit (&self)->&'static str {
        match self { UnitSystem::Imperial => "fahrenheit", UnitSystem::Metric => "celsius" }
    }

    pub fn wind_speed_unit (&self)->&'static str {
        match self { UnitSystem::Imperial => "mph", UnitSystem::Metric => "kmh" }
    }

    /// derive the default from a POSIX locale string such as "en_US.UTF-8"
    pub fn from_locale (locale: &str)->Self {
        let region = locale.split(['.','@']).next()
            .and_then( |l| l.split(['_','-']).nth(1))
            .unwrap_or("");
        match region.to_ascii_uppercase().as_str() {
            "US" | "LR" | "MM" => UnitSystem::Imperial,
            "" => UnitSystem::Imperial,
            _ => UnitSystem::Metric
        }
    }

    pub fn detect()->Self {
        let locale = std::env::var("LC_ALL").ok().filter( |s| !s.is_empty())
            .or_else( || std::env::var("LANG").ok())
            .unwrap_or_default();
        Self::from_locale(&locale)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
#[serde(rename_all="camelCase")]
pub enum Layer {
    Flights,
    WeatherRadar,
    Pollen,
    Labels,
    Spin
}

impl Layer {
    pub const ALL: [Layer;5] = [Layer::Flights, Layer::WeatherRadar, Layer::Pollen, Layer::Labels, Layer::Spin];

    /// layers that are part of the map and hence need the map token
    pub fn needs_map (&self)->bool {
        matches!( self, Layer::Flights | Layer::WeatherRadar | Layer::Labels | Layer::Spin)
    }
}

impl FromStr for Layer {
    type Err = GlobeWallError;
    fn from_str (s: &str)->Result<Self> {
        match s {
            "flights" => Ok(Layer::Flights),
            "radar" | "weather" | "weatherRadar" => Ok(Layer::WeatherRadar),
            "pollen" | "allergy" => Ok(Layer::Pollen),
            "labels" => Ok(Layer::Labels),
            "spin" => Ok(Layer::Spin),
            _ => Err( parse_error!("unknown layer '{}'", s))
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash,Default)]
#[serde(rename_all="lowercase")]
pub enum ZoomLevel {
    #[default]
    Globe,
    Country,
    City,
    Street
}

impl ZoomLevel {
    pub fn level (&self)->f64 {
        match self {
            ZoomLevel::Globe => 2.5,
            ZoomLevel::Country => 5.0,
            ZoomLevel::City => 8.0,
            ZoomLevel::Street => 12.0,
        }
    }

    pub fn from_level (level: f64)->Option<Self> {
        [ZoomLevel::Globe, ZoomLevel::Country, ZoomLevel::City, ZoomLevel::Street].into_iter()
            .find( |z| (z.level() - level).abs() < 1e-6)
    }
}

impl FromStr for ZoomLevel {
    type Err = GlobeWallError;
    fn from_str (s: &str)->Result<Self> {
        match s {
            "globe" => Ok(ZoomLevel::Globe),
            "country" => Ok(ZoomLevel::Country),
            "city" => Ok(ZoomLevel::City),
            "street" => Ok(ZoomLevel::Street),
            _ => s.parse::<f64>().ok()
                    .and_then( ZoomLevel::from_level)
                    .ok_or_else( || parse_error!("unsupported zoom level '{}'", s))
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq)]
pub struct LayerToggles {
    pub flights: bool,
    pub weather_radar: bool,
    pub pollen: bool,
    pub labels: bool,
    pub spin: bool,
}

impl Default for LayerToggles {
    fn default()->Self {
        LayerToggles { flights: false, weather_radar: false, pollen: false, labels: true, spin: false }
    }
}

impl LayerToggles {
    pub fn get (&self, layer: Layer)->bool {
        match layer {
            Layer::Flights => self.flights,
            Layer::WeatherRadar => self.weather_radar,
            Layer::Pollen => self.pollen,
            Layer::Labels => self.labels,
            Layer::Spin => self.spin,
        }
    }

    /// returns true if this changed the toggle
    pub fn set (&mut self, layer: Layer, enabled: bool)->bool {
        let toggle = match layer {
            Layer::Flights => &mut self.flights,
            Layer::WeatherRadar => &mut self.weather_radar,
            Layer::Pollen => &mut self.pollen,
            Layer::Labels => &mut self.labels,
            Layer::Spin => &mut self.spin,
        };
        let changed = *toggle != enabled;
        *toggle = enabled;
        changed
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct SharedPrefs {
    pub unit_system: UnitSystem,
    pub toggles: LayerToggles,
    pub zoom: ZoomLevel,
    pub map_token: String,
    pub pollen_key: String,
}

/// the single state object all surfaces are seeded from. Mutated only through the manager
/// command path (last write wins)
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct SharedState {
    pub prefs: SharedPrefs,
    pub location: Option<Location>,
    pub paused: bool,
}

impl SharedState {
    /// restore what was persisted, falling back to locale derived units
    pub fn load (store: &PrefsStore)->Self {
        let unit_system = store.get_str(UNIT_SYSTEM_KEY).map( UnitSystem::normalize).unwrap_or_else( UnitSystem::detect);

        let location = match (store.get_f64(LAST_LAT_KEY), store.get_f64(LAST_LON_KEY)) {
            (Some(lat), Some(lon)) => Some( match store.get_str(LAST_NAME_KEY) {
                Some(name) if !name.is_empty() => Location::new( name, lat, lon),
                _ => Location::from_coords( lat, lon)
            }),
            _ => None
        };

        let prefs = SharedPrefs {
            unit_system,
            map_token: store.get_str(MAP_TOKEN_KEY).unwrap_or_default().to_string(),
            pollen_key: store.get_str(POLLEN_KEY_KEY).unwrap_or_default().to_string(),
            ..SharedPrefs::default()
        };

        SharedState { prefs, location, paused: false }
    }

    /// the location surfaces should show: last set, or the configured default
    pub fn effective_location (&self, default_location: &Location)->Location {
        self.location.clone().unwrap_or_else( || default_location.clone())
    }
}

// persistence failures are not fatal, the in-memory state stays authoritative

pub fn persist_location (store: &mut PrefsStore, loc: &Location) {
    let res = store.set( LAST_LAT_KEY, loc.lat)
        .and_then( |_| store.set( LAST_LON_KEY, loc.lon))
        .and_then( |_| store.set( LAST_NAME_KEY, loc.name.as_str()));
    if let Err(e) = res { warn!("failed to persist location: {}", e) }
}

pub fn persist_str (store: &mut PrefsStore, key: &str, value: &str) {
    if let Err(e) = store.set( key, value) { warn!("failed to persist {}: {}", key, e) }
}
