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

use std::time::Duration;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use globewall_common::{datetime::duration_since, geo::Location, store::LocalStore};

use crate::{errors::Result, prefs::UnitSystem};

/// current conditions in the units of the snapshot
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub weather_code: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub pressure: Option<f64>,
    pub dew_point: Option<f64>,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct DailyForecast {
    /// local date, e.g. "2025-10-17"
    pub date: String,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub weather_code: Option<i32>,
}

/// what the forecast provider returns for a place
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct WeatherReport {
    /// IANA name of the local timezone of the location
    pub timezone: Option<String>,
    /// local times of today's sunrise and sunset ("2025-10-17T07:31")
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
}

/// a timestamped weather report for a location and unit system, which is what gets cached and relayed
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub unit_system: UnitSystem,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub report: WeatherReport,
}

impl WeatherSnapshot {
    pub fn age (&self, now: &DateTime<Utc>)->Duration {
        duration_since( now, &self.timestamp)
    }

    pub fn is_fresh (&self, now: &DateTime<Utc>, ttl: Duration)->bool {
        self.age(now) < ttl
    }

    /// can this be shown for the given place and units
    pub fn matches (&self, loc: &Location, unit_system: UnitSystem)->bool {
        self.unit_system == unit_system && self.location.is_same_place(loc)
    }

    pub fn summary (&self)->String {
        let c = &self.report.current;
        let temp_unit = match self.unit_system { UnitSystem::Imperial => "°F", UnitSystem::Metric => "°C" };
        let temp = c.temperature.map( |t| format!("{:.0}{}", t, temp_unit)).unwrap_or_else( || "--".into());
        let cond = c.weather_code.map( condition_text).unwrap_or("Unknown");
        format!("{}: {} {}", self.location.name, temp, cond)
    }
}

/* #region weather cache ***************************************************************************/

/// cache entries are kept per unit system so that a unit switch never shows mismatched data
pub fn cache_key (unit_system: UnitSystem)->String {
    format!("weather-cache-{}", unit_system.as_str())
}

/// cached snapshot for the given units. Malformed entries are removed and reported as a miss
pub fn read_cached (store: &LocalStore, unit_system: UnitSystem)->Option<WeatherSnapshot> {
    store.get_json::<WeatherSnapshot>( &cache_key(unit_system))
        .filter( |s| s.unit_system == unit_system)
}

pub fn write_cached (store: &LocalStore, snapshot: &WeatherSnapshot)->Result<()> {
    Ok( store.insert_json( cache_key(snapshot.unit_system), snapshot)? )
}

/// a snapshot for the location and units that has not expired yet
pub fn fresh_cached (store: &LocalStore, loc: &Location, unit_system: UnitSystem, now: &DateTime<Utc>, ttl: Duration)->Option<WeatherSnapshot> {
    read_cached( store, unit_system).filter( |s| s.matches(loc, unit_system) && s.is_fresh(now, ttl))
}

/* #endregion weather cache */

/* #region WMO weather interpretation codes ********************************************************/

pub fn condition_text (code: i32)->&'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 | 81 | 82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown"
    }
}

/// short label for forecast tiles
pub fn condition_label (code: i32)->&'static str {
    match code {
        0 | 1 => "Sunny",
        2 => "Partly Cloudy",
        3 => "Cloudy",
        45 | 48 => "Fog",
        51..=67 | 80..=82 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Storms",
        _ => "--"
    }
}

/* #endregion WMO codes */
