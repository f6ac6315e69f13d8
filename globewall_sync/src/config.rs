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

use std::{fs, path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use globewall_common::{
    datetime::{deserialize_duration, serialize_duration, millis, secs, minutes},
    geo::{BoundingBox, Location},
    terminator::{NIGHT_OFFSET, TWILIGHT_OFFSET},
};

use crate::errors::{Result, parse_error};

pub const APP_NAME: &str = "globewall";

#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct GlobeWallConfig {
    /// interval of the background task (flight refresh, terminator recompute)
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub background_interval: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub clock_interval: Duration,

    /// dead-reckoning frame interval of the flight layer
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub flight_render_interval: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub spin_frame_interval: Duration,

    /// globe rotation in degrees per second
    pub spin_speed: f64,

    /// max age of cached weather before it gets re-fetched
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub weather_ttl: Duration,

    pub twilight_offset: f64,
    pub night_offset: f64,

    pub max_flights: usize,
    pub flight_bbox: Option<BoundingBox>,

    /// capacity of each surface mailbox and of the manager mailbox
    pub channel_bound: usize,

    pub default_location: Location,

    pub providers: ProviderConfig,
}

impl Default for GlobeWallConfig {
    fn default()->Self {
        GlobeWallConfig {
            background_interval: minutes(5),
            clock_interval: minutes(1),
            flight_render_interval: millis(500),
            spin_frame_interval: millis(50),
            spin_speed: 360.0 / 40.0,
            weather_ttl: minutes(15),
            twilight_offset: TWILIGHT_OFFSET,
            night_offset: NIGHT_OFFSET,
            max_flights: 12_000,
            flight_bbox: None,
            channel_bound: 64,
            default_location: Location::austin_tx(),
            providers: ProviderConfig::default(),
        }
    }
}

impl GlobeWallConfig {
    pub fn from_ron (s: &str)->Result<Self> {
        let config: GlobeWallConfig = ron::from_str(s)?;
        config.check_intervals()?;
        Ok(config)
    }

    /// timer periods have to be non-zero
    pub fn check_intervals (&self)->Result<()> {
        let intervals = [
            ("background_interval", self.background_interval),
            ("clock_interval", self.clock_interval),
            ("flight_render_interval", self.flight_render_interval),
            ("spin_frame_interval", self.spin_frame_interval),
        ];
        for (name, d) in intervals {
            if d.is_zero() { return Err( parse_error!("{} must not be zero", name)) }
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>> (path: P)->Result<Self> {
        let s = fs::read_to_string( path.as_ref())?;
        Self::from_ron(&s)
    }
}

#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub flights_url: String,
    pub weather_url: String,
    pub air_quality_url: String,
    pub pollen_url: String,
    pub radar_url: String,
    pub radar_tile_host: String,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default()->Self {
        ProviderConfig {
            flights_url: "https://opensky-network.org/api/states/all".into(),
            weather_url: "https://api.open-meteo.com/v1/forecast".into(),
            air_quality_url: "https://air-quality-api.open-meteo.com/v1/air-quality".into(),
            pollen_url: "https://pollen.googleapis.com/v1/forecast:lookup".into(),
            radar_url: "https://api.rainviewer.com/public/weather-maps.json".into(),
            radar_tile_host: "https://tilecache.rainviewer.com".into(),
            request_timeout: secs(20),
        }
    }
}

/// per-user directory for config and prefs files, e.g. ~/.config/globewall
pub fn config_dir()->Option<PathBuf> {
    dirs::config_dir().map( |d| d.join(APP_NAME))
}

pub fn default_prefs_path()->Option<PathBuf> {
    config_dir().map( |d| d.join("prefs.json"))
}
