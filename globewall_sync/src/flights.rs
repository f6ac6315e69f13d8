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

use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use globewall_common::{dead_reckoning::estimate_position, datetime::elapsed_secs};

/// last reported state of an airborne aircraft
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct Flight {
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub lon: f64,
    pub lat: f64,
    /// meters
    pub altitude: Option<f64>,
    /// ground speed in m/s
    pub velocity: f64,
    /// true track in degrees clockwise from north
    pub heading: f64,
    /// m/s
    pub vertical_rate: Option<f64>,
}

/// a complete flight feed snapshot. Positions are only valid at `fetched_at`, everything after that
/// is extrapolated
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct FlightSet {
    pub fetched_at: DateTime<Utc>,
    #[serde(rename="entities")]
    pub flights: Vec<Flight>,
}

/// what the flight layer draws for each aircraft
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct FlightPosition {
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub lon: f64,
    pub lat: f64,
    pub heading: f64,
    pub altitude: Option<f64>,
    pub velocity: f64,
    pub vertical_rate: Option<f64>,
}

impl FlightSet {
    pub fn len (&self)->usize { self.flights.len() }
    pub fn is_empty (&self)->bool { self.flights.is_empty() }

    /// dead-reckoned positions of all flights at `now`
    pub fn positions_at (&self, now: &DateTime<Utc>)->Vec<FlightPosition> {
        let dt = elapsed_secs( now, &self.fetched_at).max(0.0);

        self.flights.iter().map( |f| {
            let (lon,lat) = estimate_position( f.lon, f.lat, f.velocity, f.heading, dt);
            FlightPosition {
                icao24: f.icao24.clone(),
                callsign: f.callsign.clone(),
                origin_country: f.origin_country.clone(),
                lon, lat,
                heading: f.heading,
                altitude: f.altitude,
                velocity: f.velocity,
                vertical_rate: f.vertical_rate
            }
        }).collect()
    }
}
