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

use std::fmt;
use serde::{Serialize,Deserialize};

/// mean earth radius in meters
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// max lat/lon difference in degrees for which two locations are considered the same place
pub const SAME_LOCATION_EPS: f64 = 0.01;

#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = d % 360.0;

    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

/// a named point on the globe the user has picked as "home"
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new (name: impl ToString, lat: f64, lon: f64)->Self {
        Location { name: name.to_string(), lat, lon }
    }

    /// a location without a known place name is labeled with its rounded coordinates
    pub fn from_coords (lat: f64, lon: f64)->Self {
        Location { name: format!("{:.2}, {:.2}", lat, lon), lat, lon }
    }

    pub fn austin_tx()->Self {
        Location::new( "Austin, TX", 30.2676, -97.743)
    }

    pub fn is_same_place (&self, other: &Location)->bool {
        (self.lat - other.lat).abs() < SAME_LOCATION_EPS && (self.lon - other.lon).abs() < SAME_LOCATION_EPS
    }
}

impl Default for Location {
    fn default()->Self { Location::austin_tx() }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4},{:.4})", self.name, self.lat, self.lon)
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}
