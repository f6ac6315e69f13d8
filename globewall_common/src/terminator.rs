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

//! day/night terminator polygons.
//!
//! The sub-solar point is computed with the low precision solar coordinates of the Astronomical
//! Almanac (good to about 0.01° for dates between 1950 and 2050), which is more than enough for
//! a wallpaper. The terminator is then traced as a latitude for every 2° of longitude and closed
//! over the dark pole, which yields a polygon that can be filled directly in Web Mercator and
//! globe projections without antimeridian splitting.

use chrono::{DateTime, Utc};
use serde::{Serialize,Deserialize};
use serde_json::{json, Value as JsonValue};

use crate::geo::normalize_180;

/// longitude sampling step in degrees
pub const LON_STEP: usize = 2;

/// declination is kept at least this far away from zero (degrees) to avoid the tan(0) singularity
pub const MIN_DECLINATION: f64 = 0.1;

/// offset of the civil twilight boundary (the geometric terminator)
pub const TWILIGHT_OFFSET: f64 = 0.0;

/// offset of the night boundary
pub const NIGHT_OFFSET: f64 = 6.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const J2000_JD: f64 = 2_451_545.0;

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct SubSolarPoint {
    pub lat: f64,
    pub lon: f64,
}

/// days since J2000.0 for the given point in time
pub fn days_since_j2000 (date: &DateTime<Utc>)->f64 {
    let jd = date.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD;
    jd - J2000_JD
}

fn positive_mod (x: f64, m: f64)->f64 {
    let r = x % m;
    if r < 0.0 { r + m } else { r }
}

/// the point on earth where the sun is at zenith
pub fn sub_solar_point (date: &DateTime<Utc>)->SubSolarPoint {
    let n = days_since_j2000(date);

    let mean_lon = positive_mod( 280.460 + 0.9856474 * n, 360.0);
    let mean_anomaly = positive_mod( 357.528 + 0.9856003 * n, 360.0).to_radians();

    let ecliptic_lon = (mean_lon + 1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin()).to_radians();
    let obliquity = (23.439 - 0.0000004 * n).to_radians();

    let declination = (obliquity.sin() * ecliptic_lon.sin()).asin();
    let gmst_hours = positive_mod( 18.697374558 + 24.06570982441908 * n, 24.0);
    let right_ascension = (obliquity.cos() * ecliptic_lon.sin()).atan2( ecliptic_lon.cos());

    let lon = normalize_180( right_ascension.to_degrees() - gmst_hours * 15.0);

    SubSolarPoint { lat: declination.to_degrees(), lon }
}

/// a closed polygon covering the dark side of the boundary `offset` degrees beyond the terminator
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TerminatorPolygon {
    pub offset: f64,
    pub sun: SubSolarPoint,
    pub dark_pole_lat: f64,
    /// [lon,lat] pairs, first and last coordinate are identical
    pub coords: Vec<[f64;2]>,
}

impl TerminatorPolygon {
    pub fn is_closed (&self)->bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => self.coords.len() > 3 && first == last,
            _ => false
        }
    }

    /// the boundary part of the polygon, i.e. the traced terminator without the pole closure
    pub fn boundary (&self)->&[[f64;2]] {
        let n = 360 / LON_STEP + 1;
        &self.coords[..n.min(self.coords.len())]
    }

    pub fn to_geojson (&self)->JsonValue {
        json!({
            "type": "Feature",
            "properties": { "offset": self.offset },
            "geometry": {
                "type": "Polygon",
                "coordinates": [ &self.coords ]
            }
        })
    }
}

pub fn compute_terminator (offset: f64, date: &DateTime<Utc>)->TerminatorPolygon {
    let sun = sub_solar_point(date);

    let mut decl = sun.lat;
    if decl.abs() < MIN_DECLINATION {
        decl = if decl >= 0.0 { MIN_DECLINATION } else { -MIN_DECLINATION };
    }
    let tan_decl = decl.to_radians().tan();

    let dark_pole_lat: f64 = if sun.lat >= 0.0 { -90.0 } else { 90.0 };
    let shift = dark_pole_lat.signum() * offset;

    let mut coords: Vec<[f64;2]> = Vec::with_capacity( 360 / LON_STEP + 4);
    for lon in (-180..=180).step_by(LON_STEP) {
        let lon = lon as f64;
        let hour_angle = (lon - sun.lon).to_radians();
        let lat = (-hour_angle.cos() / tan_decl).atan().to_degrees() + shift;
        coords.push( [lon, lat.clamp(-90.0, 90.0)]);
    }

    coords.push( [180.0, dark_pole_lat]);
    coords.push( [-180.0, dark_pole_lat]);
    let first = coords[0];
    coords.push( first);

    TerminatorPolygon { offset, sun, dark_pole_lat, coords }
}

/// the two polygons the globe shows: the twilight band boundary and full night
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TerminatorPair {
    pub computed_at: DateTime<Utc>,
    pub twilight: TerminatorPolygon,
    pub night: TerminatorPolygon,
}

impl TerminatorPair {
    pub fn compute (date: &DateTime<Utc>, twilight_offset: f64, night_offset: f64)->Self {
        TerminatorPair {
            computed_at: *date,
            twilight: compute_terminator( twilight_offset, date),
            night: compute_terminator( night_offset, date),
        }
    }
}
