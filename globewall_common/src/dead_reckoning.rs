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

use crate::geo::{EARTH_RADIUS, normalize_180};

/// below this cos(lat) we don't extrapolate longitude anymore (≈ 89.4° lat)
pub const MIN_COS_LAT: f64 = 0.01;

/// estimated position of an object that was at `lon`,`lat` (degrees) moving with `velocity` (m/s)
/// on a constant `heading` (degrees clockwise from north) after `elapsed_secs`.
///
/// Always extrapolate from the original fix with the total elapsed time, never from a previous
/// estimate, so that results do not depend on how often this gets called.
/// Returns (lon,lat) in degrees, lon normalized to [-180,180] and lat clamped to [-90,90].
pub fn estimate_position (lon: f64, lat: f64, velocity: f64, heading: f64, elapsed_secs: f64)->(f64,f64) {
    let dist = velocity * elapsed_secs;
    let heading = heading.to_radians();
    let angular_dist = dist / EARTH_RADIUS;

    let dlat = (angular_dist * heading.cos()).to_degrees();

    let cos_lat = lat.to_radians().cos();
    let dlon = if cos_lat > MIN_COS_LAT {
        (angular_dist * heading.sin() / cos_lat).to_degrees()
    } else {
        0.0
    };

    (normalize_180(lon + dlon), (lat + dlat).clamp(-90.0, 90.0))
}
