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

use serde::{Serialize,Deserialize};
use globewall_common::geo::Location;

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct AirQuality {
    pub us_aqi: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub uv_index: Option<f64>,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct PlantPollen {
    pub name: String,
    /// universal pollen index 0..5
    pub index: Option<u32>,
    pub category: Option<String>,
    pub in_season: bool,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct PollenForecast {
    pub date: Option<String>,
    pub plants: Vec<PlantPollen>,
}

impl PollenForecast {
    /// highest index of all plants that are in season
    pub fn max_index (&self)->Option<u32> {
        self.plants.iter().filter( |p| p.in_season).filter_map( |p| p.index).max()
    }
}

/// payload of the allergy panel. Either part can be missing if its provider failed
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct AllergyData {
    pub location: Location,
    pub air_quality: Option<AirQuality>,
    pub pollen: Option<PollenForecast>,
}

impl AllergyData {
    pub fn is_empty (&self)->bool {
        self.air_quality.is_none() && self.pollen.is_none()
    }
}

pub fn aqi_category (aqi: f64)->&'static str {
    if aqi <= 50.0 { "Good" }
    else if aqi <= 100.0 { "Moderate" }
    else if aqi <= 150.0 { "Unhealthy for Sensitive Groups" }
    else if aqi <= 200.0 { "Unhealthy" }
    else if aqi <= 300.0 { "Very Unhealthy" }
    else { "Hazardous" }
}

pub fn pollen_category (index: u32)->&'static str {
    match index {
        0 => "None",
        1 => "Very Low",
        2 => "Low",
        3 => "Moderate",
        4 => "High",
        _ => "Very High"
    }
}
