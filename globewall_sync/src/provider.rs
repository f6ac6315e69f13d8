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

//! the external data sources. Only the primary surface ever calls these

use std::sync::Arc;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;
use globewall_common::geo::{BoundingBox, Location};

use crate::{
    allergy::{AirQuality, PlantPollen, PollenForecast},
    config::ProviderConfig,
    errors::{GlobeWallError, Result, parse_error},
    flights::Flight,
    prefs::UnitSystem,
    weather::{CurrentConditions, DailyForecast, WeatherReport},
};

pub const FORECAST_DAYS: usize = 7;

#[async_trait]
pub trait DataProvider: Send + Sync + 'static {
    async fn fetch_flights (&self, bbox: Option<BoundingBox>, max_flights: usize)->Result<Vec<Flight>>;
    async fn fetch_weather (&self, location: &Location, unit_system: UnitSystem)->Result<WeatherReport>;
    async fn fetch_air_quality (&self, location: &Location)->Result<AirQuality>;
    async fn fetch_pollen (&self, location: &Location, api_key: &str)->Result<PollenForecast>;
    async fn fetch_radar_tile_url (&self)->Result<String>;
}

pub type SharedProvider = Arc<dyn DataProvider>;

/* #region http provider ***************************************************************************/

pub struct HttpDataProvider {
    config: ProviderConfig,
    client: Client,
}

impl HttpDataProvider {
    pub fn new (config: ProviderConfig)->Result<Self> {
        let client = Client::builder()
            .timeout( config.request_timeout)
            .user_agent( concat!("globewall/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok( HttpDataProvider { config, client } )
    }

    async fn get_text (&self, source: &str, rb: RequestBuilder)->Result<String> {
        let response = rb.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            Err( GlobeWallError::RateLimited( source.to_string()))
        } else if !status.is_success() {
            Err( GlobeWallError::HttpStatus( status.as_u16()))
        } else {
            let text = response.text().await?;
            debug!("{} returned {} bytes", source, text.len());
            Ok(text)
        }
    }
}

#[async_trait]
impl DataProvider for HttpDataProvider {
    async fn fetch_flights (&self, bbox: Option<BoundingBox>, max_flights: usize)->Result<Vec<Flight>> {
        let mut rb = self.client.get( &self.config.flights_url);
        if let Some(bb) = bbox {
            rb = rb.query( &[("lamin", bb.south), ("lomin", bb.west), ("lamax", bb.north), ("lomax", bb.east)]);
        }
        let text = self.get_text( "opensky", rb).await?;
        parse_flight_states( &text, max_flights)
    }

    async fn fetch_weather (&self, location: &Location, unit_system: UnitSystem)->Result<WeatherReport> {
        let rb = self.client.get( &self.config.weather_url).query( &[
            ("latitude", location.lat.to_string()),
            ("longitude", location.lon.to_string()),
            ("current", "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,wind_direction_10m,surface_pressure,dew_point_2m".into()),
            ("daily", "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset".into()),
            ("temperature_unit", unit_system.temperature_unit().into()),
            ("wind_speed_unit", unit_system.wind_speed_unit().into()),
            ("timezone", "auto".into()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ]);
        let text = self.get_text( "open-meteo", rb).await?;
        parse_forecast( &text)
    }

    async fn fetch_air_quality (&self, location: &Location)->Result<AirQuality> {
        let rb = self.client.get( &self.config.air_quality_url).query( &[
            ("latitude", location.lat.to_string()),
            ("longitude", location.lon.to_string()),
            ("current", "us_aqi,pm2_5,pm10,uv_index".into()),
        ]);
        let text = self.get_text( "open-meteo air quality", rb).await?;
        parse_air_quality( &text)
    }

    async fn fetch_pollen (&self, location: &Location, api_key: &str)->Result<PollenForecast> {
        if api_key.is_empty() { return Err( GlobeWallError::MissingCredential("pollen api key")) }

        let rb = self.client.get( &self.config.pollen_url).query( &[
            ("key", api_key.to_string()),
            ("location.latitude", location.lat.to_string()),
            ("location.longitude", location.lon.to_string()),
            ("days", "1".into()),
            ("plantsDescription", "false".into()),
        ]);
        let text = self.get_text( "google pollen", rb).await?;
        parse_pollen( &text)
    }

    async fn fetch_radar_tile_url (&self)->Result<String> {
        let rb = self.client.get( &self.config.radar_url);
        let text = self.get_text( "rainviewer", rb).await?;
        parse_radar_tile_url( &text, &self.config.radar_tile_host)
    }
}

/* #endregion http provider */

/* #region response parsers ************************************************************************/

// OpenSky state vector indices
const SV_ICAO24: usize = 0;
const SV_CALLSIGN: usize = 1;
const SV_COUNTRY: usize = 2;
const SV_LON: usize = 5;
const SV_LAT: usize = 6;
const SV_BARO_ALT: usize = 7;
const SV_ON_GROUND: usize = 8;
const SV_VELOCITY: usize = 9;
const SV_TRUE_TRACK: usize = 10;
const SV_VERTICAL_RATE: usize = 11;
const SV_GEO_ALT: usize = 13;

#[derive(Deserialize)]
struct StatesResponse {
    #[serde(default)]
    states: Option<Vec<Vec<JsonValue>>>,
}

fn sv_f64 (sv: &[JsonValue], i: usize)->Option<f64> { sv.get(i).and_then( |v| v.as_f64()) }
fn sv_str (sv: &[JsonValue], i: usize)->String { sv.get(i).and_then( |v| v.as_str()).unwrap_or("").trim().to_string() }

/// airborne flights with a known position from an OpenSky `states/all` response
pub fn parse_flight_states (json: &str, max_flights: usize)->Result<Vec<Flight>> {
    let response: StatesResponse = serde_json::from_str(json)?;

    let flights = response.states.unwrap_or_default().iter()
        .filter( |sv| !sv.get(SV_ON_GROUND).and_then( |v| v.as_bool()).unwrap_or(false))
        .filter_map( |sv| {
            let lon = sv_f64( sv, SV_LON)?;
            let lat = sv_f64( sv, SV_LAT)?;
            Some( Flight {
                icao24: sv_str( sv, SV_ICAO24),
                callsign: sv_str( sv, SV_CALLSIGN),
                origin_country: sv_str( sv, SV_COUNTRY),
                lon, lat,
                altitude: sv_f64( sv, SV_GEO_ALT).or_else( || sv_f64( sv, SV_BARO_ALT)),
                velocity: sv_f64( sv, SV_VELOCITY).unwrap_or(0.0),
                heading: sv_f64( sv, SV_TRUE_TRACK).unwrap_or(0.0),
                vertical_rate: sv_f64( sv, SV_VERTICAL_RATE),
            })
        })
        .take( max_flights)
        .collect();

    Ok(flights)
}

#[derive(Deserialize,Default)]
#[serde(default)]
struct ForecastCurrent {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weather_code: Option<i32>,
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
    surface_pressure: Option<f64>,
    dew_point_2m: Option<f64>,
}

#[derive(Deserialize,Default)]
#[serde(default)]
struct ForecastDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    sunrise: Vec<Option<String>>,
    sunset: Vec<Option<String>>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    timezone: Option<String>,
    current: Option<ForecastCurrent>,
    #[serde(default)]
    daily: ForecastDaily,
}

/// an Open-Meteo forecast response
pub fn parse_forecast (json: &str)->Result<WeatherReport> {
    let response: ForecastResponse = serde_json::from_str(json)?;
    let c = response.current.ok_or_else( || parse_error!("forecast without current conditions"))?;
    let d = response.daily;

    let daily = d.time.iter().enumerate().map( |(i,date)| DailyForecast {
        date: date.clone(),
        high: d.temperature_2m_max.get(i).copied().flatten(),
        low: d.temperature_2m_min.get(i).copied().flatten(),
        weather_code: d.weather_code.get(i).copied().flatten(),
    }).collect();

    Ok( WeatherReport {
        timezone: response.timezone,
        sunrise: d.sunrise.first().cloned().flatten(),
        sunset: d.sunset.first().cloned().flatten(),
        current: CurrentConditions {
            temperature: c.temperature_2m,
            humidity: c.relative_humidity_2m,
            weather_code: c.weather_code,
            wind_speed: c.wind_speed_10m,
            wind_direction: c.wind_direction_10m,
            pressure: c.surface_pressure,
            dew_point: c.dew_point_2m,
        },
        daily,
    })
}

#[derive(Deserialize)]
struct AirQualityResponse {
    current: Option<AirQuality>,
}

pub fn parse_air_quality (json: &str)->Result<AirQuality> {
    let response: AirQualityResponse = serde_json::from_str(json)?;
    response.current.ok_or_else( || parse_error!("air quality response without current values"))
}

#[derive(Deserialize)]
#[serde(rename_all="camelCase")]
struct PollenResponse {
    #[serde(default)]
    daily_info: Vec<PollenDay>,
}

#[derive(Deserialize)]
#[serde(rename_all="camelCase")]
struct PollenDay {
    date: Option<PollenDate>,
    #[serde(default)]
    plant_info: Vec<PollenPlant>,
}

#[derive(Deserialize)]
struct PollenDate { year: i32, month: u32, day: u32 }

#[derive(Deserialize)]
#[serde(rename_all="camelCase")]
struct PollenPlant {
    #[serde(default)]
    code: String,
    display_name: Option<String>,
    #[serde(default)]
    in_season: bool,
    index_info: Option<PollenIndex>,
}

#[derive(Deserialize)]
struct PollenIndex {
    value: Option<u32>,
    category: Option<String>,
}

/// first day of a Google pollen forecast
pub fn parse_pollen (json: &str)->Result<PollenForecast> {
    let response: PollenResponse = serde_json::from_str(json)?;
    let day = response.daily_info.into_iter().next().ok_or_else( || parse_error!("pollen response without daily info"))?;

    let plants = day.plant_info.into_iter().map( |p| PlantPollen {
        name: p.display_name.unwrap_or(p.code),
        index: p.index_info.as_ref().and_then( |i| i.value),
        category: p.index_info.and_then( |i| i.category),
        in_season: p.in_season,
    }).collect();

    Ok( PollenForecast {
        date: day.date.map( |d| format!("{:04}-{:02}-{:02}", d.year, d.month, d.day)),
        plants
    })
}

#[derive(Deserialize)]
struct RadarFrame {
    path: String,
}

#[derive(Deserialize,Default)]
#[serde(default)]
struct RadarFrames {
    past: Vec<RadarFrame>,
}

#[derive(Deserialize)]
struct WeatherMapsResponse {
    host: Option<String>,
    #[serde(default)]
    radar: RadarFrames,
}

/// tile URL template of the latest past radar frame of a RainViewer weather-maps response
pub fn parse_radar_tile_url (json: &str, default_host: &str)->Result<String> {
    let response: WeatherMapsResponse = serde_json::from_str(json)?;
    let frame = response.radar.past.last().ok_or_else( || parse_error!("no radar frames"))?;
    let host = response.host.as_deref().unwrap_or(default_host);
    Ok( format!("{}{}/256/{{z}}/{{x}}/{{y}}/2/1_1.png", host, frame.path) )
}

/* #endregion response parsers */
