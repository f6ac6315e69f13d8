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
#![allow(unused)]

//! test fixtures shared by the integration tests of this crate

use std::{sync::{Arc, atomic::{AtomicUsize, Ordering}}, time::Duration};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use globewall_common::{datetime::{ManualClock, SharedClock}, geo::{BoundingBox, Location}};
use globewall_sync::{
    allergy::{AirQuality, PlantPollen, PollenForecast},
    config::GlobeWallConfig,
    flights::Flight,
    prefs::UnitSystem,
    provider::DataProvider,
    weather::{CurrentConditions, WeatherReport},
    errors::Result,
};

pub const RADAR_URL: &str = "https://tilecache.rainviewer.com/v2/radar/1760000000/256/{z}/{x}/{y}/2/1_1.png";

/// counts calls per provider method and returns canned data
#[derive(Default)]
pub struct MockProvider {
    pub delay: Duration,
    pub flights: AtomicUsize,
    pub weather: AtomicUsize,
    pub air_quality: AtomicUsize,
    pub pollen: AtomicUsize,
    pub radar: AtomicUsize,
}

impl MockProvider {
    pub fn new()->Arc<Self> { Arc::new( MockProvider::default()) }

    pub fn with_delay (delay: Duration)->Arc<Self> {
        Arc::new( MockProvider { delay, ..MockProvider::default() })
    }

    pub fn weather_calls (&self)->usize { self.weather.load( Ordering::SeqCst) }
    pub fn flight_calls (&self)->usize { self.flights.load( Ordering::SeqCst) }
    pub fn pollen_calls (&self)->usize { self.pollen.load( Ordering::SeqCst) }
    pub fn air_quality_calls (&self)->usize { self.air_quality.load( Ordering::SeqCst) }
    pub fn radar_calls (&self)->usize { self.radar.load( Ordering::SeqCst) }

    async fn pause (&self) {
        if !self.delay.is_zero() { tokio::time::sleep( self.delay).await }
    }
}

#[async_trait]
impl DataProvider for MockProvider {
    async fn fetch_flights (&self, _bbox: Option<BoundingBox>, _max_flights: usize)->Result<Vec<Flight>> {
        self.flights.fetch_add( 1, Ordering::SeqCst);
        self.pause().await;
        Ok( vec![
            Flight { icao24: "a1b2c3".into(), callsign: "SWA123".into(), origin_country: "United States".into(),
                     lon: -97.7, lat: 30.2, altitude: Some(10000.0), velocity: 230.0, heading: 90.0, vertical_rate: None },
            Flight { icao24: "3c6444".into(), callsign: "DLH400".into(), origin_country: "Germany".into(),
                     lon: -40.0, lat: 50.0, altitude: Some(11000.0), velocity: 250.0, heading: 270.0, vertical_rate: Some(0.0) },
        ])
    }

    async fn fetch_weather (&self, _location: &Location, unit_system: UnitSystem)->Result<WeatherReport> {
        self.weather.fetch_add( 1, Ordering::SeqCst);
        self.pause().await;
        let temperature = match unit_system { UnitSystem::Imperial => 72.0, UnitSystem::Metric => 22.2 };
        Ok( WeatherReport {
            timezone: Some("America/Chicago".into()),
            sunrise: Some("2025-06-21T06:29".into()),
            sunset: Some("2025-06-21T20:36".into()),
            current: CurrentConditions { temperature: Some(temperature), humidity: Some(40.0), weather_code: Some(1), ..CurrentConditions::default() },
            daily: Vec::new(),
        })
    }

    async fn fetch_air_quality (&self, _location: &Location)->Result<AirQuality> {
        self.air_quality.fetch_add( 1, Ordering::SeqCst);
        self.pause().await;
        Ok( AirQuality { us_aqi: Some(42.0), pm2_5: Some(8.1), pm10: Some(12.0), uv_index: Some(6.0) })
    }

    async fn fetch_pollen (&self, _location: &Location, _api_key: &str)->Result<PollenForecast> {
        self.pollen.fetch_add( 1, Ordering::SeqCst);
        self.pause().await;
        Ok( PollenForecast {
            date: Some("2025-06-21".into()),
            plants: vec![ PlantPollen { name: "Grass".into(), index: Some(3), category: Some("Moderate".into()), in_season: true } ]
        })
    }

    async fn fetch_radar_tile_url (&self)->Result<String> {
        self.radar.fetch_add( 1, Ordering::SeqCst);
        self.pause().await;
        Ok( RADAR_URL.to_string())
    }
}

pub fn start_time()->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 6, 21, 17, 0, 0).unwrap()
}

pub fn manual_clock()->(Arc<ManualClock>, SharedClock) {
    let clock = Arc::new( ManualClock::new( start_time()));
    let shared: SharedClock = clock.clone();
    (clock, shared)
}

/// config with timers that don't fire on their own during a test
pub fn test_config()->Arc<GlobeWallConfig> {
    let mut config = GlobeWallConfig::default();
    config.background_interval = Duration::from_secs(3600);
    config.clock_interval = Duration::from_secs(3600);
    Arc::new(config)
}

/// poll `cond` until it holds or `timeout` passed. Returns the last value of `cond`
pub async fn wait_until<F> (timeout: Duration, cond: F)->bool where F: Fn()->bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() { return true }
        if tokio::time::Instant::now() >= deadline { return cond() }
        tokio::time::sleep( Duration::from_millis(10)).await;
    }
}

/// give running tasks a chance to process whatever is queued
pub async fn settle() {
    tokio::time::sleep( Duration::from_millis(150)).await;
}
