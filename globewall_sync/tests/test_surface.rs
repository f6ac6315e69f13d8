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

mod common;

use std::{sync::Arc, time::Duration};
use kanal::AsyncReceiver;
use globewall_common::{geo::Location, store::LocalStore};
use globewall_sync::{
    display::DisplayId,
    manager::ManagerMsg,
    msg::{DataKind, RelayMsg, SurfaceCmd},
    prefs::{Layer, LayerToggles, SharedPrefs, UnitSystem},
    renderer::{PlaceholderSlot, RecordingHandle, RecordingRenderer, RenderUpdate},
    surface::{MAP_TOKEN_PLACEHOLDER, POLLEN_KEY_PLACEHOLDER, SurfaceContext, SurfaceHandle, SurfaceSeed, spawn_surface},
    weather::{WeatherReport, WeatherSnapshot, CurrentConditions},
};
use common::*;

const TIMEOUT: Duration = Duration::from_secs(3);

fn seed (prefs: SharedPrefs)->SurfaceSeed {
    SurfaceSeed { prefs, location: Location::austin_tx(), paused: false, terminator: None }
}

fn imperial_prefs()->SharedPrefs {
    SharedPrefs { unit_system: UnitSystem::Imperial, ..SharedPrefs::default() }
}

/// a single surface that reports to a manager mailbox we can inspect
fn spawn_test_surface (index: usize, seed: SurfaceSeed, provider: Arc<MockProvider>)->(SurfaceHandle, RecordingHandle, AsyncReceiver<ManagerMsg>) {
    let (_clock, shared_clock) = manual_clock();
    let (tx, rx) = kanal::bounded_async::<ManagerMsg>(64);
    let ctx = SurfaceContext { config: test_config(), provider, clock: shared_clock, cache: LocalStore::new(), manager: tx };

    let (renderer, recording) = RecordingRenderer::new();
    let handle = spawn_surface( index, DisplayId::from("test"), 1, seed, Box::new(renderer), ctx);
    (handle, recording, rx)
}

fn weather_snapshot (temperature: f64)->WeatherSnapshot {
    WeatherSnapshot {
        location: Location::austin_tx(),
        unit_system: UnitSystem::Imperial,
        timestamp: start_time(),
        report: WeatherReport {
            timezone: Some("America/Chicago".into()),
            current: CurrentConditions { temperature: Some(temperature), weather_code: Some(0), ..CurrentConditions::default() },
            ..WeatherReport::default()
        }
    }
}

fn relayed_kinds (rx: &AsyncReceiver<ManagerMsg>)->Vec<DataKind> {
    let mut kinds = Vec::new();
    while let Ok(Some(msg)) = rx.try_recv() {
        if let ManagerMsg::Relay(envelope) = msg { kinds.push( envelope.msg.kind()) }
    }
    kinds
}

#[tokio::test]
async fn test_secondary_relay_is_idempotent() {
    let provider = MockProvider::new();
    let (surface, recording, _rx) = spawn_test_surface( 1, seed( imperial_prefs()), provider.clone());

    let msg = RelayMsg::Weather( Arc::new( weather_snapshot(81.0)));
    assert!( surface.try_send( msg.clone()));
    assert!( wait_until( TIMEOUT, || recording.snapshot().weather.is_some()).await);
    let first = recording.snapshot();
    println!("after first relay: {}", first.weather.as_ref().unwrap().summary());

    assert!( surface.try_send( msg.clone()));
    assert!( surface.try_send( RelayMsg::RadarTileUrl( RADAR_URL.into())));
    settle().await;
    let second = recording.snapshot();

    // radar layer is off, so the url is kept but not shown
    assert_eq!( first, second);
    assert_eq!( provider.weather_calls() + provider.flight_calls() + provider.radar_calls(), 0);
    surface.terminate();
}

#[tokio::test]
async fn test_secondary_ignores_weather_for_other_place() {
    let provider = MockProvider::new();
    let (surface, recording, _rx) = spawn_test_surface( 1, seed( imperial_prefs()), provider.clone());

    let mut other = weather_snapshot(50.0);
    other.location = Location::new( "Denver, CO", 39.74, -104.99);
    surface.try_send( RelayMsg::Weather( Arc::new(other)));

    let mut metric = weather_snapshot(27.0);
    metric.unit_system = UnitSystem::Metric;
    surface.try_send( RelayMsg::Weather( Arc::new(metric)));
    settle().await;

    assert!( recording.snapshot().weather.is_none());
    surface.terminate();
}

#[tokio::test]
async fn test_primary_fetches_and_ignores_relays() {
    let provider = MockProvider::new();
    let (surface, recording, rx) = spawn_test_surface( 0, seed( imperial_prefs()), provider.clone());
    assert!( surface.is_primary);

    assert!( wait_until( TIMEOUT, || recording.snapshot().weather.is_some()).await);
    let shown = recording.snapshot().weather.unwrap();
    println!("primary shows: {}", shown.summary());
    assert_eq!( shown.report.current.temperature, Some(72.0));
    assert_eq!( provider.weather_calls(), 1);

    surface.try_send( RelayMsg::Weather( Arc::new( weather_snapshot(99.0))));
    settle().await;
    assert_eq!( recording.snapshot().weather.unwrap().report.current.temperature, Some(72.0));

    let kinds = relayed_kinds(&rx);
    println!("posted relays: {:?}", kinds);
    assert_eq!( kinds, vec![DataKind::Weather]);
    surface.terminate();
}

#[tokio::test]
async fn test_missing_credentials_gate_fetches() {
    let provider = MockProvider::new();
    let mut prefs = imperial_prefs();
    prefs.toggles = LayerToggles { flights: true, pollen: true, ..LayerToggles::default() };
    let (surface, recording, _rx) = spawn_test_surface( 0, seed(prefs), provider.clone());

    assert!( wait_until( TIMEOUT, || recording.snapshot().weather.is_some()).await);
    let snap = recording.snapshot();
    println!("placeholders: {:?}", snap.placeholders);
    assert_eq!( snap.placeholders.get(&PlaceholderSlot::Globe).map( String::as_str), Some(MAP_TOKEN_PLACEHOLDER));
    assert_eq!( snap.placeholders.get(&PlaceholderSlot::Allergy).map( String::as_str), Some(POLLEN_KEY_PLACEHOLDER));
    assert!( !snap.is_visible( Layer::Flights));
    assert_eq!( provider.flight_calls(), 0);
    assert_eq!( provider.pollen_calls(), 0);
    assert_eq!( provider.air_quality_calls(), 0);

    //--- pollen key arrives: exactly one allergy fetch
    surface.try_send( SurfaceCmd::SetPollenKey("pollen-key".into()));
    assert!( wait_until( TIMEOUT, || recording.snapshot().allergy.is_some()).await);
    assert!( recording.snapshot().placeholders.get(&PlaceholderSlot::Allergy).is_none());

    surface.try_send( SurfaceCmd::SetPollenKey("pollen-key".into()));
    settle().await;
    assert_eq!( provider.pollen_calls(), 1);
    assert_eq!( provider.air_quality_calls(), 1);

    //--- map token arrives: flights become visible and get fetched once
    surface.try_send( SurfaceCmd::SetMapToken("map-token".into()));
    assert!( wait_until( TIMEOUT, || recording.snapshot().flights.is_some()).await);
    surface.try_send( SurfaceCmd::SetMapToken("map-token".into()));
    settle().await;

    let snap = recording.snapshot();
    assert!( snap.placeholders.is_empty());
    assert!( snap.is_visible( Layer::Flights));
    assert_eq!( provider.flight_calls(), 1);
    assert_eq!( snap.flights.unwrap().len(), 2);
    surface.terminate();
}

#[tokio::test]
async fn test_concurrent_weather_requests_are_deduped() {
    let provider = MockProvider::with_delay( Duration::from_millis(200));
    let (surface, recording, _rx) = spawn_test_surface( 0, seed( imperial_prefs()), provider.clone());

    for _ in 0..5 {
        surface.try_send( SurfaceCmd::RefreshStaleWeather);
    }
    assert!( wait_until( TIMEOUT, || recording.snapshot().weather.is_some()).await);
    settle().await;
    println!("weather fetches: {}", provider.weather_calls());
    assert_eq!( provider.weather_calls(), 1);
    surface.terminate();
}

#[tokio::test]
async fn test_outdated_weather_result_is_discarded() {
    let provider = MockProvider::with_delay( Duration::from_millis(200));
    let (surface, recording, _rx) = spawn_test_surface( 0, seed( imperial_prefs()), provider.clone());

    // switch units while the imperial request is still running
    surface.try_send( SurfaceCmd::SetUnitSystem( UnitSystem::Metric));
    assert!( wait_until( TIMEOUT, || provider.weather_calls() == 2).await);
    assert!( wait_until( TIMEOUT, || recording.snapshot().weather.is_some()).await);
    settle().await;

    let shown = recording.snapshot().weather.unwrap();
    println!("shown: {}", shown.summary());
    assert_eq!( shown.unit_system, UnitSystem::Metric);
    assert_eq!( recording.count_updates( |u| matches!( u, RenderUpdate::Weather{..})), 1);
    surface.terminate();
}

#[tokio::test]
async fn test_terminated_surface_drops_messages() {
    let provider = MockProvider::new();
    let (surface, recording, _rx) = spawn_test_surface( 1, seed( imperial_prefs()), provider);
    assert!( wait_until( TIMEOUT, || recording.update_count() > 0).await);

    surface.terminate();
    assert!( wait_until( TIMEOUT, || !surface.is_running()).await);
    assert!( !surface.try_send( RelayMsg::RadarTileUrl( RADAR_URL.into())));
}
