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
use globewall_common::{geo::Location, store::{LocalStore, PrefsStore}};
use globewall_sync::{
    display::DisplayTopology,
    lifecycle::SystemEvent,
    manager::spawn_manager,
    msg::DataKind,
    prefs::{self, Layer, UnitSystem, ZoomLevel},
    renderer::{PlaceholderSlot, RecordingFactory},
    weather,
};
use common::*;

const TIMEOUT: Duration = Duration::from_secs(3);

fn imperial_prefs_store()->PrefsStore {
    let mut store = PrefsStore::in_memory();
    store.set( prefs::UNIT_SYSTEM_KEY, "imperial").unwrap();
    store
}

#[tokio::test]
async fn test_only_primary_fetches() {
    let provider = MockProvider::new();
    let factory = RecordingFactory::new();
    let (_clock, clock) = manual_clock();

    let (hmgr, jh) = spawn_manager( test_config(), imperial_prefs_store(), LocalStore::new(), Box::new( factory.clone()),
                                    provider.clone(), clock, DisplayTopology::from_list("main,left"));

    let primary = factory.latest(0).unwrap();
    let secondary = factory.latest(1).unwrap();
    assert!( wait_until( TIMEOUT, || primary.snapshot().weather.is_some() && secondary.snapshot().weather.is_some()).await);
    settle().await;

    println!("primary: {}", primary.snapshot().weather.unwrap().summary());
    println!("secondary: {}", secondary.snapshot().weather.unwrap().summary());
    assert_eq!( primary.snapshot().weather, secondary.snapshot().weather);
    assert_eq!( provider.weather_calls(), 1);

    let status = hmgr.status().await.unwrap();
    println!("status: {:#?}", status);
    assert_eq!( status.surfaces.len(), 2);
    assert!( status.surfaces[0].is_primary);
    assert!( !status.surfaces[1].is_primary);
    assert!( status.scheduler_running);

    hmgr.terminate().await.unwrap();
    jh.await.unwrap();
}

#[tokio::test]
async fn test_rebuild_seeds_new_surfaces() {
    let provider = MockProvider::new();
    let factory = RecordingFactory::new();
    let (_clock, clock) = manual_clock();

    let (hmgr, jh) = spawn_manager( test_config(), imperial_prefs_store(), LocalStore::new(), Box::new( factory.clone()),
                                    provider.clone(), clock, DisplayTopology::from_list("main"));
    let first = factory.latest(0).unwrap();
    assert!( wait_until( TIMEOUT, || first.snapshot().weather.is_some()).await);

    let denver = Location::new( "Denver, CO", 39.74, -104.99);
    hmgr.set_map_token("  map-token ").await.unwrap();
    hmgr.set_layer_toggle( Layer::Flights, true).await.unwrap();
    hmgr.set_zoom( ZoomLevel::City).await.unwrap();
    hmgr.set_location( denver.clone()).await.unwrap();
    assert!( wait_until( TIMEOUT, || {
        first.snapshot().weather.map( |w| w.location.is_same_place(&denver)).unwrap_or(false)
    }).await);
    assert_eq!( provider.weather_calls(), 2);

    hmgr.rebuild_surfaces( DisplayTopology::from_list("main,left")).await.unwrap();
    let status = hmgr.status().await.unwrap();
    assert_eq!( status.generation, 2);
    assert_eq!( status.surfaces.len(), 2);
    assert_eq!( status.state.prefs.map_token, "map-token");

    let secondary = factory.latest(1).unwrap();
    assert!( wait_until( TIMEOUT, || {
        let s = secondary.snapshot();
        s.weather.is_some() && s.flights.is_some()
    }).await);

    let snap = secondary.snapshot();
    println!("seeded secondary: location={:?} zoom={:?} placeholders={:?}", snap.location, snap.zoom, snap.placeholders);
    assert_eq!( snap.location, Some(denver.clone()));
    assert_eq!( snap.zoom, Some(ZoomLevel::City));
    assert!( snap.is_visible( Layer::Flights));
    assert!( snap.placeholders.get(&PlaceholderSlot::Globe).is_none());
    assert!( snap.weather.unwrap().location.is_same_place(&denver));

    // the fresh cached Denver weather was reused by the new primary
    assert_eq!( provider.weather_calls(), 2);
    assert_eq!( factory.created().len(), 3);

    hmgr.terminate().await.unwrap();
    jh.await.unwrap();
}

#[tokio::test]
async fn test_settings_are_persisted_and_restored() {
    let path = std::env::temp_dir().join( format!("globewall-test-manager-prefs-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let provider = MockProvider::new();
    let (_clock, clock) = manual_clock();
    let store = PrefsStore::open(&path);
    let (hmgr, jh) = spawn_manager( test_config(), store, LocalStore::new(), Box::new( RecordingFactory::new()),
                                    provider.clone(), clock.clone(), DisplayTopology::from_list("main"));

    hmgr.set_location( Location::new( "Tromsø", 69.65, 18.96)).await.unwrap();
    hmgr.set_unit_system( UnitSystem::Metric).await.unwrap();
    hmgr.set_pollen_key("pk-123").await.unwrap();
    hmgr.status().await.unwrap(); // all commands processed
    hmgr.terminate().await.unwrap();
    jh.await.unwrap();

    let factory = RecordingFactory::new();
    let (hmgr, jh) = spawn_manager( test_config(), PrefsStore::open(&path), LocalStore::new(), Box::new( factory.clone()),
                                    provider, clock, DisplayTopology::from_list("main"));
    let status = hmgr.status().await.unwrap();
    println!("restored state: {:?}", status.state);
    assert_eq!( status.state.prefs.unit_system, UnitSystem::Metric);
    assert_eq!( status.state.prefs.pollen_key, "pk-123");
    assert_eq!( status.state.location.as_ref().map( |l| l.name.as_str()), Some("Tromsø"));

    let surface = factory.latest(0).unwrap();
    assert!( wait_until( TIMEOUT, || surface.snapshot().location.is_some()).await);
    assert_eq!( surface.snapshot().location.unwrap().name, "Tromsø");

    hmgr.terminate().await.unwrap();
    jh.await.unwrap();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_displays_changed_event_rebuilds() {
    let provider = MockProvider::new();
    let factory = RecordingFactory::new();
    let (_clock, clock) = manual_clock();

    let (hmgr, jh) = spawn_manager( test_config(), imperial_prefs_store(), LocalStore::new(), Box::new( factory.clone()),
                                    provider.clone(), clock, DisplayTopology::from_list("main,left,right"));
    assert_eq!( hmgr.status().await.unwrap().surfaces.len(), 3);

    hmgr.system_event( SystemEvent::DisplaysChanged( DisplayTopology::from_list("main"))).await.unwrap();
    let status = hmgr.status().await.unwrap();
    assert_eq!( status.generation, 2);
    assert_eq!( status.surfaces.len(), 1);
    assert_eq!( status.surfaces[0].generation, 2);

    let primary = factory.latest(0).unwrap();
    assert!( wait_until( TIMEOUT, || primary.snapshot().weather.is_some()).await);
    settle().await;

    let status = hmgr.status().await.unwrap();
    println!("weather relay stats: {:?}", status.relay_stats( DataKind::Weather));
    assert!( status.relay_stats( DataKind::Weather).received >= 1);

    hmgr.terminate().await.unwrap();
    jh.await.unwrap();
}
