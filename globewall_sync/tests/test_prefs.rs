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

use chrono::{TimeZone, Utc};
use globewall_common::{datetime::{minutes, millis}, geo::Location, store::{LocalStore, PrefsStore}};
use globewall_sync::{
    clock::{clock_face, parse_sun_minutes, sun_arc_position},
    config::GlobeWallConfig,
    console::{ConsoleCmd, parse_console_cmd},
    lifecycle::SystemEvent,
    manager::ManagerCmd,
    prefs::{self, Layer, LayerToggles, SharedState, UnitSystem, ZoomLevel},
    weather::{self, WeatherReport, WeatherSnapshot},
};

#[test]
fn test_unit_system() {
    assert_eq!( UnitSystem::normalize(" Metric "), UnitSystem::Metric);
    assert_eq!( UnitSystem::normalize("kelvin"), UnitSystem::Imperial);
    assert_eq!( UnitSystem::from_locale("en_US.UTF-8"), UnitSystem::Imperial);
    assert_eq!( UnitSystem::from_locale("de_DE.UTF-8"), UnitSystem::Metric);
    assert_eq!( UnitSystem::from_locale("en-GB"), UnitSystem::Metric);
    assert_eq!( UnitSystem::from_locale("C"), UnitSystem::Imperial);
    assert_eq!( UnitSystem::Metric.temperature_unit(), "celsius");
}

#[test]
fn test_layers_and_zoom() {
    let mut toggles = LayerToggles::default();
    assert!( toggles.get( Layer::Labels));
    assert!( toggles.set( Layer::Flights, true));
    assert!( !toggles.set( Layer::Flights, true));
    assert!( !Layer::Pollen.needs_map());

    assert_eq!( "radar".parse::<Layer>().unwrap(), Layer::WeatherRadar);
    assert_eq!( "city".parse::<ZoomLevel>().unwrap(), ZoomLevel::City);
    assert_eq!( "12".parse::<ZoomLevel>().unwrap(), ZoomLevel::Street);
    assert!( "7".parse::<ZoomLevel>().is_err());
}

#[test]
fn test_shared_state_load() {
    let mut store = PrefsStore::in_memory();
    let state = SharedState::load(&store);
    assert!( state.location.is_none());
    assert_eq!( state.effective_location( &Location::austin_tx()), Location::austin_tx());

    prefs::persist_location( &mut store, &Location::new( "", 47.61, -122.33));
    prefs::persist_str( &mut store, prefs::UNIT_SYSTEM_KEY, "metric");
    prefs::persist_str( &mut store, prefs::MAP_TOKEN_KEY, "pk.abc");

    let state = SharedState::load(&store);
    println!("{:?}", state);
    let loc = state.location.unwrap();
    assert_eq!( loc.name, "47.61, -122.33"); // unnamed locations show their coordinates
    assert_eq!( state.prefs.unit_system, UnitSystem::Metric);
    assert_eq!( state.prefs.map_token, "pk.abc");
    assert!( state.prefs.pollen_key.is_empty());
}

#[test]
fn test_console_commands() {
    match parse_console_cmd("location 39.74 -104.99 Denver, CO").unwrap() {
        Some( ConsoleCmd::Manager( ManagerCmd::SetLocation(loc))) => {
            assert_eq!( loc.name, "Denver, CO");
            assert_eq!( loc.lat, 39.74);
        }
        other => panic!("unexpected {:?}", other)
    }

    assert!( matches!( parse_console_cmd("layer flights on").unwrap(), Some( ConsoleCmd::Manager( ManagerCmd::SetLayer( Layer::Flights, true)))));
    assert!( matches!( parse_console_cmd("units metric").unwrap(), Some( ConsoleCmd::Manager( ManagerCmd::SetUnitSystem( UnitSystem::Metric)))));
    assert!( matches!( parse_console_cmd("lock").unwrap(), Some( ConsoleCmd::System( SystemEvent::ScreenLocked))));
    assert!( matches!( parse_console_cmd("token").unwrap(), Some( ConsoleCmd::Manager( ManagerCmd::SetMapToken(t))) if t.is_empty()));
    assert!( matches!( parse_console_cmd("status").unwrap(), Some( ConsoleCmd::Status)));
    assert!( parse_console_cmd("   ").unwrap().is_none());

    match parse_console_cmd("displays main, left").unwrap() {
        Some( ConsoleCmd::System( SystemEvent::DisplaysChanged(topology))) => assert_eq!( topology.len(), 2),
        other => panic!("unexpected {:?}", other)
    }

    assert!( parse_console_cmd("location 95 0").is_err());
    assert!( parse_console_cmd("location NaN NaN").is_err());
    assert!( parse_console_cmd("location 10 inf").is_err());
    assert!( parse_console_cmd("layer clouds on").is_err());
    assert!( parse_console_cmd("layer flights maybe").is_err());
    assert!( parse_console_cmd("frobnicate").is_err());
}

#[test]
fn test_weather_cache() {
    let cache = LocalStore::new();
    let now = Utc.with_ymd_and_hms( 2025, 10, 17, 20, 0, 0).unwrap();
    let austin = Location::austin_tx();
    let snapshot = WeatherSnapshot {
        location: austin.clone(), unit_system: UnitSystem::Imperial, timestamp: now, report: WeatherReport::default()
    };

    weather::write_cached( &cache, &snapshot).unwrap();
    assert_eq!( weather::cache_key( UnitSystem::Imperial), "weather-cache-imperial");
    assert!( weather::fresh_cached( &cache, &austin, UnitSystem::Imperial, &now, minutes(15)).is_some());

    // nearby is the same place, other units or an expired snapshot are not
    let nearby = Location::new( "Austin", austin.lat + 0.005, austin.lon - 0.005);
    assert!( weather::fresh_cached( &cache, &nearby, UnitSystem::Imperial, &now, minutes(15)).is_some());
    assert!( weather::fresh_cached( &cache, &austin, UnitSystem::Metric, &now, minutes(15)).is_none());
    let later = now + chrono::Duration::minutes(16);
    assert!( weather::fresh_cached( &cache, &austin, UnitSystem::Imperial, &later, minutes(15)).is_none());
    assert!( weather::read_cached( &cache, UnitSystem::Imperial).is_some());

    cache.insert( weather::cache_key( UnitSystem::Imperial), "{\"location\": 42");
    assert!( weather::read_cached( &cache, UnitSystem::Imperial).is_none());
    assert!( !cache.contains_key( &weather::cache_key( UnitSystem::Imperial)));
}

#[test]
fn test_clock_face() {
    assert_eq!( parse_sun_minutes("2025-10-17T07:31"), Some(451));
    assert_eq!( parse_sun_minutes("07:31"), None);

    let noon = sun_arc_position( 12*60+30, 6*60+30, 18*60+30);
    assert!( noon.is_day);
    assert!( (noon.x - 45.0).abs() < 1e-6);
    assert!( !sun_arc_position( 23*60, 6*60+30, 18*60+30).is_day);

    let now = Utc.with_ymd_and_hms( 2025, 10, 17, 20, 4, 0).unwrap();
    let snapshot = WeatherSnapshot {
        location: Location::austin_tx(), unit_system: UnitSystem::Imperial, timestamp: now,
        report: WeatherReport {
            timezone: Some("America/Chicago".into()),
            sunrise: Some("2025-10-17T07:31".into()),
            sunset: Some("2025-10-17T18:55".into()),
            ..WeatherReport::default()
        }
    };
    let face = clock_face( &now, Some(&snapshot));
    println!("{:?}", face);
    assert_eq!( face.timezone, "America/Chicago");
    assert_eq!( face.text, "Friday, Oct 17 · 3:04 PM");
    assert!( face.sun_dot.unwrap().is_day);
}

#[test]
fn test_config_from_ron() {
    let config = GlobeWallConfig::from_ron( r#"(
        background_interval: "10min",
        flight_render_interval: "250ms",
        max_flights: 500,
        default_location: ( name: "Denver, CO", lat: 39.74, lon: -104.99 ),
    )"#).unwrap();
    println!("{:#?}", config);

    assert_eq!( config.background_interval, minutes(10));
    assert_eq!( config.flight_render_interval, millis(250));
    assert_eq!( config.clock_interval, minutes(1));
    assert_eq!( config.weather_ttl, minutes(15));
    assert_eq!( config.max_flights, 500);
    assert_eq!( config.default_location.name, "Denver, CO");

    assert!( GlobeWallConfig::from_ron("( max_flights: \"many\" )").is_err());
    assert!( GlobeWallConfig::from_ron( r#"( background_interval: "0s" )"#).is_err());
    assert!( GlobeWallConfig::from_ron( r#"( clock_interval: "0ms" )"#).is_err());
}

#[test]
fn test_example_config_loads() {
    let config = GlobeWallConfig::load( concat!( env!("CARGO_MANIFEST_DIR"), "/configs/globewall.ron")).unwrap();
    assert_eq!( config.spin_speed, 9.0);
    assert_eq!( config.providers.request_timeout, globewall_common::datetime::secs(20));
    assert!( config.flight_bbox.is_none());
}
