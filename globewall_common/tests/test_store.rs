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

use std::{fs, time::Duration};
use serde::{Serialize,Deserialize};
use globewall_common::{CommonError, store::*, geo::Location, datetime::*};

#[test]
fn test_local_store_shared_and_malformed() {
    let store = LocalStore::new();
    let other = store.clone();

    store.insert_json( "home", &Location::austin_tx()).unwrap();
    let loc: Option<Location> = other.get_json("home");
    println!("read back through clone: {:?}", loc);
    assert_eq!( loc, Some(Location::austin_tx()));

    other.insert( "home", "{ this is not json");
    let loc: Option<Location> = store.get_json("home");
    assert!( loc.is_none());
    assert!( !store.contains_key("home")); // malformed entries get dropped
}

#[test]
fn test_prefs_store_persists() {
    let path = std::env::temp_dir().join( format!("globewall-test-prefs-{}.json", std::process::id()));
    let _ = fs::remove_file(&path);

    {
        let mut prefs = PrefsStore::open(&path);
        assert!( prefs.get_f64("last-location-lat").is_none());
        prefs.set( "last-location-lat", 47.6).unwrap();
        prefs.set( "unit-system", "metric").unwrap();
    }

    let prefs = PrefsStore::open(&path);
    println!("reloaded prefs from {:?}", prefs.path());
    assert_eq!( prefs.get_f64("last-location-lat"), Some(47.6));
    assert_eq!( prefs.get_str("unit-system"), Some("metric"));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_prefs_store_malformed_file() {
    let path = std::env::temp_dir().join( format!("globewall-test-bad-prefs-{}.json", std::process::id()));
    fs::write( &path, "{not json").unwrap();

    let mut prefs = PrefsStore::open(&path);
    assert!( prefs.get_str("unit-system").is_none());

    // the broken file is replaced on the next write
    prefs.set( "unit-system", "metric").unwrap();
    let prefs = PrefsStore::open(&path);
    assert_eq!( prefs.get_str("unit-system"), Some("metric"));

    let _ = fs::remove_file(&path);
}

#[derive(Deserialize,Debug)]
struct Intervals {
    #[serde(deserialize_with="deserialize_duration")]
    background: Duration,
    #[serde(deserialize_with="deserialize_duration")]
    frame: Duration,
}

#[test]
fn test_duration_config() {
    let intervals: Intervals = ron::from_str( r#"( background: "5min", frame: "500ms" )"#).unwrap();
    println!("{:?}", intervals);
    assert_eq!( intervals.background, minutes(5));
    assert_eq!( intervals.frame, millis(500));

    assert_eq!( parse_human_duration(" 1h 30min ").unwrap(), minutes(90));
    assert!( matches!( parse_human_duration("soon"), Err(CommonError::ParseError(_))));
    assert!( ron::from_str::<Intervals>( r#"( background: "often", frame: "1s" )"#).is_err());
}

#[test]
fn test_manual_clock() {
    let start = utc_now();
    let clock = ManualClock::new(start);
    clock.advance( minutes(20));
    assert_eq!( duration_since( &clock.now(), &start), minutes(20));
    assert_eq!( duration_since( &start, &clock.now()), Duration::ZERO);
}
