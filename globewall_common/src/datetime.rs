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

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use std::{fmt::Debug, sync::{Arc, Mutex}, time::Duration};
use parse_duration::parse;

// simple Duration ctors that don't require unstable features
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }

#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// elapsed time between two points in time, zero if `later` is before `earlier`
pub fn duration_since (later: &DateTime<Utc>, earlier: &DateTime<Utc>)->Duration {
    (*later - *earlier).to_std().unwrap_or(Duration::ZERO)
}

/// elapsed seconds between two points in time (negative if `later` is before `earlier`)
pub fn elapsed_secs (later: &DateTime<Utc>, earlier: &DateTime<Utc>)->f64 {
    (*later - *earlier).num_milliseconds() as f64 / 1000.0
}

/* #region clocks ****************************************************************************************/

/// source of "now" for everything that is time dependent (cache ages, dead reckoning, sun position).
/// Production code uses [`SystemClock`], tests use a [`ManualClock`] they can advance explicitly
pub trait Clock: Send + Sync + Debug {
    fn now (&self)->DateTime<Utc>;
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug,Default,Clone,Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now (&self)->DateTime<Utc> { Utc::now() }
}

pub fn system_clock()->SharedClock {
    Arc::new(SystemClock)
}

/// a clock that only changes when told so
#[derive(Debug,Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>
}

impl ManualClock {
    pub fn new (start: DateTime<Utc>)->Self {
        ManualClock { now: Arc::new( Mutex::new(start)) }
    }

    pub fn set (&self, dt: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() { *now = dt }
    }

    pub fn advance (&self, dur: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now = *now + TimeDelta::from_std(dur).unwrap_or(TimeDelta::zero());
        }
    }
}

impl Clock for ManualClock {
    fn now (&self)->DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner()
        }
    }
}

/* #endregion clocks */

/* #region serde support for human readable durations ("5min", "500ms") **********************************/

/// parse a human readable duration such as "5min", "1h 30m" or "500ms"
pub fn parse_human_duration (s: &str)->crate::errors::Result<Duration> {
    parse( s.trim()).map_err( |e| crate::parse_error!("invalid duration '{}': {:?}", s, e))
}

pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse_human_duration( &string).map_err( |e| serde::de::Error::custom( e.to_string()))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{:?}", dur);
    s.serialize_str(&dfm)
}

/* #endregion serde support */
