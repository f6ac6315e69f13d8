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

use std::f64::consts::PI;
use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Serialize,Deserialize};

use crate::weather::WeatherSnapshot;

// sun arc geometry in a 90x48 view box
pub const ARC_CX: f64 = 45.0;
pub const ARC_HORIZON_Y: f64 = 24.0;
pub const ARC_RX: f64 = 40.0;
pub const ARC_RY_DAY: f64 = 20.0;
pub const ARC_RY_NIGHT: f64 = 10.0;

const MINUTES_PER_DAY: f64 = 1440.0;

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct SunDot {
    pub x: f64,
    pub y: f64,
    pub is_day: bool,
}

/// the date/time subtitle and the sun arc of the weather panel
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ClockFace {
    pub timezone: String,
    /// e.g. "Friday, Oct 17 · 3:04 PM"
    pub text: String,
    pub sun_dot: Option<SunDot>,
}

/// minutes since local midnight of an ISO local time such as "2025-10-17T07:31"
pub fn parse_sun_minutes (iso: &str)->Option<u32> {
    let time = iso.split('T').nth(1)?;
    let mut parts = time.split(':');
    let h: u32 = parts.next()?.parse().ok()?;
    let m: u32 = parts.next()?.parse().ok()?;
    Some( h * 60 + m)
}

/// position of the sun dot on the day arc (between sunrise and sunset) or the night arc
pub fn sun_arc_position (now_min: u32, rise_min: u32, set_min: u32)->SunDot {
    let (now, rise, set) = (now_min as f64, rise_min as f64, set_min as f64);

    if now >= rise && now <= set && set > rise {
        let t = (now - rise) / (set - rise);
        let angle = PI * (1.0 - t);
        SunDot { x: ARC_CX + ARC_RX * angle.cos(), y: ARC_HORIZON_Y - ARC_RY_DAY * angle.sin(), is_day: true }

    } else {
        let night_len = (MINUTES_PER_DAY - (set - rise)).max(1.0);
        let elapsed = if now > set { now - set } else { now + MINUTES_PER_DAY - set };
        let t = (elapsed / night_len).min(1.0);
        let angle = PI * t;
        SunDot { x: ARC_CX + ARC_RX * angle.cos(), y: ARC_HORIZON_Y + ARC_RY_NIGHT * angle.sin(), is_day: false }
    }
}

fn format_text<T: chrono::TimeZone> (dt: &DateTime<T>)->String where T::Offset: std::fmt::Display {
    dt.format("%A, %b %-d · %-I:%M %p").to_string()
}

/// clock face at `now` for the timezone of the weather snapshot, or the local timezone if there is none
pub fn clock_face (now: &DateTime<Utc>, weather: Option<&WeatherSnapshot>)->ClockFace {
    let tz: Option<Tz> = weather
        .and_then( |w| w.report.timezone.as_deref())
        .and_then( |s| s.parse::<Tz>().ok());

    let (timezone, text, now_min) = match tz {
        Some(tz) => {
            let local = now.with_timezone(&tz);
            (tz.name().to_string(), format_text(&local), local.hour() * 60 + local.minute())
        }
        None => {
            let local = now.with_timezone(&Local);
            ("local".to_string(), format_text(&local), local.hour() * 60 + local.minute())
        }
    };

    let sun_dot = weather.and_then( |w| {
        let rise = w.report.sunrise.as_deref().and_then( parse_sun_minutes)?;
        let set = w.report.sunset.as_deref().and_then( parse_sun_minutes)?;
        Some( sun_arc_position( now_min, rise, set))
    });

    ClockFace { timezone, text, sun_dot }
}
