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

//! line commands that drive a running engine from a terminal

use globewall_common::geo::Location;

use crate::{
    display::DisplayTopology,
    errors::{Result, parse_error},
    lifecycle::SystemEvent,
    manager::ManagerCmd,
    prefs::{Layer, UnitSystem, ZoomLevel},
};

pub const CONSOLE_HELP: &str = "\
commands:
  location <lat> <lon> [name]      set the home location
  units imperial|metric
  zoom globe|country|city|street|<level>
  layer flights|radar|pollen|labels|spin on|off
  token <map-token>                 (empty to clear)
  pollen-key <api-key>              (empty to clear)
  pause | resume
  sleep | wake | screens-sleep | screens-wake | lock | unlock
  displays <name>,<name>,...        simulate a display topology change
  status | help | quit";

#[derive(Debug,Clone)]
pub enum ConsoleCmd {
    Manager(ManagerCmd),
    System(SystemEvent),
    Status,
    Help,
    Quit,
}

fn parse_on_off (s: Option<&str>)->Result<bool> {
    match s {
        Some("on") | Some("true") => Ok(true),
        Some("off") | Some("false") => Ok(false),
        other => Err( parse_error!("expected on|off, got {:?}", other))
    }
}

fn parse_coord (s: Option<&str>, what: &str, limit: f64)->Result<f64> {
    let v: f64 = s.ok_or_else( || parse_error!("missing {}", what))?
        .parse().map_err( |_| parse_error!("invalid {}", what))?;
    if !v.is_finite() || v.abs() > limit { return Err( parse_error!("{} out of range: {}", what, v)) }
    Ok(v)
}

/// parse a single console line. Empty lines yield `None`
pub fn parse_console_cmd (line: &str)->Result<Option<ConsoleCmd>> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb,rest)) => (verb, rest.trim()),
        None => (line, "")
    };
    let mut args = rest.split_whitespace();

    let cmd = match verb {
        "" => return Ok(None),
        "location" => {
            let lat = parse_coord( args.next(), "latitude", 90.0)?;
            let lon = parse_coord( args.next(), "longitude", 180.0)?;
            let name: Vec<&str> = args.collect();
            let loc = if name.is_empty() { Location::from_coords( lat, lon) } else { Location::new( name.join(" "), lat, lon) };
            ConsoleCmd::Manager( ManagerCmd::SetLocation(loc))
        }
        "units" => ConsoleCmd::Manager( ManagerCmd::SetUnitSystem( UnitSystem::normalize(rest))),
        "zoom" => ConsoleCmd::Manager( ManagerCmd::SetZoom( rest.parse::<ZoomLevel>()?)),
        "layer" => {
            let layer: Layer = args.next().ok_or_else( || parse_error!("missing layer"))?.parse()?;
            ConsoleCmd::Manager( ManagerCmd::SetLayer( layer, parse_on_off( args.next())?))
        }
        "token" => ConsoleCmd::Manager( ManagerCmd::SetMapToken( rest.to_string())),
        "pollen-key" => ConsoleCmd::Manager( ManagerCmd::SetPollenKey( rest.to_string())),
        "pause" => ConsoleCmd::Manager( ManagerCmd::SetPaused(true)),
        "resume" => ConsoleCmd::Manager( ManagerCmd::SetPaused(false)),
        "displays" => ConsoleCmd::System( SystemEvent::DisplaysChanged( DisplayTopology::from_list(rest))),
        "status" => ConsoleCmd::Status,
        "help" | "?" => ConsoleCmd::Help,
        "quit" | "exit" => ConsoleCmd::Quit,
        other => ConsoleCmd::System( other.parse::<SystemEvent>()?),
    };
    Ok( Some(cmd))
}
