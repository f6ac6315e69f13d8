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

use std::str::FromStr;
use serde::{Serialize,Deserialize};
use tracing::{debug,info};

use crate::{display::DisplayTopology, errors::{GlobeWallError, Result, parse_error}};

/// notifications from the operating system
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum SystemEvent {
    SystemWillSleep,
    SystemDidWake,
    ScreensDidSleep,
    ScreensDidWake,
    ScreenLocked,
    ScreenUnlocked,
    DisplaysChanged(DisplayTopology),
}

impl SystemEvent {
    /// the state this event asks for, `None` if it is not a power event
    pub fn target_state (&self)->Option<LifecycleState> {
        match self {
            SystemEvent::SystemWillSleep | SystemEvent::ScreensDidSleep | SystemEvent::ScreenLocked => Some(LifecycleState::Paused),
            SystemEvent::SystemDidWake | SystemEvent::ScreensDidWake | SystemEvent::ScreenUnlocked => Some(LifecycleState::Active),
            SystemEvent::DisplaysChanged(_) => None,
        }
    }
}

impl FromStr for SystemEvent {
    type Err = GlobeWallError;
    fn from_str (s: &str)->Result<Self> {
        match s {
            "sleep" => Ok(SystemEvent::SystemWillSleep),
            "wake" => Ok(SystemEvent::SystemDidWake),
            "screens-sleep" => Ok(SystemEvent::ScreensDidSleep),
            "screens-wake" => Ok(SystemEvent::ScreensDidWake),
            "lock" => Ok(SystemEvent::ScreenLocked),
            "unlock" => Ok(SystemEvent::ScreenUnlocked),
            _ => Err( parse_error!("unknown system event '{}'", s))
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Default)]
pub enum LifecycleState {
    #[default]
    Active,
    Paused
}

/// two state machine driven by power events. Events that don't change the state are ignored
#[derive(Debug,Default)]
pub struct LifecycleController {
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new()->Self { LifecycleController::default() }

    pub fn state (&self)->LifecycleState { self.state }

    pub fn is_paused (&self)->bool { self.state == LifecycleState::Paused }

    /// returns the new state if `event` caused a transition
    pub fn on_event (&mut self, event: &SystemEvent)->Option<LifecycleState> {
        let target = event.target_state()?;
        if target == self.state {
            debug!("ignoring {:?}, already {:?}", event, self.state);
            None
        } else {
            info!("lifecycle {:?} -> {:?} on {:?}", self.state, target, event);
            self.state = target;
            Some(target)
        }
    }

    /// explicit pause/resume from the user, returns true if that changed the state
    pub fn set_paused (&mut self, paused: bool)->bool {
        let target = if paused { LifecycleState::Paused } else { LifecycleState::Active };
        let changed = target != self.state;
        self.state = target;
        changed
    }
}
