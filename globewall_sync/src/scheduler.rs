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

use std::time::Duration;
use kanal::AsyncSender;
use tracing::debug;

use crate::{manager::ManagerMsg, timer::TaskTimer};

/// the two process wide periodic tasks: the background refresh and the clock tick.
/// Both send a tick message to the manager mailbox, the manager does the work
pub struct BackgroundScheduler {
    background_interval: Duration,
    clock_interval: Duration,
    background: TaskTimer,
    clock: TaskTimer,
}

impl BackgroundScheduler {
    pub fn new (background_interval: Duration, clock_interval: Duration)->Self {
        BackgroundScheduler {
            background_interval,
            clock_interval,
            background: TaskTimer::new("background"),
            clock: TaskTimer::new("clock"),
        }
    }

    /// run both tasks now and then periodically. Any previously armed timers are stopped first
    pub fn start (&mut self, tx: &AsyncSender<ManagerMsg>) {
        self.arm( tx, true);
    }

    /// re-arm without running right away (the caller did the immediate part already)
    pub fn resume (&mut self, tx: &AsyncSender<ManagerMsg>) {
        self.arm( tx, false);
    }

    fn arm (&mut self, tx: &AsyncSender<ManagerMsg>, instantly: bool) {
        self.stop();
        debug!("arming background ({:?}) and clock ({:?}) timers", self.background_interval, self.clock_interval);
        self.background.arm( tx.clone(), self.background_interval, instantly, || ManagerMsg::BackgroundTick);
        self.clock.arm( tx.clone(), self.clock_interval, instantly, || ManagerMsg::ClockTick);
    }

    pub fn stop (&mut self) {
        self.background.disarm();
        self.clock.disarm();
    }

    pub fn is_running (&self)->bool {
        self.background.is_armed() || self.clock.is_armed()
    }
}
