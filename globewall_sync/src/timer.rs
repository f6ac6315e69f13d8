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
use tokio::{task::AbortHandle, time::{interval, interval_at, Instant, MissedTickBehavior}};
use tracing::{debug,warn};

/// a named repeat timer that sends a message to a mailbox each time it fires.
/// There is at most one armed task per TaskTimer: arming always disarms first.
///
/// Ticks are sent with `try_send`: if the mailbox is full the tick is dropped since processing it
/// late is not useful, if the mailbox is closed the timer task ends.
pub struct TaskTimer {
    name: String,
    handle: Option<AbortHandle>,
}

impl TaskTimer {
    pub fn new (name: impl ToString)->Self {
        TaskTimer { name: name.to_string(), handle: None }
    }

    pub fn name (&self)->&str { &self.name }

    pub fn is_armed (&self)->bool {
        self.handle.as_ref().map( |h| !h.is_finished()).unwrap_or(false)
    }

    /// start sending `mk_msg()` every `period`. If `instantly` the first message is sent right away,
    /// otherwise after the first period. A zero period leaves the timer disarmed
    pub fn arm<M,F> (&mut self, tx: AsyncSender<M>, period: Duration, instantly: bool, mk_msg: F)
        where M: Send + 'static, F: Fn()->M + Send + 'static
    {
        self.disarm();
        if period.is_zero() {
            warn!("timer {} not armed: zero period", self.name);
            return
        }

        let name = self.name.clone();
        let mut ticker = if instantly { interval(period) } else { interval_at( Instant::now() + period, period) };
        ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);

        let jh = tokio::spawn( async move {
            loop {
                ticker.tick().await;
                match tx.try_send( mk_msg()) {
                    Ok(true) => {}
                    Ok(false) => debug!("timer {} dropped tick (mailbox full)", name),
                    Err(_) => { debug!("timer {} stopped (mailbox closed)", name); break }
                }
            }
        });
        self.handle = Some( jh.abort_handle());
    }

    pub fn disarm (&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TaskTimer {
    fn drop (&mut self) {
        self.disarm();
    }
}
