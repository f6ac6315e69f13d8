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

use std::collections::HashMap;
use tracing::debug;

use crate::{msg::{DataKind, RelayEnvelope, SurfaceMsg}, surface::SurfaceHandle};

#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct RelayStats {
    pub received: u64,
    pub delivered: u64,
    pub dropped: u64,
}

/// broadcasts whatever a surface posted to every surface of the current generation, in the order it
/// was posted. Delivery is best effort: closed or full mailboxes just lose the message
#[derive(Debug,Default)]
pub struct DataRelayBus {
    stats: HashMap<DataKind,RelayStats>,
}

impl DataRelayBus {
    pub fn new()->Self { DataRelayBus::default() }

    /// returns the number of surfaces the message was delivered to
    pub fn relay (&mut self, envelope: RelayEnvelope, surfaces: &[SurfaceHandle], generation: u64)->usize {
        let kind = envelope.msg.kind();
        let stats = self.stats.entry(kind).or_default();
        stats.received += 1;

        if envelope.generation != generation {
            debug!("dropping {} from surface {} of outdated generation {}", kind, envelope.source, envelope.generation);
            stats.dropped += 1;
            return 0
        }

        let mut delivered = 0;
        for surface in surfaces {
            if surface.try_send( SurfaceMsg::Relay( envelope.msg.clone())) {
                delivered += 1;
            } else {
                stats.dropped += 1;
            }
        }
        stats.delivered += delivered as u64;
        debug!("relayed {} from surface {} to {} surfaces", kind, envelope.source, delivered);
        delivered
    }

    pub fn stats (&self, kind: DataKind)->RelayStats {
        self.stats.get(&kind).copied().unwrap_or_default()
    }
}
