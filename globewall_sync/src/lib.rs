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

//! multi display globe wallpaper engine.
//!
//! One [`surface`] per display renders the globe, the weather panel and optional layers (flights,
//! radar, pollen). The [`manager`] keeps the user preferences, seeds and rebuilds surfaces, and
//! relays data that only the primary surface fetches to all others. A [`scheduler`] drives periodic
//! refreshes and the [`lifecycle`] controller pauses everything while the machine sleeps or is locked.

pub mod errors;
pub use errors::*;

pub mod config;
pub mod prefs;
pub mod display;

pub mod flights;
pub mod weather;
pub mod allergy;
pub mod clock;
pub mod provider;

pub mod msg;
pub mod renderer;
pub mod timer;
pub mod surface;
pub mod relay;
pub mod scheduler;
pub mod lifecycle;
pub mod manager;

pub mod console;
