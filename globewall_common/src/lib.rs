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

//! runtime independent building blocks of the globe wallpaper: time and clock abstractions,
//! geodetic helpers, the day/night terminator and flight dead-reckoning, and the simple
//! key/value stores used for caches and persisted user preferences

pub mod errors;
pub use errors::*;

pub mod datetime;
pub mod geo;
pub mod terminator;
pub mod dead_reckoning;
pub mod store;
