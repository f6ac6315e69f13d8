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

use std::fmt;
use serde::{Serialize,Deserialize};

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq,Hash)]
pub struct DisplayId(pub String);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for DisplayId {
    fn from (s: &str)->Self { DisplayId(s.to_string()) }
}

/// the ordered set of attached displays. The first one is the main display, which hosts the primary surface
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq,Default)]
pub struct DisplayTopology {
    pub displays: Vec<DisplayId>,
}

impl DisplayTopology {
    pub fn new<T: Into<DisplayId>> (displays: impl IntoIterator<Item=T>)->Self {
        DisplayTopology { displays: displays.into_iter().map( |d| d.into()).collect() }
    }

    /// parse a comma separated list of display names ("main,left")
    pub fn from_list (s: &str)->Self {
        DisplayTopology::new( s.split(',').map( str::trim).filter( |d| !d.is_empty()))
    }

    pub fn len (&self)->usize { self.displays.len() }
    pub fn is_empty (&self)->bool { self.displays.is_empty() }
}

impl fmt::Display for DisplayTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.displays.iter().map( |d| d.0.as_str()).collect();
        write!(f, "[{}]", names.join(","))
    }
}
