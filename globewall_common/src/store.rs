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

use std::{
    collections::HashMap,
    sync::{Arc,RwLock},
    path::{Path,PathBuf},
    fs::{self,File},
    io::{BufReader,BufWriter},
};
use serde::{Serialize,de::DeserializeOwned};
use serde_json::Value as JsonValue;
use tracing::{debug,warn};

use crate::errors::Result;

/// RwLock-synchronized string key/value store that is shared by clone between all surfaces of the
/// process (the local storage of a web origin). Values are serialized JSON so that readers have to
/// cope with entries that don't parse anymore.
///
/// Lock poisoning is not propagated: a poisoned lock means a panic happened while holding it, and
/// the map itself is still consistent since all operations are single inserts/removes.
#[derive(Debug,Clone,Default)]
pub struct LocalStore {
    map: Arc<RwLock<HashMap<String,String>>>
}

impl LocalStore {
    pub fn new()->Self { LocalStore::default() }

    pub fn get (&self, key: &str)->Option<String> {
        let map = self.map.read().unwrap_or_else(|e| e.into_inner());
        map.get(key).cloned()
    }

    pub fn insert (&self, key: impl ToString, value: impl ToString) {
        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        map.insert( key.to_string(), value.to_string());
    }

    pub fn remove (&self, key: &str)->bool {
        let mut map = self.map.write().unwrap_or_else(|e| e.into_inner());
        map.remove(key).is_some()
    }

    pub fn contains_key (&self, key: &str)->bool {
        let map = self.map.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(key)
    }

    /// deserialize the value of `key`. Entries that do not parse are removed and reported as missing
    pub fn get_json<T: DeserializeOwned> (&self, key: &str)->Option<T> {
        let s = self.get(key)?;
        match serde_json::from_str::<T>(&s) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("discarding malformed store entry '{}': {}", key, e);
                self.remove(key);
                None
            }
        }
    }

    pub fn insert_json<T: Serialize> (&self, key: impl ToString, value: &T)->Result<()> {
        let s = serde_json::to_string(value)?;
        self.insert( key, s);
        Ok(())
    }
}

/// durable scalar key/value store for user preferences, persisted as a flat JSON object.
/// Every `set` writes through to the backing file if there is one.
#[derive(Debug,Default)]
pub struct PrefsStore {
    path: Option<PathBuf>,
    map: HashMap<String,JsonValue>
}

impl PrefsStore {
    /// a store that is not backed by a file (tests and --headless runs)
    pub fn in_memory()->Self {
        PrefsStore { path: None, map: HashMap::new() }
    }

    /// open (or create on first write) the prefs file at `path`. An unreadable or malformed file
    /// is treated as empty and gets replaced on the next write
    pub fn open<P: AsRef<Path>> (path: P)->Self {
        let path = path.as_ref().to_path_buf();
        let map = if path.is_file() {
            match read_prefs(&path) {
                Ok(map) => map,
                Err(e) => { warn!("ignoring unusable prefs file {:?}: {}", path, e); HashMap::new() }
            }
        } else {
            HashMap::new()
        };
        debug!("opened prefs store {:?} with {} entries", path, map.len());

        PrefsStore { path: Some(path), map }
    }

    pub fn path (&self)->Option<&Path> { self.path.as_deref() }

    pub fn get_f64 (&self, key: &str)->Option<f64> {
        self.map.get(key).and_then( |v| v.as_f64())
    }

    pub fn get_str (&self, key: &str)->Option<&str> {
        self.map.get(key).and_then( |v| v.as_str())
    }

    pub fn set (&mut self, key: &str, value: impl Into<JsonValue>)->Result<()> {
        let value = value.into();
        if self.map.get(key) != Some(&value) {
            self.map.insert( key.to_string(), value);
            self.save()?;
        }
        Ok(())
    }

    pub fn remove (&mut self, key: &str)->Result<()> {
        if self.map.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save (&self)->Result<()> {
        if let Some(path) = &self.path {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() { fs::create_dir_all(dir)? }
            }
            let writer = BufWriter::new( File::create(path)?);
            serde_json::to_writer_pretty( writer, &self.map)?;
        }
        Ok(())
    }
}

fn read_prefs (path: &Path)->Result<HashMap<String,JsonValue>> {
    let reader = BufReader::new( File::open(path)?);
    Ok( serde_json::from_reader(reader)? )
}
