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

use thiserror::Error;

pub type Result<T> = std::result::Result<T,GlobeWallError>;

#[derive(Error,Debug)]
pub enum GlobeWallError {

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("unexpected http status {0}")]
    HttpStatus(u16),

    #[error("rate limited by {0}")]
    RateLimited(String),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("config error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("common error {0}")]
    CommonError( #[from] globewall_common::CommonError),

    #[error("parse error {0}")]
    ParseError(String),

    #[error("missing credential {0}")]
    MissingCredential(&'static str),

    #[error("channel closed {0}")]
    ChannelClosed(String),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

impl GlobeWallError {
    /// failures that are expected to go away by themselves and are just logged
    pub fn is_transient (&self)->bool {
        matches!( self, GlobeWallError::HttpError(_) | GlobeWallError::HttpStatus(_) | GlobeWallError::RateLimited(_))
    }
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::GlobeWallError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;
