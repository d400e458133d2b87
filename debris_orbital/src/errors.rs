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
use crate::propagator::PropagationFailure;

pub type Result<T> = std::result::Result<T, DebrisOrbitalError>;

#[derive(Error,Debug)]
pub enum DebrisOrbitalError {

   #[error("IO error {0}")]
   IOError( #[from] std::io::Error),

   #[error("config error {0}")]
   ConfigError( String ),

   #[error("config file error {0}")]
   ConfigFileError( #[from] debris_common::errors::DebrisCommonError),

   #[error("catalog fetch failed {0}")]
   FetchError( String ),

   #[error("propagation failed {0}")]
   PropagationError( #[from] PropagationFailure),

   #[error("no data available {0}")]
   NoData( String ),

   #[error("serialization error {0}")]
   SerdeError( #[from] serde_json::Error),

   #[error("operation failed {0}")]
   OpFailedError(String),
}

impl DebrisOrbitalError {
    /// is this a failure to obtain a catalog (as opposed to a local processing error)
    pub fn is_fetch_error (&self)->bool {
        matches!( self, DebrisOrbitalError::FetchError(_))
    }
}

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::DebrisOrbitalError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;

macro_rules! fetch_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::DebrisOrbitalError::FetchError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use fetch_error;

macro_rules! no_data {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::DebrisOrbitalError::NoData( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use no_data;

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::DebrisOrbitalError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;

impl From<reqwest::Error> for DebrisOrbitalError {
    fn from (e: reqwest::Error)->Self {
        if e.is_timeout() {
            fetch_error!("request timed out: {e}")
        } else {
            fetch_error!("{e}")
        }
    }
}
