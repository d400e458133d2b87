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
use serde::{Deserialize,Serialize};
use debris_common::datetime::{de_duration_from_fractional_secs, ser_duration_as_fractional_secs};
use crate::{
    catalog_source::{CatalogQuery, SpaceTrackCredentials},
    errors::{config_error, Result},
    smoother::{KalmanSmoother, MotionModel},
    trail::TrailWindow
};

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct SmootherConfig {
    pub process_noise: f64,
    pub observation_noise: f64,
    pub model: MotionModel,
}

/// the caller supplied parameters of a track render cycle. There are no defaults, all values
/// come from config files or the caller
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TrackConfig {
    /// how far back (in days) we look for element set epochs
    pub lookback_days: u32,

    /// max number of tracked objects
    pub object_cap: usize,

    /// trail window radius and step in minutes
    pub trail_half_window: f64,
    pub trail_step: f64,

    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub cache_ttl: Duration,

    /// no smoothing if not set
    pub smoother: Option<SmootherConfig>,
}

impl TrackConfig {
    /// check all constraints before any fetch or propagation is attempted
    pub fn validate (&self)->Result<()> {
        if self.lookback_days == 0 { return Err( config_error!("lookback_days has to be > 0")) }
        if self.object_cap == 0 { return Err( config_error!("object_cap has to be > 0")) }
        self.trail_window()?;
        self.kalman_smoother()?;
        Ok(())
    }

    pub fn trail_window (&self)->Result<TrailWindow> {
        TrailWindow::new( self.trail_half_window, self.trail_step)
    }

    pub fn kalman_smoother (&self)->Result<Option<KalmanSmoother>> {
        match &self.smoother {
            Some(sc) => Ok( Some( KalmanSmoother::new( sc.process_noise, sc.observation_noise, sc.model)?)),
            None => Ok(None)
        }
    }

    pub fn catalog_query (&self, credentials: SpaceTrackCredentials)->Result<CatalogQuery> {
        CatalogQuery::new( credentials, self.lookback_days, self.object_cap)
    }
}
