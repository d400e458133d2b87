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
use serde::{Deserialize,Serialize};
use debris_common::{cartographic::Cartographic, define_load_config};

pub mod errors;
pub mod tle;
pub mod propagator;
pub mod validity;
pub mod trail;
pub mod smoother;
pub mod catalog_source;
pub mod catalog_cache;
pub mod config;
pub mod tracks;

define_load_config!{}

/// the geodetic sub-point of an object at a given instant (WGS84).
/// longitudes are always reported in [-180,180] degrees, latitudes in [-90,90] degrees.
/// Positions are derived values - they are only meaningful together with the (record, instant) they were computed for
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeodeticPosition {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub height: f64, // meters above ellipsoid
}

impl GeodeticPosition {
    pub fn new (longitude_deg: f64, latitude_deg: f64, height: f64)->Self {
        GeodeticPosition { longitude_deg, latitude_deg, height }
    }

    /// both coordinates finite and within their valid ranges
    pub fn is_valid (&self)->bool {
        self.latitude_deg.is_finite() && self.longitude_deg.is_finite()
            && (-90.0..=90.0).contains( &self.latitude_deg)
            && (-180.0..=180.0).contains( &self.longitude_deg)
    }

    /// flat (lon,lat) coordinate pair as used by 2D map renderers and the smoother
    pub fn lon_lat (&self)->(f64,f64) {
        (self.longitude_deg, self.latitude_deg)
    }
}

impl From<&Cartographic> for GeodeticPosition {
    fn from (c: &Cartographic)->Self {
        GeodeticPosition::new( c.longitude_deg(), c.latitude_deg(), c.height)
    }
}

impl fmt::Display for GeodeticPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:9.4}°,{:8.4}°,{:8.0} m", self.longitude_deg, self.latitude_deg, self.height)
    }
}
