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

use std::ops::{Mul, Sub};
use serde::{Serialize,Deserialize};
use crate::{cos, sin, sqrt};
use crate::geo_constants::{EARTH_RADIUS_RATIO_SQUARED, EQUATORIAL_EARTH_RADIUS, E_EARTH_SQUARED};
use crate::cartographic::Cartographic;

/// note that we do not use units here to allow for abstract coordinate systems (although
/// it is mostly used for TEME and ITRF/ECEF systems)
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl Cartesian3 {
    pub fn new (x: f64, y: f64, z: f64)->Cartesian3 {
        Cartesian3{x,y,z}
    }

    pub fn from_array (a: &[f64;3])->Cartesian3 {
        Cartesian3{ x: a[0], y: a[1], z: a[2] }
    }

    pub fn zero ()->Cartesian3 {
        Cartesian3{x: 0.0, y: 0.0, z: 0.0}
    }

    pub fn is_finite (&self)->bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn length(&self) -> f64 {
        sqrt((self.x * self.x) + (self.y * self.y) + (self.z * self.z))
    }

    /// passive rotation of the coordinate frame around the z-axis by `angle` radians.
    /// With `angle` being the Greenwich sidereal angle this turns TEME (pseudo inertial) into
    /// earth fixed coordinates, ignoring polar motion
    pub fn rotated_frame_z (&self, angle: f64)->Cartesian3 {
        let c = cos(angle);
        let s = sin(angle);

        Cartesian3 {
            x:  self.x * c + self.y * s,
            y: -self.x * s + self.y * c,
            z:  self.z
        }
    }
}

impl std::fmt::Display for Cartesian3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}

impl Sub for &Cartesian3 {
    type Output = Cartesian3;

     fn sub (self, rhs: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z
        }
    }
}

impl Mul<f64> for Cartesian3 {
    type Output = Self;

     fn mul (self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs
        }
    }
}

/// convert WGS84 into ECEF coordinates
impl From<Cartographic> for Cartesian3 {
    fn from(p: Cartographic) -> Self {
        Cartesian3::from(&p)
    }
}

impl From<&Cartographic> for Cartesian3 {
    fn from(p: &Cartographic) -> Self {
        let φ = p.latitude;
        let λ = p.longitude;
        let h = p.height;

        let sin_φ = sin(φ);
        let cos_φ = cos(φ);

        let b = EQUATORIAL_EARTH_RADIUS / sqrt( 1.0 - E_EARTH_SQUARED* (sin_φ * sin_φ));
        let c = (b + h)*cos_φ;

        let x = c * cos(λ);
        let y = c * sin(λ);
        let z = (EARTH_RADIUS_RATIO_SQUARED * b + h) * sin_φ;

        Cartesian3::new( x, y, z)
    }
}
