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

#![allow(uncommon_codepoints)]

pub mod errors;
pub mod geo_constants;
pub mod cartesian3;
pub mod cartographic;
pub mod datetime;
pub mod config;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn sin(x:f64) -> f64 { x.sin() }
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn atan2(y:f64,x:f64) -> f64 { y.atan2(x) }
#[inline(always)] pub fn sqrt(x:f64) -> f64 { x.sqrt() }

/// normalize longitude degrees into [-180,180]
pub fn normalize_180 (deg: f64) -> f64 {
    let d = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if d == -180.0 && deg > 0.0 { 180.0 } else { d }
}

/// shift `deg` by full turns so that it is within 180° of `reference`
/// (used to make longitude sequences continuous across the antimeridian)
pub fn unwrap_degrees (reference: f64, deg: f64) -> f64 {
    let mut d = deg;
    while d - reference > 180.0 { d -= 360.0 }
    while reference - d > 180.0 { d += 360.0 }
    d
}

/// a simple incremental min/max/avg accumulator
#[derive(Debug,Clone,Copy)]
pub struct MinMaxAvg {
    pub n: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64
}

impl MinMaxAvg {
    pub fn new()->Self { MinMaxAvg { n: 0, min: f64::MAX, max: f64::MIN, avg: f64::NAN } }

    /// add a new observation
    pub fn add (&mut self, x: f64) {
        self.n += 1;

        if self.n > 1 {
            self.avg = self.avg + (x - self.avg) / self.n as f64;
            if x < self.min { self.min = x }
            if x > self.max { self.max = x }
        } else {
            self.min = x;
            self.max = x;
            self.avg = x;
        }
    }
}

impl Default for MinMaxAvg {
    fn default()->Self { MinMaxAvg::new() }
}
