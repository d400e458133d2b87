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

//! single pass linear Kalman filter to smooth 2D position sequences (such as lon/lat trails).
//!
//! The state is `[x, y, vx, vy]` with a unit time step between observations, i.e. we assume
//! (near) uniformly spaced samples. Only positions are observed

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};
use serde::{Deserialize,Serialize};
use debris_common::{normalize_180, unwrap_degrees};
use crate::{GeodeticPosition, trail::Trail, errors::{config_error, Result}};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum MotionModel {
    /// positions advance by the estimated velocity each step
    ConstantVelocity,
    /// velocity terms are pinned to zero, estimates only follow the observations
    ConstantPosition,
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct KalmanSmoother {
    process_noise: f64,
    observation_noise: f64,
    model: MotionModel,
}

impl KalmanSmoother {
    pub fn new (process_noise: f64, observation_noise: f64, model: MotionModel)->Result<Self> {
        if !(process_noise.is_finite() && process_noise > 0.0) {
            return Err( config_error!("smoother process_noise has to be a positive number (is {process_noise})"))
        }
        if !(observation_noise.is_finite() && observation_noise > 0.0) {
            return Err( config_error!("smoother observation_noise has to be a positive number (is {observation_noise})"))
        }
        Ok( KalmanSmoother { process_noise, observation_noise, model } )
    }

    pub fn process_noise (&self)->f64 { self.process_noise }
    pub fn observation_noise (&self)->f64 { self.observation_noise }
    pub fn model (&self)->MotionModel { self.model }

    fn transition (&self)->Matrix4<f64> {
        match self.model {
            MotionModel::ConstantVelocity => Matrix4::new(
                1.0, 0.0, 1.0, 0.0,
                0.0, 1.0, 0.0, 1.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0
            ),
            MotionModel::ConstantPosition => Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0
            ),
        }
    }

    /// filter the observation sequence. The result has the same length as the input, its first element is the
    /// first observation (the state is initialized from it). Empty input yields empty output
    pub fn smooth (&self, observations: &[(f64,f64)])->Vec<(f64,f64)> {
        let mut smoothed: Vec<(f64,f64)> = Vec::with_capacity( observations.len());
        let Some(&(x0,y0)) = observations.first() else { return smoothed };
        smoothed.push( (x0,y0));

        let f = self.transition();
        let h = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0
        );
        let q = Matrix4::<f64>::identity() * self.process_noise;
        let r = Matrix2::<f64>::identity() * self.observation_noise;
        let i4 = Matrix4::<f64>::identity();

        let mut x = Vector4::new( x0, y0, 0.0, 0.0);
        let mut p = Matrix4::<f64>::identity() * self.observation_noise;

        for &(zx,zy) in &observations[1..] {
            // predict
            x = f * x;
            p = f * p * f.transpose() + q;

            // update - if the innovation covariance is singular we keep the prediction
            let z = Vector2::new( zx, zy);
            let s = h * p * h.transpose() + r;
            if let Some(s_inv) = s.try_inverse() {
                let k = p * h.transpose() * s_inv;
                x = x + k * (z - h * x);
                p = (i4 - k * h) * p;
            }

            smoothed.push( (x[0], x[1]));
        }

        smoothed
    }

    /// smooth the positions of a geodetic trail. Longitudes are unwrapped across the antimeridian before filtering
    /// and normalized into [-180,180] afterwards, latitudes are clamped to [-90,90]. Heights are passed through
    pub fn smooth_trail (&self, trail: &Trail)->Vec<GeodeticPosition> {
        let positions = trail.positions();

        let mut last_lon = positions.first().map(|p| p.longitude_deg).unwrap_or(0.0);
        let observations: Vec<(f64,f64)> = positions.iter().map( |p| {
            let (lon,lat) = p.lon_lat();
            last_lon = unwrap_degrees( last_lon, lon);
            (last_lon, lat)
        }).collect();

        self.smooth( &observations).into_iter().zip( positions.iter()).map( |((lon,lat),raw)| {
            GeodeticPosition::new( normalize_180(lon), lat.clamp(-90.0, 90.0), raw.height)
        }).collect()
    }
}
