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

//! sampling of ground track trails around a reference instant.
//!
//! Offset grid: we start at `-half_window` and step forward by `step` while we are still before
//! `+half_window`, then we always add `+half_window` itself. Both window ends are therefore always
//! included. If `step` divides `2*half_window` this gives `2*half_window/step + 1` evenly spaced
//! offsets (e.g. 15/2 -> -15,-13,..,13,15), otherwise the last step is shorter (15/4 -> -15,-11,-7,-3,1,5,9,13,15)

use chrono::{DateTime, Utc};
use serde::{Deserialize,Serialize};
use tokio::task::JoinHandle;
use debris_common::datetime::{de_from_epoch_millis, offset_by_minutes, ser_epoch_millis};
use crate::{GeodeticPosition, propagator::Propagate, errors::{config_error, op_failed, Result}};

/// upper bound for the number of offsets per trail
pub const MAX_TRAIL_SAMPLES: usize = 10000;

/// the symmetric time window (in minutes) we sample trails for
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct TrailWindow {
    half_window: f64,
    step: f64,
}

impl TrailWindow {
    pub fn new (half_window: f64, step: f64)->Result<Self> {
        if !(half_window.is_finite() && half_window > 0.0) {
            return Err( config_error!("trail half-window has to be a positive number of minutes (is {half_window})"))
        }
        if !(step.is_finite() && step > 0.0) {
            return Err( config_error!("trail step has to be a positive number of minutes (is {step})"))
        }
        if step > half_window {
            return Err( config_error!("trail step ({step} min) exceeds trail half-window ({half_window} min)"))
        }
        if (2.0 * half_window / step).ceil() as usize + 1 > MAX_TRAIL_SAMPLES {
            return Err( config_error!("trail half-window {half_window} min with step {step} min exceeds {MAX_TRAIL_SAMPLES} samples"))
        }

        Ok( TrailWindow { half_window, step } )
    }

    pub fn half_window (&self)->f64 { self.half_window }
    pub fn step (&self)->f64 { self.step }

    pub fn offsets (&self)->Vec<f64> {
        trail_offsets( self.half_window, self.step)
    }
}

/// the strictly increasing offsets (minutes) for the given window - see module doc for the boundary rule.
/// Returns an empty vec for windows that do not satisfy `0 < step <= half_window`
pub fn trail_offsets (half_window: f64, step: f64)->Vec<f64> {
    if !(half_window.is_finite() && step.is_finite() && step > 0.0 && step <= half_window) { return Vec::new() }

    let eps = 1e-9 * half_window;
    let n = ((2.0 * half_window) / step + 1e-9).floor() as usize;
    let mut offsets: Vec<f64> = Vec::with_capacity( n + 2);

    for k in 0..=n {
        let offset = -half_window + (k as f64) * step;
        if offset < half_window - eps {
            offsets.push( offset);
        }
    }
    offsets.push( half_window);

    offsets
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct TrailSample {
    pub offset: f64, // minutes relative to the reference instant

    #[serde(serialize_with="ser_epoch_millis", deserialize_with="de_from_epoch_millis")]
    pub time: DateTime<Utc>,

    pub position: GeodeticPosition,
}

/// time ordered (by increasing offset) sub-points of one object around a reference instant.
/// Offsets for which propagation failed are missing and counted in `failures`
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct Trail {
    pub samples: Vec<TrailSample>,
    pub failures: usize,
}

impl Trail {
    pub fn is_empty (&self)->bool { self.samples.is_empty() }
    pub fn len (&self)->usize { self.samples.len() }

    pub fn positions (&self)->Vec<GeodeticPosition> {
        self.samples.iter().map(|s| s.position).collect()
    }

    pub fn offsets (&self)->Vec<f64> {
        self.samples.iter().map(|s| s.offset).collect()
    }
}

/// sample the trail of a single position source. Each offset is propagated independently, failures
/// are skipped. If all offsets fail this returns an empty trail
pub fn sample_trail<P> (src: &P, reference: &DateTime<Utc>, window: &TrailWindow)->Trail where P: Propagate + ?Sized {
    let offsets = window.offsets();
    let mut samples: Vec<TrailSample> = Vec::with_capacity( offsets.len());
    let mut failures = 0;

    for offset in offsets {
        let time = offset_by_minutes( reference, offset);
        match src.position_at( &time) {
            Ok(position) if position.is_valid() => samples.push( TrailSample{ offset, time, position }),
            _ => failures += 1
        }
    }

    Trail { samples, failures }
}

/// sample trails for a list of objects on tokio's blocking thread pool. The returned trails are in the same
/// order as the input objects
pub async fn sample_trails<P> (objects: &[P], reference: &DateTime<Utc>, window: &TrailWindow)->Result<Vec<Trail>>
    where P: Propagate + Clone + Send + Sync + 'static
{
    if objects.is_empty() { return Ok( Vec::new()) }

    let n_tasks = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
    let chunk_size = objects.len().div_ceil( n_tasks);

    let handles: Vec<JoinHandle<Vec<Trail>>> = objects.chunks( chunk_size).map( |chunk| {
        let chunk: Vec<P> = chunk.to_vec();
        let reference = *reference;
        let window = *window;

        tokio::task::spawn_blocking( move || {
            chunk.iter().map( |o| sample_trail( o, &reference, &window)).collect()
        })
    }).collect();

    let mut trails: Vec<Trail> = Vec::with_capacity( objects.len());
    for handle in handles {
        let chunk_trails = handle.await.map_err( |e| op_failed!("trail sampling task failed: {e}"))?;
        trails.extend( chunk_trails);
    }

    Ok(trails)
}
