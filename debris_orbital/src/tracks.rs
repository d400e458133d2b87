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

//! the render cycle: cached catalog -> current positions -> trails -> optional smoothing -> report

use std::{sync::Arc, time::Duration};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use debris_common::datetime::{ser_epoch_millis, utc_now};
use crate::{
    GeodeticPosition,
    catalog_cache::{CacheStatus, CatalogCache},
    catalog_source::{CatalogQuery, CatalogSource},
    config::TrackConfig,
    errors::{config_error, no_data, Result},
    propagator::Propagate,
    smoother::KalmanSmoother,
    trail::{sample_trails, TrailSample, TrailWindow}
};

/// what we report for one tracked object
#[derive(Debug,Clone,Serialize)]
pub struct ObjectTrack {
    pub name: String,
    pub catalog_number: String,

    /// position at the reference instant, None if propagation failed for it
    pub current: Option<GeodeticPosition>,

    /// raw trail, possibly empty
    pub trail: Vec<TrailSample>,
    pub trail_failures: usize,

    /// same length as `trail`. Only set if smoothing is configured and the trail is not empty
    pub smoothed: Option<Vec<GeodeticPosition>>,
}

impl ObjectTrack {
    pub fn has_trail (&self)->bool { !self.trail.is_empty() }
}

#[derive(Debug,Clone,Serialize)]
pub struct TrackReport {
    #[serde(serialize_with="ser_epoch_millis")]
    pub reference: DateTime<Utc>,

    #[serde(serialize_with="ser_epoch_millis")]
    pub catalog_created: DateTime<Utc>,

    pub objects: Vec<ObjectTrack>,
    pub records: usize,
    pub rejected: usize,
    pub trail_failures: usize,
    pub cache_status: CacheStatus,
}

impl TrackReport {
    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string( self)?)
    }

    pub fn to_json_pretty (&self)->Result<String> {
        Ok( serde_json::to_string_pretty( self)?)
    }
}

pub struct TrackPipeline<S> where S: CatalogSource {
    cache: Arc<CatalogCache<S>>,
    config: TrackConfig,
    window: TrailWindow,
    smoother: Option<KalmanSmoother>,
}

impl<S> TrackPipeline<S> where S: CatalogSource {
    /// this fails if `config` does not validate
    pub fn new (cache: Arc<CatalogCache<S>>, config: TrackConfig)->Result<Self> {
        config.validate()?;
        let window = config.trail_window()?;
        let smoother = config.kalman_smoother()?;

        Ok( TrackPipeline { cache, config, window, smoother } )
    }

    pub fn config (&self)->&TrackConfig { &self.config }
    pub fn cache (&self)->&Arc<CatalogCache<S>> { &self.cache }

    /// one render cycle for the given reference instant. Individual propagation failures are reported by omission,
    /// only fetch failures without cached data and catalogs without accepted objects are errors
    pub async fn render (&self, query: &CatalogQuery, now: &DateTime<Utc>)->Result<TrackReport> {
        let lookup = self.cache.get( query, now).await?;
        let entry = &lookup.entry;

        if entry.objects.is_empty() {
            return Err( no_data!("no valid element sets in catalog ({} records, {} rejected)", entry.records, entry.rejected))
        }

        let trails = sample_trails( &entry.objects, now, &self.window).await?;

        let mut trail_failures = 0;
        let objects: Vec<ObjectTrack> = entry.objects.iter().zip( trails.into_iter()).map( |(obj,trail)| {
            trail_failures += trail.failures;
            if trail.is_empty() {
                debug!("no usable trail for {}", obj.name);
            }

            let current = obj.position_at( now).ok().filter( |p| p.is_valid());
            let smoothed = match &self.smoother {
                Some(smoother) if !trail.is_empty() => Some( smoother.smooth_trail( &trail)),
                _ => None
            };

            ObjectTrack {
                name: obj.name.clone(),
                catalog_number: obj.catalog_number().to_string(),
                current,
                trail_failures: trail.failures,
                trail: trail.samples,
                smoothed,
            }
        }).collect();

        info!("rendered {} objects ({} cache, {} rejected, {} trail failures)", objects.len(), lookup.status, entry.rejected, trail_failures);

        Ok( TrackReport {
            reference: *now,
            catalog_created: entry.created,
            objects,
            records: entry.records,
            rejected: entry.rejected,
            trail_failures,
            cache_status: lookup.status,
        })
    }
}

/// render every `period` (starting immediately) until `cancel_token` is cancelled, passing each result to `callback`.
/// Cancellation is only checked between cycles, a running cycle always completes. Returns the number of cycles
pub async fn run_periodic<S,F> (pipeline: &TrackPipeline<S>, query: &CatalogQuery, period: Duration, cancel_token: CancellationToken, mut callback: F)->Result<usize>
    where S: CatalogSource, F: FnMut(Result<TrackReport>)
{
    if period.is_zero() { return Err( config_error!("render interval has to be > 0")) }

    let mut ticker = interval( period);
    ticker.set_missed_tick_behavior( MissedTickBehavior::Delay);
    let mut cycles = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                let result = pipeline.render( query, &utc_now()).await;
                cycles += 1;
                callback( result);
            }
        }
    }

    info!("periodic rendering cancelled after {cycles} cycles");
    Ok(cycles)
}
