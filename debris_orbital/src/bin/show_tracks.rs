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

use std::{path::PathBuf, sync::Arc, time::Duration};
use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use debris_common::{MinMaxAvg, datetime::{short_utc_datetime_string, utc_now}};
use debris_orbital::{
    load_config,
    catalog_cache::CatalogCache,
    catalog_source::{CatalogSource, FileCatalogSource, SpaceTrackConfig, SpaceTrackCredentials, SpaceTrackSource},
    config::TrackConfig,
    errors::Result as OrbitalResult,
    tracks::{run_periodic, TrackPipeline, TrackReport}
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "compute current positions and trails of tracked debris objects")]
pub struct Args {
    /// read element sets from this 2LE/3LE file instead of space-track.org
    #[arg(short,long)]
    pub file: Option<PathBuf>,

    /// name of the track config file
    #[arg(long, default_value = "debris.ron")]
    pub config: String,

    /// name of the space-track.org config file
    #[arg(long, default_value = "spacetrack.ron")]
    pub spacetrack: String,

    /// print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// re-render every given number of seconds until interrupted
    #[arg(short,long)]
    pub interval: Option<f64>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config: TrackConfig = load_config( &args.config)?;
    config.validate()?;

    if let Some(path) = &args.file {
        let credentials = SpaceTrackCredentials::new( "local", "");
        run( FileCatalogSource::new( path), credentials, config, &args).await
    } else {
        let st_config: SpaceTrackConfig = load_config( &args.spacetrack)?;
        let credentials = st_config.credentials.clone();
        run( SpaceTrackSource::new( st_config)?, credentials, config, &args).await
    }
}

async fn run<S> (source: S, credentials: SpaceTrackCredentials, config: TrackConfig, args: &Args)->Result<()> where S: CatalogSource {
    let query = config.catalog_query( credentials)?;
    let cache = Arc::new( CatalogCache::new( source, config.cache_ttl));
    let pipeline = TrackPipeline::new( cache, config)?;

    match args.interval {
        Some(secs) => {
            let period = Duration::try_from_secs_f64( secs)?;
            let cancel_token = CancellationToken::new();

            let ct = cancel_token.clone();
            tokio::spawn( async move {
                if tokio::signal::ctrl_c().await.is_ok() { ct.cancel() }
            });

            run_periodic( &pipeline, &query, period, cancel_token, |res| print_result( res, args.json)).await?;
        }
        None => {
            let report = pipeline.render( &query, &utc_now()).await?;
            print_report( &report, args.json)?;
        }
    }

    Ok(())
}

fn print_result (res: OrbitalResult<TrackReport>, json: bool) {
    match res {
        Ok(report) => {
            if let Err(e) = print_report( &report, json) { eprintln!("failed to print report: {e}") }
        }
        Err(e) => eprintln!("render cycle failed: {e}")
    }
}

fn print_report (report: &TrackReport, json: bool)->OrbitalResult<()> {
    if json {
        println!("{}", report.to_json_pretty()?);
        return Ok(())
    }

    println!("------- {} (catalog {}, {})", short_utc_datetime_string( &report.reference),
             short_utc_datetime_string( &report.catalog_created), report.cache_status);

    let mut trail_len = MinMaxAvg::new();
    for obj in &report.objects {
        trail_len.add( obj.trail.len() as f64);
        match &obj.current {
            Some(pos) => println!("{:>7} {:<24} {}  trail: {:3}", obj.catalog_number, obj.name, pos, obj.trail.len()),
            None => println!("{:>7} {:<24} {:^38}  trail: {:3}", obj.catalog_number, obj.name, "-", obj.trail.len())
        }
    }

    println!("{} objects, {} records, {} rejected, {} trail failures, trail length min/avg/max: {}/{:.1}/{}",
             report.objects.len(), report.records, report.rejected, report.trail_failures,
             trail_len.min, trail_len.avg, trail_len.max);

    Ok(())
}
