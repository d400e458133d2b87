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

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use debris_orbital::{
    load_config,
    catalog_source::{CatalogQuery, CatalogSource, SpaceTrackConfig, SpaceTrackSource},
    tle::parse_element_sets
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "retrieve the most recent debris element sets from space-track.org")]
pub struct Args {
    /// look back this many days for element set epochs
    #[arg(short,long, default_value_t = 3)]
    pub days: u32,

    /// max number of objects we want to track (query limit is this times the configured oversample factor)
    #[arg(short,long, default_value_t = 100)]
    pub cap: usize,

    /// name of the space-track.org config file
    #[arg(long, default_value = "spacetrack.ron")]
    pub config: String,

    /// write the catalog to this file instead of stdout
    #[arg(short,long)]
    pub output: Option<PathBuf>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config: SpaceTrackConfig = load_config( &args.config)?;
    let query = CatalogQuery::new( config.credentials.clone(), args.days, args.cap)?;
    let source = SpaceTrackSource::new( config)?;

    let text = source.fetch_catalog( &query).await?;
    let records = parse_element_sets( &text);

    if let Some(path) = &args.output {
        std::fs::write( path, &text)?;
        println!("saved {} element sets to {:?}", records.len(), path);
    } else {
        for rec in &records {
            println!("{rec}");
        }
        eprintln!("{} element sets", records.len());
    }

    Ok(())
}
