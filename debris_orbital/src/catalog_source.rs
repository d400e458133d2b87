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

//! sources of raw element set catalog text

use std::{collections::HashMap, fmt, path::PathBuf, time::Duration};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize,Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use debris_common::datetime::{compact_utc_datetime_string, de_duration_from_fractional_secs, ser_duration_as_fractional_secs};
use crate::errors::{config_error, fetch_error, Result};

const LOGIN_PATH: &'static str = "ajaxauth/login";
const QUERY_PATH: &'static str = "basicspacedata/query";

#[derive(Serialize,Deserialize,Clone,PartialEq,Eq)]
pub struct SpaceTrackCredentials {
    pub identity: String,
    pub password: String
}

impl SpaceTrackCredentials {
    pub fn new (identity: impl ToString, password: impl ToString)->Self {
        SpaceTrackCredentials { identity: identity.to_string(), password: password.to_string() }
    }
}

impl fmt::Debug for SpaceTrackCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaceTrackCredentials").field("identity", &self.identity).field("password", &"***").finish()
    }
}

/// the parameters of a catalog request. Queries with equal keys are served from the same cache entry
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct CatalogQuery {
    pub credentials: SpaceTrackCredentials,

    pub lookback_days: u32,
    pub cap: usize,
}

/// the cache key of a query. We key on the credentials identity, not the password
#[derive(Debug,Clone,PartialEq,Eq,Hash)]
pub struct CatalogKey {
    pub identity: String,
    pub lookback_days: u32,
    pub cap: usize,
}

impl CatalogQuery {
    pub fn new (credentials: SpaceTrackCredentials, lookback_days: u32, cap: usize)->Result<Self> {
        if lookback_days == 0 { return Err( config_error!("catalog lookback_days has to be > 0")) }
        if cap == 0 { return Err( config_error!("catalog object cap has to be > 0")) }
        Ok( CatalogQuery { credentials, lookback_days, cap } )
    }

    pub fn key (&self)->CatalogKey {
        CatalogKey { identity: self.credentials.identity.clone(), lookback_days: self.lookback_days, cap: self.cap }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}d/{}", self.identity, self.lookback_days, self.cap)
    }
}

/// something that can produce raw (2LE or 3LE) element set text for a query
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog (&self, query: &CatalogQuery)->Result<String>;
}

/* #region space-track.org ***************************************************************************************/

/// configuration data for space-track.org catalog retrieval
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct SpaceTrackConfig {
    pub credentials: SpaceTrackCredentials,

    /// server root, e.g. "https://www.space-track.org"
    pub base_url: String,

    /// hard timeout for each request
    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub timeout: Duration,

    /// after which we need to log in again
    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub max_cookie_age: Duration,

    /// query limit is `cap * oversample` to leave room for rejected records
    pub oversample: usize,

    /// if set we store each retrieved catalog there
    pub archive_dir: Option<PathBuf>,
}

impl SpaceTrackConfig {
    pub fn validate (&self)->Result<()> {
        if self.base_url.trim().is_empty() { return Err( config_error!("space-track.org base_url not set")) }
        if self.timeout.is_zero() { return Err( config_error!("space-track.org request timeout has to be > 0")) }
        if self.oversample < 1 { return Err( config_error!("space-track.org oversample factor has to be >= 1")) }
        if self.credentials.identity.is_empty() { return Err( config_error!("space-track.org identity not set")) }
        Ok(())
    }
}

struct SpaceTrackCookie {
    value: String,
    created: DateTime<Utc>,
}

/// retrieves the most recent debris element sets from space-track.org
/// note that space-track.org APIs use a login cookie with a short expiration, which we keep per identity
pub struct SpaceTrackSource {
    config: SpaceTrackConfig,
    client: Client,
    cookies: Mutex<HashMap<String,SpaceTrackCookie>>,
}

impl SpaceTrackSource {
    pub fn new (config: SpaceTrackConfig)->Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout( config.timeout).build()?;

        if let Some(dir) = &config.archive_dir {
            std::fs::create_dir_all( dir)?;
        }

        Ok( SpaceTrackSource { config, client, cookies: Mutex::new( HashMap::new()) } )
    }

    pub fn config (&self)->&SpaceTrackConfig {
        &self.config
    }

    fn base_url (&self)->&str {
        self.config.base_url.trim().trim_end_matches('/')
    }

    /// the query limit for a requested cap
    pub fn query_limit (&self, cap: usize)->usize {
        cap.saturating_mul( self.config.oversample)
    }

    pub fn query_url (&self, query: &CatalogQuery)->String {
        let days = query.lookback_days;
        let limit = self.query_limit( query.cap);
        let base = self.base_url();
        format!("{base}/{QUERY_PATH}/class/gp/OBJECT_TYPE/DEBRIS/DECAY_DATE/null-val/EPOCH/%3Enow-{days}/orderby/EPOCH%20desc/limit/{limit}/format/3le")
    }

    async fn get_cookie_value (&self, credentials: &SpaceTrackCredentials)->Result<String> {
        let mut cookies = self.cookies.lock().await;

        if let Some(cookie) = cookies.get( &credentials.identity) {
            if (Utc::now() - cookie.created).num_seconds() <= self.config.max_cookie_age.as_secs() as i64 {
                return Ok( cookie.value.clone())
            }
        }

        let value = self.login( credentials).await?;
        cookies.insert( credentials.identity.clone(), SpaceTrackCookie { value: value.clone(), created: Utc::now() });
        Ok(value)
    }

    async fn login (&self, credentials: &SpaceTrackCredentials)->Result<String> {
        debug!("logging into space-track.org as {}", credentials.identity);

        let response = self.client
            .post( format!("{}/{LOGIN_PATH}", self.base_url()))
            .form( &[("identity", credentials.identity.as_str()), ("password", credentials.password.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err( fetch_error!("space-track.org login failed: {}", response.status()))
        }

        match response.headers().get("Set-Cookie") {
            Some(cookie) => {
                let value = cookie.to_str().map_err(|e| fetch_error!("invalid space-track.org cookie value: {e}"))?;
                Ok( value.to_string())
            }
            None => Err( fetch_error!("space-track.org login failed to obtain cookie"))
        }
    }

    async fn archive (&self, text: &str) {
        if let Some(dir) = &self.config.archive_dir {
            let path = dir.join( format!("debris_{}.3le", compact_utc_datetime_string( &Utc::now())));
            if let Err(e) = tokio::fs::write( &path, text).await {
                warn!("failed to archive catalog to {:?}: {e}", path);
            }
        }
    }
}

#[async_trait]
impl CatalogSource for SpaceTrackSource {
    async fn fetch_catalog (&self, query: &CatalogQuery)->Result<String> {
        let cookie = self.get_cookie_value( &query.credentials).await?;
        let url = self.query_url( query);

        info!("querying space-track.org debris catalog ({} days, limit {})", query.lookback_days, self.query_limit(query.cap));
        let response = self.client
            .get( url)
            .header("Cookie", cookie)
            .send()
            .await?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::UNAUTHORIZED {
                self.cookies.lock().await.remove( &query.credentials.identity);
            }
            return Err( fetch_error!("error retrieving debris catalog: {}", response.status()))
        }

        let text = response.text().await?;
        check_catalog_text( &text)?;
        self.archive( &text).await;

        Ok(text)
    }
}

/// top level sanity check of a retrieved catalog. space-track.org reports errors as JSON or HTML documents
pub fn check_catalog_text (text: &str)->Result<()> {
    match text.trim_start().chars().next() {
        Some(c) if c == '{' || c == '[' || c == '<' => {
            let excerpt: String = text.trim().chars().take(80).collect();
            Err( fetch_error!("malformed catalog content: {excerpt}"))
        }
        _ => Ok(())
    }
}

/* #endregion space-track.org */

/// a catalog source that reads element sets from a local 2LE/3LE file. This ignores the query credentials and
/// lookback, the cap is applied by the validity filter
#[derive(Debug,Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new (path: impl Into<PathBuf>)->Self {
        FileCatalogSource { path: path.into() }
    }

    pub fn path (&self)->&PathBuf { &self.path }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_catalog (&self, _query: &CatalogQuery)->Result<String> {
        let text = tokio::fs::read_to_string( &self.path).await
            .map_err(|e| fetch_error!("failed to read catalog file {:?}: {e}", self.path))?;
        check_catalog_text( &text)?;
        Ok(text)
    }
}
