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

//! keyed TTL cache for validated catalogs.
//!
//! Each key has its own async mutex slot, which is held while the slot is refreshed. Concurrent requests
//! for the same key therefore wait for the in-flight refresh and then get its result, requests for
//! different keys do not block each other

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};
use chrono::{DateTime, Utc};
use serde::{Deserialize,Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use debris_common::datetime::is_expired;
use crate::{
    catalog_source::{CatalogKey, CatalogQuery, CatalogSource},
    errors::{op_failed, Result},
    tle::parse_element_sets,
    validity::{TrackedObject, ValidityFilter}
};

/// the validated catalog for one key
#[derive(Debug)]
pub struct CacheEntry {
    pub key: CatalogKey,
    pub objects: Vec<TrackedObject>,
    pub rejected: usize,
    pub records: usize, // number of parsed element sets
    pub created: DateTime<Utc>,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum CacheStatus {
    Hit,
    Miss,
    /// refresh failed, this is the last (expired) entry
    Stale,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStatus::Hit => write!(f, "hit"),
            CacheStatus::Miss => write!(f, "miss"),
            CacheStatus::Stale => write!(f, "stale"),
        }
    }
}

#[derive(Debug,Clone)]
pub struct CatalogLookup {
    pub entry: Arc<CacheEntry>,
    pub status: CacheStatus,
}

type Slot = Arc<Mutex<Option<Arc<CacheEntry>>>>;

pub struct CatalogCache<S> where S: CatalogSource {
    source: S,
    ttl: Duration,
    slots: Mutex<HashMap<CatalogKey,Slot>>,
}

impl<S> CatalogCache<S> where S: CatalogSource {
    pub fn new (source: S, ttl: Duration)->Self {
        CatalogCache { source, ttl, slots: Mutex::new( HashMap::new()) }
    }

    pub fn source (&self)->&S { &self.source }
    pub fn ttl (&self)->Duration { self.ttl }

    async fn slot (&self, key: &CatalogKey)->Slot {
        let mut slots = self.slots.lock().await;
        slots.entry( key.clone()).or_default().clone()
    }

    async fn is_current_slot (&self, key: &CatalogKey, slot: &Slot)->bool {
        self.slots.lock().await.get( key).is_some_and( |s| Arc::ptr_eq( s, slot))
    }

    /// lock the slot for `key`. If the slot got invalidated while we were waiting for it we retry with the
    /// current one, so that there never are concurrent refreshes for the same key
    async fn lock_slot (&self, key: &CatalogKey)->OwnedMutexGuard<Option<Arc<CacheEntry>>> {
        loop {
            let slot = self.slot( key).await;
            let guard = slot.clone().lock_owned().await;
            if self.is_current_slot( key, &slot).await { return guard }
        }
    }

    /// get the validated catalog for `query`. An entry is fresh while `now - created <= ttl`, otherwise (or if
    /// there is none) exactly one caller refreshes it. If that refresh fails to fetch and we still have an old entry
    /// it is returned with `CacheStatus::Stale`
    pub async fn get (&self, query: &CatalogQuery, now: &DateTime<Utc>)->Result<CatalogLookup> {
        let key = query.key();
        let mut cached = self.lock_slot( &key).await;

        if let Some(entry) = cached.as_ref() {
            if !is_expired( &entry.created, now, self.ttl) {
                return Ok( CatalogLookup { entry: entry.clone(), status: CacheStatus::Hit } )
            }
        }

        match self.refresh( query, now).await {
            Ok(entry) => {
                let entry = Arc::new(entry);
                *cached = Some( entry.clone());
                Ok( CatalogLookup { entry, status: CacheStatus::Miss } )
            }
            Err(e) => {
                if e.is_fetch_error() {
                    if let Some(entry) = cached.as_ref() {
                        warn!("catalog refresh for {key} failed, serving stale entry from {}: {e}", entry.created);
                        return Ok( CatalogLookup { entry: entry.clone(), status: CacheStatus::Stale } )
                    }
                }
                Err(e)
            }
        }
    }

    async fn refresh (&self, query: &CatalogQuery, now: &DateTime<Utc>)->Result<CacheEntry> {
        let key = query.key();
        let text = self.source.fetch_catalog( query).await?;

        let cap = query.cap;
        let reference = *now;
        let (records, outcome) = tokio::task::spawn_blocking( move || {
            let records = parse_element_sets( &text);
            let outcome = ValidityFilter::new( reference).select( &records, cap);
            (records.len(), outcome)
        }).await.map_err(|e| op_failed!("catalog validation task failed: {e}"))?;

        info!("refreshed catalog {key}: {} records, {} accepted, {} rejected", records, outcome.accepted.len(), outcome.rejected);

        Ok( CacheEntry { key, objects: outcome.accepted, rejected: outcome.rejected, records, created: *now } )
    }

    /// the current entry for `key` regardless of its age. This waits for in-flight refreshes of that key
    pub async fn cached (&self, key: &CatalogKey)->Option<Arc<CacheEntry>> {
        let slot = self.slots.lock().await.get( key).cloned();
        match slot {
            Some(slot) => {
                let cached = slot.lock().await;
                cached.clone()
            }
            None => None
        }
    }

    /// drop the entry for `key` so that the next request refreshes. Returns true if there was one.
    /// This waits for in-flight refreshes of that key
    pub async fn invalidate (&self, key: &CatalogKey)->bool {
        let Some(slot) = self.slots.lock().await.get( key).cloned() else { return false };

        let mut cached = slot.lock().await;
        let had_entry = cached.take().is_some();

        let mut slots = self.slots.lock().await;
        if slots.get( key).is_some_and( |s| Arc::ptr_eq( s, &slot)) {
            slots.remove( key);
        }

        had_entry
    }

    /// drop all entries
    pub async fn clear (&self) {
        let keys: Vec<CatalogKey> = self.slots.lock().await.keys().cloned().collect();
        for key in &keys {
            self.invalidate( key).await;
        }
    }

    /// the keys we currently keep slots for
    pub async fn keys (&self)->Vec<CatalogKey> {
        self.slots.lock().await.keys().cloned().collect()
    }
}
