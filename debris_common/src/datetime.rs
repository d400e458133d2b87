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

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize,Serializer,Deserializer,de::{Error as DeError}};
use std::time::Duration;

// simple wrappers for std Duration ctors that are (still) experimental
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }

/// this should be used wherever we might have to use a sim clock instead of the wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// the instant that is `offset` (fractional) minutes after/before `dt`, rounded to milliseconds
pub fn offset_by_minutes (dt: &DateTime<Utc>, offset: f64) -> DateTime<Utc> {
    *dt + TimeDelta::milliseconds( (offset * 60000.0).round() as i64)
}

/// fractional minutes from `dt_earlier` to `dt_later` (negative if `dt_later` is before `dt_earlier`)
pub fn minutes_between (dt_earlier: &DateTime<Utc>, dt_later: &DateTime<Utc>) -> f64 {
    (*dt_later - *dt_earlier).num_milliseconds() as f64 / 60000.0
}

/// has `ttl` passed between `created` and `now`. Instants before `created` never expire
pub fn is_expired (created: &DateTime<Utc>, now: &DateTime<Utc>, ttl: Duration) -> bool {
    match (*now - *created).to_std() {
        Ok(age) => age > ttl,
        Err(_) => false // now < created
    }
}

pub fn short_utc_datetime_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format("%Y-%m-%dT%H:%M:%S%Z"))
}

/// file name friendly timestamp (no ':')
pub fn compact_utc_datetime_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format("%Y-%m-%d_%H%M%S"))
}

/// parse RFC 3339 / ISO 8601 date-time specs. Specs without explicit offset or 'Z' are rejected
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.to_utc()),
        Err(_) => DateTime::parse_from_str(s, "%+").ok().map(|dt| dt.to_utc())
    }
}

//--- support for serde

pub fn ser_epoch_millis<S: Serializer> (dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_i64(dt.timestamp_millis())
}

pub fn de_from_epoch_millis <'a,D>(deserializer: D) -> Result<DateTime<Utc>,D::Error> where D: Deserializer<'a> {
    let millis: i64 = i64::deserialize(deserializer)?;
    DateTime::from_timestamp_millis(millis).ok_or( DeError::custom("invalid timestamp value"))
}

pub fn ser_duration_as_fractional_secs<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let secs = dur.as_secs_f64();
    s.serialize_f64( secs)
}

/// note this rejects negative or non-finite values instead of panicking in `Duration::from_secs_f64`
pub fn de_duration_from_fractional_secs <'a,D>(deserializer: D) -> Result<Duration,D::Error> where D: Deserializer<'a> {
    let secs: f64 = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err( |e| DeError::custom(format!("invalid duration {secs}: {e}")))
}
