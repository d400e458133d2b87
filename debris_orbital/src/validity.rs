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

use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::debug;
use crate::{GeodeticPosition, propagator::{Propagate, PropagationFailure, StatePropagator}, tle::ElementRecord};

/// max number of individual reject reasons we log per filter run
const MAX_LOGGED_REJECTS: usize = 10;

/// an element record that passed the validity filter, bound to its display name.
/// TrackedObjects live as long as the catalog cache entry they belong to. They are cheap to clone
/// since the propagator is shared
#[derive(Debug,Clone)]
pub struct TrackedObject {
    pub name: String,
    pub record: ElementRecord,

    /// the instant the object was validated at, and its position at that instant
    pub validated_at: DateTime<Utc>,
    pub position: GeodeticPosition,

    propagator: Arc<StatePropagator>,
}

impl TrackedObject {
    pub fn catalog_number (&self)->&str {
        self.record.catalog_number()
    }
}

impl Propagate for TrackedObject {
    /// note this always re-computes, also for the instant the object was validated at
    fn position_at (&self, t: &DateTime<Utc>) -> Result<GeodeticPosition,PropagationFailure> {
        self.propagator.position_at(t)
    }
}

/// the result of filtering a list of candidate records
#[derive(Debug,Clone)]
pub struct FilterOutcome {
    pub accepted: Vec<TrackedObject>,
    pub rejected: usize,
}

/// accepts element records iff they can be propagated to a finite, in-range position at the reference instant.
/// Rejected records are counted and discarded, not retried.
/// Note that acceptance does not imply that propagation for other instants will succeed
#[derive(Debug)]
pub struct ValidityFilter {
    reference: DateTime<Utc>,
    rejected: usize,
}

impl ValidityFilter {
    pub fn new (reference: DateTime<Utc>)->Self {
        ValidityFilter { reference, rejected: 0 }
    }

    pub fn reference (&self)->&DateTime<Utc> {
        &self.reference
    }

    /// running total of rejected records
    pub fn rejected (&self)->usize {
        self.rejected
    }

    /// check a single record. Each `Err` result increments the reject count by one
    pub fn check (&mut self, record: &ElementRecord)->Result<TrackedObject,PropagationFailure> {
        match validate( record, &self.reference) {
            Ok(tracked) => Ok(tracked),
            Err(failure) => {
                self.rejected += 1;
                if self.rejected <= MAX_LOGGED_REJECTS {
                    debug!("rejected element set {}: {}", record.display_name(), failure);
                }
                Err(failure)
            }
        }
    }

    /// keep the first `cap` accepted records in input order. Records after the one that fills the cap are
    /// not evaluated (and hence not counted as rejects)
    pub fn select<'a> (mut self, records: impl IntoIterator<Item=&'a ElementRecord>, cap: usize)->FilterOutcome {
        let mut accepted: Vec<TrackedObject> = Vec::with_capacity( cap.min(1024));

        for record in records {
            if accepted.len() >= cap { break }
            if let Ok(tracked) = self.check(record) {
                accepted.push( tracked);
            }
        }

        FilterOutcome { accepted, rejected: self.rejected }
    }
}

fn validate (record: &ElementRecord, reference: &DateTime<Utc>)->Result<TrackedObject,PropagationFailure> {
    let propagator = StatePropagator::new( record)?;
    let position = propagator.position_at( reference)?;

    if !position.is_valid() { return Err( PropagationFailure::OutOfRange(position)) }

    Ok( TrackedObject {
        name: record.display_name(),
        record: record.clone(),
        validated_at: *reference,
        position,
        propagator: Arc::new(propagator)
    })
}
