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

//! SGP4 based state propagation from element records to geodetic sub-points.
//!
//! The TEME position produced by SGP4 is rotated into the earth fixed frame with the (IAU-82)
//! Greenwich mean sidereal time of the requested instant. Polar motion and the equation of the
//! equinoxes are ignored - this is below the accuracy of SGP4 anyways.

use std::fmt;
use chrono::{DateTime, TimeZone, Utc};
use sgp4::{Constants, Elements};
use thiserror::Error;
use debris_common::{cartesian3::Cartesian3, cartographic::Cartographic, geo_constants::POLAR_EARTH_RADIUS};
use crate::{GeodeticPosition, tle::{ElementRecord, StructureDefect}};

/// anything closer to the earth center has decayed (or is garbage)
const MIN_ORBIT_RADIUS: f64 = POLAR_EARTH_RADIUS - 10000.0;

/// why a (record,instant) propagation did not produce a usable position.
/// These are expected for stale or decayed objects and hence are not fatal
#[derive(Error,Debug,Clone,PartialEq)]
pub enum PropagationFailure {
    #[error("malformed element set: {0}")]
    Malformed( StructureDefect ),

    #[error("invalid elements: {0}")]
    InvalidElements( String ),

    #[error("instant not representable relative to element epoch: {0}")]
    InvalidInstant( String ),

    #[error("model diverged: {0}")]
    ModelDiverged( String ),

    #[error("non-finite position")]
    NonFinite,

    #[error("position below earth surface (r = {0:.0} m)")]
    BelowSurface( f64 ),

    #[error("geodetic position out of range ({0})")]
    OutOfRange( GeodeticPosition ),
}

/// something that can compute a geodetic position for a given instant.
/// This is the seam that trail sampling and validity checks are built on
pub trait Propagate {
    fn position_at (&self, t: &DateTime<Utc>) -> Result<GeodeticPosition,PropagationFailure>;
}

/// the SGP4 model for one element record. Construction checks the record structure and element values,
/// propagation is a pure function of the requested instant (each call is computed from scratch)
pub struct StatePropagator {
    catalog_number: String,
    elements: Elements,
    constants: Constants,
}

impl StatePropagator {
    pub fn new (record: &ElementRecord)->Result<Self,PropagationFailure> {
        record.check_structure().map_err( PropagationFailure::Malformed)?;

        let elements = Elements::from_tle(
            record.name().map(|s| s.to_string()),
            record.line1().as_bytes(),
            record.line2().as_bytes()
        ).map_err( |e| PropagationFailure::InvalidElements( e.to_string()))?;

        let constants = Constants::from_elements( &elements)
            .map_err( |e| PropagationFailure::InvalidElements( e.to_string()))?;

        let catalog_number = record.catalog_number().to_string();

        Ok( StatePropagator { catalog_number, elements, constants } )
    }

    pub fn catalog_number (&self)->&str {
        &self.catalog_number
    }

    pub fn epoch (&self)->DateTime<Utc> {
        Utc.from_utc_datetime( &self.elements.datetime)
    }

    /// inclination in degrees
    pub fn inclination (&self)->f64 {
        self.elements.inclination
    }

    /// mean motion in revolutions per day
    pub fn mean_motion (&self)->f64 {
        self.elements.mean_motion
    }

    /// earth fixed (ECEF) position in meters
    pub fn ecef_position_at (&self, t: &DateTime<Utc>) -> Result<Cartesian3,PropagationFailure> {
        let t_naive = t.naive_utc();
        let minutes = self.elements.datetime_to_minutes_since_epoch( &t_naive)
            .map_err( |e| PropagationFailure::InvalidInstant( e.to_string()))?;

        let prediction = self.constants.propagate( minutes)
            .map_err( |e| PropagationFailure::ModelDiverged( e.to_string()))?;

        let p_teme = Cartesian3::from_array( &prediction.position) * 1000.0; // km -> m
        if !p_teme.is_finite() { return Err( PropagationFailure::NonFinite) }

        let gmst = sgp4::iau_epoch_to_sidereal_time( sgp4::julian_years_since_j2000( &t_naive));
        Ok( p_teme.rotated_frame_z( gmst) )
    }
}

impl Propagate for StatePropagator {
    fn position_at (&self, t: &DateTime<Utc>) -> Result<GeodeticPosition,PropagationFailure> {
        let p = self.ecef_position_at(t)?;

        let r = p.length();
        if r < MIN_ORBIT_RADIUS { return Err( PropagationFailure::BelowSurface(r)) }

        let c = Cartographic::try_from_ecef( &p).ok_or( PropagationFailure::NonFinite)?;
        let pos = GeodeticPosition::from( &c);

        if pos.is_valid() { Ok(pos) } else { Err( PropagationFailure::OutOfRange(pos)) }
    }
}

impl fmt::Debug for StatePropagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatePropagator{{ catalog_number: {}, epoch: {} }}", self.catalog_number, self.epoch())
    }
}
