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

use chrono::{TimeZone, Utc};
use debris_orbital::{
    propagator::{Propagate, PropagationFailure},
    tle::ElementRecord,
    validity::ValidityFilter
};

/// tests for the validity filter
/// run with "cargo test test_select -- --nocapture"

const NOAA21_A_L1: &str = "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994";
const NOAA21_A_L2: &str = "2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811";
const NOAA21_B_L1: &str = "1 54234U 22150A   25076.57593612  .00000324  00000-0  17437-3 0  9990";
const NOAA21_B_L2: &str = "2 54234  98.7204  16.6962 0002723  73.3399 286.8075 14.19555996121765";

fn noaa21_a()->ElementRecord { ElementRecord::new( Some("NOAA 21 A".to_string()), NOAA21_A_L1, NOAA21_A_L2) }
fn noaa21_b()->ElementRecord { ElementRecord::new( Some("NOAA 21 B".to_string()), NOAA21_B_L1, NOAA21_B_L2) }
fn corrupted()->ElementRecord { ElementRecord::new( Some("BAD".to_string()), NOAA21_A_L1.replace("9994", "9999"), NOAA21_A_L2) }
fn truncated()->ElementRecord { ElementRecord::new( None, &NOAA21_B_L1[..50], NOAA21_B_L2) }

#[test]
fn test_check () {
    let reference = Utc.with_ymd_and_hms( 2025, 3, 17, 22, 0, 0).unwrap();
    let mut filter = ValidityFilter::new( reference);

    let obj = filter.check( &noaa21_a()).unwrap();
    println!("accepted {} at {}: {}", obj.name, obj.validated_at, obj.position);
    assert_eq!( obj.name, "NOAA 21 A");
    assert_eq!( obj.catalog_number(), "54234");
    assert_eq!( obj.validated_at, reference);
    assert!( obj.position.is_valid());
    assert_eq!( obj.position_at( &reference).unwrap(), obj.position);
    assert_eq!( filter.rejected(), 0);

    let res = filter.check( &corrupted());
    println!("rejected: {:?}", res.as_ref().err());
    assert!( matches!( res, Err(PropagationFailure::Malformed(_))));
    assert_eq!( filter.rejected(), 1);

    assert!( filter.check( &truncated()).is_err());
    assert_eq!( filter.rejected(), 2);
}

#[test]
fn test_select () {
    let reference = Utc.with_ymd_and_hms( 2025, 3, 17, 22, 0, 0).unwrap();
    let records = vec![ corrupted(), noaa21_a(), truncated(), noaa21_b() ];

    let outcome = ValidityFilter::new( reference).select( &records, 10);
    let names: Vec<&str> = outcome.accepted.iter().map(|o| o.name.as_str()).collect();
    println!("accepted: {names:?}, rejected: {}", outcome.rejected);
    assert_eq!( names, vec!["NOAA 21 A", "NOAA 21 B"]);
    assert_eq!( outcome.rejected, 2);

    // first accepted in source order wins, records after the cap is reached are not evaluated
    let outcome = ValidityFilter::new( reference).select( &records, 1);
    assert_eq!( outcome.accepted.len(), 1);
    assert_eq!( outcome.accepted[0].name, "NOAA 21 A");
    assert_eq!( outcome.rejected, 1);

    let outcome = ValidityFilter::new( reference).select( &Vec::<ElementRecord>::new(), 5);
    assert!( outcome.accepted.is_empty());
    assert_eq!( outcome.rejected, 0);
}

#[test]
fn test_all_rejected () {
    let reference = Utc.with_ymd_and_hms( 2025, 3, 17, 22, 0, 0).unwrap();
    let records = vec![ corrupted(), truncated(), corrupted() ];

    let outcome = ValidityFilter::new( reference).select( &records, 10);
    assert!( outcome.accepted.is_empty());
    assert_eq!( outcome.rejected, 3);
}
