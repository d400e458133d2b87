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

use debris_orbital::tle::{checksum_digit, parse_element_sets, ElementRecord, StructureDefect};

/// tests for element set parsing and structure checks
/// run with "cargo test test_parse -- --nocapture"

const NOAA21_L1: &str = "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994";
const NOAA21_L2: &str = "2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811";
const ISS_L1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
const ISS_L2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

#[test]
fn test_parse_3le () {
    let text = format!("0 NOAA 21\n{NOAA21_L1}\n{NOAA21_L2}\nISS (ZARYA)\n{ISS_L1}\n{ISS_L2}\n0 NOAA 21\n{NOAA21_L1}\n{NOAA21_L2}\n0 TRUNCATED\n{ISS_L1}\n");
    let records = parse_element_sets(&text);
    for r in &records { println!("{}\n", r); }

    assert_eq!( records.len(), 3);
    assert_eq!( records[0].name(), Some("NOAA 21"));
    assert_eq!( records[1].name(), Some("ISS (ZARYA)"));
    assert_eq!( records[1].catalog_number(), "25544");
    assert_eq!( records[2].line2(), NOAA21_L2);
}

#[test]
fn test_parse_2le () {
    let text = format!("{NOAA21_L1}\r\n{NOAA21_L2}\r\n\r\n{ISS_L1}\r\n{ISS_L2}\r\n");
    let records = parse_element_sets(&text);

    assert_eq!( records.len(), 2);
    assert!( records[0].name().is_none());
    assert_eq!( records[0].display_name(), "#54234");
    assert_eq!( records[1].line1(), ISS_L1); // no trailing CR
}

#[test]
fn test_parse_fragments () {
    assert!( parse_element_sets("").is_empty());
    assert!( parse_element_sets(" \n\n  \n").is_empty());

    // orphan line 2 and orphan line 1 (with its name) are dropped, the name does not carry over
    let text = format!("{ISS_L2}\nORPHAN\n{ISS_L1}\n{NOAA21_L1}\n{NOAA21_L2}\n");
    let records = parse_element_sets(&text);
    println!("{records:?}");

    assert_eq!( records.len(), 1);
    assert_eq!( records[0].catalog_number(), "54234");
    assert!( records[0].name().is_none());

    // odd trailing line
    let text = format!("{NOAA21_L1}\n{NOAA21_L2}\n{ISS_L1}");
    assert_eq!( parse_element_sets(&text).len(), 1);
}

#[test]
fn test_structure_checks () {
    assert_eq!( checksum_digit(NOAA21_L1), 4);
    assert_eq!( checksum_digit(NOAA21_L2), 1);
    assert_eq!( checksum_digit(ISS_L1), 2);

    let rec = ElementRecord::new( Some("  NOAA 21 ".to_string()), NOAA21_L1, NOAA21_L2);
    assert_eq!( rec.name(), Some("NOAA 21"));
    assert_eq!( rec.check_structure(), Ok(()));

    let corrupted = NOAA21_L1.replace("9994", "9995");
    let rec = ElementRecord::new( None, &corrupted, NOAA21_L2);
    let res = rec.check_structure();
    println!("{corrupted} -> {res:?}");
    assert_eq!( res, Err( StructureDefect::Checksum{ line: 1, expected: 4, found: '5' }));

    let rec = ElementRecord::new( None, &NOAA21_L1[..60], NOAA21_L2);
    assert_eq!( rec.check_structure(), Err( StructureDefect::LineLength{ line: 1, len: 60 }));

    let rec = ElementRecord::new( None, NOAA21_L2, NOAA21_L1);
    assert_eq!( rec.check_structure(), Err( StructureDefect::LineMarker{ line: 1 }));

    let rec = ElementRecord::new( None, NOAA21_L1, ISS_L2);
    assert_eq!( rec.check_structure(), Err( StructureDefect::CatalogNumberMismatch));
}
