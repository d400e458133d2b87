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

use debris_common::{cartesian3::Cartesian3, cartographic::Cartographic, normalize_180, unwrap_degrees, MinMaxAvg};

/// unit tests for cartesian3 and cartographic
/// run with "cargo test test_roundtrip -- --nocapture"

#[test]
fn test_roundtrip () {
    let ps: Vec<Cartographic> = vec![
        (-122.5463, 32.3474, 0.0),
        (  17.0432, 81.2000, 830000.0),
        ( 179.9000, -45.0000, 400000.0),
        (-179.9000,   0.0000, 35786000.0)
    ].iter().map( |p| Cartographic::from_degrees(p.0, p.1, p.2)).collect();

    for p in ps.iter() {
        let ecef = Cartesian3::from(p);
        let c = Cartographic::try_from_ecef(&ecef).unwrap();
        println!("  {} -> {} -> {}", p, ecef, c);

        assert!( (c.longitude_deg() - p.longitude_deg()).abs() < 1e-7);
        assert!( (c.latitude_deg() - p.latitude_deg()).abs() < 1e-7);
        assert!( (c.height - p.height).abs() < 1e-2);
    }
}

#[test]
fn test_degenerate_ecef () {
    assert!( Cartographic::try_from_ecef( &Cartesian3::zero()).is_none());
    assert!( Cartographic::try_from_ecef( &Cartesian3::new( 1000.0, 0.0, 0.0)).is_none());
    assert!( Cartographic::try_from_ecef( &Cartesian3::new( f64::NAN, 7e6, 0.0)).is_none());
}

#[test]
fn test_frame_rotation () {
    let p = Cartesian3::new( 7000000.0, 0.0, 1000.0);

    // rotating the frame by +90° moves a point on the x-axis onto the negative y-axis
    let q = p.rotated_frame_z( 90f64.to_radians());
    println!("{} -> {}", p, q);
    assert!( q.x.abs() < 1e-6);
    assert!( (q.y + 7000000.0).abs() < 1e-6);
    assert_eq!( q.z, p.z);
    assert!( (q.length() - p.length()).abs() < 1e-6);

    let d = &p.rotated_frame_z( 2.0 * std::f64::consts::PI) - &p;
    assert!( d.length() < 1e-6);
}

#[test]
fn test_longitude_normalization () {
    assert_eq!( normalize_180( 190.0), -170.0);
    assert_eq!( normalize_180( -190.0), 170.0);
    assert_eq!( normalize_180( 180.0), 180.0);
    assert_eq!( normalize_180( -180.0), -180.0);
    assert_eq!( normalize_180( 45.0), 45.0);

    assert_eq!( unwrap_degrees( 179.0, -179.0), 181.0);
    assert_eq!( unwrap_degrees( -179.0, 179.0), -181.0);
    assert_eq!( unwrap_degrees( 10.0, 20.0), 20.0);
}

#[test]
fn test_min_max_avg () {
    let mut mma = MinMaxAvg::new();
    assert!( mma.avg.is_nan());

    for x in [31.0, 12.0, 29.0, 0.0, 28.0] { mma.add(x); }
    println!("{mma:?}");

    assert_eq!( mma.n, 5);
    assert_eq!( mma.min, 0.0);
    assert_eq!( mma.max, 31.0);
    assert!( (mma.avg - 20.0).abs() < 1e-9);
}
