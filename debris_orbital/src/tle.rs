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

//! splitting raw catalog text into two-line element (TLE) records.
//!
//! We accept both tightly packed 2-line sets and 3-line sets (name line + 2 data lines), including
//! the space-track.org "3le" flavor that prefixes name lines with "0 ". Fragments that do not form
//! a proper "1 "/"2 " pair are dropped without error - real world feeds are not always clean.
//! This module only splits text. Full structural checks (line length, checksums) happen in
//! [`ElementRecord::check_structure`], which is called before any propagation

use std::fmt;
use serde::{Deserialize,Serialize};

pub const TLE_LINE_LEN: usize = 69;

const LINE1_MARKER: &str = "1 ";
const LINE2_MARKER: &str = "2 ";
const NAME_MARKER: &str = "0 ";

/// one element set as it was found in the catalog text. Immutable once parsed
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct ElementRecord {
    name: Option<String>,
    line1: String,
    line2: String,
}

/// the reasons why a record is structurally unusable
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum StructureDefect {
    LineMarker { line: u8 },
    LineLength { line: u8, len: usize },
    Checksum { line: u8, expected: u8, found: char },
    CatalogNumberMismatch,
}

impl fmt::Display for StructureDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureDefect::LineMarker{line} => write!(f, "line {line} has wrong line marker"),
            StructureDefect::LineLength{line,len} => write!(f, "line {line} has {len} instead of {TLE_LINE_LEN} columns"),
            StructureDefect::Checksum{line,expected,found} => write!(f, "line {line} checksum mismatch (expected {expected}, found '{found}')"),
            StructureDefect::CatalogNumberMismatch => write!(f, "catalog numbers of line 1 and 2 differ"),
        }
    }
}

impl ElementRecord {
    pub fn new (name: Option<String>, line1: impl ToString, line2: impl ToString)->Self {
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        ElementRecord { name, line1: line1.to_string(), line2: line2.to_string() }
    }

    pub fn name (&self)->Option<&str> { self.name.as_deref() }
    pub fn line1 (&self)->&str { &self.line1 }
    pub fn line2 (&self)->&str { &self.line2 }

    /// the satellite catalog number (NORAD id) as it appears in columns 3-7 of line 1.
    /// Note this can be alpha-5 encoded for new objects, hence we keep it as a string
    pub fn catalog_number (&self)->&str {
        self.line1.get(2..7).map(|s| s.trim()).unwrap_or("")
    }

    /// the name to display for this record. If there is no name line we fall back to the catalog number
    pub fn display_name (&self)->String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.catalog_number())
        }
    }

    /// check line markers, line lengths, checksums and catalog number consistency
    pub fn check_structure (&self)->Result<(),StructureDefect> {
        if !self.line1.starts_with(LINE1_MARKER) { return Err(StructureDefect::LineMarker{line:1}) }
        if !self.line2.starts_with(LINE2_MARKER) { return Err(StructureDefect::LineMarker{line:2}) }

        check_line( 1, &self.line1)?;
        check_line( 2, &self.line2)?;

        if self.line1.get(2..7) != self.line2.get(2..7) { return Err(StructureDefect::CatalogNumberMismatch) }

        Ok(())
    }
}

impl fmt::Display for ElementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name { writeln!(f, "{name}")?; }
        writeln!(f, "{}", self.line1)?;
        write!(f, "{}", self.line2)
    }
}

fn check_line (n: u8, line: &str)->Result<(),StructureDefect> {
    if line.len() != TLE_LINE_LEN || !line.is_ascii() {
        return Err( StructureDefect::LineLength{ line: n, len: line.len() })
    }

    let expected = checksum_digit(line);
    let found = line.as_bytes()[TLE_LINE_LEN-1] as char;
    if found.to_digit(10) != Some(expected as u32) {
        return Err( StructureDefect::Checksum{ line: n, expected, found })
    }

    Ok(())
}

/// the modulo 10 checksum over the first 68 columns of a TLE line: digits count with their value,
/// '-' counts as 1, everything else as 0
pub fn checksum_digit (line: &str)->u8 {
    let sum: u32 = line.bytes().take(TLE_LINE_LEN-1).map( |b| match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'-' => 1,
        _ => 0
    }).sum();
    (sum % 10) as u8
}

/// split raw catalog text into ElementRecords (in source order).
/// A record is emitted for each "1 " line that is immediately followed by a "2 " line. A non-data line
/// directly preceding such a pair is used as its name. Everything else is dropped
pub fn parse_element_sets (text: &str)->Vec<ElementRecord> {
    let lines: Vec<&str> = text.lines()
        .map( |l| l.trim_end())
        .filter( |l| !l.is_empty())
        .collect();

    let mut records: Vec<ElementRecord> = Vec::with_capacity( lines.len() / 2);
    let mut name: Option<&str> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.starts_with(LINE1_MARKER) {
            if let Some(next) = lines.get(i+1) {
                if next.starts_with(LINE2_MARKER) {
                    records.push( ElementRecord::new( name.take().map(name_line_value), line, *next));
                    i += 2;
                    continue;
                }
            }
            name = None; // orphan line 1 - drop it together with a pending name

        } else if line.starts_with(LINE2_MARKER) {
            name = None; // orphan line 2

        } else {
            name = Some(line); // if there are consecutive non-data lines the last one wins
        }

        i += 1;
    }

    records
}

fn name_line_value (line: &str)->String {
    line.strip_prefix(NAME_MARKER).unwrap_or(line).trim().to_string()
}
