// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Scene records and capture-date handling.
//!
//! A [`Scene`] is one satellite capture as published by the catalog. Its
//! geographic footprint is not part of the listing and is attached later by
//! the bounds resolver; once attached it is never fetched again.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Byte offset of the `YYYYDDD` acquisition date inside a Landsat scene id.
const CAPTURE_DATE_OFFSET: usize = 9;
/// Length of the `YYYYDDD` acquisition date.
const CAPTURE_DATE_LEN: usize = 7;

/// Long-form date used in the info panel, e.g. "August 22, 2014".
pub const CAPTURE_DATE_FORMAT: &str = "%B %-d, %Y";

/// Errors from decoding the acquisition date embedded in a scene id.
#[derive(Debug, Error)]
pub enum CaptureDateError {
    #[error("scene id '{0}' is too short to contain a capture date")]
    TooShort(String),

    #[error("capture date '{0}' is not a YYYYDDD number")]
    NotDigits(String),

    #[error("invalid number in capture date '{raw}': {source}")]
    Number {
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("capture date '{0}' is not a valid year and day of year")]
    InvalidDay(String),
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic footprint of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    /// Lower-left corner.
    pub south_west: LatLon,
    /// Upper-right corner.
    pub north_east: LatLon,
    /// Scene center as reported by the catalog.
    pub center: LatLon,
}

/// Nested `{ "name": ... }` object used by the catalog for display strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// One satellite capture from the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scene {
    /// Scene identifier, encodes path/row and acquisition date.
    pub scene_id: String,

    /// Only ready scenes have imagery that can be displayed.
    pub ready: bool,

    /// Publish time used for ordering (ISO-8601, compares lexically).
    pub time_requested: String,

    /// Tile layer identifier handed to the map.
    pub map_id: String,

    pub satellite: NamedRef,

    pub process_method: NamedRef,

    /// Footprint, filled in lazily by the bounds resolver.
    #[serde(skip)]
    pub bounds: Option<SceneBounds>,
}

impl Scene {
    /// Acquisition date decoded from the scene id.
    pub fn capture_date(&self) -> Result<NaiveDate, CaptureDateError> {
        parse_capture_date(&self.scene_id)
    }
}

/// Decode the `YYYYDDD` (year + day of year) date found at a fixed offset in
/// a Landsat scene id such as `LC80010622014234LGN00`.
pub fn parse_capture_date(scene_id: &str) -> Result<NaiveDate, CaptureDateError> {
    let raw = scene_id
        .get(CAPTURE_DATE_OFFSET..CAPTURE_DATE_OFFSET + CAPTURE_DATE_LEN)
        .ok_or_else(|| CaptureDateError::TooShort(scene_id.to_string()))?;

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CaptureDateError::NotDigits(raw.to_string()));
    }

    let number = |digits: &str| {
        digits.parse::<u16>().map_err(|source| CaptureDateError::Number {
            raw: raw.to_string(),
            source,
        })
    };
    let year = number(&raw[..4])?;
    let ordinal = number(&raw[4..])?;

    NaiveDate::from_yo_opt(i32::from(year), u32::from(ordinal))
        .ok_or_else(|| CaptureDateError::InvalidDay(raw.to_string()))
}

/// Format a capture date for display.
#[must_use]
pub fn format_capture_date(date: NaiveDate) -> String {
    date.format(CAPTURE_DATE_FORMAT).to_string()
}
