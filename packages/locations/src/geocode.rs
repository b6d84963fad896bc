//! Offline fallback geocoder for Chicago ticket locations.
//!
//! Ticket locations are free text ("100 N STATE ST", "WABASH & ADAMS").
//! Without a real geocoding service we anchor known downtown streets to a
//! fixed point and scatter everything else around the city center. The
//! scatter is derived from an MD5 digest of the normalized text, so the
//! same location always lands on the same coordinates.

use std::collections::BTreeMap;

/// Chicago city center, used for blank input and unknown streets.
pub const CITY_CENTER: (f64, f64) = (41.8781, -87.6298);

/// Maximum offset in degrees applied around a known street anchor.
pub const STREET_SCATTER_DEGREES: f64 = 0.005;

/// Maximum offset in degrees applied around the city center.
pub const CITY_SCATTER_DEGREES: f64 = 0.1;

/// Street-name anchors, checked in order; the first substring match wins.
const STREET_ANCHORS: &[(&str, (f64, f64))] = &[
    ("MICHIGAN", (41.8755, -87.6244)),
    ("STATE", (41.8819, -87.6278)),
    ("LASALLE", (41.8755, -87.6321)),
    ("CLARK", (41.8822, -87.6309)),
    ("WABASH", (41.8755, -87.6256)),
    ("RUSH", (41.8904, -87.6248)),
    ("DEARBORN", (41.8789, -87.6298)),
    ("FRANKLIN", (41.8833, -87.6356)),
    ("WELLS", (41.8822, -87.6340)),
    ("ADAMS", (41.8794, -87.6278)),
];

/// Memoizing text-to-coordinates resolver.
#[derive(Debug, Default)]
pub struct Geocoder {
    cache: BTreeMap<String, (f64, f64)>,
}

impl Geocoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a location string to `(latitude, longitude)`.
    ///
    /// Blank input resolves to [`CITY_CENTER`] and is not cached.
    pub fn geocode(&mut self, location: &str) -> (f64, f64) {
        let key = location.trim().to_uppercase();
        if key.is_empty() {
            return CITY_CENTER;
        }

        if let Some(&coords) = self.cache.get(&key) {
            return coords;
        }

        let coords = resolve(&key);
        log::trace!("Geocoded {key:?} to ({}, {})", coords.0, coords.1);
        self.cache.insert(key, coords);
        coords
    }

    /// Number of distinct locations resolved so far.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn resolve(key: &str) -> (f64, f64) {
    let (anchor, scale) = STREET_ANCHORS
        .iter()
        .find(|(street, _)| key.contains(street))
        .map_or((CITY_CENTER, CITY_SCATTER_DEGREES), |(_, anchor)| {
            (*anchor, STREET_SCATTER_DEGREES)
        });

    let (lat_offset, lng_offset) = deterministic_offsets(key, scale);
    (anchor.0 + lat_offset, anchor.1 + lng_offset)
}

/// Two offsets in `[-scale, scale]` derived from the key's MD5 digest.
fn deterministic_offsets(key: &str, scale: f64) -> (f64, f64) {
    let md5::Digest(bytes) = md5::compute(key.as_bytes());
    let (high, low) = bytes.split_at(8);
    (
        spread(u64_from(high), scale),
        spread(u64_from(low), scale),
    )
}

fn u64_from(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}

#[allow(clippy::cast_precision_loss)]
fn spread(value: u64, scale: f64) -> f64 {
    let unit = value as f64 / u64::MAX as f64;
    scale.mul_add(2.0 * unit, -scale)
}
