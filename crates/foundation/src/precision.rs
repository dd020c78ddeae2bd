//! Deterministic float ordering.
//!
//! Ratings and relevance scores are `f64`; every sort over them goes through
//! these helpers so that `-0.0`/`0.0` and NaN never produce unstable output.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Total ordering over canonicalized floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Descending variant used by "highest first" sorts.
pub fn stable_total_cmp_f64_desc(a: f64, b: f64) -> Ordering {
    stable_total_cmp_f64(b, a)
}
