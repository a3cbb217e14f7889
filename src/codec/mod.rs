//! Compressed wire formats for polylines.
//!
//! Two independent, non-interoperable formats. Both are delta-based and
//! bit-exact: decoding an encoded polyline reproduces the original dm7
//! coordinates without loss.

pub mod delta;
pub mod text;

pub use delta::DeltaEncodedPolyLine;
