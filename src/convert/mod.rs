//! Conversions between integer, float and half-float pixel representations.

/// Row packing and unpacking for every source and output layout.
pub mod adapter;
/// IEEE 754 binary16 conversion with finite-overflow clamping.
pub mod half;
