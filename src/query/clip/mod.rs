//! Clipping of incident features against reference features.

pub use self::clip_segment_segment::clip_segment_segment;

mod clip_segment_segment;
