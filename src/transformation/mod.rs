//! Decomposition of mesh polygons into convex pieces.

pub use self::convex_decomposition::{convex_decomposition, is_convex_polygon};
pub use self::ear_clipping::triangulate_ear_clipping;
pub use self::hertel_mehlhorn::hertel_mehlhorn_idx;

mod convex_decomposition;
mod ear_clipping;
mod hertel_mehlhorn;
