//! Various unsorted geometrical and logical operators.

pub use self::point_in_poly2d::{point_in_convex_poly2d, point_in_poly2d};
pub use self::point_in_triangle::{corner_direction, is_point_in_triangle, Orientation};
pub use self::segments_intersection::{line_intersection, segments_cross};
pub use self::sorted_pair::SortedPair;
pub use self::vector_ops::{
    angle_between, angle_to_unit_vector, bisector_unit_vector, perpendicular, rotated,
    safe_normalize, signed_polygon_area,
};

mod point_in_poly2d;
mod point_in_triangle;
mod segments_intersection;
mod sorted_pair;
mod vector_ops;
