//! Narrow-phase routines between particle groups.
//!
//! Every routine appends the contacts it finds to a caller-owned buffer, which
//! is cleared by the caller once the contacts are solved.

pub use self::contact::Contact;
pub use self::contact_circles_circles::{contact_circles_circles, contact_circles_self};
pub use self::contact_circles_polygon::contact_circles_polygon;
pub use self::contact_polygon_polygon::contact_polygon_polygon;
pub use self::contact_polyline_polygon::contact_polyline_polygon;
pub use self::contact_polyline_polyline::contact_polyline_polyline;

mod contact;
mod contact_circles_circles;
mod contact_circles_polygon;
mod contact_polygon_polygon;
mod contact_polyline_polygon;
mod contact_polyline_polyline;
