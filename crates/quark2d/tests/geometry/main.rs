#[macro_use]
extern crate approx;

mod circle_circle_contact;
mod polygon_polygon_contact;
mod ray_cast;
