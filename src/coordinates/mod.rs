pub mod coordinate_errors;
pub mod coordinate_transformation;
pub mod spherical;

pub use coordinate_errors::CoordinatesError;
pub use spherical::{Coordinates, Direction};
