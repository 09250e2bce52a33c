pub mod alignment;
pub mod analysis;
pub mod solar;
pub mod timing;

pub use alignment::*;
pub use analysis::proximity::{NearestCity, PathProximity, closest_point_on_polyline, nearest_city};
pub use solar::*;
pub use timing::*;
