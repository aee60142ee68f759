pub mod disc;
pub mod line_segment;
pub mod polygon;

pub use disc::Disc;
pub use line_segment::LineSegment;
pub use polygon::Polygon;
