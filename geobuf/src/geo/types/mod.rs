// Geometric primitives used by `Geometry`: coordinates, points, lines, rings, polygons and
// their multi-geometry counterparts. They share the `GeometryTrait`, `SingleGeometryTrait` and
// `CompositeGeometryTrait` traits.

mod coordinates;
mod linestring;
mod macros;
mod multi_linestring;
mod multi_point;
mod multi_polygon;
mod point;
mod polygon;
mod ring;
mod traits;

pub use coordinates::*;
pub use linestring::*;
pub use multi_linestring::*;
pub use multi_point::*;
pub use multi_polygon::*;
pub use point::*;
pub use polygon::*;
pub use ring::*;
pub use traits::*;
