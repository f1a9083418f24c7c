//! Geometry transcoding.
//!
//! A geometry is stored as a type tag, a flat delta-coded coordinate list (`coords`) and,
//! for geometries made of several sequences, a list of counts (`lengths`):
//!
//! | geometry          | `lengths`                                                        |
//! |-------------------|------------------------------------------------------------------|
//! | `MultiLineString` | points per line                                                  |
//! | `Polygon`         | stored points per ring                                           |
//! | `MultiPolygon`    | polygon count, then per polygon its ring count and ring sizes    |
//!
//! `lengths` is left out when it would describe a single non-empty line or ring. Ring sizes
//! count the stored points; the closing point is never stored. Collections keep their
//! children in `geometries` and carry no coordinates.
//!
//! Field layout of the `Geometry` message:
//!  * field 1: `type` (enum)
//!  * field 2: `lengths` (packed uint32)
//!  * field 3: `coords` (packed sint64)
//!  * field 4: repeated `geometries` (embedded message)

use super::{
	EncodingConfig, GeobufError, MAX_GEOMETRY_DEPTH,
	coords::{decode_sequence, encode_sequence, quantize},
	geometry_type::GeomType,
};
use crate::geo::*;
use anyhow::{Context, Result, ensure};
use byteorder::LE;
use geobuf_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};
use log::trace;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeobufGeometry {
	pub geom_type: GeomType,
	pub lengths: Vec<u32>,
	pub coords: Vec<i64>,
	pub geometries: Vec<GeobufGeometry>,
}

impl GeobufGeometry {
	/// Decodes a `Geometry` message found at nesting level `depth`.
	pub fn read(reader: &mut dyn ValueReader<'_, LE>, depth: usize) -> Result<GeobufGeometry> {
		check_depth(depth)?;

		let mut geom_type = None;
		let mut geometry = GeobufGeometry::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => {
					geom_type = Some(
						GeomType::try_from(reader.read_varint().context("Failed to read geometry type")?)
							.context("Failed to parse geometry type")?,
					);
				}
				(2, 2) => geometry
					.lengths
					.extend(reader.read_pbf_packed_uint32().context("Failed to read lengths")?),
				(2, 0) => {
					let length = reader.read_varint().context("Failed to read length")?;
					geometry.lengths.push(
						u32::try_from(length).map_err(|_| GeobufError::malformed(format!("length {length} exceeds 32 bits")))?,
					);
				}
				(3, 2) => geometry
					.coords
					.extend(reader.read_pbf_packed_sint64().context("Failed to read coordinates")?),
				(3, 0) => geometry
					.coords
					.push(reader.read_svarint().context("Failed to read coordinate")?),
				(4, 2) => {
					check_depth(depth + 1)?;
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					geometry.geometries.push(
						GeobufGeometry::read(sub_reader.as_mut(), depth + 1).context("Failed to read child geometry")?,
					);
				}
				(f, w) => {
					trace!("skipping geometry field {f} with wire type {w}");
					reader
						.skip_pbf_field(w)
						.context("Failed to skip unknown geometry field")?;
				}
			}
		}

		geometry.geom_type =
			geom_type.ok_or_else(|| anyhow::Error::from(GeobufError::malformed("geometry without type")))?;
		Ok(geometry)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer
			.write_pbf_key(1, 0)
			.context("Failed to write PBF key for geometry type")?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.lengths.is_empty() {
			writer
				.write_pbf_key(2, 2)
				.context("Failed to write PBF key for lengths")?;
			writer
				.write_pbf_packed_uint32(&self.lengths)
				.context("Failed to write lengths")?;
		}

		if !self.coords.is_empty() {
			writer
				.write_pbf_key(3, 2)
				.context("Failed to write PBF key for coordinates")?;
			writer
				.write_pbf_packed_sint64(&self.coords)
				.context("Failed to write coordinates")?;
		}

		for child in &self.geometries {
			writer
				.write_pbf_key(4, 2)
				.context("Failed to write PBF key for child geometry")?;
			writer
				.write_pbf_blob(&child.to_blob().context("Failed to encode child geometry")?)
				.context("Failed to write child geometry")?;
		}

		Ok(writer.into_blob())
	}

	pub fn from_geometry(geometry: &Geometry, config: &EncodingConfig) -> Result<GeobufGeometry> {
		Self::from_geometry_at(geometry, config, 0)
	}

	fn from_geometry_at(geometry: &Geometry, config: &EncodingConfig, depth: usize) -> Result<GeobufGeometry> {
		check_depth(depth)?;

		let mut result = GeobufGeometry {
			geom_type: GeomType::from(geometry),
			..GeobufGeometry::default()
		};

		match geometry {
			Geometry::Point(point) => result.coords = quantize(point.as_coord(), config)?,
			Geometry::MultiPoint(points) => {
				let coords: Vec<Coordinates> = points.iter_coords().copied().collect();
				result.coords = encode_sequence(&coords, false, config)?;
			}
			Geometry::LineString(line) => result.coords = encode_sequence(&line.0, false, config)?,
			Geometry::MultiLineString(lines) => {
				for line in &lines.0 {
					result.add_sequence(&line.0, false, config)?;
				}
				if lines.0.len() == 1 && !lines.0[0].0.is_empty() {
					result.lengths.clear();
				}
			}
			Geometry::Polygon(polygon) => {
				result.add_polygon(polygon, config)?;
				if is_single_ring(polygon) {
					result.lengths.clear();
				}
			}
			Geometry::MultiPolygon(polygons) => {
				result.lengths.push(count(polygons.0.len())?);
				for polygon in &polygons.0 {
					result.lengths.push(count(polygon.0.len())?);
					result.add_polygon(polygon, config)?;
				}
				if polygons.0.len() == 1 && is_single_ring(&polygons.0[0]) {
					result.lengths.clear();
				}
			}
			Geometry::GeometryCollection(children) => {
				result.geometries = children
					.iter()
					.map(|child| Self::from_geometry_at(child, config, depth + 1))
					.collect::<Result<Vec<_>>>()?;
			}
		}

		Ok(result)
	}

	fn add_sequence(&mut self, points: &[Coordinates], closed: bool, config: &EncodingConfig) -> Result<()> {
		let stored = if closed { points.len().saturating_sub(1) } else { points.len() };
		self.lengths.push(count(stored)?);
		self.coords.extend(encode_sequence(points, closed, config)?);
		Ok(())
	}

	fn add_polygon(&mut self, polygon: &PolygonGeometry, config: &EncodingConfig) -> Result<()> {
		for ring in &polygon.0 {
			ensure!(
				ring.is_closed(),
				GeobufError::unsupported(format!("polygon ring {ring:?} is not closed"))
			);
			self.add_sequence(&ring.0, true, config)?;
		}
		Ok(())
	}

	pub fn to_geometry(&self, config: &EncodingConfig) -> Result<Geometry> {
		self.to_geometry_at(config, 0)
	}

	fn to_geometry_at(&self, config: &EncodingConfig, depth: usize) -> Result<Geometry> {
		check_depth(depth)?;

		let mut cursor = CoordCursor::new(&self.coords, config);

		let geometry = match self.geom_type {
			GeomType::Point => {
				let mut points = cursor.take_rest(false)?;
				ensure!(
					points.len() == 1,
					GeobufError::malformed(format!("point with {} coordinates", points.len()))
				);
				Geometry::Point(PointGeometry(points.remove(0)))
			}
			GeomType::MultiPoint => Geometry::MultiPoint(MultiPointGeometry(
				cursor.take_rest(false)?.into_iter().map(PointGeometry).collect(),
			)),
			GeomType::LineString => Geometry::LineString(LineStringGeometry(cursor.take_rest(false)?)),
			GeomType::MultiLineString => Geometry::MultiLineString(MultiLineStringGeometry(
				cursor
					.take_groups(&self.lengths, false)?
					.into_iter()
					.map(LineStringGeometry)
					.collect(),
			)),
			GeomType::Polygon => Geometry::Polygon(PolygonGeometry(
				cursor
					.take_groups(&self.lengths, true)?
					.into_iter()
					.map(RingGeometry)
					.collect(),
			)),
			GeomType::MultiPolygon => Geometry::MultiPolygon(cursor.take_polygons(&self.lengths)?),
			GeomType::GeometryCollection => Geometry::GeometryCollection(
				self
					.geometries
					.iter()
					.map(|child| child.to_geometry_at(config, depth + 1))
					.collect::<Result<Vec<_>>>()?,
			),
		};

		cursor.finish()?;
		Ok(geometry)
	}
}

/// Walks a flat coordinate list, handing out one sequence at a time.
struct CoordCursor<'a> {
	coords: &'a [i64],
	position: usize,
	config: &'a EncodingConfig,
}

impl<'a> CoordCursor<'a> {
	fn new(coords: &'a [i64], config: &'a EncodingConfig) -> Self {
		CoordCursor {
			coords,
			position: 0,
			config,
		}
	}

	fn take(&mut self, points: u32, closed: bool) -> Result<Vec<Coordinates>> {
		let end = (points as usize)
			.checked_mul(self.config.dimension())
			.and_then(|n| n.checked_add(self.position))
			.filter(|&end| end <= self.coords.len())
			.ok_or_else(|| {
				GeobufError::malformed(format!(
					"lengths ask for {points} more points but only {} coordinate values are left",
					self.coords.len() - self.position
				))
			})?;
		let points = decode_sequence(&self.coords[self.position..end], closed, self.config)?;
		self.position = end;
		Ok(points)
	}

	fn take_rest(&mut self, closed: bool) -> Result<Vec<Coordinates>> {
		let points = decode_sequence(&self.coords[self.position..], closed, self.config)?;
		self.position = self.coords.len();
		Ok(points)
	}

	/// Without `lengths`, all coordinates form one group (or none if there are none).
	fn take_groups(&mut self, lengths: &[u32], closed: bool) -> Result<Vec<Vec<Coordinates>>> {
		if lengths.is_empty() {
			if self.coords.is_empty() {
				return Ok(Vec::new());
			}
			return Ok(vec![self.take_rest(closed)?]);
		}
		lengths.iter().map(|&length| self.take(length, closed)).collect()
	}

	fn take_polygons(&mut self, lengths: &[u32]) -> Result<MultiPolygonGeometry> {
		if lengths.is_empty() {
			if self.coords.is_empty() {
				return Ok(MultiPolygonGeometry(Vec::new()));
			}
			let ring = RingGeometry(self.take_rest(true)?);
			return Ok(MultiPolygonGeometry(vec![PolygonGeometry(vec![ring])]));
		}

		let mut lengths = lengths.iter().copied();
		let mut next = |what: &str| {
			lengths
				.next()
				.ok_or_else(|| anyhow::Error::from(GeobufError::malformed(format!("lengths end before {what}"))))
		};

		let polygon_count = next("the polygon count")?;
		let mut polygons = Vec::new();
		for _ in 0..polygon_count {
			let ring_count = next("a ring count")?;
			let mut rings = Vec::new();
			for _ in 0..ring_count {
				let points = next("a ring size")?;
				rings.push(RingGeometry(self.take(points, true)?));
			}
			polygons.push(PolygonGeometry(rings));
		}

		ensure!(
			lengths.next().is_none(),
			GeobufError::malformed("lengths continue after the last polygon")
		);
		Ok(MultiPolygonGeometry(polygons))
	}

	fn finish(&self) -> Result<()> {
		ensure!(
			self.position == self.coords.len(),
			GeobufError::malformed(format!(
				"{} coordinate values are not covered by lengths",
				self.coords.len() - self.position
			))
		);
		Ok(())
	}
}

fn check_depth(depth: usize) -> Result<()> {
	ensure!(depth < MAX_GEOMETRY_DEPTH, GeobufError::DepthExceeded(MAX_GEOMETRY_DEPTH));
	Ok(())
}

fn count(n: usize) -> Result<u32> {
	u32::try_from(n).map_err(|_| GeobufError::unsupported(format!("{n} elements do not fit a 32-bit count")).into())
}

/// One non-empty ring: the only shape whose `lengths` can be left out.
fn is_single_ring(polygon: &PolygonGeometry) -> bool {
	polygon.0.len() == 1 && !polygon.0[0].0.is_empty()
}
