//! GeoJSON geometries as `geo` types
//!
//! Bounding boxes go through [`geo::BoundingRect`] so every geometry kind,
//! nested collections included, is measured the same way.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::geojson::{to_lat_lng, FeatureCollection, GeoJsonGeometry, Position},
    Result,
};
use geo::BoundingRect;
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Polygon, Rect,
};

pub fn lat_lng_to_coord(lat_lng: &LatLng) -> Coord<f64> {
    Coord {
        x: lat_lng.lng,
        y: lat_lng.lat,
    }
}

pub fn coord_to_lat_lng(coord: &Coord<f64>) -> LatLng {
    LatLng::new(coord.y, coord.x)
}

fn position_to_coord(position: &[f64]) -> Result<Coord<f64>> {
    to_lat_lng(position).map(|p| lat_lng_to_coord(&p))
}

fn line_string(positions: &[Position]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(|p| position_to_coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let mut rings = rings
        .iter()
        .map(|ring| line_string(ring))
        .collect::<Result<Vec<_>>>()?;
    let exterior = if rings.is_empty() {
        LineString::new(Vec::new())
    } else {
        rings.remove(0)
    };
    Ok(Polygon::new(exterior, rings))
}

impl TryFrom<&GeoJsonGeometry> for Geometry<f64> {
    type Error = crate::MapError;

    fn try_from(geometry: &GeoJsonGeometry) -> Result<Self> {
        let converted = match geometry {
            GeoJsonGeometry::Point { coordinates } => {
                Geometry::Point(position_to_coord(coordinates)?.into())
            }
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(line_string(coordinates)?)
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)?),
            GeoJsonGeometry::MultiPoint { coordinates } => {
                let points = coordinates
                    .iter()
                    .map(|p| position_to_coord(p).map(Into::into))
                    .collect::<Result<Vec<_>>>()?;
                Geometry::MultiPoint(MultiPoint::new(points))
            }
            GeoJsonGeometry::MultiLineString { coordinates } => {
                let lines = coordinates
                    .iter()
                    .map(|line| line_string(line))
                    .collect::<Result<Vec<_>>>()?;
                Geometry::MultiLineString(MultiLineString::new(lines))
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                let polygons = coordinates
                    .iter()
                    .map(|rings| polygon(rings))
                    .collect::<Result<Vec<_>>>()?;
                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                let children = geometries
                    .iter()
                    .map(Geometry::<f64>::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Geometry::GeometryCollection(GeometryCollection::new_from(children))
            }
        };
        Ok(converted)
    }
}

pub fn rect_to_bounds(rect: &Rect<f64>) -> LatLngBounds {
    LatLngBounds::new(coord_to_lat_lng(&rect.min()), coord_to_lat_lng(&rect.max()))
}

/// Bounding box of one geometry; `None` for empty geometries
pub fn geometry_bounds(geometry: &GeoJsonGeometry) -> Result<Option<LatLngBounds>> {
    let geometry = Geometry::<f64>::try_from(geometry)?;
    Ok(geometry.bounding_rect().map(|rect| rect_to_bounds(&rect)))
}

/// Bounding box of every feature geometry in the collection
pub fn collection_bounds(collection: &FeatureCollection) -> Result<Option<LatLngBounds>> {
    let mut bounds: Option<LatLngBounds> = None;
    for feature in &collection.features {
        if let Some(feature_bounds) = feature.bounds()? {
            bounds = Some(match bounds {
                Some(b) => b.union(&feature_bounds),
                None => feature_bounds,
            });
        }
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    #[test]
    fn test_point_bounds_are_degenerate() {
        let bounds = geometry_bounds(&GeoJsonGeometry::Point {
            coordinates: vec![12.5, 41.9],
        })
        .unwrap()
        .unwrap();
        assert_eq!(bounds.south_west, LatLng::new(41.9, 12.5));
        assert_eq!(bounds.north_east, LatLng::new(41.9, 12.5));
    }

    #[test]
    fn test_nested_collection_bounds() {
        let geometry = GeoJsonGeometry::GeometryCollection {
            geometries: vec![
                GeoJsonGeometry::LineString {
                    coordinates: vec![vec![10.0, 40.0], vec![11.0, 41.0]],
                },
                GeoJsonGeometry::MultiPolygon {
                    coordinates: vec![vec![vec![
                        vec![9.0, 39.0],
                        vec![9.5, 39.0],
                        vec![9.5, 39.5],
                        vec![9.0, 39.0],
                    ]]],
                },
            ],
        };

        let bounds = geometry_bounds(&geometry).unwrap().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(39.0, 9.0));
        assert_eq!(bounds.north_east, LatLng::new(41.0, 11.0));
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        let geometry = GeoJsonGeometry::MultiPoint {
            coordinates: Vec::new(),
        };
        assert_eq!(geometry_bounds(&geometry).unwrap(), None);
    }

    #[test]
    fn test_invalid_position_propagates() {
        let geometry = GeoJsonGeometry::Point {
            coordinates: vec![1.0],
        };
        assert!(matches!(
            geometry_bounds(&geometry),
            Err(MapError::InvalidCoordinates(_))
        ));
    }
}
