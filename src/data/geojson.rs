use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::conversion,
    layers::{
        base::{LayerTrait, LayerType},
        group::LayerGroup,
        marker::Marker,
        vector::{PathStyle, Polygon, Polyline},
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GeoJSON position: `[lng, lat]` with an optional altitude
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    pub fn point(lat_lng: LatLng) -> Self {
        GeoJsonGeometry::Point {
            coordinates: lat_lng.to_position().to_vec(),
        }
    }

    pub fn line_string(points: &[LatLng]) -> Self {
        GeoJsonGeometry::LineString {
            coordinates: points.iter().map(|p| p.to_position().to_vec()).collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point { .. } => "Point",
            GeoJsonGeometry::LineString { .. } => "LineString",
            GeoJsonGeometry::Polygon { .. } => "Polygon",
            GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
            GeoJsonGeometry::MultiLineString { .. } => "MultiLineString",
            GeoJsonGeometry::MultiPolygon { .. } => "MultiPolygon",
            GeoJsonGeometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Every vertex of the geometry, holes included
    pub fn to_lat_lng_points(&self) -> Result<Vec<LatLng>> {
        let mut points = Vec::new();
        self.collect_points(&mut points)?;
        Ok(points)
    }

    fn collect_points(&self, points: &mut Vec<LatLng>) -> Result<()> {
        match self {
            GeoJsonGeometry::Point { coordinates } => points.push(to_lat_lng(coordinates)?),
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => {
                points.extend(to_lat_lngs(coordinates)?);
            }
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                for ring in coordinates {
                    points.extend(to_lat_lngs(ring)?);
                }
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                for ring in coordinates.iter().flatten() {
                    points.extend(to_lat_lngs(ring)?);
                }
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_points(points)?;
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn to_lat_lng(position: &[f64]) -> Result<LatLng> {
    LatLng::from_position(position).ok_or_else(|| {
        MapError::InvalidCoordinates(format!(
            "position needs at least 2 numbers, got {:?}",
            position
        ))
    })
}

fn to_lat_lngs(positions: &[Position]) -> Result<Vec<LatLng>> {
    positions.iter().map(|p| to_lat_lng(p)).collect()
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, Value>>,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry, properties: serde_json::Map<String, Value>) -> Self {
        Self {
            kind: feature_type(),
            id: None,
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    pub fn bounds(&self) -> Result<Option<LatLngBounds>> {
        match &self.geometry {
            Some(geometry) => conversion::geometry_bounds(geometry),
            None => Ok(None),
        }
    }
}

/// Root object of every feature payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    pub features: Vec<GeoJsonFeature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            kind: collection_type(),
            features,
        }
    }

    pub fn from_str(geojson: &str) -> Result<Self> {
        serde_json::from_str(geojson)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding box of every feature; `None` when nothing has a geometry
    pub fn bounds(&self) -> Result<Option<LatLngBounds>> {
        conversion::collection_bounds(self)
    }
}

type StyleFn<'a> = Box<dyn Fn(&GeoJsonFeature) -> PathStyle + 'a>;
type FeatureHook<'a> = Box<dyn Fn(&GeoJsonFeature, &mut dyn LayerTrait) + 'a>;

/// Turns GeoJSON features into map layers
///
/// Points become [`Marker`]s, lines [`Polyline`]s, polygons [`Polygon`]s,
/// and multi-part geometries nested groups. Features without a geometry are
/// skipped. Each built feature layer is handed to the `on_each_feature` hook,
/// which is where popups get bound.
pub struct GeoJsonLayer<'a> {
    style: PathStyle,
    style_function: Option<StyleFn<'a>>,
    on_each_feature: Option<FeatureHook<'a>>,
}

impl Default for GeoJsonLayer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GeoJsonLayer<'a> {
    pub fn new() -> Self {
        Self {
            style: PathStyle::default(),
            style_function: None,
            on_each_feature: None,
        }
    }

    /// Sets the default style for all vector features
    pub fn set_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets a function to style features based on their properties
    pub fn set_style_function<F>(mut self, style_fn: F) -> Self
    where
        F: Fn(&GeoJsonFeature) -> PathStyle + 'a,
    {
        self.style_function = Some(Box::new(style_fn));
        self
    }

    pub fn on_each_feature<F>(mut self, hook: F) -> Self
    where
        F: Fn(&GeoJsonFeature, &mut dyn LayerTrait) + 'a,
    {
        self.on_each_feature = Some(Box::new(hook));
        self
    }

    pub fn feature_style(&self, feature: &GeoJsonFeature) -> PathStyle {
        match &self.style_function {
            Some(style_fn) => style_fn(feature),
            None => self.style.clone(),
        }
    }

    /// Builds a whole collection into one group, child ids `{id}/{index}`
    pub fn build(&self, id: &str, name: &str, data: &FeatureCollection) -> Result<LayerGroup> {
        let mut group = LayerGroup::with_type(id.to_string(), name.to_string(), LayerType::GeoJson);
        for (index, feature) in data.features.iter().enumerate() {
            if let Some(layer) = self.build_feature(&format!("{}/{}", id, index), feature)? {
                group.add_layer(layer);
            }
        }
        Ok(group)
    }

    /// Builds a single feature, `None` when it has no geometry
    pub fn build_feature(
        &self,
        id: &str,
        feature: &GeoJsonFeature,
    ) -> Result<Option<Box<dyn LayerTrait>>> {
        let geometry = match &feature.geometry {
            Some(geometry) => geometry,
            None => {
                log::debug!("feature {} has no geometry, skipped", id);
                return Ok(None);
            }
        };

        let style = self.feature_style(feature);
        let mut layer = geometry_to_layer(id, geometry, &style)?;
        if let Some(hook) = &self.on_each_feature {
            hook(feature, layer.as_mut());
        }
        Ok(Some(layer))
    }
}

/// Converts one geometry into a layer drawn with `style`
pub fn geometry_to_layer(
    id: &str,
    geometry: &GeoJsonGeometry,
    style: &PathStyle,
) -> Result<Box<dyn LayerTrait>> {
    let layer: Box<dyn LayerTrait> = match geometry {
        GeoJsonGeometry::Point { coordinates } => {
            Box::new(Marker::new(id.to_string(), to_lat_lng(coordinates)?))
        }
        GeoJsonGeometry::LineString { coordinates } => Box::new(
            Polyline::new(id.to_string(), to_lat_lngs(coordinates)?).with_style(style.clone()),
        ),
        GeoJsonGeometry::MultiLineString { coordinates } => {
            let lines = coordinates
                .iter()
                .map(|line| to_lat_lngs(line))
                .collect::<Result<Vec<_>>>()?;
            Box::new(Polyline::multi(id.to_string(), lines).with_style(style.clone()))
        }
        GeoJsonGeometry::Polygon { coordinates } => Box::new(polygon(id, coordinates, style)?),
        GeoJsonGeometry::MultiPoint { coordinates } => {
            let mut group = feature_group(id);
            for (index, position) in coordinates.iter().enumerate() {
                group.add_layer(Box::new(Marker::new(
                    format!("{}/{}", id, index),
                    to_lat_lng(position)?,
                )));
            }
            Box::new(group)
        }
        GeoJsonGeometry::MultiPolygon { coordinates } => {
            let mut group = feature_group(id);
            for (index, rings) in coordinates.iter().enumerate() {
                group.add_layer(Box::new(polygon(&format!("{}/{}", id, index), rings, style)?));
            }
            Box::new(group)
        }
        GeoJsonGeometry::GeometryCollection { geometries } => {
            let mut group = feature_group(id);
            for (index, child) in geometries.iter().enumerate() {
                group.add_layer(geometry_to_layer(&format!("{}/{}", id, index), child, style)?);
            }
            Box::new(group)
        }
    };
    Ok(layer)
}

fn polygon(id: &str, rings: &[Vec<Position>], style: &PathStyle) -> Result<Polygon> {
    let rings = rings
        .iter()
        .map(|ring| to_lat_lngs(ring))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(id.to_string(), rings).with_style(style.clone().filled()))
}

fn feature_group(id: &str) -> LayerGroup {
    LayerGroup::with_type(id.to_string(), "Feature".to_string(), LayerType::GeoJson)
}
