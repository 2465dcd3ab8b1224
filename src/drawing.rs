//! Geolocated DXF drawings and the page payloads built from them
//!
//! A [`Drawing`] is placed on the map by its insertion point and carries
//! its DXF layers, each holding entities already transformed to WGS84.
//! [`PayloadBuilder`] turns a list of drawings into the `layer_data`,
//! `marker_data` and `line_data` blocks the render cycle reads.

use crate::{
    core::{config::PageIds, geo::LatLng},
    data::geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry},
    page::StaticPage,
    payload::POPUP_CONTENT,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JsonMap, Value};
use std::collections::BTreeSet;

/// Default RGB of every AutoCAD Color Index entry; 0 (BYBLOCK) is black
const ACI_COLORS: [u32; 256] = [
    0x000000, 0xFF0000, 0xFFFF00, 0x00FF00, 0x00FFFF, 0x0000FF, 0xFF00FF, 0xFFFFFF,
    0x414141, 0x808080, 0xFF0000, 0xFFAAAA, 0xBD0000, 0xBD7E7E, 0x810000, 0x815656,
    0x680000, 0x683434, 0x4F0000, 0x4F2727, 0xFF3F00, 0xFFBFAA, 0xBD2E00, 0xBD8D7E,
    0x811F00, 0x816056, 0x681900, 0x684E34, 0x4F1300, 0x4F3B27, 0xFF7F00, 0xFFD4AA,
    0xBD5E00, 0xBD9D7E, 0x814000, 0x816B56, 0x683400, 0x685634, 0x4F2700, 0x4F4227,
    0xFFBF00, 0xFFEAAA, 0xBD8D00, 0xBDAD7E, 0x816000, 0x817656, 0x684E00, 0x685F34,
    0x4F3B00, 0x4F4927, 0xFFFF00, 0xFFFFAA, 0xBDBD00, 0xBDBD7E, 0x818100, 0x818156,
    0x686800, 0x686834, 0x4F4F00, 0x4F4F27, 0xBFFF00, 0xEAFFAA, 0x8DBD00, 0xADBD7E,
    0x608100, 0x768156, 0x4E6800, 0x5F6834, 0x3B4F00, 0x494F27, 0x7FFF00, 0xD4FFAA,
    0x5EBD00, 0x9DBD7E, 0x408100, 0x6B8156, 0x346800, 0x566834, 0x274F00, 0x424F27,
    0x3FFF00, 0xBFFFAA, 0x2EBD00, 0x8DBD7E, 0x1F8100, 0x608156, 0x196800, 0x4E6834,
    0x134F00, 0x3B4F27, 0x00FF00, 0xAAFFAA, 0x00BD00, 0x7EBD7E, 0x008100, 0x568156,
    0x006800, 0x346834, 0x004F00, 0x274F27, 0x00FF3F, 0xAAFFBF, 0x00BD2E, 0x7EBD8D,
    0x00811F, 0x568160, 0x006819, 0x34684E, 0x004F13, 0x274F3B, 0x00FF7F, 0xAAFFD4,
    0x00BD5E, 0x7EBD9D, 0x008140, 0x56816B, 0x006834, 0x346856, 0x004F27, 0x274F42,
    0x00FFBF, 0xAAFFEA, 0x00BD8D, 0x7EBDAD, 0x008160, 0x568176, 0x00684E, 0x34685F,
    0x004F3B, 0x274F49, 0x00FFFF, 0xAAFFFF, 0x00BDBD, 0x7EBDBD, 0x008181, 0x568181,
    0x006868, 0x346868, 0x004F4F, 0x274F4F, 0x00BFFF, 0xAAEAFF, 0x008DBD, 0x7EADBD,
    0x006081, 0x567681, 0x004E68, 0x345F68, 0x003B4F, 0x27494F, 0x007FFF, 0xAAD4FF,
    0x005EBD, 0x7E9DBD, 0x004081, 0x566B81, 0x003468, 0x345668, 0x00274F, 0x27424F,
    0x003FFF, 0xAABFFF, 0x002EBD, 0x7E8DBD, 0x001F81, 0x566081, 0x001968, 0x344E68,
    0x00134F, 0x273B4F, 0x0000FF, 0xAAAAFF, 0x0000BD, 0x7E7EBD, 0x000081, 0x565681,
    0x000068, 0x343468, 0x00004F, 0x27274F, 0x3F00FF, 0xBFAAFF, 0x2E00BD, 0x8D7EBD,
    0x1F0081, 0x605681, 0x190068, 0x4E3468, 0x13004F, 0x3B274F, 0x7F00FF, 0xD4AAFF,
    0x5E00BD, 0x9D7EBD, 0x400081, 0x6B5681, 0x340068, 0x563468, 0x27004F, 0x42274F,
    0xBF00FF, 0xEAAAFF, 0x8D00BD, 0xAD7EBD, 0x600081, 0x765681, 0x4E0068, 0x5F3468,
    0x3B004F, 0x49274F, 0xFF00FF, 0xFFAAFF, 0xBD00BD, 0xBD7EBD, 0x810081, 0x815681,
    0x680068, 0x683468, 0x4F004F, 0x4F274F, 0xFF00BF, 0xFFAAEA, 0xBD008D, 0xBD7EAD,
    0x810060, 0x815676, 0x68004E, 0x68345F, 0x4F003B, 0x4F2749, 0xFF007F, 0xFFAAD4,
    0xBD005E, 0xBD7E9D, 0x810040, 0x81566B, 0x680034, 0x683456, 0x4F0027, 0x4F2742,
    0xFF003F, 0xFFAABF, 0xBD002E, 0xBD7E8D, 0x81001F, 0x815660, 0x680019, 0x68344E,
    0x4F0013, 0x4F273B, 0x333333, 0x505050, 0x696969, 0x828282, 0xBEBEBE, 0xFFFFFF,
];

/// A DXF color: palette index or 24 bit true color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DxfColor {
    Aci(u8),
    TrueColor(u8, u8, u8),
}

/// CSS hex of a DXF color
///
/// True colors come out lowercase (`#1a2b3c`), palette colors uppercase
/// (`#FF0000`).
pub fn cad_to_hex(color: DxfColor) -> String {
    match color {
        DxfColor::TrueColor(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        DxfColor::Aci(index) => format!("#{:06X}", ACI_COLORS[index as usize]),
    }
}

/// `#RRGGBB` as accepted by the layer color picker
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// One field error of a location form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Range check of a latitude/longitude pair as entered in the form
pub fn validate_location(lat: f64, long: f64) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !(-90.0..=90.0).contains(&lat) {
        errors.push(FieldError {
            field: "lat",
            message: "Invalid value",
        });
    }
    if !(-180.0..=180.0).contains(&long) {
        errors.push(FieldError {
            field: "long",
            message: "Invalid value",
        });
    }
    errors
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Text or attribute data of the DXF entity
    #[serde(default)]
    pub label: Option<Value>,
    pub geometry: GeoJsonGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingLayer {
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    /// Continuous linetype; dashed otherwise
    #[serde(default = "default_linetype")]
    pub linetype: bool,
    #[serde(default)]
    pub is_block: bool,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

fn default_linetype() -> bool {
    true
}

impl DrawingLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: "#FFFFFF".to_string(),
            linetype: true,
            is_block: false,
            entities: Vec::new(),
        }
    }

    pub fn set_color(&mut self, color: &str) -> Result<()> {
        if !is_hex_color(color) {
            return Err(MapError::Color(format!("`{}` is not a #RRGGBB color", color)));
        }
        self.color = color.to_string();
        Ok(())
    }

    pub fn set_dxf_color(&mut self, color: DxfColor) {
        self.color = cad_to_hex(color);
    }

    fn popup_content(&self, entity: &Entity) -> Value {
        let mut content = format!("<p>{}</p>", escape_html(&self.name));
        if let Some(Value::String(label)) = &entity.label {
            content.push_str(&format!("<p>{}</p>", escape_html(label)));
        }
        json!({
            "content": content,
            "layer": self.name,
            "color": self.color,
            "linetype": self.linetype,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: u64,
    pub title: String,
    /// Insertion point of the design origin, `None` until located
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub design_x: f64,
    #[serde(default)]
    pub design_y: f64,
    /// Rotation of the drawing in degrees
    #[serde(default)]
    pub rotation: f64,
    /// CRS of the DXF file; without one the line work cannot be placed
    #[serde(default)]
    pub epsg: Option<u32>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub layers: Vec<DrawingLayer>,
}

impl Drawing {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            location: None,
            design_x: 0.0,
            design_y: 0.0,
            rotation: 0.0,
            epsg: None,
            parent: None,
            layers: Vec::new(),
        }
    }

    /// Places the drawing, rejecting out of range coordinates per field
    pub fn set_location(&mut self, lat: f64, long: f64) -> Result<()> {
        let errors = validate_location(lat, long);
        if !errors.is_empty() {
            let fields: Vec<String> = errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(MapError::InvalidCoordinates(fields.join(", ")));
        }
        self.location = Some(LatLng::new(lat, long));
        Ok(())
    }

    pub fn is_geolocated(&self) -> bool {
        self.location.is_some() && self.epsg.is_some()
    }

    /// The map marker of the drawing; clicking its title opens the detail
    pub fn marker_feature(&self, detail_path: &str) -> Option<GeoJsonFeature> {
        let location = self.location?;
        let content = format!(
            "<a href=\"#\" onclick=\"openDrawing('{}')\"><strong>{}</strong></a>",
            escape_html(detail_path),
            escape_html(&self.title)
        );

        let mut properties = JsonMap::new();
        properties.insert(POPUP_CONTENT.to_string(), json!({ "content": content }));
        let mut feature = GeoJsonFeature::new(GeoJsonGeometry::point(location), properties);
        feature.id = Some(Value::from(self.id));
        Some(feature)
    }

    /// One line feature per entity, tagged with its layer
    pub fn line_features(&self) -> Vec<GeoJsonFeature> {
        self.layers
            .iter()
            .flat_map(|layer| {
                layer.entities.iter().map(move |entity| {
                    let mut properties = JsonMap::new();
                    properties.insert(POPUP_CONTENT.to_string(), layer.popup_content(entity));
                    GeoJsonFeature::new(entity.geometry.clone(), properties)
                })
            })
            .collect()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// The three feature payloads of a drawing list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawingPayloads {
    pub layer_data: Vec<String>,
    pub marker_data: FeatureCollection,
    pub line_data: FeatureCollection,
}

impl DrawingPayloads {
    /// Embeds the payloads into `page` under the ids the render cycle reads
    pub fn write_to(&self, page: &mut StaticPage, ids: &PageIds) -> Result<()> {
        page.set_json(&ids.layer_data, &self.layer_data)?;
        page.set_json(&ids.marker_data, &self.marker_data)?;
        page.set_json(&ids.line_data, &self.line_data)?;
        Ok(())
    }
}

/// Builds the list page payloads from drawings
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    /// Prefix of the drawing detail path, the id and `/` are appended
    detail_prefix: String,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self::new("/drawing/")
    }
}

impl PayloadBuilder {
    pub fn new(detail_prefix: impl Into<String>) -> Self {
        Self {
            detail_prefix: detail_prefix.into(),
        }
    }

    pub fn detail_path(&self, drawing: &Drawing) -> String {
        format!("{}{}/", self.detail_prefix, drawing.id)
    }

    /// Every located drawing gets a marker; only drawings with a CRS
    /// contribute layers and line work
    pub fn build(&self, drawings: &[Drawing]) -> DrawingPayloads {
        let mut layer_names = BTreeSet::new();
        let mut markers = Vec::new();
        let mut lines = Vec::new();

        for drawing in drawings {
            match drawing.marker_feature(&self.detail_path(drawing)) {
                Some(marker) => markers.push(marker),
                None => {
                    log::debug!("drawing {} has no location, not listed", drawing.id);
                    continue;
                }
            }

            if drawing.epsg.is_none() {
                continue;
            }
            for layer in &drawing.layers {
                if !layer.entities.is_empty() {
                    layer_names.insert(layer.name.clone());
                }
            }
            lines.extend(drawing.line_features());
        }

        DrawingPayloads {
            layer_data: layer_names.into_iter().collect(),
            marker_data: FeatureCollection::new(markers),
            line_data: FeatureCollection::new(lines),
        }
    }
}
