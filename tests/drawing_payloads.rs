use geocad_map::{
    drawing::{DrawingLayer, DxfColor, Entity, PayloadBuilder},
    payload::PopupContent,
    prelude::*,
};
use serde_json::json;

/// Payloads built from drawings, fed through the render cycle
#[cfg(test)]
mod drawing_payload_tests {
    use super::*;

    fn located(id: u64, title: &str, lat: f64, long: f64) -> Drawing {
        let mut drawing = Drawing::new(id, title);
        drawing.set_location(lat, long).unwrap();
        drawing
    }

    fn layer(name: &str, color: DxfColor, continuous: bool, points: &[LatLng]) -> DrawingLayer {
        let mut layer = DrawingLayer::new(name);
        layer.set_dxf_color(color);
        layer.linetype = continuous;
        layer.entities.push(Entity {
            label: None,
            geometry: GeoJsonGeometry::line_string(points),
        });
        layer
    }

    fn drawings() -> Vec<Drawing> {
        let mut plan = located(1, "Ground floor", 42.0, 12.0);
        plan.epsg = Some(3003);
        plan.layers.push(layer(
            "Walls",
            DxfColor::Aci(1),
            true,
            &[LatLng::new(42.0, 12.0), LatLng::new(42.0005, 12.0)],
        ));
        plan.layers.push(layer(
            "Hidden",
            DxfColor::Aci(8),
            false,
            &[LatLng::new(42.0, 12.0), LatLng::new(42.0, 12.0005)],
        ));

        let mut sketch = located(2, "Sketch", 42.01, 12.02);
        sketch.layers.push(layer(
            "Sketch lines",
            DxfColor::TrueColor(0, 128, 255),
            true,
            &[LatLng::new(42.01, 12.02), LatLng::new(42.02, 12.03)],
        ));

        vec![plan, sketch, Drawing::new(3, "Not placed")]
    }

    fn page() -> StaticPage {
        let mut page = StaticPage::new().with_element("id_lat").with_element("id_long");
        page.set_json(
            "leaflet_config",
            &json!({"DEFAULT_CENTER": [41.9, 12.5], "DEFAULT_ZOOM": 6}),
        )
        .unwrap();
        page.set_json("map_status", &json!({"map_on_click": false}))
            .unwrap();
        page
    }

    #[test]
    fn test_builder_output_feeds_render_cycle() {
        let mut page = page();
        let options = MapOptions::default();
        PayloadBuilder::new("/geocad/drawing/")
            .build(&drawings())
            .write_to(&mut page, &options.ids)
            .unwrap();

        let controller = RenderCycleController::load(page, options).unwrap();

        assert_eq!(controller.control().overlay_names(), vec!["Hidden", "Walls"]);
        assert_eq!(controller.markers().unwrap().len(), 2);

        let walls = controller.overlay("Walls").unwrap();
        let wall = walls.layers()[0].as_any().downcast_ref::<Polyline>().unwrap();
        assert_eq!(wall.style().color, "#FF0000");
        assert!(!wall.style().is_dashed());

        let hidden = controller.overlay("Hidden").unwrap();
        let edge = hidden.layers()[0].as_any().downcast_ref::<Polyline>().unwrap();
        assert_eq!(edge.style().color, "#414141");
        assert_eq!(edge.style().dash_array.as_deref(), Some("10, 10"));
    }

    #[test]
    fn test_marker_popups_open_details() {
        let payloads = PayloadBuilder::new("/geocad/drawing/").build(&drawings());
        assert_eq!(payloads.marker_data.len(), 2);

        let content = PopupContent::of(&payloads.marker_data.features[1])
            .unwrap()
            .unwrap()
            .content
            .unwrap();
        assert!(content.contains("openDrawing('/geocad/drawing/2/')"));
        assert!(content.contains("<strong>Sketch</strong>"));
    }

    #[test]
    fn test_fit_covers_every_drawing() {
        let mut page = page();
        let options = MapOptions::default();
        PayloadBuilder::default()
            .build(&drawings())
            .write_to(&mut page, &options.ids)
            .unwrap();
        let controller = RenderCycleController::load(page, options).unwrap();

        let bounds = controller.map().viewport().bounds();
        assert!(bounds.contains(&LatLng::new(42.0, 12.0)));
        assert!(bounds.contains(&LatLng::new(42.01, 12.02)));
    }

    #[test]
    fn test_no_drawings_falls_back_to_default_view() {
        let mut page = page();
        let options = MapOptions::default();
        PayloadBuilder::default()
            .build(&[])
            .write_to(&mut page, &options.ids)
            .unwrap();
        let controller = RenderCycleController::load(page, options).unwrap();

        assert_eq!(controller.map().center(), LatLng::new(41.9, 12.5));
        assert_eq!(controller.map().zoom(), 6.0);
        assert!(controller.control().is_empty());
    }
}
