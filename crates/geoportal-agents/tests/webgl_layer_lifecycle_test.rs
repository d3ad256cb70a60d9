// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use geoportal_agents::{LayerLifecycle, LayerServices, LayerState, WebGlLayer};
use geoportal_core::color::RgbaColor;
use geoportal_core::event::{EventBus, LayerEvent};
use geoportal_core::lane::LaneKind;
use geoportal_core::legend::LegendEntry;
use geoportal_core::renderer::{BufferUsage, RendererMode};
use geoportal_core::style::StyleRule;
use geoportal_data::{InMemoryStyleRegistry, LayerDescriptor, RuleStyleModel};
use geoportal_infra::HeadlessDevice;
use geoportal_lanes::RenderFunctions;
use serde_json::{json, Value};
use std::sync::Arc;

// --- HELPERS FOR THIS TEST ---

fn point(id: &str, x: f64, y: f64) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "geometry": {"type": "Point", "coordinates": [x, y]},
        "properties": {}
    })
}

fn polygon(id: &str) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        },
        "properties": {"kind": "apple"}
    })
}

fn inline_layer(extra: Value, features: Vec<Value>) -> LayerDescriptor {
    let mut descriptor = json!({
        "id": "inline",
        "name": "Inline layer",
        "typ": "VectorBase",
        "isSelected": true,
        "gfiAttributes": "showAll",
        "features": features
    });
    if let (Some(target), Value::Object(extra)) = (descriptor.as_object_mut(), extra) {
        target.extend(extra);
    }
    serde_json::from_value(descriptor).expect("descriptor should deserialize")
}

fn three_points() -> Vec<Value> {
    vec![point("0", 0.0, 0.0), point("1", 50.0, 50.0), point("2", 100.0, 100.0)]
}

fn ids(layer: &WebGlLayer) -> Vec<String> {
    layer
        .source()
        .features()
        .iter()
        .filter_map(|feature| feature.id().map(str::to_string))
        .collect()
}

#[test]
fn test_hide_all_keeps_retained_features() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let mut layer =
        WebGlLayer::new(inline_layer(json!({}), three_points()), LayerServices::new(device)).unwrap();
    assert_eq!(layer.source().len(), 3);

    // --- 2. ACT ---
    layer.hide_all();

    // --- 3. ASSERT ---
    assert_eq!(layer.source().len(), 0, "Hidden layer should show nothing");
    assert_eq!(layer.features().len(), 3, "Retained list should be untouched");
    assert!(!layer.is_disposed(), "Hiding empties the source, not the GPU object");

    layer.show_all();
    assert_eq!(ids(&layer), vec!["0", "1", "2"]);
}

#[test]
fn test_show_by_ids_follows_request_order() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let mut layer =
        WebGlLayer::new(inline_layer(json!({}), three_points()), LayerServices::new(device)).unwrap();

    // --- 2. ACT & 3. ASSERT ---
    layer.show_by_ids(&["1"]);
    assert_eq!(ids(&layer), vec!["1"]);

    layer.show_by_ids(&["2", "missing", "0"]);
    assert_eq!(ids(&layer), vec!["2", "0"], "Unknown ids are skipped");

    layer.show_by_ids::<&str>(&[]);
    assert!(layer.source().is_empty());
}

#[test]
fn test_deselect_disposes_and_reselect_rebuilds() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let mut layer = WebGlLayer::new(
        inline_layer(json!({}), three_points()),
        LayerServices::new(device.clone()),
    )
    .unwrap();
    assert!(layer.prepare_frame().unwrap(), "First frame uploads the points");
    assert_eq!(device.live_buffer_count(), 1);
    assert_eq!(layer.generation(), 1);

    // --- 2. ACT ---
    layer.set_selected(false);

    // --- 3. ASSERT ---
    assert!(layer.is_disposed());
    assert_eq!(layer.state(), LayerState::Disposed);
    assert_eq!(device.live_buffer_count(), 0, "Disposal releases the buffer");
    assert_eq!(layer.features().len(), 3, "Feature data survives disposal");
    assert!(!layer.prepare_frame().unwrap(), "Disposed layers upload nothing");

    layer.set_selected(true);
    assert!(!layer.is_disposed());
    assert_eq!(layer.state(), LayerState::Built(RendererMode::Point));
    assert_eq!(layer.generation(), 2, "Reselecting builds a new GPU object");
    assert!(layer.prepare_frame().unwrap());
    assert_eq!(device.live_buffer_count(), 1);
}

#[test]
fn test_renderer_mode_follows_geometry() {
    let device = Arc::new(HeadlessDevice::new());

    let points = WebGlLayer::new(
        inline_layer(json!({}), vec![point("0", 1.0, 1.0)]),
        LayerServices::new(device.clone()),
    )
    .unwrap();
    assert_eq!(points.state(), LayerState::Built(RendererMode::Point));

    let polygons = WebGlLayer::new(
        inline_layer(json!({}), vec![polygon("0")]),
        LayerServices::new(device.clone()),
    )
    .unwrap();
    assert_eq!(polygons.state(), LayerState::Built(RendererMode::Generic));

    let flagged = WebGlLayer::new(
        inline_layer(json!({"isPointLayer": false}), vec![point("0", 1.0, 1.0)]),
        LayerServices::new(device.clone()),
    )
    .unwrap();
    assert_eq!(
        flagged.state(),
        LayerState::Built(RendererMode::Generic),
        "An explicit flag wins over the data"
    );

    let empty =
        WebGlLayer::new(inline_layer(json!({}), Vec::new()), LayerServices::new(device)).unwrap();
    assert_eq!(empty.state(), LayerState::Built(RendererMode::Point));
}

#[test]
fn test_pipeline_names_lanes_in_order() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let mut points = WebGlLayer::new(
        inline_layer(json!({}), three_points()),
        LayerServices::new(device.clone()),
    )
    .unwrap();
    let polygons = WebGlLayer::new(
        inline_layer(json!({}), vec![polygon("0")]),
        LayerServices::new(device),
    )
    .unwrap();

    // --- 2. ACT & 3. ASSERT ---
    assert_eq!(
        points.pipeline(),
        vec![
            (LaneKind::Filter, "GeometryAndRegionFilter"),
            (LaneKind::Transform, "WebGlFeatureTransform"),
            (LaneKind::Render, "WebGlPoints"),
        ]
    );
    assert_eq!(polygons.pipeline().last(), Some(&(LaneKind::Render, "WebGlVector")));

    points.set_selected(false);
    assert_eq!(points.pipeline().len(), 2, "A disposed layer has no render lane");
}

#[test]
fn test_generic_layer_uploads_vertices() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let mut layer = WebGlLayer::new(
        inline_layer(json!({}), vec![polygon("0")]),
        LayerServices::new(device.clone()),
    )
    .unwrap();

    // --- 2. ACT ---
    assert!(layer.prepare_frame().unwrap());
    assert!(!layer.prepare_frame().unwrap(), "Unchanged source is not uploaded again");

    // --- 3. ASSERT ---
    let buffer = layer.rendered_layer().and_then(|r| r.buffer()).unwrap();
    assert_eq!(buffer.count, 8, "Four ring positions as fill and as stroke");
    assert_eq!(device.buffer_layout(buffer.id), Some((BufferUsage::Vertex, 24)));
}

#[test]
fn test_bbox_geometry_filters_inline_features() {
    let device = Arc::new(HeadlessDevice::new());
    let extra = json!({
        "bboxGeometry": {
            "type": "Polygon",
            "coordinates": [[[-1.0, -1.0], [10.0, -1.0], [10.0, 10.0], [-1.0, 10.0], [-1.0, -1.0]]]
        }
    });

    let layer = WebGlLayer::new(inline_layer(extra, three_points()), LayerServices::new(device)).unwrap();

    assert_eq!(ids(&layer), vec!["0"]);
    assert_eq!(layer.features().len(), 1);
}

#[test]
fn test_hit_box_respects_tolerance_and_gfi() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let layer = WebGlLayer::new(
        inline_layer(json!({"hitTolerance": 5}), three_points()),
        LayerServices::new(device.clone()),
    )
    .unwrap();
    let ignored = WebGlLayer::new(
        inline_layer(json!({"gfiAttributes": "ignore"}), three_points()),
        LayerServices::new(device),
    )
    .unwrap();

    // --- 2. ACT ---
    let near_origin = layer.features_in_hit_box([3.0, 3.0], 1.0);
    let coarse = layer.features_in_hit_box([20.0, 20.0], 49.0);
    let none = ignored.features_in_hit_box([0.0, 0.0], 1.0);

    // --- 3. ASSERT ---
    assert_eq!(near_origin.len(), 1);
    assert_eq!(near_origin[0].id(), Some("0"));
    assert_eq!(coarse.len(), 2, "Box grows with the square root of the resolution");
    assert!(none.is_empty(), "Layers ignoring feature info report no hits");
}

#[test]
fn test_style_rules_drive_render_values_and_legend() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let rule: StyleRule = serde_json::from_value(json!({
        "conditions": {"properties": {"kind": "apple"}},
        "style": {"polygonFillColor": [255, 0, 0, 0.5], "legendValue": "Apples"}
    }))
    .unwrap();
    let mut styles = InMemoryStyleRegistry::new();
    styles.insert(RuleStyleModel::new("fruit", vec![rule]));
    let services = LayerServices::new(device).with_styles(Arc::new(styles));

    let mut unstyled = polygon("1");
    unstyled["properties"] = json!({"kind": "pear"});

    // --- 2. ACT ---
    let layer = WebGlLayer::new(
        inline_layer(json!({"styleId": "fruit", "legend": true}), vec![polygon("0"), unstyled]),
        services,
    )
    .unwrap();

    // --- 3. ASSERT ---
    let bound = &layer.features()[0];
    let unbound = &layer.features()[1];
    assert!(bound.style_rule().is_some());
    assert!(unbound.style_rule().is_none());
    assert_eq!(
        RenderFunctions::fill_color(bound),
        RgbaColor::rgba(255.0, 0.0, 0.0, 0.5).packed()
    );
    assert_eq!(RenderFunctions::fill_opacity(bound), 0.5);
    assert_eq!(RenderFunctions::fill_opacity(unbound), 0.8);

    match layer.legend() {
        [LegendEntry::Info(info)] => assert_eq!(info.label, "Apples"),
        other => panic!("Unexpected legend: {other:?}"),
    }
}

#[test]
fn test_notifier_receives_lifecycle_events() {
    // --- 1. ARRANGE ---
    let device = Arc::new(HeadlessDevice::new());
    let bus = Arc::new(EventBus::<LayerEvent>::new());
    let services = LayerServices::new(device).with_notifier(bus.clone());

    // --- 2. ACT ---
    let mut layer = WebGlLayer::new(inline_layer(json!({}), three_points()), services).unwrap();
    layer.set_selected(false);

    // --- 3. ASSERT ---
    let events = bus.drain();
    assert_eq!(events.len(), 3);
    match &events[0] {
        LayerEvent::FeaturesLoaded { layer_id, features } => {
            assert_eq!(layer_id, "inline");
            assert_eq!(features.len(), 3);
        }
        other => panic!("Expected FeaturesLoaded, got {other:?}"),
    }
    assert_eq!(events[1], LayerEvent::Built { layer_id: "inline".to_string() });
    assert_eq!(events[2], LayerEvent::Disposed { layer_id: "inline".to_string() });
}

#[test]
fn test_child_layers_start_hidden() {
    let device = Arc::new(HeadlessDevice::new());
    let layer = WebGlLayer::new(
        inline_layer(json!({"isChildLayer": true}), three_points()),
        LayerServices::new(device),
    )
    .unwrap();

    assert!(layer.is_selected());
    assert!(!layer.is_visible_in_map());
    assert!(!layer.is_disposed(), "Construction still builds the GPU object");
}
