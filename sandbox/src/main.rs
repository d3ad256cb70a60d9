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

// Loads one layer descriptor, runs a load cycle and walks the layer through
// its GPU lifecycle on a headless device.
// Run with: cargo run -p geoportal-sandbox -- sandbox/data/trees.json --styles sandbox/data/styles.json

use anyhow::{Context, Result};
use clap::Parser;
use geoportal_agents::{LayerLifecycle, LayerServices, WebGlLayer};
use geoportal_core::event::{EventBus, LayerEvent};
use geoportal_data::{InMemoryLayerRegistry, InMemoryStyleRegistry, LayerDescriptor};
use geoportal_infra::{GeoJsonFileLoader, HeadlessDevice, LoggingOverlay};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Layer descriptor (JSON object).
    descriptor: PathBuf,

    /// Raw layer list the descriptor's `sourceId` is resolved against.
    #[arg(long)]
    layers: Option<PathBuf>,

    /// Style definitions (JSON array of `{styleId, rules}`).
    #[arg(long)]
    styles: Option<PathBuf>,

    /// Directory relative GeoJSON URLs are read from. Defaults to the
    /// descriptor's directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Feature ids to show after loading.
    #[arg(long, value_delimiter = ',')]
    show: Vec<String>,

    /// Map resolution used for the hit-box query.
    #[arg(long, default_value = "1.0")]
    resolution: f64,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn build_services(
    args: &Args,
    device: Arc<HeadlessDevice>,
) -> Result<(LayerServices, Arc<EventBus<LayerEvent>>)> {
    let layers = match &args.layers {
        Some(path) => InMemoryLayerRegistry::from_json(&read(path)?)
            .with_context(|| format!("Invalid layer list '{}'", path.display()))?,
        None => InMemoryLayerRegistry::new(),
    };
    let styles = match &args.styles {
        Some(path) => InMemoryStyleRegistry::from_json(&read(path)?)
            .with_context(|| format!("Invalid style definitions '{}'", path.display()))?,
        None => InMemoryStyleRegistry::new(),
    };
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| args.descriptor.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let bus = Arc::new(EventBus::<LayerEvent>::new());
    let services = LayerServices::new(device)
        .with_layers(Arc::new(layers))
        .with_styles(Arc::new(styles))
        .with_overlay(Arc::new(LoggingOverlay::new()))
        .with_notifier(bus.clone())
        .with_loader(Arc::new(GeoJsonFileLoader::with_base_dir(data_dir)));
    Ok((services, bus))
}

fn report(layer: &WebGlLayer, device: &HeadlessDevice, step: &str) {
    println!(
        "{step:<12} state={:?} visible={} shown={}/{} buffers={} bytes={}",
        layer.state(),
        layer.is_visible_in_map(),
        layer.source().len(),
        layer.features().len(),
        device.live_buffer_count(),
        device.allocated_bytes(),
    );
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let descriptor: LayerDescriptor = serde_json::from_str(&read(&args.descriptor)?)
        .with_context(|| format!("Invalid layer descriptor '{}'", args.descriptor.display()))?;
    let device = Arc::new(HeadlessDevice::new());
    let (services, bus) = build_services(&args, device.clone())?;

    let mut layer = WebGlLayer::new(descriptor, services)?;
    report(&layer, &device, "constructed");

    let loaded = pollster::block_on(layer.load())?;
    log::info!("Load cycle returned {loaded} features.");
    layer.prepare_frame()?;
    report(&layer, &device, "loaded");

    if !args.show.is_empty() {
        layer.show_by_ids(args.show.as_slice());
        layer.prepare_frame()?;
        report(&layer, &device, "filtered");
        layer.show_all();
    }

    if let Some(first) = layer.features().first().and_then(|f| f.extent()) {
        let hits = layer.features_in_hit_box(first.center(), args.resolution);
        println!("hit box around first feature: {} hits", hits.len());
    }

    layer.set_selected(false);
    report(&layer, &device, "deselected");
    layer.set_selected(true);
    layer.prepare_frame()?;
    report(&layer, &device, "reselected");

    for entry in layer.legend() {
        println!("legend: {}", serde_json::to_string(entry)?);
    }
    for event in bus.drain() {
        match event {
            LayerEvent::FeaturesLoaded { layer_id, features } => {
                println!("event: {layer_id} loaded {} features", features.len())
            }
            LayerEvent::Built { layer_id } => println!("event: {layer_id} built"),
            LayerEvent::Disposed { layer_id } => println!("event: {layer_id} disposed"),
        }
    }
    Ok(())
}
