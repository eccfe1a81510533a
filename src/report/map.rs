//! Station location map.
//!
//! Purely illustrative: a standalone Leaflet page with one marker per
//! station, centred on the map-centre station, plus the same points as a
//! GeoJSON feature collection.

use std::path::Path;

use serde_json::{Value, json};

use crate::logging::{self, Stage};
use crate::model::PipelineError;
use crate::stations::{MAP_CENTER_STATION, Station, find_station, mapped_stations};

pub const DEFAULT_ZOOM: u8 = 8;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// GeoJSON `FeatureCollection` of the given stations. Coordinates are
/// `[longitude, latitude]` as GeoJSON requires.
pub fn stations_geojson(stations: &[&Station]) -> Value {
    let features: Vec<Value> = stations
        .iter()
        .map(|s| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [s.longitude, s.latitude] },
                "properties": { "station_id": s.station_id, "name": s.name, "label": s.label },
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Renders a Leaflet page for `stations`. The view is centred on the
/// registry's map-centre station, or on the first station if that one is
/// unknown.
pub fn plot_data_sources(stations: &[&Station]) -> String {
    let center = match find_station(MAP_CENTER_STATION) {
        Some(s) => (s.latitude, s.longitude),
        None => stations
            .first()
            .map(|s| (s.latitude, s.longitude))
            .unwrap_or((0.0, 0.0)),
    };

    let geojson = stations_geojson(stations);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>Tide station data sources</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("{tiles}", {{ attribution: "{attribution}" }}).addTo(map);
var stations = {geojson};
L.geoJSON(stations, {{
  onEachFeature: function (feature, layer) {{ layer.bindPopup(feature.properties.label); }}
}}).addTo(map);
</script>
</body>
</html>
"#,
        lat = center.0,
        lon = center.1,
        zoom = DEFAULT_ZOOM,
        tiles = TILE_URL,
        attribution = TILE_ATTRIBUTION,
        geojson = geojson,
    )
}

/// Renders the default map (registry stations flagged for mapping) and
/// writes it to `path`.
pub fn write_map(path: &Path) -> Result<(), PipelineError> {
    let stations = mapped_stations();
    std::fs::write(path, plot_data_sources(&stations))
        .map_err(|e| PipelineError::Report(format!("{}: {}", path.display(), e)))?;
    logging::info(
        Stage::Report,
        &format!("wrote station map with {} markers to {}", stations.len(), path.display()),
    );
    Ok(())
}
