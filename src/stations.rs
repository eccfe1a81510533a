//! Station registry for the Mid-Atlantic / New England tide gauge study.
//!
//! Defines the NOAA CO-OPS water-level stations whose exports this pipeline
//! was built around, with their locations. Used by the station map and to
//! label log output; the cleaning stages themselves are station-agnostic.

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single tide gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// 7-digit NOAA CO-OPS station id.
    pub station_id: &'static str,
    pub name: &'static str,
    /// Short label used for map markers.
    pub label: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Whether the station appears on the default data-source map.
    pub mapped: bool,
}

/// All stations, north to south.
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        station_id: "8418150",
        name: "Portland, ME",
        label: "Portland",
        latitude: 43.6567,
        longitude: -70.2467,
        mapped: false,
    },
    Station {
        station_id: "8443970",
        name: "Boston, MA",
        label: "Boston",
        latitude: 42.3539,
        longitude: -71.0503,
        mapped: false,
    },
    Station {
        station_id: "8534720",
        name: "Atlantic City, NJ",
        label: "AC",
        latitude: 39.3550,
        longitude: -74.4183,
        mapped: true,
    },
    Station {
        station_id: "8536110",
        name: "Cape May, NJ",
        label: "Cape May",
        latitude: 38.9678,
        longitude: -74.9597,
        mapped: true,
    },
    Station {
        station_id: "8557380",
        name: "Lewes, DE",
        label: "Lewes",
        latitude: 38.7828,
        longitude: -75.1192,
        mapped: true,
    },
];

/// Station the default map is centred on.
pub const MAP_CENTER_STATION: &str = "8536110";

/// Looks up a station by id. Returns `None` if not found.
pub fn find_station(station_id: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.station_id == station_id)
}

/// Stations drawn on the default map.
pub fn mapped_stations() -> Vec<&'static Station> {
    STATION_REGISTRY.iter().filter(|s| s.mapped).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
