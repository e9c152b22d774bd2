//! Typed views over USGS GeoJSON payloads
//!
//! The fetcher hands out the provider payload verbatim; these types decode
//! the parts the terminal UI displays. Unknown fields are ignored and most
//! properties are optional because USGS leaves them null for many events.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// A decoded feed: metadata plus one entry per event
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeCollection {
    /// Feed title from the metadata block, e.g. "USGS All Earthquakes, Past Day"
    pub title: Option<String>,
    /// When USGS generated the feed
    pub generated: Option<DateTime<Utc>>,
    /// Events in provider order (most recent first)
    pub quakes: Vec<Quake>,
}

/// A single earthquake event
#[derive(Debug, Clone, PartialEq)]
pub struct Quake {
    /// Provider event id
    pub id: String,
    pub magnitude: Option<f64>,
    /// Magnitude type, e.g. "ml", "mww"
    pub magnitude_type: Option<String>,
    /// Location description, e.g. "10 km NE of Ridgecrest, CA"
    pub place: String,
    /// Origin time
    pub time: Option<DateTime<Utc>>,
    pub longitude: f64,
    pub latitude: f64,
    /// Depth in kilometers
    pub depth_km: f64,
    /// Whether a tsunami flag was raised
    pub tsunami: bool,
    /// PAGER alert level (green, yellow, orange, red)
    pub alert: Option<String>,
    /// Number of "did you feel it" reports
    pub felt: Option<u32>,
    /// Significance score (0-1000)
    pub significance: Option<u32>,
    /// Event page on the provider site
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionJson {
    #[serde(default)]
    metadata: Option<MetadataJson>,
    #[serde(default)]
    features: Vec<FeatureJson>,
}

#[derive(Debug, Deserialize)]
struct MetadataJson {
    title: Option<String>,
    generated: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FeatureJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: PropertiesJson,
    #[serde(default)]
    geometry: Option<GeometryJson>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertiesJson {
    mag: Option<f64>,
    #[serde(rename = "magType")]
    mag_type: Option<String>,
    place: Option<String>,
    time: Option<i64>,
    tsunami: Option<u8>,
    alert: Option<String>,
    felt: Option<u32>,
    sig: Option<u32>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeometryJson {
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl QuakeCollection {
    /// Decodes a GeoJSON FeatureCollection value
    ///
    /// # Returns
    /// * `Ok(QuakeCollection)` if the value has the FeatureCollection shape
    /// * `Err` if the value is not an object or fields have the wrong types
    pub fn from_geojson(value: &Value) -> Result<Self, serde_json::Error> {
        let raw = FeatureCollectionJson::deserialize(value)?;
        let (title, generated) = match raw.metadata {
            Some(meta) => (meta.title, meta.generated.and_then(DateTime::from_timestamp_millis)),
            None => (None, None),
        };

        let quakes = raw.features.into_iter().map(Quake::from_feature).collect();

        Ok(Self {
            title,
            generated,
            quakes,
        })
    }

    pub fn len(&self) -> usize {
        self.quakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quakes.is_empty()
    }

    /// Largest magnitude in the collection, if any event reports one
    pub fn max_magnitude(&self) -> Option<f64> {
        self.quakes
            .iter()
            .filter_map(|q| q.magnitude)
            .reduce(f64::max)
    }
}

impl Quake {
    fn from_feature(feature: FeatureJson) -> Self {
        let props = feature.properties;
        let coords = feature.geometry.map(|g| g.coordinates).unwrap_or_default();
        let coord = |i: usize| coords.get(i).copied().unwrap_or(0.0);

        Self {
            id: feature.id.unwrap_or_default(),
            magnitude: props.mag,
            magnitude_type: props.mag_type,
            place: props.place.unwrap_or_else(|| "Unknown location".to_string()),
            time: props.time.and_then(DateTime::from_timestamp_millis),
            longitude: coord(0),
            latitude: coord(1),
            depth_km: coord(2),
            tsunami: props.tsunami.unwrap_or(0) != 0,
            alert: props.alert,
            felt: props.felt,
            significance: props.sig,
            url: props.url,
        }
    }

    /// Magnitude formatted to one decimal, or "?" if unknown
    pub fn magnitude_label(&self) -> String {
        self.magnitude
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| "?".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_feed() -> Value {
        json!({
            "type": "FeatureCollection",
            "metadata": {
                "generated": 1_700_000_000_000_i64,
                "url": "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson",
                "title": "USGS All Earthquakes, Past Day",
                "status": 200,
                "api": "1.10.3",
                "count": 2
            },
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "mag": 4.7,
                        "place": "45 km SSW of Hualien City, Taiwan",
                        "time": 1_699_990_000_000_i64,
                        "updated": 1_699_995_000_000_i64,
                        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd",
                        "felt": 12,
                        "alert": "green",
                        "tsunami": 1,
                        "sig": 340,
                        "magType": "mb",
                        "type": "earthquake"
                    },
                    "geometry": { "type": "Point", "coordinates": [121.4, 23.6, 10.0] },
                    "id": "us7000abcd"
                },
                {
                    "type": "Feature",
                    "properties": {
                        "mag": null,
                        "place": null,
                        "time": 1_699_980_000_000_i64,
                        "tsunami": 0
                    },
                    "geometry": { "type": "Point", "coordinates": [-150.2, 61.1, 35.5] },
                    "id": "ak0241"
                }
            ]
        })
    }

    #[test]
    fn test_from_geojson_reads_metadata() {
        let collection = QuakeCollection::from_geojson(&sample_feed()).expect("should decode");

        assert_eq!(
            collection.title.as_deref(),
            Some("USGS All Earthquakes, Past Day")
        );
        assert_eq!(
            collection.generated,
            DateTime::from_timestamp_millis(1_700_000_000_000)
        );
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_from_geojson_reads_event_fields() {
        let collection = QuakeCollection::from_geojson(&sample_feed()).expect("should decode");
        let quake = &collection.quakes[0];

        assert_eq!(quake.id, "us7000abcd");
        assert_eq!(quake.magnitude, Some(4.7));
        assert_eq!(quake.magnitude_type.as_deref(), Some("mb"));
        assert_eq!(quake.place, "45 km SSW of Hualien City, Taiwan");
        assert!((quake.longitude - 121.4).abs() < 1e-9);
        assert!((quake.latitude - 23.6).abs() < 1e-9);
        assert!((quake.depth_km - 10.0).abs() < 1e-9);
        assert!(quake.tsunami);
        assert_eq!(quake.alert.as_deref(), Some("green"));
        assert_eq!(quake.felt, Some(12));
        assert_eq!(quake.significance, Some(340));
        assert_eq!(quake.magnitude_label(), "4.7");
    }

    #[test]
    fn test_from_geojson_tolerates_nulls() {
        let collection = QuakeCollection::from_geojson(&sample_feed()).expect("should decode");
        let quake = &collection.quakes[1];

        assert!(quake.magnitude.is_none());
        assert_eq!(quake.magnitude_label(), "?");
        assert_eq!(quake.place, "Unknown location");
        assert!(!quake.tsunami);
        assert!(quake.url.is_none());
    }

    #[test]
    fn test_empty_feature_collection() {
        let value = json!({ "type": "FeatureCollection", "features": [] });
        let collection = QuakeCollection::from_geojson(&value).expect("should decode");

        assert!(collection.is_empty());
        assert!(collection.title.is_none());
        assert!(collection.max_magnitude().is_none());
    }

    #[test]
    fn test_max_magnitude() {
        let collection = QuakeCollection::from_geojson(&sample_feed()).expect("should decode");
        assert_eq!(collection.max_magnitude(), Some(4.7));
    }

    #[test]
    fn test_error_object_does_not_decode_as_features() {
        let value = json!({ "features": "not a list" });
        assert!(QuakeCollection::from_geojson(&value).is_err());
    }
}
