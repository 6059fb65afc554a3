use serde::{Deserialize, Serialize};

/// A weather observation as persisted by the storage service.
///
/// Records are read-only snapshots: nothing in this crate mutates one after it
/// has been decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: String,
    #[serde(alias = "requestDate")]
    pub request_date: String,
    /// Free-text label the record was created with.
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(alias = "weatherData")]
    pub weather_data: WeatherData,
    /// Persistence timestamp, only ever reparsed for display.
    #[serde(alias = "createdAt")]
    pub created_at: String,
}

impl WeatherRecord {
    /// Notes, if the record carries any non-empty text.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherData {
    pub request: RequestEcho,
    pub location: ResolvedLocation,
    pub current: CurrentObservation,
}

/// Echo of the query the record was originally fetched with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestEcho {
    #[serde(rename = "type")]
    pub kind: String,
    pub query: String,
    pub language: String,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedLocation {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: String,
    pub lon: String,
    pub timezone_id: String,
    pub localtime: String,
    pub localtime_epoch: i64,
    pub utc_offset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentObservation {
    pub observation_time: String,
    pub temperature: f64,
    pub feelslike: f64,
    pub weather_code: i64,
    pub weather_icons: Vec<String>,
    pub weather_descriptions: Vec<String>,
    pub wind_speed: f64,
    pub wind_degree: i64,
    pub wind_dir: String,
    pub pressure: f64,
    pub precip: f64,
    pub humidity: u8,
    pub cloudcover: u8,
    pub uv_index: f64,
    pub visibility: f64,
    pub is_day: String,
}

impl CurrentObservation {
    /// Condition descriptions joined the way they are displayed.
    pub fn conditions(&self) -> String {
        self.weather_descriptions.join(", ")
    }

    pub fn is_daytime(&self) -> bool {
        matches!(self.is_day.to_ascii_lowercase().as_str(), "yes" | "true" | "1")
    }
}
