//! Read-only projection of the lookup phase into displayable text.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::{controller::Phase, model::WeatherRecord};

/// One labelled value, e.g. `Temperature: 18°C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

/// The Location / Current Weather / Request Details breakdown of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub sections: Vec<Section>,
}

impl RecordView {
    /// First value shown under `label` in `section`.
    pub fn value(&self, section: &str, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .filter(|s| s.title == section)
            .flat_map(|s| &s.rows)
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

/// What the widget shows for a given phase. The input form is always present;
/// the variants describe what accompanies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Form,
    /// Form with its submit control disabled.
    Loading,
    Alert(String),
    Record(RecordView),
}

/// Formats records for display. Timestamps are shown in `Tz`.
#[derive(Debug, Clone)]
pub struct Presenter<Tz: TimeZone = Local> {
    tz: Tz,
}

impl Presenter<Local> {
    pub fn local() -> Self {
        Self { tz: Local }
    }
}

impl Default for Presenter<Local> {
    fn default() -> Self {
        Self::local()
    }
}

impl<Tz: TimeZone> Presenter<Tz>
where
    Tz::Offset: fmt::Display,
{
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn screen(&self, phase: &Phase) -> Screen {
        match phase {
            Phase::Idle => Screen::Form,
            Phase::Pending => Screen::Loading,
            Phase::Failed(message) => Screen::Alert(message.clone()),
            Phase::Resolved(record) => Screen::Record(self.record_view(record)),
        }
    }

    pub fn record_view(&self, record: &WeatherRecord) -> RecordView {
        let location = &record.weather_data.location;
        let current = &record.weather_data.current;

        let mut details = vec![
            row("Request Date", &record.request_date),
            row("Location", &record.location),
        ];
        if let Some(notes) = record.notes() {
            details.push(row("Notes", notes));
        }
        details.push(row("Created", self.format_created_at(&record.created_at)));

        RecordView {
            sections: vec![
                Section {
                    title: "Location",
                    rows: vec![
                        row("Name", &location.name),
                        row("Country", &location.country),
                        row("Local Time", &location.localtime),
                    ],
                },
                Section {
                    title: "Current Weather",
                    rows: vec![
                        row("Temperature", format!("{}°C", current.temperature)),
                        row("Feels Like", format!("{}°C", current.feelslike)),
                        row("Condition", current.conditions()),
                        row("Humidity", format!("{}%", current.humidity)),
                        row("Wind", format!("{} km/h {}", current.wind_speed, current.wind_dir)),
                        row("Pressure", format!("{} mb", current.pressure)),
                        row("Visibility", format!("{} km", current.visibility)),
                        row("UV Index", current.uv_index.to_string()),
                        row("Cloud Cover", format!("{}%", current.cloudcover)),
                        row("Precipitation", format!("{} mm", current.precip)),
                    ],
                },
                Section { title: "Request Details", rows: details },
            ],
        }
    }

    /// Long US-English date and time, e.g. `January 1, 2024 at 10:00 AM`.
    ///
    /// Zone-less timestamps are taken as wall time in `Tz`. Anything that does
    /// not parse is returned unchanged.
    pub fn format_created_at(&self, raw: &str) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return long_date_time(&dt.with_timezone(&self.tz));
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .and_then(|naive| self.tz.from_local_datetime(&naive).earliest())
            .map(|dt| long_date_time(&dt))
            .unwrap_or_else(|| raw.to_string())
    }
}

fn long_date_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    dt.format("%B %-d, %Y at %I:%M %p").to_string()
}

fn row(label: &'static str, value: impl Into<String>) -> Row {
    Row { label, value: value.into() }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

impl fmt::Display for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.title)?;
            for row in &section.rows {
                writeln!(f, "  {row}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Form => Ok(()),
            Screen::Loading => writeln!(f, "Loading..."),
            Screen::Alert(message) => writeln!(f, "Error: {message}"),
            Screen::Record(view) => write!(f, "{view}"),
        }
    }
}
