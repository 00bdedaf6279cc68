use serde::Serialize;

use crate::options::PopupOptions;
use crate::record::WorkoutRecord;
use crate::workout::{ActivityKind, Coords};

/// A marker render request for the map host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    pub id: String,
    pub coords: Coords,
    pub caption: String,
    pub class_name: String,
    pub popup: PopupOptions,
}

/// One line of a workout list entry, e.g. `⚡️ 6.0 min/km`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricLine {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// A list-item render request for the UI host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutListItem {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub lines: Vec<MetricLine>,
}

pub fn marker_for(record: &WorkoutRecord, popup: &PopupOptions) -> MarkerSpec {
    let info = record.kind.info();
    MarkerSpec {
        id: record.id.clone(),
        coords: record.coordinates,
        caption: format!("{} {}", info.glyph, record.description),
        class_name: format!("{}-popup", info.tag),
        popup: popup.clone(),
    }
}

pub fn list_item_for(record: &WorkoutRecord) -> WorkoutListItem {
    let info = record.kind.info();
    let lines = vec![
        MetricLine {
            icon: info.glyph,
            value: record.distance_km.to_string(),
            unit: "km",
        },
        MetricLine {
            icon: "⏱",
            value: record.duration_min.to_string(),
            unit: "min",
        },
        MetricLine {
            icon: "⚡️",
            value: format_optional(record.derived_metric(), |v| format!("{v:.1}")),
            unit: info.metric_unit,
        },
        MetricLine {
            icon: info.extra_glyph,
            value: format_optional(record.extra_value(), |v| v.to_string()),
            unit: info.extra_unit,
        },
    ];

    WorkoutListItem {
        id: record.id.clone(),
        kind: record.kind,
        title: record.description.clone(),
        lines,
    }
}

/// A one-line summary such as `5 km · 30 min · 6.0 min/km · 150 spm`.
pub fn summary_for(record: &WorkoutRecord) -> String {
    list_item_for(record)
        .lines
        .iter()
        .map(|l| format!("{} {}", l.value, l.unit))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn format_optional(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "-".to_string())
}

/// Where the map should pan to when a list item is clicked.
pub fn locate(records: &[WorkoutRecord], id: &str) -> Option<Coords> {
    records.iter().find(|r| r.id == id).map(|r| r.coordinates)
}
