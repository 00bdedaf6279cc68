use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};

/// A geographic position, persisted as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

/// Activity discriminant. The serialized tag is what dispatch keys off after a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Running,
    Cycling,
}

/// Display facts for one activity kind.
#[derive(Debug)]
pub struct KindInfo {
    pub tag: &'static str,
    pub label: &'static str,
    pub glyph: &'static str,
    pub metric_unit: &'static str,
    pub extra_glyph: &'static str,
    pub extra_unit: &'static str,
}

const RUNNING: KindInfo = KindInfo {
    tag: "running",
    label: "Running",
    glyph: "🏃‍♂️",
    metric_unit: "min/km",
    extra_glyph: "🦶🏼",
    extra_unit: "spm",
};

const CYCLING: KindInfo = KindInfo {
    tag: "cycling",
    label: "Cycling",
    glyph: "🚴‍♀️",
    metric_unit: "km/h",
    extra_glyph: "⛰",
    extra_unit: "m",
};

impl ActivityKind {
    pub const ALL: [ActivityKind; 2] = [ActivityKind::Running, ActivityKind::Cycling];

    pub fn info(self) -> &'static KindInfo {
        match self {
            Self::Running => &RUNNING,
            Self::Cycling => &CYCLING,
        }
    }

    pub fn tag(self) -> &'static str {
        self.info().tag
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

/// Kind-specific input supplied when a workout is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityInput {
    Running { cadence_steps_per_min: f64 },
    Cycling { elevation_gain_m: f64 },
}

impl ActivityInput {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::Running { .. } => ActivityKind::Running,
            Self::Cycling { .. } => ActivityKind::Cycling,
        }
    }
}

/// Kind-specific payload with its derived metric already computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityDetails {
    Running {
        cadence_steps_per_min: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl ActivityDetails {
    fn compute(input: ActivityInput, distance_km: f64, duration_min: f64) -> Self {
        match input {
            ActivityInput::Running {
                cadence_steps_per_min,
            } => Self::Running {
                cadence_steps_per_min,
                pace_min_per_km: duration_min / distance_km,
            },
            ActivityInput::Cycling { elevation_gain_m } => Self::Cycling {
                elevation_gain_m,
                speed_km_per_h: distance_km / (duration_min / 60.0),
            },
        }
    }
}

/// A freshly recorded workout. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    created_at: DateTime<Local>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    details: ActivityDetails,
    description: String,
}

impl Workout {
    /// Build a workout. Inputs are expected to be validated already; a zero
    /// distance or duration is not guarded against here.
    pub fn new(
        coords: Coords,
        created_at: DateTime<Local>,
        distance_km: f64,
        duration_min: f64,
        input: ActivityInput,
    ) -> Self {
        let details = ActivityDetails::compute(input, distance_km, duration_min);
        Self {
            id: workout_id(&created_at),
            description: describe(input.kind(), &created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        }
    }

    pub fn running(
        coords: Coords,
        created_at: DateTime<Local>,
        distance_km: f64,
        duration_min: f64,
        cadence_steps_per_min: f64,
    ) -> Self {
        Self::new(
            coords,
            created_at,
            distance_km,
            duration_min,
            ActivityInput::Running {
                cadence_steps_per_min,
            },
        )
    }

    pub fn cycling(
        coords: Coords,
        created_at: DateTime<Local>,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::new(
            coords,
            created_at,
            distance_km,
            duration_min,
            ActivityInput::Cycling { elevation_gain_m },
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn details(&self) -> &ActivityDetails {
        &self.details
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ActivityKind {
        match self.details {
            ActivityDetails::Running { .. } => ActivityKind::Running,
            ActivityDetails::Cycling { .. } => ActivityKind::Cycling,
        }
    }

    /// Pace in min/km for running, speed in km/h for cycling.
    pub fn derived_metric(&self) -> f64 {
        match self.details {
            ActivityDetails::Running {
                pace_min_per_km, ..
            } => pace_min_per_km,
            ActivityDetails::Cycling { speed_km_per_h, .. } => speed_km_per_h,
        }
    }
}

/// Last 10 digits of the creation time in milliseconds. Two workouts created
/// within the same millisecond share an id.
fn workout_id(created_at: &DateTime<Local>) -> String {
    let millis = created_at.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(10);
    millis[start..].to_string()
}

/// "{Kind} on {Month} {Day}"
fn describe(kind: ActivityKind, created_at: &DateTime<Local>) -> String {
    format!(
        "{} on {} {}",
        kind.info().label,
        created_at.format("%B"),
        created_at.day()
    )
}
