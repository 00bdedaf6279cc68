use serde::{Deserialize, Serialize};

use crate::workout::{ActivityDetails, ActivityKind, Coords, Workout};

/// Persisted, rendering-only view of a workout.
///
/// Records read back from storage are never re-run through the `Workout`
/// constructors: id, description and the derived metric arrive exactly as
/// they were stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub created_at: String,
    pub coordinates: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    pub kind: ActivityKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_steps_per_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_km_per_h: Option<f64>,
}

impl WorkoutRecord {
    /// Pace for running, speed for cycling, if it was stored.
    pub fn derived_metric(&self) -> Option<f64> {
        match self.kind {
            ActivityKind::Running => self.pace_min_per_km,
            ActivityKind::Cycling => self.speed_km_per_h,
        }
    }

    /// Cadence for running, elevation gain for cycling.
    pub fn extra_value(&self) -> Option<f64> {
        match self.kind {
            ActivityKind::Running => self.cadence_steps_per_min,
            ActivityKind::Cycling => self.elevation_gain_m,
        }
    }
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        let mut record = Self {
            id: w.id().to_string(),
            created_at: w.created_at().to_rfc3339(),
            coordinates: w.coords(),
            distance_km: w.distance_km(),
            duration_min: w.duration_min(),
            kind: w.kind(),
            description: w.description().to_string(),
            cadence_steps_per_min: None,
            pace_min_per_km: None,
            elevation_gain_m: None,
            speed_km_per_h: None,
        };
        match *w.details() {
            ActivityDetails::Running {
                cadence_steps_per_min,
                pace_min_per_km,
            } => {
                record.cadence_steps_per_min = Some(cadence_steps_per_min);
                record.pace_min_per_km = Some(pace_min_per_km);
            }
            ActivityDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                record.elevation_gain_m = Some(elevation_gain_m);
                record.speed_km_per_h = Some(speed_km_per_h);
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_running_record_fields() {
        let created = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        let w = Workout::running(Coords::new(51.5, -0.1), created, 5.0, 30.0, 150.0);
        let rec = WorkoutRecord::from(&w);

        assert_eq!(rec.id, w.id());
        assert_eq!(rec.kind, ActivityKind::Running);
        assert_eq!(rec.derived_metric(), Some(6.0));
        assert_eq!(rec.extra_value(), Some(150.0));
        assert_eq!(rec.elevation_gain_m, None);

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["kind"], "running");
        assert_eq!(json["coordinates"][0], 51.5);
        assert_eq!(json["paceMinPerKm"], 6.0);
        assert_eq!(json["cadenceStepsPerMin"], 150.0);
        assert!(json.get("speedKmPerH").is_none());
    }

    #[test]
    fn test_stored_values_are_not_recomputed() {
        // Pace deliberately inconsistent with distance/duration.
        let json = r#"{
            "id": "0000000001",
            "createdAt": "2024-04-14T09:30:00+00:00",
            "coordinates": [10.0, 20.0],
            "distanceKm": 5,
            "durationMin": 30,
            "kind": "running",
            "description": "Running on April 14",
            "cadenceStepsPerMin": 150,
            "paceMinPerKm": 99.5
        }"#;
        let rec: WorkoutRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.derived_metric(), Some(99.5));
        assert_eq!(rec.description, "Running on April 14");
    }
}
