use serde::Deserialize;

use crate::workout::{ActivityInput, ActivityKind};

/// Alert text shown when a submission is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";

/// A numeric form field as the host hands it over: an input's string value,
/// an already-converted number (possibly NaN), or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl RawNumber {
    fn finite(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Missing => None,
        }
        .filter(|v| v.is_finite())
    }
}

impl std::fmt::Display for RawNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => f.write_str("<missing>"),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawNumber {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Raw values read from the workout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub distance: RawNumber,
    #[serde(default)]
    pub duration: RawNumber,
    #[serde(default)]
    pub cadence: RawNumber,
    #[serde(default)]
    pub elevation: RawNumber,
}

/// A submission that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedForm {
    pub distance_km: f64,
    pub duration_min: f64,
    pub activity: ActivityInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    UnknownKind(String),
    NotPositive { field: &'static str, value: String },
    Negative { field: &'static str, value: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "Unknown workout type '{kind}'"),
            Self::NotPositive { field, value } => {
                write!(f, "Field '{field}' must be a positive number, got '{value}'")
            }
            Self::Negative { field, value } => {
                write!(f, "Field '{field}' must not be negative, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl FormInput {
    /// Every numeric field must be finite and strictly positive, except
    /// elevation gain which may be zero. Only the field belonging to the
    /// selected kind is checked.
    pub fn validate(&self) -> Result<ValidatedForm, ValidationError> {
        let kind = ActivityKind::from_tag(self.kind.trim())
            .ok_or_else(|| ValidationError::UnknownKind(self.kind.clone()))?;

        let distance_km = positive("distance", &self.distance)?;
        let duration_min = positive("duration", &self.duration)?;

        let activity = match kind {
            ActivityKind::Running => ActivityInput::Running {
                cadence_steps_per_min: positive("cadence", &self.cadence)?,
            },
            ActivityKind::Cycling => ActivityInput::Cycling {
                elevation_gain_m: non_negative("elevation", &self.elevation)?,
            },
        };

        Ok(ValidatedForm {
            distance_km,
            duration_min,
            activity,
        })
    }
}

fn positive(field: &'static str, raw: &RawNumber) -> Result<f64, ValidationError> {
    match raw.finite() {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(ValidationError::NotPositive {
            field,
            value: raw.to_string(),
        }),
    }
}

fn non_negative(field: &'static str, raw: &RawNumber) -> Result<f64, ValidationError> {
    match raw.finite() {
        Some(v) if v >= 0.0 => Ok(v),
        _ => Err(ValidationError::Negative {
            field,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(distance: &str, duration: &str, cadence: &str) -> FormInput {
        FormInput {
            kind: "running".to_string(),
            distance: distance.into(),
            duration: duration.into(),
            cadence: cadence.into(),
            ..Default::default()
        }
    }

    fn cycling(distance: &str, duration: &str, elevation: &str) -> FormInput {
        FormInput {
            kind: "cycling".to_string(),
            distance: distance.into(),
            duration: duration.into(),
            elevation: elevation.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_running() {
        let v = running("5", "30", "150").validate().unwrap();
        assert_eq!(v.distance_km, 5.0);
        assert_eq!(v.duration_min, 30.0);
        assert_eq!(
            v.activity,
            ActivityInput::Running {
                cadence_steps_per_min: 150.0
            }
        );
    }

    #[test]
    fn test_valid_cycling_with_zero_elevation() {
        let v = cycling("20.5", " 60 ", "0").validate().unwrap();
        assert_eq!(v.distance_km, 20.5);
        assert_eq!(v.duration_min, 60.0);
        assert_eq!(
            v.activity,
            ActivityInput::Cycling {
                elevation_gain_m: 0.0
            }
        );
    }

    #[test]
    fn test_rejects_zero_distance() {
        let err = running("0", "30", "150").validate().unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "distance", .. }));
    }

    #[test]
    fn test_rejects_negative_duration() {
        let err = running("5", "-5", "150").validate().unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "duration", .. }));
    }

    #[test]
    fn test_rejects_nan_and_infinite() {
        assert!(running("5", "30", "NaN").validate().is_err());
        assert!(running("inf", "30", "150").validate().is_err());
        assert!(cycling("5", "30", "-inf").validate().is_err());
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(running("", "30", "150").validate().is_err());
        assert!(running("5", "abc", "150").validate().is_err());
        assert!(cycling("5", "30", "").validate().is_err());
    }

    #[test]
    fn test_cycling_checks_distance() {
        let err = cycling("0", "30", "100").validate().unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "distance", .. }));
    }

    #[test]
    fn test_rejects_negative_elevation() {
        let err = cycling("10", "30", "-1").validate().unwrap_err();
        assert!(matches!(err, ValidationError::Negative { field: "elevation", .. }));
    }

    #[test]
    fn test_unused_field_is_ignored() {
        let mut input = running("5", "30", "150");
        input.elevation = "garbage".into();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_unknown_kind() {
        let mut input = running("5", "30", "150");
        input.kind = "swimming".to_string();
        assert_eq!(
            input.validate().unwrap_err(),
            ValidationError::UnknownKind("swimming".to_string())
        );
    }

    #[test]
    fn test_numeric_fields() {
        let input: FormInput =
            serde_json::from_str(r#"{"type":"running","distance":5,"duration":30.5,"cadence":150}"#)
                .unwrap();
        assert_eq!(input.distance, RawNumber::Number(5.0));
        let v = input.validate().unwrap();
        assert_eq!(v.duration_min, 30.5);
        assert_eq!(
            v.activity,
            ActivityInput::Running {
                cadence_steps_per_min: 150.0
            }
        );
    }

    #[test]
    fn test_numeric_fields_still_validated() {
        let input: FormInput =
            serde_json::from_str(r#"{"type":"running","distance":0,"duration":30,"cadence":150}"#)
                .unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPositive {
                field: "distance",
                value: "0".to_string()
            }
        );

        let mut input = running("5", "30", "150");
        input.cadence = f64::NAN.into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_null_field_is_rejected_not_thrown() {
        let input: FormInput =
            serde_json::from_str(r#"{"type":"cycling","distance":"12","duration":null,"elevation":3}"#)
                .unwrap();
        assert_eq!(input.duration, RawNumber::Missing);
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "duration", .. }));
    }

    #[test]
    fn test_deserialize_from_form_json() {
        let input: FormInput =
            serde_json::from_str(r#"{"type":"cycling","distance":"12","duration":"40","elevation":"80"}"#)
                .unwrap();
        assert_eq!(input.kind, "cycling");
        assert_eq!(input.cadence, RawNumber::Missing);
        assert!(input.validate().is_ok());
    }
}
