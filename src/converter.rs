use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::error::MaptyError;
use crate::record::WorkoutRecord;
use crate::view;

/// Convert a workout list to a GeoJSON FeatureCollection of Points.
pub fn to_feature_collection(records: &[WorkoutRecord]) -> Result<FeatureCollection, MaptyError> {
    let features = records
        .iter()
        .map(workout_to_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn workout_to_feature(record: &WorkoutRecord) -> Result<Feature, MaptyError> {
    // GeoJSON positions are [lon, lat]
    let geometry = Geometry::new(Value::Point(vec![
        record.coordinates.lng,
        record.coordinates.lat,
    ]));

    let mut props = match serde_json::to_value(record)? {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    };
    props.remove("coordinates");
    props.insert(
        "summary".to_string(),
        JsonValue::String(view::summary_for(record)),
    );

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(Id::String(record.id.clone())),
        properties: Some(props),
        foreign_members: None,
    })
}
