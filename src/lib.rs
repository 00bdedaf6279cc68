pub mod app;
pub mod converter;
pub mod error;
pub mod form;
pub mod gpx;
pub mod logging;
pub mod options;
pub mod record;
pub mod storage;
pub mod view;
pub mod web;
pub mod workout;

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::error::MaptyError;
use crate::form::FormInput;
use crate::options::AppOptions;
use crate::web::{JsMap, JsUi, LocalStorage, MapHost, UiHost};
use crate::workout::{ActivityKind, Coords};

/// The workout tracker bound to `localStorage` and the host page.
#[wasm_bindgen]
pub struct Mapty {
    inner: App<LocalStorage, JsUi, JsMap>,
}

#[wasm_bindgen]
impl Mapty {
    #[wasm_bindgen(constructor)]
    pub fn new(ui: UiHost, options: JsValue) -> Result<Mapty, JsValue> {
        console_error_panic_hook::set_once();

        let opts = parse_options(options)?;
        logging::init(opts.max_log_level());
        let store = LocalStorage::open()?;
        let ui = JsUi::new(ui, opts.form_reset_delay_ms);
        Ok(Mapty {
            inner: App::new(store, ui, opts),
        })
    }

    /// Restore persisted workouts into the list. Call once at start-up.
    pub fn load(&mut self) {
        self.inner.on_load();
    }

    /// Hand over the map once geolocation succeeded.
    #[wasm_bindgen(js_name = mapReady)]
    pub fn map_ready(&mut self, map: MapHost) {
        self.inner.on_map_ready(JsMap::new(map));
    }

    #[wasm_bindgen(js_name = positionUnavailable)]
    pub fn position_unavailable(&mut self) {
        self.inner.on_position_unavailable();
    }

    #[wasm_bindgen(js_name = mapClick)]
    pub fn map_click(&mut self, lat: f64, lng: f64) {
        self.inner.on_map_click(Coords::new(lat, lng));
    }

    #[wasm_bindgen(js_name = typeChange)]
    pub fn type_change(&mut self, kind: &str) {
        match ActivityKind::from_tag(kind) {
            Some(kind) => self.inner.on_type_change(kind),
            None => tracing::warn!(kind, "unknown workout type selected"),
        }
    }

    /// Submit the form. Returns `false` when the input was rejected.
    pub fn submit(&mut self, form: JsValue) -> Result<bool, JsValue> {
        let input: FormInput =
            serde_wasm_bindgen::from_value(form).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.inner.on_form_submit(&input).is_ok())
    }

    #[wasm_bindgen(js_name = workoutClick)]
    pub fn workout_click(&mut self, id: &str) {
        self.inner.on_workout_click(id);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// The current workout list in its persisted shape.
    pub fn workouts(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.workouts())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Convert a persisted workout list (JSON string) to GeoJSON, returned as a JS object.
#[wasm_bindgen(js_name = workoutsToGeoJson)]
pub fn workouts_to_geojson(workouts_json: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let records = storage::parse_records(workouts_json)?;
    let fc = converter::to_feature_collection(&records)?;
    serde_wasm_bindgen::to_value(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a persisted workout list (JSON string) to GeoJSON, returned as a JSON string.
#[wasm_bindgen(js_name = workoutsToGeoJsonString)]
pub fn workouts_to_geojson_string(workouts_json: &str) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let records = storage::parse_records(workouts_json)?;
    let fc = converter::to_feature_collection(&records)?;
    serde_json::to_string(&fc).map_err(|e| MaptyError::from(e).into())
}

/// Convert a persisted workout list (JSON string) to a GPX document.
#[wasm_bindgen(js_name = workoutsToGpx)]
pub fn workouts_to_gpx(workouts_json: &str) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let records = storage::parse_records(workouts_json)?;
    Ok(gpx::to_gpx(&records)?)
}

fn parse_options(options: JsValue) -> Result<AppOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(AppOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
