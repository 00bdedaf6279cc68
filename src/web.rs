//! Browser adapters: `localStorage`, and the duck-typed JS objects the host
//! page passes in for the form/list UI and the Leaflet map.

use gloo_timers::callback::Timeout;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::app::{MapSurface, Ui};
use crate::error::MaptyError;
use crate::options::PanOptions;
use crate::storage::KeyValueStore;
use crate::view::{MarkerSpec, WorkoutListItem};
use crate::workout::{ActivityKind, Coords};

#[wasm_bindgen]
extern "C" {
    /// Host object driving the form, the workout list and page-level actions.
    #[derive(Clone, Debug)]
    pub type UiHost;

    #[wasm_bindgen(method, catch, js_name = showForm)]
    fn show_form(this: &UiHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = focusDistance)]
    fn focus_distance(this: &UiHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = hideForm)]
    fn hide_form(this: &UiHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = restoreFormDisplay)]
    fn restore_form_display(this: &UiHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = showFieldsFor)]
    fn show_fields_for(this: &UiHost, kind: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = renderWorkout)]
    fn render_workout(this: &UiHost, item: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn alert(this: &UiHost, message: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn reload(this: &UiHost) -> Result<(), JsValue>;

    /// Host wrapper around a Leaflet map.
    #[derive(Clone, Debug)]
    pub type MapHost;

    #[wasm_bindgen(method, catch, js_name = addMarker)]
    fn add_marker(this: &MapHost, marker: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setView)]
    fn set_view(this: &MapHost, coords: JsValue, zoom: u8, pan: JsValue) -> Result<(), JsValue>;
}

fn js_message(e: &JsValue) -> String {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn report(call: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        web_sys::console::error_1(&format!("[mapty] {call} failed: {}", js_message(&e)).into());
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, MaptyError> {
        let unavailable = |message: String| MaptyError::Storage {
            operation: "open",
            key: String::new(),
            message,
        };
        let window = web_sys::window().ok_or_else(|| unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| unavailable(js_message(&e)))?
            .ok_or_else(|| unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

fn storage_err(operation: &'static str, key: &str, e: JsValue) -> MaptyError {
    MaptyError::Storage {
        operation,
        key: key.to_string(),
        message: js_message(&e),
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, MaptyError> {
        self.storage
            .get_item(key)
            .map_err(|e| storage_err("read", key, e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MaptyError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| storage_err("write", key, e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), MaptyError> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_err("remove", key, e))
    }
}

pub struct JsUi {
    host: UiHost,
    form_reset_delay_ms: u32,
}

impl JsUi {
    pub fn new(host: UiHost, form_reset_delay_ms: u32) -> Self {
        Self {
            host,
            form_reset_delay_ms,
        }
    }
}

impl Ui for JsUi {
    fn show_form(&mut self) {
        report("showForm", self.host.show_form());
    }

    fn focus_distance(&mut self) {
        report("focusDistance", self.host.focus_distance());
    }

    fn hide_form(&mut self) {
        report("hideForm", self.host.hide_form());
        // Let the slide-out transition finish before the form takes space again.
        let host = self.host.clone();
        Timeout::new(self.form_reset_delay_ms, move || {
            report("restoreFormDisplay", host.restore_form_display());
        })
        .forget();
    }

    fn show_fields_for(&mut self, kind: ActivityKind) {
        report("showFieldsFor", self.host.show_fields_for(kind.tag()));
    }

    fn render_workout(&mut self, item: &WorkoutListItem) {
        report(
            "renderWorkout",
            to_js(item).and_then(|v| self.host.render_workout(v)),
        );
    }

    fn alert(&mut self, message: &str) {
        report("alert", self.host.alert(message));
    }

    fn reload(&mut self) {
        report("reload", self.host.reload());
    }
}

pub struct JsMap {
    host: MapHost,
}

impl JsMap {
    pub fn new(host: MapHost) -> Self {
        Self { host }
    }
}

impl MapSurface for JsMap {
    fn add_marker(&mut self, marker: &MarkerSpec) {
        report(
            "addMarker",
            to_js(marker).and_then(|v| self.host.add_marker(v)),
        );
    }

    fn set_view(&mut self, coords: Coords, zoom: u8, pan: &PanOptions) {
        let result = to_js(&coords)
            .and_then(|c| Ok((c, to_js(pan)?)))
            .and_then(|(c, p)| self.host.set_view(c, zoom, p));
        report("setView", result);
    }
}
