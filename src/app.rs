use chrono::{DateTime, Local};

use crate::form::{FormInput, INVALID_INPUT_MESSAGE, ValidationError};
use crate::options::{AppOptions, PanOptions};
use crate::record::WorkoutRecord;
use crate::storage::{KeyValueStore, WorkoutRepository};
use crate::view::{self, MarkerSpec, WorkoutListItem};
use crate::workout::{ActivityKind, Coords, Workout};

/// Alert text shown when the initial position cannot be acquired.
pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Could not get your position";

/// Alert text shown when the workout list could not be written to storage.
pub const SAVE_FAILED_MESSAGE: &str = "Could not save your workouts. They will be lost on reload.";

/// The page around the map: form, workout list, alerts.
pub trait Ui {
    fn show_form(&mut self);
    fn focus_distance(&mut self);
    /// Clear the inputs and hide the form.
    fn hide_form(&mut self);
    /// Show the cadence or elevation row, whichever belongs to `kind`.
    fn show_fields_for(&mut self, kind: ActivityKind);
    fn render_workout(&mut self, item: &WorkoutListItem);
    fn alert(&mut self, message: &str);
    fn reload(&mut self);
}

/// The interactive map, available once the initial position is known.
pub trait MapSurface {
    fn add_marker(&mut self, marker: &MarkerSpec);
    fn set_view(&mut self, coords: Coords, zoom: u8, pan: &PanOptions);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Idle,
    AwaitingInput { pending: Coords },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    NoPendingLocation,
    Invalid(ValidationError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPendingLocation => write!(f, "No map location selected"),
            Self::Invalid(e) => write!(f, "Invalid input: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}

type Clock = Box<dyn Fn() -> DateTime<Local>>;

/// Owns the workout list and keeps the map, the list view and storage in step.
pub struct App<S, U, M> {
    repo: WorkoutRepository<S>,
    ui: U,
    map: Option<M>,
    form: FormState,
    workouts: Vec<WorkoutRecord>,
    options: AppOptions,
    clock: Clock,
}

impl<S: KeyValueStore, U: Ui, M: MapSurface> App<S, U, M> {
    pub fn new(store: S, ui: U, options: AppOptions) -> Self {
        Self {
            repo: WorkoutRepository::new(store, options.storage_key.clone()),
            ui,
            map: None,
            form: FormState::Idle,
            workouts: Vec::new(),
            options,
            clock: Box::new(Local::now),
        }
    }

    /// Replace the time source used to stamp new workouts.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn workouts(&self) -> &[WorkoutRecord] {
        &self.workouts
    }

    pub fn form_state(&self) -> FormState {
        self.form
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    /// Stage one of start-up: restore the persisted list and render it.
    /// Markers wait for the map unless it is already there.
    pub fn on_load(&mut self) {
        let restored = self.repo.load();
        if restored.is_empty() {
            tracing::debug!("no stored workouts");
            return;
        }

        tracing::info!(count = restored.len(), "restored workouts");
        self.workouts = restored;
        for record in &self.workouts {
            self.ui.render_workout(&view::list_item_for(record));
        }
        if let Some(map) = self.map.as_mut() {
            for record in &self.workouts {
                map.add_marker(&view::marker_for(record, &self.options.popup));
            }
        }
    }

    /// Stage two of start-up: the map exists, so every loaded workout gets a marker.
    pub fn on_map_ready(&mut self, mut map: M) {
        for record in &self.workouts {
            map.add_marker(&view::marker_for(record, &self.options.popup));
        }
        tracing::debug!(markers = self.workouts.len(), "map ready");
        self.map = Some(map);
    }

    pub fn on_position_unavailable(&mut self) {
        tracing::warn!("geolocation unavailable, map disabled");
        self.ui.alert(POSITION_UNAVAILABLE_MESSAGE);
    }

    pub fn on_map_click(&mut self, coords: Coords) {
        self.form = FormState::AwaitingInput { pending: coords };
        self.ui.show_form();
        self.ui.focus_distance();
    }

    pub fn on_type_change(&mut self, kind: ActivityKind) {
        self.ui.show_fields_for(kind);
    }

    /// Validate the form and commit a new workout at the pending location.
    ///
    /// A rejected submission raises one alert and leaves the list, storage,
    /// the pending location and the form untouched. A failed save keeps the
    /// workout in memory and alerts the user.
    pub fn on_form_submit(&mut self, input: &FormInput) -> Result<WorkoutRecord, SubmitError> {
        let FormState::AwaitingInput { pending } = self.form else {
            tracing::warn!("form submitted without a map location");
            return Err(SubmitError::NoPendingLocation);
        };

        let form = match input.validate() {
            Ok(form) => form,
            Err(e) => {
                tracing::debug!(err = %e, "rejected workout form");
                self.ui.alert(INVALID_INPUT_MESSAGE);
                return Err(e.into());
            }
        };

        let workout = Workout::new(
            pending,
            (self.clock)(),
            form.distance_km,
            form.duration_min,
            form.activity,
        );
        let record = WorkoutRecord::from(&workout);
        tracing::info!(id = %record.id, kind = record.kind.tag(), "new workout");

        if let Some(map) = self.map.as_mut() {
            map.add_marker(&view::marker_for(&record, &self.options.popup));
        }
        self.ui.render_workout(&view::list_item_for(&record));
        self.ui.hide_form();
        self.form = FormState::Idle;

        self.workouts.push(record.clone());
        if let Err(e) = self.repo.save(&self.workouts) {
            tracing::error!(err = %e, count = self.workouts.len(), "could not persist workouts");
            self.ui.alert(SAVE_FAILED_MESSAGE);
        }

        Ok(record)
    }

    /// Pan to the clicked workout. Unknown ids are ignored.
    pub fn on_workout_click(&mut self, id: &str) {
        let Some(coords) = view::locate(&self.workouts, id) else {
            tracing::debug!(id, "no workout for list item");
            return;
        };
        if let Some(map) = self.map.as_mut() {
            map.set_view(coords, self.options.map_zoom, &self.options.pan);
        }
    }

    /// Wipe persisted workouts and reload the page.
    pub fn reset(&mut self) {
        if let Err(e) = self.repo.clear() {
            tracing::error!(err = %e, "could not clear stored workouts");
        }
        self.ui.reload();
    }
}
