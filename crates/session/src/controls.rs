use gpu::GpuResources;
use grid::{AngularStep, StepError};
use runtime::{Frame, RefreshGate};
use tracing::debug;

use crate::config::{CameraConfig, ViewerConfig};
use crate::error::SessionError;
use crate::session::RenderSession;
use crate::status::{GridReport, memory_label, points_label};

/// Toolbar state without a DOM.
///
/// The render button is only enabled after the step changes, and a click
/// defers the regeneration to the next frame so the spinner can paint first.
#[derive(Debug)]
pub struct ControlPanel {
    step_options: Vec<AngularStep>,
    selected_step: AngularStep,
    needs_render: bool,
    render_enabled: bool,
    spinner_visible: bool,
    graticule_checked: bool,
    grid_checked: bool,
    texture: String,
    gate: RefreshGate<AngularStep>,
    last_report: Option<GridReport>,
    pub zoom: CameraZoom,
}

impl ControlPanel {
    /// Starts with the initial refresh already scheduled.
    pub fn new(config: &ViewerConfig) -> Self {
        let mut panel = Self {
            step_options: config.step_options.clone(),
            selected_step: config.initial_step,
            needs_render: false,
            render_enabled: false,
            spinner_visible: false,
            graticule_checked: true,
            grid_checked: true,
            texture: config.default_texture.clone(),
            gate: RefreshGate::new(),
            last_report: None,
            zoom: CameraZoom::new(config.grid.radius, &config.camera),
        };
        panel.schedule(config.initial_step);
        panel
    }

    pub fn step_options(&self) -> &[AngularStep] {
        &self.step_options
    }

    pub fn selected_step(&self) -> AngularStep {
        self.selected_step
    }

    pub fn select_step(&mut self, step: AngularStep) {
        self.selected_step = step;
        self.needs_render = true;
        self.render_enabled = true;
    }

    /// Parses the selector's string value. Invalid input changes nothing.
    pub fn select_step_str(&mut self, value: &str) -> Result<AngularStep, StepError> {
        let step: AngularStep = value.parse()?;
        self.select_step(step);
        Ok(step)
    }

    /// Render button click. Returns `false` when a regeneration is already
    /// pending.
    pub fn request_render(&mut self) -> bool {
        if !self.schedule(self.selected_step) {
            return false;
        }
        self.needs_render = false;
        self.render_enabled = false;
        true
    }

    fn schedule(&mut self, step: AngularStep) -> bool {
        if !self.gate.request(step) {
            return false;
        }
        self.spinner_visible = true;
        true
    }

    /// Runs a due regeneration against `session`. Returns the new report when
    /// one ran.
    pub fn on_frame<G: GpuResources>(
        &mut self,
        frame: Frame,
        session: &mut RenderSession<G>,
    ) -> Result<Option<GridReport>, SessionError> {
        session.begin_frame(frame);
        let Some(step) = self.gate.take_due(frame) else {
            return Ok(None);
        };
        debug!(frame = frame.index, %step, "running scheduled regeneration");
        let result = session.regenerate(step);
        self.spinner_visible = false;
        match result {
            Ok(report) => {
                self.last_report = Some(report);
                Ok(Some(report))
            }
            Err(err) => {
                // A failed upload may have cleared the grid; show what is left.
                self.last_report = session.report();
                // Let the user try again.
                self.needs_render = true;
                self.render_enabled = true;
                Err(err)
            }
        }
    }

    pub fn set_graticule_checked<G: GpuResources>(
        &mut self,
        checked: bool,
        session: &mut RenderSession<G>,
    ) {
        self.graticule_checked = checked;
        session.set_graticule_visible(checked);
    }

    pub fn set_grid_checked<G: GpuResources>(
        &mut self,
        checked: bool,
        session: &mut RenderSession<G>,
    ) {
        self.grid_checked = checked;
        session.set_points_visible(checked);
    }

    pub fn select_texture(&mut self, name: &str) {
        self.texture = name.to_string();
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    pub fn render_enabled(&self) -> bool {
        self.render_enabled
    }

    pub fn spinner_visible(&self) -> bool {
        self.spinner_visible
    }

    pub fn graticule_checked(&self) -> bool {
        self.graticule_checked
    }

    pub fn grid_checked(&self) -> bool {
        self.grid_checked
    }

    pub fn last_report(&self) -> Option<GridReport> {
        self.last_report
    }

    pub fn status_points(&self) -> String {
        points_label(self.last_report.map_or(0, |r| r.count))
    }

    pub fn status_memory(&self) -> String {
        memory_label(self.last_report.map_or(0, |r| r.byte_size))
    }
}

const ZOOM_IN: f64 = 0.85;
const ZOOM_OUT: f64 = 1.18;
/// Closest approach as a multiple of the globe radius.
const MIN_DISTANCE_FACTOR: f64 = 1.05;
const FIT_FRACTION: f64 = 0.7;

/// Camera distance from the globe center along the view axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraZoom {
    distance: f64,
    home: f64,
    min: f64,
    max: f64,
    fov_y_deg: f64,
}

impl CameraZoom {
    pub fn new(radius: f64, camera: &CameraConfig) -> Self {
        let min = radius * MIN_DISTANCE_FACTOR;
        let max = camera.max_distance.max(min);
        let home = camera.distance.clamp(min, max);
        Self {
            distance: home,
            home,
            min,
            max,
            fov_y_deg: camera.fov_y_deg,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn fov_y_deg(&self) -> f64 {
        self.fov_y_deg
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_distance(self.distance * ZOOM_IN)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_distance(self.distance * ZOOM_OUT)
    }

    pub fn reset(&mut self) -> f64 {
        self.set_distance(self.home)
    }

    /// Frames the whole globe with some margin.
    pub fn fit(&mut self, radius: f64) -> f64 {
        self.set_distance(fit_distance(radius, self.fov_y_deg.to_radians(), FIT_FRACTION))
    }

    fn set_distance(&mut self, distance: f64) -> f64 {
        self.distance = distance.clamp(self.min, self.max);
        self.distance
    }
}

/// Distance at which a sphere of `radius` fills `fraction` of a viewport with
/// vertical field of view `fov_y` (radians).
pub fn fit_distance(radius: f64, fov_y: f64, fraction: f64) -> f64 {
    (radius / (fov_y / 2.0).sin()) / (fraction / 2.0)
}
