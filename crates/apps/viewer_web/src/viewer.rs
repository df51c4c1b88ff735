use gpu::{DecodedImage, GpuResources, RenderFrame};
use runtime::{Event, Frame};
use scene::components::Rgb;
use session::{
    AssetError, ControlPanel, GridReport, RenderSession, SessionError, SwapOutcome,
    TextureRequest, ViewerConfig,
};

use crate::camera::{Mat4, ViewParams};

/// Everything behind the page: session, toolbar state and the frame clock.
#[derive(Debug)]
pub struct Viewer<G: GpuResources> {
    pub session: RenderSession<G>,
    pub panel: ControlPanel,
    config: ViewerConfig,
    frame: Option<Frame>,
    canvas_width: f64,
    canvas_height: f64,
}

impl<G: GpuResources> Viewer<G> {
    pub fn new(gpu: G, config: ViewerConfig) -> Result<Self, SessionError> {
        let session = RenderSession::new(gpu, &config)?;
        let panel = ControlPanel::new(&config);
        Ok(Self {
            session,
            panel,
            config,
            frame: None,
            canvas_width: 1280.0,
            canvas_height: 720.0,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn background(&self) -> Rgb {
        self.config.background
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Advances to the frame at `timestamp_ms` and runs a due regeneration.
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<Option<GridReport>, SessionError> {
        let frame = match self.frame {
            Some(prev) => prev.advance_ms(timestamp_ms),
            None => Frame::first().advance_ms(timestamp_ms),
        };
        self.frame = Some(frame);
        self.panel.on_frame(frame, &mut self.session)
    }

    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn render_frame(&self) -> RenderFrame {
        self.session.render_frame()
    }

    pub fn view_params(&self) -> ViewParams {
        let camera = &self.config.camera;
        ViewParams {
            distance: self.panel.zoom.distance(),
            fov_y_deg: self.panel.zoom.fov_y_deg(),
            near: camera.near,
            far: camera.far,
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_params().view_proj()
    }

    pub fn set_graticule_visible(&mut self, visible: bool) {
        self.panel.set_graticule_checked(visible, &mut self.session);
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.panel.set_grid_checked(visible, &mut self.session);
    }

    pub fn zoom_fit(&mut self) -> f64 {
        self.panel.zoom.fit(self.config.grid.radius)
    }

    pub fn begin_texture(&mut self, name: &str) -> Result<TextureRequest, SessionError> {
        self.session.begin_texture_swap(name)
    }

    /// The selector follows the globe: it only changes once a texture is
    /// actually applied.
    pub fn finish_texture(
        &mut self,
        request: TextureRequest,
        loaded: Result<DecodedImage, AssetError>,
    ) -> Result<SwapOutcome, SessionError> {
        let outcome = self.session.complete_texture_swap(request, loaded)?;
        if let SwapOutcome::Applied { name } = &outcome {
            self.panel.select_texture(name);
        }
        Ok(outcome)
    }

    /// Takes the session events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.session.events_mut().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::Viewer;
    use gpu::{DecodedImage, HeadlessGpu, RenderCommand};
    use pretty_assertions::assert_eq;
    use runtime::EventKind;
    use session::{AssetError, SwapOutcome, ViewerConfig};

    fn viewer() -> Viewer<HeadlessGpu> {
        Viewer::new(HeadlessGpu::new(), ViewerConfig::default()).unwrap()
    }

    #[test]
    fn first_tick_draws_the_initial_grid() {
        let mut v = viewer();
        assert_eq!(v.render_frame().commands.len(), 2);
        let report = v.tick(16.0).unwrap().unwrap();
        assert_eq!(report.count, 7_320);
        assert_eq!(v.render_frame().commands.len(), 3);
        assert_eq!(v.tick(32.0).unwrap(), None);
    }

    #[test]
    fn render_request_runs_on_next_tick() {
        let mut v = viewer();
        v.tick(0.0).unwrap();
        v.panel.select_step_str("10").unwrap();
        assert!(v.panel.request_render());
        assert!(v.panel.spinner_visible());
        let report = v.tick(16.0).unwrap().unwrap();
        assert_eq!(report.count, 19 * 36);
        assert_eq!(v.panel.status_points(), "Points: 684");
        assert!(!v.panel.spinner_visible());
    }

    #[test]
    fn zoom_changes_projection() {
        let mut v = viewer();
        let before = v.view_proj();
        v.panel.zoom.zoom_in();
        assert_ne!(v.view_proj(), before);
        v.panel.zoom.reset();
        assert_eq!(v.view_proj(), before);
    }

    #[test]
    fn texture_arrives_asynchronously() {
        let mut v = viewer();
        let default = v.panel.texture().to_string();
        let request = v.begin_texture("earth_precipitation.png").unwrap();
        assert_eq!(request.path, "assets/earth_precipitation.png");
        assert_eq!(v.panel.texture(), default);

        let image = DecodedImage::solid(2, 2, [1, 2, 3, 255]).unwrap();
        let outcome = v.finish_texture(request, Ok(image)).unwrap();
        assert!(matches!(outcome, SwapOutcome::Applied { .. }));
        assert_eq!(v.panel.texture(), "earth_precipitation.png");
        assert!(matches!(
            v.render_frame().commands[0],
            RenderCommand::Globe {
                texture: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn grid_toggle_hides_points() {
        let mut v = viewer();
        v.tick(0.0).unwrap();
        v.set_grid_visible(false);
        assert!(
            !v.render_frame()
                .commands
                .iter()
                .any(|c| matches!(c, RenderCommand::Points { .. }))
        );
    }

    #[test]
    fn failed_and_stale_loads_leave_selector_alone() {
        let mut v = viewer();
        let default = v.panel.texture().to_string();

        let missing = v.begin_texture("earth_pollution.png").unwrap();
        let err = AssetError::NotFound {
            path: missing.path.clone(),
        };
        assert!(v.finish_texture(missing, Err(err)).is_err());
        assert_eq!(v.panel.texture(), default);

        let slow = v.begin_texture("earth_temperature.png").unwrap();
        let _newer = v.begin_texture("earth_vegitation.jpg").unwrap();
        let image = DecodedImage::solid(2, 2, [0, 0, 0, 255]).unwrap();
        let outcome = v.finish_texture(slow, Ok(image)).unwrap();
        assert!(matches!(outcome, SwapOutcome::Stale { .. }));
        assert_eq!(v.panel.texture(), default);
    }

    #[test]
    fn events_are_drained_once() {
        let mut v = viewer();
        v.tick(0.0).unwrap();
        let events = v.drain_events();
        assert!(
            events
                .iter()
                .any(|e| e.kind == EventKind::GridRegenerated)
        );
        assert!(v.drain_events().is_empty());
    }
}
