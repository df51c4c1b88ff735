use foundation::ids::{BufferId, TextureId};
use gpu::{DecodedImage, GpuError, GpuResources, RenderFrame, Renderer, Residency};
use grid::{AngularStep, Graticule, GridParams, PointCap, generate_grid};
use runtime::{EventBus, EventKind, Frame, Metrics};
use scene::World;
use scene::components::{Drawable3D, LineMaterial, PointMaterial, Visibility};
use scene::entity::EntityId;
use scene::prefabs::globe::{set_globe_texture, spawn_globe};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::error::{AssetError, SessionError};
use crate::slot::{Release, ResourceSlot};
use crate::status::GridReport;
use crate::texture::{AssetLoader, SwapOutcome, TextureCatalog, TextureRequest};

pub const METRIC_REGENERATIONS: &str = "grid.regenerations";
pub const METRIC_GRID_POINTS: &str = "grid.points";
pub const METRIC_TEXTURE_SWAPS: &str = "texture.swaps";
pub const METRIC_RESIDENT_BYTES: &str = "gpu.resident_bytes";

/// The scene plus the GPU that backs it. Slots release into this.
#[derive(Debug)]
pub struct Stage<G> {
    pub world: World,
    pub gpu: G,
}

/// The live point grid: one scene entity over one vertex buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct PointSet {
    pub entity: EntityId,
    pub buffer: BufferId,
    pub count: u32,
}

/// The graticule overlay.
#[derive(Debug, PartialEq, Eq)]
pub struct LineSet {
    pub entity: EntityId,
    pub buffer: BufferId,
    pub vertex_count: u32,
}

/// The texture currently assigned to the globe.
#[derive(Debug, PartialEq, Eq)]
pub struct GlobeTexture {
    pub name: String,
    pub texture: TextureId,
}

impl<G: GpuResources> Release<Stage<G>> for PointSet {
    type Error = GpuError;

    // The entity stays on screen until its buffer is actually gone.
    fn release(&self, stage: &mut Stage<G>) -> Result<(), GpuError> {
        stage.gpu.release_buffer(self.buffer)?;
        stage.world.remove(self.entity);
        Ok(())
    }
}

impl<G: GpuResources> Release<Stage<G>> for LineSet {
    type Error = GpuError;

    // The entity stays on screen until its buffer is actually gone.
    fn release(&self, stage: &mut Stage<G>) -> Result<(), GpuError> {
        stage.gpu.release_buffer(self.buffer)?;
        stage.world.remove(self.entity);
        Ok(())
    }
}

impl<G: GpuResources> Release<Stage<G>> for GlobeTexture {
    type Error = GpuError;

    // The globe may still point at this id for a moment; it is reassigned
    // before release on swap and detached with the globe on shutdown.
    fn release(&self, stage: &mut Stage<G>) -> Result<(), GpuError> {
        stage.gpu.release_texture(self.texture)
    }
}

/// Owns everything on screen: the globe, the graticule, at most one point set
/// and at most one globe texture.
#[derive(Debug)]
pub struct RenderSession<G: GpuResources> {
    stage: Stage<G>,
    params: GridParams,
    cap: PointCap,
    point_material: PointMaterial,
    catalog: TextureCatalog,
    globe: Option<EntityId>,
    graticule: ResourceSlot<LineSet>,
    points: ResourceSlot<PointSet>,
    texture: ResourceSlot<GlobeTexture>,
    points_visible: bool,
    graticule_visible: bool,
    texture_generation: u64,
    report: Option<GridReport>,
    frame: Frame,
    events: EventBus,
    metrics: Metrics,
}

impl<G: GpuResources> RenderSession<G> {
    /// Spawns the globe and uploads the graticule. The point grid and the
    /// texture arrive later through `regenerate` and the texture swap.
    pub fn new(gpu: G, config: &ViewerConfig) -> Result<Self, SessionError> {
        let mut stage = Stage {
            world: World::new(),
            gpu,
        };
        let globe = spawn_globe(&mut stage.world, config.grid.radius);

        let graticule = Graticule::build(config.grid.radius, config.graticule);
        let mut slot = ResourceSlot::new();
        let lines = config.lines;
        slot.rebuild_with(&mut stage, |stage: &mut Stage<G>| {
            upload_lines(stage, &graticule, lines)
        })?;

        let mut session = Self {
            stage,
            params: config.grid,
            cap: config.point_cap,
            point_material: config.points,
            catalog: TextureCatalog::from_config(config),
            globe: Some(globe),
            graticule: slot,
            points: ResourceSlot::new(),
            texture: ResourceSlot::new(),
            points_visible: true,
            graticule_visible: true,
            texture_generation: 0,
            report: None,
            frame: Frame::first(),
            events: EventBus::new(),
            metrics: Metrics::new(),
        };
        session.events.emit(
            session.frame,
            EventKind::GraticuleBuilt,
            format!("{} lines", graticule.line_count()),
        );
        session.record_residency();
        Ok(session)
    }

    /// Stamps subsequent events with `frame`.
    pub fn begin_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Replaces the point grid with a fresh one for `step`.
    ///
    /// The previous buffer is released before the new one is uploaded. If the
    /// upload fails the grid stays empty and the error is returned.
    pub fn regenerate(&mut self, step: AngularStep) -> Result<GridReport, SessionError> {
        self.ensure_live()?;
        let grid = generate_grid(step, self.cap, self.params);
        let count = u32::try_from(grid.count)
            .map_err(|_| SessionError::TooManyPoints { count: grid.count })?;

        let material = self.point_material;
        let visible = self.points_visible;
        let positions = &grid.positions;
        let rebuilt = self
            .points
            .rebuild_with(&mut self.stage, |stage: &mut Stage<G>| {
                let buffer = stage.gpu.create_vertex_buffer("grid points", positions)?;
                let entity = stage
                    .world
                    .add(Drawable3D::points(buffer, count, material));
                stage.world.set_visibility(entity, Visibility::from(visible));
                Ok::<_, SessionError>(PointSet {
                    entity,
                    buffer,
                    count,
                })
            })
            .map(|_| ());
        if let Err(err) = rebuilt {
            warn!(%step, error = %err, "grid upload failed");
            // The report must describe what is on screen.
            if !self.points.is_occupied() {
                self.report = None;
            }
            self.record_residency();
            return Err(err);
        }

        let report = GridReport::from_grid(&grid);
        self.report = Some(report);
        self.metrics.inc_counter(METRIC_REGENERATIONS);
        self.metrics.observe(METRIC_GRID_POINTS, report.count as u64);
        self.record_residency();
        self.events.emit(
            self.frame,
            EventKind::GridRegenerated,
            format!("step={step} count={} skip={}", report.count, report.skip),
        );
        info!(
            %step,
            count = report.count,
            skip = report.skip,
            bytes = report.byte_size,
            "grid regenerated"
        );
        Ok(report)
    }

    /// Shows or hides the point grid without regenerating. Later grids inherit
    /// the flag.
    pub fn set_points_visible(&mut self, visible: bool) {
        self.points_visible = visible;
        if let Some(points) = self.points.get() {
            self.stage
                .world
                .set_visibility(points.entity, Visibility::from(visible));
        }
    }

    pub fn set_graticule_visible(&mut self, visible: bool) {
        self.graticule_visible = visible;
        if let Some(lines) = self.graticule.get() {
            self.stage
                .world
                .set_visibility(lines.entity, Visibility::from(visible));
        }
    }

    pub fn points_visible(&self) -> bool {
        self.points_visible
    }

    pub fn graticule_visible(&self) -> bool {
        self.graticule_visible
    }

    /// Issues a load request for `name`. Any earlier request still in flight
    /// becomes stale.
    pub fn begin_texture_swap(&mut self, name: &str) -> Result<TextureRequest, SessionError> {
        self.ensure_live()?;
        let path = self
            .catalog
            .path(name)
            .ok_or_else(|| SessionError::UnknownTexture(name.to_string()))?;
        self.texture_generation += 1;
        debug!(name, generation = self.texture_generation, "texture requested");
        Ok(TextureRequest {
            name: name.to_string(),
            path,
            generation: self.texture_generation,
        })
    }

    /// Applies a finished load.
    ///
    /// Stale completions are dropped without uploading. Otherwise the new image
    /// is uploaded and assigned before the old texture is released, so a
    /// failure at any step leaves the current texture on the globe.
    pub fn complete_texture_swap(
        &mut self,
        request: TextureRequest,
        loaded: Result<DecodedImage, AssetError>,
    ) -> Result<SwapOutcome, SessionError> {
        self.ensure_live()?;
        if request.generation != self.texture_generation {
            debug!(
                name = %request.name,
                generation = request.generation,
                latest = self.texture_generation,
                "dropping stale texture"
            );
            self.events
                .emit(self.frame, EventKind::TextureStale, request.name.clone());
            return Ok(SwapOutcome::Stale {
                name: request.name,
                generation: request.generation,
            });
        }

        let image = match loaded {
            Ok(image) => image,
            Err(err) => {
                warn!(name = %request.name, error = %err, "texture load failed; keeping current");
                self.events
                    .emit(self.frame, EventKind::TextureFailed, err.to_string());
                return Err(err.into());
            }
        };

        let globe = self.globe.ok_or(SessionError::MissingGlobe)?;
        let name = request.name;
        self.texture
            .swap_with(&mut self.stage, |stage: &mut Stage<G>| {
                let texture = stage.gpu.create_texture(&name, &image)?;
                if set_globe_texture(&mut stage.world, globe, texture).is_none() {
                    stage.gpu.release_texture(texture)?;
                    return Err(SessionError::MissingGlobe);
                }
                Ok::<_, SessionError>(GlobeTexture {
                    name: name.clone(),
                    texture,
                })
            })
            .inspect_err(|e| {
                warn!(name = %name, error = %e, "texture upload failed; keeping current")
            })?;

        self.metrics.inc_counter(METRIC_TEXTURE_SWAPS);
        self.record_residency();
        self.events
            .emit(self.frame, EventKind::TextureSwapped, name.clone());
        info!(name = %name, "texture swapped");
        Ok(SwapOutcome::Applied { name })
    }

    /// Loads `name` synchronously and applies it.
    pub fn switch_texture(
        &mut self,
        name: &str,
        loader: &mut impl AssetLoader,
    ) -> Result<SwapOutcome, SessionError> {
        let request = self.begin_texture_swap(name)?;
        let loaded = loader.load(&request.path);
        self.complete_texture_swap(request, loaded)
    }

    /// Releases everything. The session refuses further work afterwards.
    ///
    /// Every release is attempted even when an earlier one fails; the first
    /// error is returned. Resources whose release failed stay owned, so
    /// calling `shutdown` again retries them.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        let first_call = self.globe.is_some();
        if let Some(globe) = self.globe.take() {
            self.stage.world.remove(globe);
        }
        let results = [
            self.points.retire(&mut self.stage),
            self.graticule.retire(&mut self.stage),
            self.texture.retire(&mut self.stage),
        ];
        self.report = None;
        self.record_residency();
        if first_call {
            self.events
                .emit(self.frame, EventKind::Shutdown, "session shut down");
        }

        if let Some(err) = results.into_iter().find_map(Result::err) {
            warn!(error = %err, residency = ?self.residency(), "shutdown left resources resident");
            return Err(err.into());
        }
        let mean_points = self
            .metrics
            .distribution(METRIC_GRID_POINTS)
            .and_then(|d| d.mean());
        info!(
            metrics = ?self.metrics.snapshot(),
            ?mean_points,
            "render session shut down"
        );
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.globe.is_none()
    }

    /// Draw commands for the current frame.
    pub fn render_frame(&self) -> RenderFrame {
        Renderer::collect(&self.stage.world)
    }

    pub fn report(&self) -> Option<GridReport> {
        self.report
    }

    pub fn residency(&self) -> Residency {
        self.stage.gpu.residency()
    }

    pub fn points(&self) -> Option<&PointSet> {
        self.points.get()
    }

    pub fn graticule(&self) -> Option<&LineSet> {
        self.graticule.get()
    }

    pub fn current_texture(&self) -> Option<&str> {
        self.texture.get().map(|t| t.name.as_str())
    }

    pub fn globe(&self) -> Option<EntityId> {
        self.globe
    }

    pub fn catalog(&self) -> &TextureCatalog {
        &self.catalog
    }

    pub fn world(&self) -> &World {
        &self.stage.world
    }

    pub fn gpu(&self) -> &G {
        &self.stage.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut G {
        &mut self.stage.gpu
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.globe.is_none() {
            return Err(SessionError::ShutDown);
        }
        Ok(())
    }

    fn record_residency(&mut self) {
        let bytes = self.stage.gpu.residency().total_bytes();
        self.metrics.set_gauge(METRIC_RESIDENT_BYTES, bytes as u64);
    }
}

fn upload_lines<G: GpuResources>(
    stage: &mut Stage<G>,
    graticule: &Graticule,
    material: LineMaterial,
) -> Result<LineSet, SessionError> {
    let vertices = graticule.line_list();
    let vertex_count = u32::try_from(vertices.len() / 3).map_err(|_| {
        SessionError::TooManyPoints {
            count: vertices.len() / 3,
        }
    })?;
    let buffer = stage.gpu.create_vertex_buffer("graticule", &vertices)?;
    let entity = stage
        .world
        .add(Drawable3D::lines(buffer, vertex_count, material));
    Ok(LineSet {
        entity,
        buffer,
        vertex_count,
    })
}

#[cfg(test)]
mod tests {
    use super::RenderSession;
    use crate::config::ViewerConfig;
    use crate::error::SessionError;
    use gpu::{GpuResources, HeadlessGpu, RenderCommand};
    use grid::AngularStep;
    use pretty_assertions::assert_eq;

    fn session() -> RenderSession<HeadlessGpu> {
        RenderSession::new(HeadlessGpu::new(), &ViewerConfig::default()).unwrap()
    }

    fn step(deg: f64) -> AngularStep {
        AngularStep::new(deg).unwrap()
    }

    #[test]
    fn new_session_has_globe_and_graticule_only() {
        let s = session();
        let frame = s.render_frame();
        assert!(matches!(
            frame.commands.as_slice(),
            [
                RenderCommand::Globe { texture: None, .. },
                RenderCommand::Lines { .. }
            ]
        ));
        assert_eq!(s.residency().buffers, 1);
        assert!(s.report().is_none());
    }

    #[test]
    fn regenerate_reports_exact_sizes() {
        let mut s = session();
        let report = s.regenerate(step(1.0)).unwrap();
        assert_eq!(report.count, 65_160);
        assert_eq!(report.skip, 1);
        assert_eq!(report.byte_size, 65_160 * 12);
        assert_eq!(report.points_label(), "Points: 65,160");

        let points = s.points().unwrap();
        assert_eq!(s.gpu().buffer_bytes(points.buffer), Some(65_160 * 12));
    }

    #[test]
    fn hidden_grid_stays_hidden_after_regeneration() {
        let mut s = session();
        s.regenerate(step(10.0)).unwrap();
        s.set_points_visible(false);
        s.regenerate(step(5.0)).unwrap();

        let frame = s.render_frame();
        assert!(
            !frame
                .commands
                .iter()
                .any(|c| matches!(c, RenderCommand::Points { .. }))
        );
        s.set_points_visible(true);
        assert_eq!(s.render_frame().commands.len(), 3);
    }

    #[test]
    fn graticule_toggle_does_not_touch_gpu() {
        let mut s = session();
        let before = s.residency();
        s.set_graticule_visible(false);
        assert_eq!(s.residency(), before);
        assert_eq!(s.render_frame().commands.len(), 1);
        assert!(!s.graticule_visible());
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut s = session();
        s.regenerate(step(3.0)).unwrap();
        s.shutdown().unwrap();
        assert_eq!(s.residency().total_bytes(), 0);
        assert!(s.world().is_empty());
        assert_eq!(s.regenerate(step(3.0)), Err(SessionError::ShutDown));
        assert!(s.shutdown().is_ok());
    }

    #[test]
    fn metrics_follow_regenerations() {
        let mut s = session();
        s.regenerate(step(10.0)).unwrap();
        s.regenerate(step(10.0)).unwrap();
        assert_eq!(s.metrics().counter(super::METRIC_REGENERATIONS), 2);
        assert_eq!(
            s.metrics().gauge(super::METRIC_RESIDENT_BYTES),
            Some(s.gpu().residency().total_bytes() as u64)
        );
    }
}
