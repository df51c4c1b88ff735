use console_error_panic_hook::set_once;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use session::ViewerConfig;

pub mod assets;
pub mod camera;
pub mod viewer;
mod wgpu;

use assets::{fetch_image, fetch_optional_text};
use viewer::Viewer;
use wgpu::{WgpuGpu, init_wgpu_from_canvas_id};

/// Optional page-level overrides, served next to `index.html`.
const CONFIG_URL: &str = "viewer.json";

#[derive(Debug)]
struct PageState {
    viewer: Option<Viewer<WgpuGpu>>,
    canvas_width: f64,
    canvas_height: f64,
}

thread_local! {
    static STATE: RefCell<PageState> = RefCell::new(PageState {
        viewer: None,
        canvas_width: 1280.0,
        canvas_height: 720.0,
    });
}

fn console_log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Runs `f` against the live viewer. `None` before `init_viewer` completes.
fn with_viewer<R>(f: impl FnOnce(&mut Viewer<WgpuGpu>) -> R) -> Option<R> {
    STATE.with(|state| state.borrow_mut().viewer.as_mut().map(f))
}

async fn load_config() -> ViewerConfig {
    match fetch_optional_text(CONFIG_URL).await {
        Ok(Some(text)) => ViewerConfig::from_json_str(&text).unwrap_or_else(|err| {
            console_log(&format!("ignoring {CONFIG_URL}: {err}"));
            ViewerConfig::default()
        }),
        Ok(None) => ViewerConfig::default(),
        Err(err) => {
            console_log(&format!("could not fetch {CONFIG_URL}: {err}"));
            ViewerConfig::default()
        }
    }
}

async fn init_viewer_inner(canvas_id: &str) -> Result<(), JsValue> {
    let config = load_config().await;
    let mut gpu = init_wgpu_from_canvas_id(canvas_id).await?;

    let (width, height) = STATE.with(|state| {
        let s = state.borrow();
        (s.canvas_width, s.canvas_height)
    });
    gpu.resize(width as u32, height as u32);

    let mut viewer = Viewer::new(gpu, config).map_err(to_js)?;
    viewer.set_canvas_size(width, height);
    let default_texture = viewer.config().default_texture.clone();

    STATE.with(|state| state.borrow_mut().viewer = Some(viewer));
    switch_texture(default_texture);
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

#[wasm_bindgen]
pub fn init_viewer(canvas_id: String) {
    spawn_local(async move {
        if let Err(err) = init_viewer_inner(&canvas_id).await {
            console_log(&format!("viewer init error: {err:?}"));
        }
    });
}

#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.canvas_width = width;
        s.canvas_height = height;
        if let Some(viewer) = &mut s.viewer {
            viewer.set_canvas_size(width, height);
            viewer.session.gpu_mut().resize(width as u32, height as u32);
        }
    });
}

/// Selects the step from the dropdown's value; takes effect on the next
/// render request.
#[wasm_bindgen]
pub fn select_step(value: &str) -> Result<(), JsValue> {
    with_viewer(|viewer| viewer.panel.select_step_str(value).map(|_| ()))
        .unwrap_or(Ok(()))
        .map_err(to_js)
}

/// Returns `false` when a regeneration is already queued.
#[wasm_bindgen]
pub fn request_render() -> bool {
    with_viewer(|viewer| viewer.panel.request_render()).unwrap_or(false)
}

/// Per-animation-frame entry point: runs any due regeneration, then draws.
#[wasm_bindgen]
pub fn tick(timestamp_ms: f64) -> Result<(), JsValue> {
    with_viewer(|viewer| {
        if let Err(err) = viewer.tick(timestamp_ms) {
            console_log(&format!("regeneration failed: {err}"));
        }
        for event in viewer.drain_events() {
            console_log(&format!(
                "[frame {}] {}: {}",
                event.frame_index,
                event.kind.name(),
                event.message
            ));
        }
        let frame = viewer.render_frame();
        viewer
            .session
            .gpu()
            .render(&frame, viewer.view_proj(), viewer.background())
    })
    .unwrap_or(Ok(()))
}

#[wasm_bindgen]
pub fn set_graticule_visible(visible: bool) {
    with_viewer(|viewer| viewer.set_graticule_visible(visible));
}

#[wasm_bindgen]
pub fn set_grid_visible(visible: bool) {
    with_viewer(|viewer| viewer.set_grid_visible(visible));
}

#[wasm_bindgen]
pub fn zoom_in() -> f64 {
    with_viewer(|viewer| viewer.panel.zoom.zoom_in()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn zoom_out() -> f64 {
    with_viewer(|viewer| viewer.panel.zoom.zoom_out()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn zoom_reset() -> f64 {
    with_viewer(|viewer| viewer.panel.zoom.reset()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn zoom_fit() -> f64 {
    with_viewer(|viewer| viewer.zoom_fit()).unwrap_or(0.0)
}

/// Starts loading `name`; the globe keeps its current covering until the
/// image arrives. A newer call supersedes this one.
#[wasm_bindgen]
pub fn switch_texture(name: String) {
    let started = with_viewer(|viewer| {
        let max_dim = viewer.session.gpu().max_texture_dimension();
        viewer
            .begin_texture(&name)
            .map(|request| (request, max_dim))
    });
    let (request, max_dim) = match started {
        Some(Ok(started)) => started,
        Some(Err(err)) => {
            console_log(&format!("texture {name:?} rejected: {err}"));
            return;
        }
        None => return,
    };

    spawn_local(async move {
        let loaded = fetch_image(&request.path, max_dim).await;
        let outcome = with_viewer(|viewer| viewer.finish_texture(request, loaded));
        if let Some(Err(err)) = outcome {
            console_log(&format!("texture {name:?} failed: {err}"));
        }
    });
}

#[wasm_bindgen]
pub fn texture_names() -> js_sys::Array {
    let names = js_sys::Array::new();
    with_viewer(|viewer| {
        for name in viewer.session.catalog().names() {
            names.push(&JsValue::from_str(name));
        }
    });
    names
}

#[wasm_bindgen]
pub fn status_points() -> String {
    with_viewer(|viewer| viewer.panel.status_points()).unwrap_or_else(|| "Points: 0".to_string())
}

#[wasm_bindgen]
pub fn status_memory() -> String {
    with_viewer(|viewer| viewer.panel.status_memory()).unwrap_or_else(|| session::memory_label(0))
}

#[wasm_bindgen]
pub fn render_enabled() -> bool {
    with_viewer(|viewer| viewer.panel.render_enabled()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn spinner_visible() -> bool {
    with_viewer(|viewer| viewer.panel.spinner_visible()).unwrap_or(true)
}

/// Releases every GPU resource the session holds. Call on page unload.
#[wasm_bindgen]
pub fn shutdown() -> Result<(), JsValue> {
    with_viewer(|viewer| viewer.session.shutdown())
        .unwrap_or(Ok(()))
        .map_err(to_js)
}
