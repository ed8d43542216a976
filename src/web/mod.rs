//! Browser entry point
//!
//! The canvas is appended to `<main>`, the document supplies the scroll, and
//! each panel plays a `<video>` element copied into its texture every frame.
//! One `Rc<RefCell<WebApp>>` handle is shared by the scroll listener, the
//! resize listener and the animation-frame closure.

mod page;
mod video;
mod webgpu_context;

pub use page::{WebPage, SCROLLABLE_SELECTOR};
pub use video::HtmlVideo;
pub use webgpu_context::{WebGpuConfig, WebGpuContext};

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::config::CarouselConfig;
use crate::error::{CarouselError, CarouselResult};
use crate::render_loop::RenderLoop;
use crate::renderer::PanelRenderer;
use crate::scroll::{PageEnvironment, Viewport};
use crate::video::VideoSource;

/// Initial video texture size, replaced once each video reports its own
const PLACEHOLDER_VIDEO_SIZE: (u32, u32) = (16, 9);

fn dom_error(context: &str, error: JsValue) -> CarouselError {
    CarouselError::Dom(format!("{}: {:?}", context, error))
}

/// Everything one animation frame touches
struct WebApp {
    context: WebGpuContext,
    renderer: PanelRenderer,
    render_loop: RenderLoop,
    page: WebPage,
    videos: Vec<HtmlVideo>,
}

impl WebApp {
    fn frame(&mut self) {
        let update = self.render_loop.frame(&mut self.page, &mut self.videos);

        for (index, video) in self.videos.iter().enumerate() {
            if video.is_paused() || !video.has_frame() {
                continue;
            }
            let uploaded = self
                .renderer
                .ensure_video_size(&self.context.device, index, video.frame_size())
                .and_then(|_| {
                    self.renderer
                        .upload_video_element(&self.context.queue, index, video.element())
                });
            if let Err(e) = uploaded {
                log::warn!("[WebApp::frame] Video upload failed: {}", e);
            }
        }

        let camera = *self.render_loop.camera();
        self.renderer.apply(
            &self.context.queue,
            self.render_loop.carousel_mut(),
            &update,
            &camera,
        );

        match self.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => self.context.reconfigure(),
            Err(e) => log::warn!("[WebApp::frame] Render error: {:?}", e),
        }
    }

    fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.context.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.renderer
            .render(&mut encoder, &view, wgpu::Color::TRANSPARENT);
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self) {
        let viewport = self.page.viewport();
        let (width, height) = backing_size(viewport, self.page.device_pixel_ratio());
        self.context.resize(width, height);
        self.renderer.resize(&self.context.device, width, height);
        self.render_loop.resize(&mut self.page, viewport);
    }
}

/// Canvas backing-store size for a CSS viewport
fn backing_size(viewport: Viewport, pixel_ratio: f64) -> (u32, u32) {
    let scale = pixel_ratio.max(1.0);
    (
        ((viewport.width as f64) * scale).round().max(1.0) as u32,
        ((viewport.height as f64) * scale).round().max(1.0) as u32,
    )
}

fn create_canvas(window: &Window, viewport: Viewport) -> CarouselResult<HtmlCanvasElement> {
    let document = window
        .document()
        .ok_or_else(|| CarouselError::Dom("no document".to_string()))?;
    let container = document
        .query_selector("main")
        .map_err(|e| dom_error("query main", e))?
        .ok_or_else(|| CarouselError::Dom("no <main> container".to_string()))?;

    let canvas = document
        .create_element("canvas")
        .map_err(|e| dom_error("create canvas", e))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| CarouselError::Dom("created element is not a canvas".to_string()))?;

    let (width, height) = backing_size(viewport, window.device_pixel_ratio());
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    style
        .set_property("width", "100%")
        .and_then(|_| style.set_property("height", "100%"))
        .map_err(|e| dom_error("canvas style", e))?;

    container
        .append_child(&canvas)
        .map_err(|e| dom_error("append canvas", e))?;
    Ok(canvas)
}

fn add_listener(
    target: &web_sys::EventTarget,
    event: &str,
    closure: &Closure<dyn FnMut()>,
) -> CarouselResult<()> {
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| dom_error(event, e))
}

fn request_animation_frame(window: &Window, f: &Closure<dyn FnMut()>) {
    if let Err(e) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
        log::error!("[web::request_animation_frame] Failed: {:?}", e);
    }
}

/// Start the carousel in the current page
pub async fn run_web(config: CarouselConfig) -> CarouselResult<()> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"console_log already initialised".into());
    }
    config.validate()?;

    log::info!("[web::run_web] Scroll carousel with {} videos", config.videos.len());

    let window = web_sys::window().ok_or_else(|| CarouselError::Dom("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| CarouselError::Dom("no document".to_string()))?;

    let mut page = WebPage::new(window.clone())?;
    let viewport = page.viewport();
    let canvas = create_canvas(&window, viewport)?;

    let context = WebGpuContext::new(&canvas).await?;
    context.log_adapter_info();

    let videos = config
        .videos
        .iter()
        .map(|entry| HtmlVideo::create(&document, &entry.url))
        .collect::<CarouselResult<Vec<_>>>()?;
    // Listeners live as long as the page
    for video in &videos {
        video.listen_ready()?.forget();
    }

    let mut render_loop = RenderLoop::new(config, viewport);
    render_loop.prepare_page(&mut page);

    let camera = *render_loop.camera();
    let renderer = PanelRenderer::new(
        &context.device,
        context.format(),
        context.size(),
        render_loop.carousel_mut(),
        &camera,
        PLACEHOLDER_VIDEO_SIZE,
    );

    let app = Rc::new(RefCell::new(WebApp {
        context,
        renderer,
        render_loop,
        page,
        videos,
    }));

    let scroll_app = app.clone();
    let on_scroll = Closure::wrap(Box::new(move || {
        scroll_app.borrow_mut().page.on_scroll();
    }) as Box<dyn FnMut()>);
    add_listener(&window, "scroll", &on_scroll)?;
    on_scroll.forget();

    let resize_app = app.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        resize_app.borrow_mut().resize();
    }) as Box<dyn FnMut()>);
    add_listener(&window, "resize", &on_resize)?;
    on_resize.forget();

    start_render_loop(window, app);
    Ok(())
}

/// Drive `WebApp::frame` from one animation-frame closure that re-submits itself
fn start_render_loop(window: Window, app: Rc<RefCell<WebApp>>) {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let frame_window = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        app.borrow_mut().frame();

        if let Some(closure) = f.borrow().as_ref() {
            request_animation_frame(&frame_window, closure);
        }
    }) as Box<dyn FnMut()>));

    if let Some(closure) = g.borrow().as_ref() {
        request_animation_frame(&window, closure);
    }
}

/// JS entry point: `await start()` or `await start(jsonConfig)`
#[wasm_bindgen]
pub async fn start(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(text) => CarouselConfig::from_str_with_format(&text, crate::config::ConfigFormat::Json)
            .map_err(|e| JsValue::from_str(&e))?,
        None => CarouselConfig::default(),
    };
    run_web(config)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
