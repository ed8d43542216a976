use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlVideoElement};

use crate::error::{CarouselError, CarouselResult};
use crate::video::{on_video_ready, VideoSource};

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

/// A `<video>` element behind one panel
#[derive(Clone)]
pub struct HtmlVideo {
    element: HtmlVideoElement,
    url: String,
}

impl HtmlVideo {
    /// Create a muted, looping video and start loading `url`
    pub fn create(document: &Document, url: &str) -> CarouselResult<Self> {
        let element = document
            .create_element("video")
            .map_err(|e| CarouselError::Dom(format!("create video: {:?}", e)))?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| CarouselError::Dom("created element is not a video".to_string()))?;

        element.set_muted(true);
        element.set_loop(true);
        element.set_cross_origin(Some("anonymous"));
        element.set_src(url);
        element.load();

        Ok(Self {
            element,
            url: url.to_string(),
        })
    }

    /// Start playback once the browser says the video can play through
    ///
    /// The returned closure must be kept alive for as long as the listener
    /// should fire.
    pub fn listen_ready(&self) -> CarouselResult<Closure<dyn FnMut()>> {
        let mut handle = self.clone();
        let closure = Closure::wrap(Box::new(move || {
            on_video_ready(&mut handle);
        }) as Box<dyn FnMut()>);

        self.element
            .add_event_listener_with_callback("canplaythrough", closure.as_ref().unchecked_ref())
            .map_err(|e| CarouselError::Dom(format!("canplaythrough listener: {:?}", e)))?;
        Ok(closure)
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }

    /// Whether a frame is available to copy into a texture
    pub fn has_frame(&self) -> bool {
        self.element.ready_state() >= HAVE_CURRENT_DATA
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.element.video_width(), self.element.video_height())
    }
}

impl VideoSource for HtmlVideo {
    fn url(&self) -> &str {
        &self.url
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn play(&mut self) -> CarouselResult<()> {
        let promise = self.element.play().map_err(|e| CarouselError::Playback {
            url: self.url.clone(),
            reason: format!("{:?}", e),
        })?;

        // Rejections (autoplay policy, aborted loads) arrive later
        let url = self.url.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::error!("[HtmlVideo::play] Error playing video {}: {:?}", url, e);
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            log::warn!("[HtmlVideo::pause] Failed to pause {}: {:?}", self.url, e);
        }
    }
}
