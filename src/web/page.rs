use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use crate::error::{CarouselError, CarouselResult};
use crate::scroll::{PageEnvironment, Viewport};

/// Class of the content layer that follows the smoothed scroll
pub const SCROLLABLE_SELECTOR: &str = ".scrollable";

/// The browser document as a scrollable page
///
/// `scroll_y` is the last value seen by the scroll listener, so a frame reads
/// one consistent target even if several scroll events arrived in between.
/// `page_height` is the content's own height, pinned onto `<body>` before the
/// scrollable layer is stretched.
pub struct WebPage {
    window: Window,
    body: HtmlElement,
    scrollable: Option<HtmlElement>,
    scroll_y: f32,
    page_height: f32,
}

impl WebPage {
    pub fn new(window: Window) -> CarouselResult<Self> {
        let document = window
            .document()
            .ok_or_else(|| CarouselError::Dom("no document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| CarouselError::Dom("no body".to_string()))?;

        let scrollable = document
            .query_selector(SCROLLABLE_SELECTOR)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        if scrollable.is_none() {
            log::warn!(
                "[WebPage::new] No {} element; content will not follow the scroll",
                SCROLLABLE_SELECTOR
            );
        }

        let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
        let mut page = Self {
            window,
            body,
            scrollable,
            scroll_y,
            page_height: 0.0,
        };
        page.fit_body_to_content();
        Ok(page)
    }

    /// Measure the content at its natural height and pin `<body>` to it
    fn fit_body_to_content(&mut self) {
        let Some(scrollable) = &self.scrollable else {
            self.page_height = self.body.offset_height() as f32;
            return;
        };
        if let Err(e) = scrollable.style().remove_property("height") {
            log::warn!("[WebPage::fit_body_to_content] Failed to reset height: {:?}", e);
        }
        let height = scrollable.get_bounding_client_rect().height() as f32;
        set_style(&self.body, "height", &format!("{}px", height));
        self.page_height = height;
        log::debug!("[WebPage::fit_body_to_content] Content height {}px", height);
    }

    /// Record the latest scroll position (called from the scroll listener)
    pub fn on_scroll(&mut self) {
        self.scroll_y = self.window.scroll_y().unwrap_or(0.0) as f32;
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("[WebPage] Failed to set {}: {:?}", property, e);
    }
}

impl PageEnvironment for WebPage {
    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f32) {
        self.window.scroll_to_with_x_and_y(0.0, y as f64);
        self.scroll_y = y;
    }

    fn page_height(&self) -> f32 {
        self.page_height
    }

    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    fn translate_content(&mut self, offset_y: f32) {
        if let Some(scrollable) = &self.scrollable {
            set_style(scrollable, "transform", &format!("translate3d(0, {}px, 0)", offset_y));
        }
    }

    fn set_scrollable_height(&mut self, height: f32) {
        // Re-measure first: a resize can reflow the content
        self.fit_body_to_content();
        if let Some(scrollable) = &self.scrollable {
            set_style(scrollable, "height", &format!("{}px", height));
        }
    }
}
