use ratatui::layout::Size;
use web_sys::{wasm_bindgen::JsValue, Document, Element, Window};

use crate::error::Error;

/// Width of a grid cell in pixels.
pub(crate) const CELL_WIDTH: u16 = 10;

/// Height of a grid cell in pixels.
pub(crate) const CELL_HEIGHT: u16 = 20;

/// Returns the global window.
pub(crate) fn get_window() -> Result<Window, Error> {
    web_sys::window().ok_or(Error::UnableToRetrieveWindow)
}

/// Returns the document of the global window.
pub(crate) fn get_document() -> Result<Document, Error> {
    get_window()?
        .document()
        .ok_or(Error::UnableToRetrieveDocument)
}

/// Returns the element with the given ID, or the body if no ID is given.
pub(crate) fn get_element_by_id_or_body(id: Option<&str>) -> Result<Element, Error> {
    match id {
        Some(id) => get_document()?
            .get_element_by_id(id)
            .ok_or_else(|| Error::UnableToRetrieveElementById(id.to_string())),
        None => get_document()?
            .body()
            .ok_or(Error::UnableToRetrieveBody)
            .map(|body| body.into()),
    }
}

/// Sets the document title.
pub fn set_document_title(title: &str) -> Result<(), Error> {
    get_document()?.set_title(title);
    Ok(())
}

/// Returns the query string of the current page, including the leading `?`.
pub fn location_search() -> Result<String, Error> {
    Ok(get_window()?.location().search()?)
}

/// Returns `true` if the screen is a mobile device.
pub fn is_mobile() -> bool {
    let user_agent = web_sys::window().and_then(|w| w.navigator().user_agent().ok());
    user_agent.is_some_and(|agent| {
        let agent = agent.to_lowercase();
        agent.contains("mobile") || agent.contains("tablet")
    })
}

/// Returns the number of cells that fit in the browser viewport, or in the
/// whole screen on mobile devices.
pub fn get_grid_size() -> Size {
    let (width, height) = if is_mobile() {
        get_raw_screen_size()
    } else {
        get_raw_window_size()
    };
    Size::new(width / CELL_WIDTH, height / CELL_HEIGHT)
}

/// Returns the size of the viewport in pixels.
fn get_raw_window_size() -> (u16, u16) {
    fn js_val_to_int(val: JsValue) -> Option<u16> {
        val.as_f64().and_then(|i| u16::try_from(i as usize).ok())
    }

    web_sys::window()
        .and_then(|s| {
            s.inner_width()
                .ok()
                .and_then(js_val_to_int)
                .zip(s.inner_height().ok().and_then(js_val_to_int))
        })
        .unwrap_or((1200, 800))
}

/// Returns the size of the physical screen in pixels.
fn get_raw_screen_size() -> (u16, u16) {
    web_sys::window()
        .and_then(|w| w.screen().ok())
        .and_then(|s| s.width().ok().zip(s.height().ok()))
        .map(|(w, h)| (w.clamp(0, u16::MAX as i32) as u16, h.clamp(0, u16::MAX as i32) as u16))
        .unwrap_or_else(get_raw_window_size)
}
