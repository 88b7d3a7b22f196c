use std::{cell::RefCell, io::Result as IoResult, rc::Rc};

use ratatui::{
    backend::{Backend, WindowSize},
    buffer::Cell,
    layout::{Position, Size},
};
use web_sys::{
    wasm_bindgen::{prelude::Closure, JsCast},
    Document, Element,
};

use crate::{
    backend::utils::*,
    error::Error,
    utils::{
        get_document, get_element_by_id_or_body, get_grid_size, get_window, CELL_HEIGHT,
        CELL_WIDTH,
    },
    widgets::hyperlink::HYPERLINK_MODIFIER,
};

/// Options for the [`DomBackend`].
#[derive(Debug, Default, Clone)]
pub struct DomBackendOptions {
    /// ID of the element hosting the grid.
    grid_id: Option<String>,
}

impl DomBackendOptions {
    /// Constructs a new [`DomBackendOptions`].
    pub fn new(grid_id: Option<String>) -> Self {
        Self { grid_id }
    }

    /// Returns the ID given to the grid element.
    ///
    /// - If no host ID is set, it returns `"grid"`.
    /// - Otherwise it returns the host ID suffixed with `"_colorsine_grid"`.
    pub fn grid_id(&self) -> String {
        match &self.grid_id {
            Some(id) => format!("{id}_colorsine_grid"),
            None => "grid".to_string(),
        }
    }
}

/// DOM backend.
///
/// Transforms the [`Cell`]s into `<span>`s appended to one `<pre>` element
/// per row. Only cells that changed since the previous flush are touched.
#[derive(Debug)]
pub struct DomBackend {
    /// Cleared by the resize listener to rebuild the grid on the next draw.
    initialized: Rc<RefCell<bool>>,
    /// Current buffer.
    buffer: Vec<Vec<Cell>>,
    /// Buffer of the previous flush.
    prev_buffer: Vec<Vec<Cell>>,
    /// One element per cell, row-major.
    cells: Vec<Element>,
    /// Grid element.
    grid: Element,
    /// Element hosting the grid.
    grid_parent: Element,
    /// Document.
    document: Document,
    /// Options.
    options: DomBackendOptions,
    /// Keeps the resize listener alive.
    _on_resize: Closure<dyn FnMut(web_sys::Event)>,
}

impl DomBackend {
    /// Constructs a new [`DomBackend`] rendering into the document body.
    pub fn new() -> Result<Self, Error> {
        Self::new_with_options(DomBackendOptions::default())
    }

    /// Constructs a new [`DomBackend`] rendering into the element with the
    /// given ID.
    pub fn new_by_id(id: &str) -> Result<Self, Error> {
        Self::new_with_options(DomBackendOptions::new(Some(id.to_string())))
    }

    /// Constructs a new [`DomBackend`] with the given options.
    pub fn new_with_options(options: DomBackendOptions) -> Result<Self, Error> {
        let document = get_document()?;
        let initialized = Rc::new(RefCell::new(false));
        let on_resize = Closure::<dyn FnMut(_)>::new({
            let initialized = Rc::clone(&initialized);
            move |_: web_sys::Event| {
                initialized.replace(false);
            }
        });
        get_window()?
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        let mut backend = Self {
            initialized,
            buffer: Vec::new(),
            prev_buffer: Vec::new(),
            cells: Vec::new(),
            grid: document.create_element("div")?,
            grid_parent: get_element_by_id_or_body(options.grid_id.as_deref())?,
            document,
            options,
            _on_resize: on_resize,
        };
        backend.reset_grid()?;
        Ok(backend)
    }

    /// Replaces the grid with an empty one sized to the viewport.
    fn reset_grid(&mut self) -> Result<(), Error> {
        self.grid = self.document.create_element("div")?;
        self.grid.set_attribute("id", &self.options.grid_id())?;
        self.cells.clear();
        let size = get_grid_size();
        tracing::debug!(width = size.width, height = size.height, "sizing grid");
        self.buffer = vec![vec![Cell::default(); size.width as usize]; size.height as usize];
        self.prev_buffer = self.buffer.clone();
        Ok(())
    }

    /// Creates the elements of every cell.
    ///
    /// Consecutive hyperlink cells of a row share one `<a>` element.
    fn prerender(&mut self) -> Result<(), Error> {
        for line in &self.buffer {
            let pre = self.document.create_element("pre")?;
            let mut link: Vec<&Cell> = Vec::new();
            for (x, cell) in line.iter().enumerate() {
                let span = create_span(&self.document, cell)?;
                self.cells.push(span.clone());
                if !cell.modifier.contains(HYPERLINK_MODIFIER) {
                    pre.append_child(&span)?;
                    continue;
                }
                link.push(cell);
                let link_continues = line
                    .get(x + 1)
                    .is_some_and(|next| next.modifier.contains(HYPERLINK_MODIFIER));
                if !link_continues {
                    let link_cells: Vec<Cell> = link.drain(..).cloned().collect();
                    let anchor = create_anchor(&self.document, &link_cells)?;
                    let first = self.cells.len() - link_cells.len();
                    for span in &self.cells[first..] {
                        anchor.append_child(span)?;
                    }
                    pre.append_child(&anchor)?;
                }
            }
            self.grid.append_child(&pre)?;
        }
        Ok(())
    }

    /// Returns `true` if a cell joined or left a hyperlink since the previous
    /// flush, which invalidates the anchors.
    fn links_changed(&self) -> bool {
        self.buffer
            .iter()
            .flatten()
            .zip(self.prev_buffer.iter().flatten())
            .any(|(cell, prev)| {
                cell.modifier.contains(HYPERLINK_MODIFIER)
                    != prev.modifier.contains(HYPERLINK_MODIFIER)
            })
    }

    /// Updates the elements of the cells that changed since the previous
    /// flush.
    fn update_grid(&mut self) -> Result<(), Error> {
        let width = self.buffer.first().map_or(0, Vec::len);
        for (y, line) in self.buffer.iter().enumerate() {
            for (x, cell) in line.iter().enumerate() {
                if cell == &self.prev_buffer[y][x] {
                    continue;
                }
                let elem = &self.cells[y * width + x];
                elem.set_text_content(Some(cell.symbol()));
                elem.set_attribute("style", &cell_css(cell))?;
            }
        }
        Ok(())
    }

    /// Recreates every element from the current buffer.
    fn rebuild(&mut self) -> Result<(), Error> {
        self.grid.set_inner_html("");
        self.cells.clear();
        self.prerender()
    }
}

impl Drop for DomBackend {
    fn drop(&mut self) {
        if let Ok(window) = get_window() {
            let _ = window.remove_event_listener_with_callback(
                "resize",
                self._on_resize.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Backend for DomBackend {
    fn draw<'a, I>(&mut self, content: I) -> IoResult<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        if !*self.initialized.borrow()
            && self
                .document
                .get_element_by_id(&self.options.grid_id())
                .is_some()
        {
            // The viewport was resized after the first flush.
            self.grid_parent.set_inner_html("");
            self.reset_grid()?;
        }

        for (x, y, cell) in content {
            if let Some(slot) = self
                .buffer
                .get_mut(y as usize)
                .and_then(|line| line.get_mut(x as usize))
            {
                *slot = cell.clone();
            }
        }
        Ok(())
    }

    /// Flushes the buffer to the DOM.
    ///
    /// The first flush after construction or a resize builds the grid; later
    /// ones only patch the changed cells.
    fn flush(&mut self) -> IoResult<()> {
        if !*self.initialized.borrow() {
            self.initialized.replace(true);
            self.grid_parent
                .append_child(&self.grid)
                .map_err(Error::from)?;
            self.prerender()?;
        } else if self.links_changed() {
            self.rebuild()?;
        } else if self.buffer != self.prev_buffer {
            self.update_grid()?;
        }
        self.prev_buffer.clone_from(&self.buffer);
        Ok(())
    }

    fn hide_cursor(&mut self) -> IoResult<()> {
        Ok(())
    }

    fn show_cursor(&mut self) -> IoResult<()> {
        Ok(())
    }

    fn get_cursor_position(&mut self) -> IoResult<Position> {
        Ok(Position::new(0, 0))
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, _position: P) -> IoResult<()> {
        Ok(())
    }

    fn clear(&mut self) -> IoResult<()> {
        self.buffer
            .iter_mut()
            .flatten()
            .for_each(|cell| *cell = Cell::default());
        Ok(())
    }

    fn size(&self) -> IoResult<Size> {
        let height = self.buffer.len();
        let width = self.buffer.first().map_or(0, Vec::len);
        Ok(Size::new(width as u16, height as u16))
    }

    fn window_size(&mut self) -> IoResult<WindowSize> {
        let columns_rows = self.size()?;
        Ok(WindowSize {
            columns_rows,
            pixels: Size::new(
                columns_rows.width.saturating_mul(CELL_WIDTH),
                columns_rows.height.saturating_mul(CELL_HEIGHT),
            ),
        })
    }
}
