use web_sys::wasm_bindgen;

/// Errors of the animation core and its browser host.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A parameter outside of the accepted domain.
    ///
    /// Returned by [`height_for`] when the resolution is zero, instead of
    /// dividing by zero and leaking `NaN` into the rendered frame.
    ///
    /// [`height_for`]: crate::height::height_for
    #[error("Invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value, formatted for display.
        value: String,
    },

    /// No global `window`, e.g. when running off the main browser thread.
    #[error("Unable to retrieve window")]
    UnableToRetrieveWindow,

    /// The window has no document.
    #[error("Unable to retrieve document")]
    UnableToRetrieveDocument,

    /// The document has no `<body>` to host the grid.
    #[error("Unable to retrieve body")]
    UnableToRetrieveBody,

    /// Unable to retrieve an element by its ID.
    #[error("Unable to retrieve element with id `{0}`")]
    UnableToRetrieveElementById(String),

    /// The host refused to schedule the next frame.
    #[error("Unable to schedule frame: {0}")]
    Schedule(String),

    /// Error coming from the terminal backend.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JS value error.
    #[error("JS value error: {0:?}")]
    JsValue(wasm_bindgen::JsValue),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub(crate) fn invalid_parameter(name: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

/// Convert [`wasm_bindgen::JsValue`] to [`Error`].
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::JsValue(value)
    }
}

/// Convert [`Error`] to [`std::io::Error`].
impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(error) => error,
            error => std::io::Error::other(error.to_string()),
        }
    }
}
