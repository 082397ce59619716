use rkb_game::SetupError;
use wasm_bindgen::JsValue;

use crate::dom::js_error_message;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),
    #[error("browser error: {0}")]
    Dom(String),
    #[error("{0} unavailable")]
    Missing(&'static str),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Dom(js_error_message(&value))
    }
}
