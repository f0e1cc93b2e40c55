//! Adapter warnings. Browsers rarely install a `tracing` subscriber, so each
//! warning is also written to `console.warn` where the host can see it.

use tracing::warn;
use wasm_bindgen::JsValue;

const PREFIX: &str = "vizij-countup";

/// Report a recoverable failure caused by a JS value (a thrown callback, a
/// rejected browser call).
pub(crate) fn warn_js(context: &str, err: &JsValue) {
    warn!(?err, "{context}");
    web_sys::console::warn_2(&JsValue::from_str(&format!("{PREFIX}: {context}")), err);
}

/// Report a recoverable failure with no JS payload.
pub(crate) fn warn_msg(message: &str) {
    warn!("{message}");
    web_sys::console::warn_1(&JsValue::from_str(&format!("{PREFIX}: {message}")));
}
