//! Loading data files over HTTP.

use shared::{LoadError, LoadResult};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Fetch `url` and return the body as text. Non-2xx responses are errors.
pub(crate) async fn fetch_text(url: &str) -> LoadResult<String> {
    let fail = |reason: String| LoadError::Fetch {
        source_id: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fail("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fail(js_message(&e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| fail("fetch did not return a Response".into()))?;

    if !response.ok() {
        return Err(fail(format!("{} {}", response.status(), response.status_text())));
    }

    let body = response.text().map_err(|e| fail(js_message(&e)))?;
    let text = JsFuture::from(body).await.map_err(|e| fail(js_message(&e)))?;
    text.as_string()
        .ok_or_else(|| fail("response body is not text".into()))
}

/// Human-readable message of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}
