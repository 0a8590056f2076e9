use crate::js;
use js_sys::{ArrayBuffer, Uint8Array};
use mobrave_core::DownloadProgress;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

async fn response(url: &str) -> Result<web::Response, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "GET {} failed: {} {}",
            url,
            response.status(),
            response.status_text()
        )));
    }
    Ok(response)
}

pub async fn fetch_json(url: &str) -> Result<JsValue, JsValue> {
    let response = response(url).await?;
    JsFuture::from(response.json()?).await
}

pub async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let response = response(url).await?;
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

pub async fn fetch_bytes(url: &str) -> Result<ArrayBuffer, JsValue> {
    let response = response(url).await?;
    JsFuture::from(response.array_buffer()?).await?.dyn_into()
}

/// Download `url` chunk by chunk, reporting progress after every chunk.
///
/// Falls back to a single `arrayBuffer()` when the body cannot be streamed.
pub async fn fetch_with_progress(
    url: &str,
    mut on_progress: impl FnMut(DownloadProgress),
) -> Result<ArrayBuffer, JsValue> {
    let response = response(url).await?;
    let mut progress = DownloadProgress {
        total: response
            .headers()
            .get("content-length")
            .ok()
            .flatten()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        ..DownloadProgress::default()
    };
    on_progress(progress);

    let Some(body) = response.body() else {
        let buffer: ArrayBuffer = JsFuture::from(response.array_buffer()?).await?.dyn_into()?;
        progress.advance(buffer.byte_length() as u64);
        progress.finish();
        on_progress(progress);
        return Ok(buffer);
    };

    let reader = js::call(&body, "getReader", &[])?;
    let mut bytes: Vec<u8> = Vec::with_capacity(progress.reserve_hint());
    loop {
        let read = js::call(&reader, "read", &[])?;
        let chunk = JsFuture::from(js_sys::Promise::resolve(&read)).await?;
        if js::get(&chunk, "done")?.as_bool().unwrap_or(true) {
            break;
        }
        let value: Uint8Array = js::get(&chunk, "value")?.dyn_into()?;
        let start = bytes.len();
        bytes.resize(start + value.length() as usize, 0);
        value.copy_to(&mut bytes[start..]);
        progress.advance(value.length() as u64);
        on_progress(progress);
    }

    progress.finish();
    on_progress(progress);
    Ok(Uint8Array::from(bytes.as_slice()).buffer())
}
