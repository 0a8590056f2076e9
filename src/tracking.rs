use mobrave_core::{LocalTask, Spawner, Tracked};
use std::future::Future;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

/// Drives tasks on the browser's microtask queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSpawner;

impl Spawner for WebSpawner {
    fn spawn(&self, task: LocalTask) {
        spawn_local(task);
    }
}

/// Tracker mirroring a Rust future on the browser task queue.
pub fn track_future<T, F>(operation: F) -> Tracked<T, JsValue>
where
    T: 'static,
    F: Future<Output = Result<T, JsValue>> + 'static,
{
    Tracked::adapt(&WebSpawner, operation)
}
