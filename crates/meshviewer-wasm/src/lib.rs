//! Browser binding of the 2D mesh viewer.
//!
//! ```js
//! import init, { MeshViewer } from "./pkg/meshviewer_wasm.js";
//! await init();
//! const viewer = new MeshViewer("mesh", { shrink: 0.9 });
//! viewer.loadData(["data/rank0.json", "data/rank1.json"]);
//! ```

use wasm_bindgen::prelude::*;

mod dom;
mod events;
mod fetch;
mod viewer;

pub use viewer::MeshViewer;

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("mesh viewer initialized");
}

/// Version info
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
