use std::cell::RefCell;
use std::rc::Rc;

use shared::{Delivery, LoadResult, ViewerConfig, ViewerCore};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::dom::{self, MeshDom, Tooltip};
use crate::events;
use crate::fetch::fetch_text;

/// State shared between the viewer handle and its event closures.
pub(crate) struct ViewerState {
    pub core: ViewerCore,
    pub dom: Option<MeshDom>,
    pub tooltip: Tooltip,
}

pub(crate) type SharedState = Rc<RefCell<ViewerState>>;

/// Mesh viewer bound to the DOM element with id `name`
#[wasm_bindgen]
pub struct MeshViewer {
    state: SharedState,
}

#[wasm_bindgen]
impl MeshViewer {
    /// `config` is an optional (partial) `ViewerConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str, config: JsValue) -> Result<MeshViewer, JsValue> {
        let config: ViewerConfig = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        let core = ViewerCore::new(name, config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let document = dom::document()?;
        let tooltip = Tooltip::create(
            &document,
            core.config().tooltip_fade_ms,
            core.config().tooltip_offset,
        )?;

        Ok(Self {
            state: Rc::new(RefCell::new(ViewerState {
                core,
                dom: None,
                tooltip,
            })),
        })
    }

    /// Fetch every file; the mesh is built once all of them arrived.
    #[wasm_bindgen(js_name = loadData)]
    pub fn load_data(&self, files: Vec<String>) -> Result<(), JsValue> {
        let started = self.state.borrow_mut().core.begin_load(files.clone());
        if let Err(err) = started {
            let message = err.to_string();
            report_failure(&self.state, &message);
            return Err(JsValue::from_str(&message));
        }

        for (index, url) in files.into_iter().enumerate() {
            let state = Rc::clone(&self.state);
            spawn_local(async move {
                let payload = fetch_text(&url).await;
                on_delivery(&state, index, payload);
            });
        }
        Ok(())
    }

    /// Re-apply the container size. Window resizes are handled already; call
    /// this when the container changes size on its own.
    #[wasm_bindgen(js_name = updateViewBox)]
    pub fn update_view_box(&self) {
        events::update_view_box(&self.state);
    }

    /// Current view box as `[x, y, width, height]`, empty before load.
    #[wasm_bindgen(js_name = viewBox)]
    pub fn view_box(&self) -> Vec<f64> {
        let state = self.state.borrow();
        match state.core.scene() {
            Some(scene) => {
                let vb = scene.view_box();
                vec![vb.x, vb.y, vb.width, vb.height]
            }
            None => Vec::new(),
        }
    }

    #[wasm_bindgen(js_name = zoneCount)]
    pub fn zone_count(&self) -> usize {
        self.state
            .borrow()
            .core
            .scene()
            .map_or(0, |scene| scene.elements().len())
    }

    /// Lifecycle phase: "idle", "loading", "ready" or "failed".
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        self.state.borrow().core.phase().label().to_string()
    }
}

fn on_delivery(state: &SharedState, index: usize, payload: LoadResult<String>) {
    let delivery = state.borrow_mut().core.deliver(index, payload);
    match delivery {
        Delivery::Ready => {
            if let Err(e) = run_pipeline(state) {
                let message = crate::fetch::js_message(&e);
                tracing::error!("render pipeline failed: {message}");
                report_failure(state, &message);
            }
        }
        Delivery::Failed(message) => report_failure(state, &message),
        Delivery::Waiting { received, expected } => {
            tracing::debug!("{received}/{expected} mesh files loaded");
        }
        Delivery::Ignored => {}
    }
}

fn report_failure(state: &SharedState, message: &str) {
    let name = state.borrow().core.name().to_string();
    let shown = dom::document().and_then(|doc| dom::show_error(&doc, &name, message));
    if let Err(e) = shown {
        tracing::error!("cannot show load error: {e:?}");
    }
}

/// Scaffold, zones, listeners, then the initial view box.
fn run_pipeline(state: &SharedState) -> Result<(), JsValue> {
    let document = dom::document()?;
    {
        let mut guard = state.borrow_mut();
        let st = &mut *guard;
        let scene = st
            .core
            .scene()
            .ok_or_else(|| JsValue::from_str("Scene not built"))?;

        let mesh_dom = MeshDom::create(&document, scene.name())?;
        for element in scene.elements() {
            mesh_dom.append_zone(&document, element)?;
        }
        st.dom = Some(mesh_dom);
    }

    events::attach(state)?;
    setup_view_box(state);
    Ok(())
}

fn setup_view_box(state: &SharedState) {
    let mut guard = state.borrow_mut();
    let st = &mut *guard;
    let (Some(mesh_dom), Some(scene)) = (st.dom.as_ref(), st.core.scene_mut()) else {
        return;
    };
    let (view_box, transform) = scene.setup_view_box(mesh_dom.viewport_size());
    mesh_dom.set_view_box(&view_box);
    mesh_dom.set_transform(&transform);
    tracing::info!("view box {}", view_box.to_attr());
}
