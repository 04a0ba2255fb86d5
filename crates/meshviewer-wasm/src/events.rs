//! Event wiring: pan/zoom on the SVG, hover tooltip on the zones, resize.
//!
//! Listeners live as long as the page; their closures are leaked on purpose
//! with `Closure::forget`.

use std::rc::Rc;

use shared::Point;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, MouseEvent, WheelEvent};

use crate::viewer::{SharedState, ViewerState};

fn listen<E>(target: &EventTarget, kind: &str, handler: impl FnMut(E) + 'static) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Pointer position in view-box units.
fn anchor(st: &ViewerState, event: &MouseEvent) -> Option<Point> {
    let mesh_dom = st.dom.as_ref()?;
    let scene = st.core.scene()?;
    let offset = mesh_dom.pointer_offset(event.client_x(), event.client_y());
    Some(scene.view_box().pixel_to_user(offset, mesh_dom.viewport_size()))
}

/// Run a zoom gesture and push the resulting transform to the mesh group.
fn with_zoom(
    state: &SharedState,
    event: &MouseEvent,
    gesture: impl FnOnce(&mut shared::ZoomBehavior, Point) -> Option<shared::ZoomTransform>,
) {
    let mut guard = state.borrow_mut();
    let st = &mut *guard;
    let Some(at) = anchor(st, event) else {
        return;
    };
    let (Some(mesh_dom), Some(scene)) = (st.dom.as_ref(), st.core.scene_mut()) else {
        return;
    };
    if let Some(transform) = gesture(scene.zoom_mut(), at) {
        mesh_dom.set_transform(&transform);
    }
}

pub(crate) fn update_view_box(state: &SharedState) {
    let mut guard = state.borrow_mut();
    let st = &mut *guard;
    let (Some(mesh_dom), Some(scene)) = (st.dom.as_ref(), st.core.scene_mut()) else {
        return;
    };
    let view_box = scene.update_view_box(mesh_dom.viewport_size());
    mesh_dom.set_view_box(&view_box);
}

/// Hovered zone's tooltip text, looked up from the event target's id.
fn hovered_text(st: &ViewerState, event: &MouseEvent) -> Option<String> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let scene = st.core.scene()?;
    let element = scene.element_by_dom_id(&target.id())?;
    scene.tooltip_for(&element.id)
}

pub(crate) fn attach(state: &SharedState) -> Result<(), JsValue> {
    let (svg, zones): (EventTarget, EventTarget) = {
        let st = state.borrow();
        let mesh_dom = st
            .dom
            .as_ref()
            .ok_or_else(|| JsValue::from_str("DOM not set up"))?;
        (mesh_dom.svg.clone().into(), mesh_dom.zones.clone().into())
    };
    let window: EventTarget = web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window"))?
        .into();

    // ── Pan / zoom ──────────────────────────────────────────

    let s = Rc::clone(state);
    listen(&svg, "wheel", move |event: WheelEvent| {
        event.prevent_default();
        let line_mode = event.delta_mode() == WheelEvent::DOM_DELTA_LINE;
        let delta_y = event.delta_y();
        with_zoom(&s, &event, |zoom, at| Some(zoom.wheel(delta_y, line_mode, at)));
    })?;

    let s = Rc::clone(state);
    listen(&svg, "dblclick", move |event: MouseEvent| {
        event.prevent_default();
        let zoom_out = event.shift_key();
        with_zoom(&s, &event, |zoom, at| Some(zoom.double_click(zoom_out, at)));
    })?;

    let s = Rc::clone(state);
    listen(&svg, "mousedown", move |event: MouseEvent| {
        if event.button() != 0 {
            return;
        }
        event.prevent_default();
        with_zoom(&s, &event, |zoom, at| {
            zoom.drag_start(at);
            None
        });
    })?;

    // Drag continues outside the SVG, so move/up are tracked on the window.
    let s = Rc::clone(state);
    listen(&window, "mousemove", move |event: MouseEvent| {
        let dragging = s
            .borrow()
            .core
            .scene()
            .is_some_and(|scene| scene.zoom().is_dragging());
        if dragging {
            with_zoom(&s, &event, |zoom, at| zoom.drag_move(at));
        }
    })?;

    let s = Rc::clone(state);
    listen(&window, "mouseup", move |_: MouseEvent| {
        if let Some(scene) = s.borrow_mut().core.scene_mut() {
            scene.zoom_mut().drag_end();
        }
    })?;

    let s = Rc::clone(state);
    listen(&window, "resize", move |_: web_sys::Event| {
        update_view_box(&s);
    })?;

    // ── Tooltip ─────────────────────────────────────────────

    let s = Rc::clone(state);
    listen(&zones, "mouseover", move |_: MouseEvent| {
        s.borrow().tooltip.show();
    })?;

    let s = Rc::clone(state);
    listen(&zones, "mousemove", move |event: MouseEvent| {
        let st = s.borrow();
        if let Some(text) = hovered_text(&st, &event) {
            let page = Point::new(event.page_x() as f64, event.page_y() as f64);
            st.tooltip.update(&text, page);
        }
    })?;

    let s = Rc::clone(state);
    listen(&zones, "mouseout", move |_: MouseEvent| {
        s.borrow().tooltip.hide();
    })?;

    Ok(())
}
