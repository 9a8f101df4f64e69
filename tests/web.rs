//! Browser tests, run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use ambient_field_wasm::AmbientEngine;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let div: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    div.style().set_property("position", "relative").unwrap();
    div.style().set_property("width", "320px").unwrap();
    div.style().set_property("height", "240px").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div.into()
}

fn config(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

/// Resolves on the next animation frame.
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn mount_appends_overlay_and_unmount_removes_it() {
    let host = container();
    let mut engine = AmbientEngine::mount(&host, JsValue::UNDEFINED).unwrap();
    assert!(engine.is_running());
    assert_eq!(host.child_element_count(), 1);
    assert_eq!(engine.particle_count(), 400);
    assert!(engine.edge_count() > 0);

    engine.unmount();
    assert!(!engine.is_running());
    assert_eq!(host.child_element_count(), 0);
    engine.unmount();
}

#[wasm_bindgen_test]
fn canvas_container_is_used_directly() {
    let host = container();
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document.create_element("canvas").unwrap();
    host.append_child(&canvas).unwrap();

    let mut engine =
        AmbientEngine::mount(&canvas, config(r#"{"layers":["dotField"],"seed":3}"#)).unwrap();
    assert!(engine.is_running());
    assert_eq!(canvas.child_element_count(), 0);
    engine.unmount();
    assert!(canvas.is_connected());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected_before_mounting() {
    let host = container();
    let result = AmbientEngine::mount(&host, config(r#"{"frictionCoefficient":2}"#));
    assert!(result.is_err());
    assert_eq!(host.child_element_count(), 0);
}

#[wasm_bindgen_test]
async fn no_frame_runs_after_unmount() {
    let host = container();
    let mut engine =
        AmbientEngine::mount(&host, config(r#"{"layers":["morph","scanGrid"],"seed":11}"#))
            .unwrap();

    next_frame().await;
    next_frame().await;
    assert!(engine.frame_count() >= 1.0);

    engine.unmount();
    let frozen = engine.frame_count();

    next_frame().await;
    next_frame().await;
    assert_eq!(engine.frame_count(), frozen);
    assert!(!engine.is_running());
}
