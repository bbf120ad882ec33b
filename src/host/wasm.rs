//! `ClmHost` over the viewer's JavaScript API (`com.veeva.clm`).
//!
//! Payloads cross the boundary as JSON text. If a host function throws, the
//! callback is completed with a failure payload carrying the exception text.

use js_sys::{Array, JSON};
use serde_json::{Value, json};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use super::{ClmHost, HostCallback};
use crate::query::QueryRequest;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = nextSlide, catch)]
    fn js_next_slide() -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = prevSlide, catch)]
    fn js_prev_slide() -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = gotoSlide, catch)]
    fn js_goto_slide(slide: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = gotoSlide, catch)]
    fn js_goto_slide_in(slide: &str, presentation: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = queryRecord, catch)]
    fn js_query_record(
        object: &str,
        fields: &Array,
        filter: &str,
        sort: &Array,
        limit: &str,
        callback: &JsValue,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = getDataForCurrentObject, catch)]
    fn js_get_data_for_current_object(
        object: &str,
        field: &str,
        callback: &JsValue,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = getDataForObject, catch)]
    fn js_get_data_for_object(
        object: &str,
        id: &str,
        field: &str,
        callback: &JsValue,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["com", "veeva", "clm"], js_name = createRecord, catch)]
    fn js_create_record(object: &str, values: &JsValue, callback: &JsValue) -> Result<(), JsValue>;
}

/// The viewer the presentation is running in
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewerHost;

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn from_js(value: &JsValue) -> Value {
    JSON::stringify(value)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null)
}

fn to_js(value: &Value) -> JsValue {
    JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL)
}

fn string_array(items: &[String]) -> Array {
    items.iter().map(|item| JsValue::from_str(item)).collect()
}

fn log_throw(operation: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        tracing::error!(operation, "host call threw: {}", describe(&err));
    }
}

/// Hand `callback` to JS and complete it ourselves if the call throws
fn invoke(callback: HostCallback, call: impl FnOnce(&JsValue) -> Result<(), JsValue>) {
    let callback = Rc::new(callback);
    let handle = Rc::clone(&callback);
    let js_callback = Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
        handle.complete(from_js(&response));
    })
    .into_js_value();

    if let Err(err) = call(&js_callback) {
        let message = describe(&err);
        tracing::error!(operation = callback.operation(), "host call threw: {}", message);
        callback.complete(json!({ "success": false, "message": message }));
    }
}

impl ClmHost for ViewerHost {
    fn next_slide(&self) {
        log_throw("nextSlide", js_next_slide());
    }

    fn prev_slide(&self) {
        log_throw("prevSlide", js_prev_slide());
    }

    fn goto_slide(&self, slide: &str, presentation: Option<&str>) {
        let result = match presentation {
            Some(presentation) => js_goto_slide_in(slide, presentation),
            None => js_goto_slide(slide),
        };
        log_throw("gotoSlide", result);
    }

    fn query_record(&self, request: &QueryRequest, callback: HostCallback) {
        let fields = string_array(&request.fields);
        let sort = string_array(&request.sort);
        let limit = request.limit_clause();
        invoke(callback, |js_callback| {
            js_query_record(
                &request.collection,
                &fields,
                &request.filter,
                &sort,
                &limit,
                js_callback,
            )
        });
    }

    fn get_data_for_current_object(&self, object: &str, field: &str, callback: HostCallback) {
        invoke(callback, |js_callback| {
            js_get_data_for_current_object(object, field, js_callback)
        });
    }

    fn get_data_for_object(&self, object: &str, id: &str, field: &str, callback: HostCallback) {
        invoke(callback, |js_callback| {
            js_get_data_for_object(object, id, field, js_callback)
        });
    }

    fn create_record(&self, object: &str, payload: &Value, callback: HostCallback) {
        let values = to_js(payload);
        invoke(callback, |js_callback| {
            js_create_record(object, &values, js_callback)
        });
    }
}
