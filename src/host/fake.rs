//! Scripted in-memory host for tests and dev previews.
//!
//! `FakeHost` records every call it receives and answers callbacks from a
//! per-operation script. Unscripted queries return zero rows, unscripted
//! record creation succeeds, and unscripted object reads fail.

use serde_json::{Map, Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ClmHost, HostCallback};
use crate::query::QueryRequest;

/// One call observed by the fake host
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    NextSlide,
    PrevSlide,
    GotoSlide {
        slide: String,
        presentation: Option<String>,
    },
    QueryRecord(QueryRequest),
    GetDataForCurrentObject {
        object: String,
        field: String,
    },
    GetDataForObject {
        object: String,
        id: String,
        field: String,
    },
    CreateRecord {
        object: String,
        payload: Value,
    },
}

/// How the fake answers one callback
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(Value),
    /// Keep the callback and never complete it
    Hold,
    /// Drop the callback without completing it
    Drop,
}

#[derive(Default)]
pub struct FakeHost {
    calls: Mutex<Vec<HostCall>>,
    script: Mutex<HashMap<String, VecDeque<Reply>>>,
    held: Mutex<Vec<HostCallback>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn query_key(collection: &str) -> String {
    format!("query:{collection}")
}

fn current_key(object: &str) -> String {
    format!("current:{object}")
}

fn object_key(object: &str) -> String {
    format!("object:{object}")
}

fn create_key(object: &str) -> String {
    format!("create:{object}")
}

/// `{ "success": true, "<key>": payload }`
fn success_with(key: &str, payload: Value) -> Value {
    let mut response = Map::new();
    response.insert("success".to_string(), Value::Bool(true));
    response.insert(key.to_string(), payload);
    Value::Object(response)
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, key: String, reply: Reply) {
        lock(&self.script).entry(key).or_default().push_back(reply);
    }

    /// Next query on `collection` succeeds with `rows` (a JSON array)
    pub fn respond_rows(&self, collection: &str, rows: Value) {
        self.push(
            query_key(collection),
            Reply::Respond(success_with(collection, rows)),
        );
    }

    /// Next query on `collection` fails, with `message` if given
    pub fn fail_query(&self, collection: &str, message: Option<&str>) {
        let response = match message {
            Some(message) => json!({ "success": false, "message": message }),
            None => json!({ "success": false }),
        };
        self.push(query_key(collection), Reply::Respond(response));
    }

    pub fn reply_to_query(&self, collection: &str, reply: Reply) {
        self.push(query_key(collection), reply);
    }

    /// Next current-object read of `object` succeeds with `fields`
    pub fn respond_current(&self, object: &str, fields: Value) {
        self.push(
            current_key(object),
            Reply::Respond(success_with(object, fields)),
        );
    }

    pub fn reply_to_current(&self, object: &str, reply: Reply) {
        self.push(current_key(object), reply);
    }

    /// Next by-id read of `object` succeeds with `fields`
    pub fn respond_object(&self, object: &str, fields: Value) {
        self.push(
            object_key(object),
            Reply::Respond(success_with(object, fields)),
        );
    }

    pub fn reply_to_object(&self, object: &str, reply: Reply) {
        self.push(object_key(object), reply);
    }

    pub fn reply_to_create(&self, object: &str, reply: Reply) {
        self.push(create_key(object), reply);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.calls).clone()
    }

    pub fn queries(&self) -> Vec<QueryRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::QueryRecord(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// `gotoSlide` commands as (slide, presentation)
    pub fn navigations(&self) -> Vec<(String, Option<String>)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::GotoSlide {
                    slide,
                    presentation,
                } => Some((slide.clone(), presentation.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn created_records(&self) -> Vec<(String, Value)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::CreateRecord { object, payload } => {
                    Some((object.clone(), payload.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Callbacks kept by [`Reply::Hold`]
    pub fn held_count(&self) -> usize {
        lock(&self.held).len()
    }

    /// Complete every held callback with `response`; returns how many were
    /// accepted
    pub fn release_held(&self, response: Value) -> usize {
        let held: Vec<HostCallback> = lock(&self.held).drain(..).collect();
        held.iter()
            .filter(|callback| callback.complete(response.clone()))
            .count()
    }

    fn record(&self, call: HostCall) {
        lock(&self.calls).push(call);
    }

    fn answer(&self, key: String, default: Value, callback: HostCallback) {
        let reply = lock(&self.script)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Respond(default));

        // locks are released before the callback runs
        match reply {
            Reply::Respond(response) => {
                callback.complete(response);
            }
            Reply::Hold => lock(&self.held).push(callback),
            Reply::Drop => drop(callback),
        }
    }
}

impl ClmHost for FakeHost {
    fn next_slide(&self) {
        self.record(HostCall::NextSlide);
    }

    fn prev_slide(&self) {
        self.record(HostCall::PrevSlide);
    }

    fn goto_slide(&self, slide: &str, presentation: Option<&str>) {
        self.record(HostCall::GotoSlide {
            slide: slide.to_string(),
            presentation: presentation.map(String::from),
        });
    }

    fn query_record(&self, request: &QueryRequest, callback: HostCallback) {
        self.record(HostCall::QueryRecord(request.clone()));
        let collection = request.collection.as_str();
        self.answer(
            query_key(collection),
            success_with(collection, json!([])),
            callback,
        );
    }

    fn get_data_for_current_object(&self, object: &str, field: &str, callback: HostCallback) {
        self.record(HostCall::GetDataForCurrentObject {
            object: object.to_string(),
            field: field.to_string(),
        });
        self.answer(
            current_key(object),
            json!({ "success": false, "message": format!("no scripted {object}") }),
            callback,
        );
    }

    fn get_data_for_object(&self, object: &str, id: &str, field: &str, callback: HostCallback) {
        self.record(HostCall::GetDataForObject {
            object: object.to_string(),
            id: id.to_string(),
            field: field.to_string(),
        });
        self.answer(
            object_key(object),
            json!({ "success": false, "message": format!("no scripted {object} {id}") }),
            callback,
        );
    }

    fn create_record(&self, object: &str, payload: &Value, callback: HostCallback) {
        self.record(HostCall::CreateRecord {
            object: object.to_string(),
            payload: payload.clone(),
        });
        self.answer(
            create_key(object),
            success_with(object, json!({ "Id": "fake-created" })),
            callback,
        );
    }
}
