#![allow(dead_code)]


use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use serde_json::Value;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Read a JSON body.
pub async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let body = actix_web::test::read_body(resp).await;
    serde_json::from_slice(&body).expect("body should be JSON")
}

/// Error body with the per-request `trace_id` removed, for comparing two
/// rejections field by field.
pub async fn error_body_without_trace<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let mut json = json_body(resp).await;
    if let Some(obj) = json.as_object_mut() {
        obj.remove("trace_id");
    }
    json
}
