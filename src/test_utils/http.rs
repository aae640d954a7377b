use axum_test::TestResponse;
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_content_type(response: &TestResponse, content_type: &str) {
    let content_type_header = response.header("content-type");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn assert_json_detail(response: &TestResponse, want_detail: &str) {
    let body = response.json::<Value>();
    assert_eq!(
        body["detail"], want_detail,
        "got body {body}, want detail \"{want_detail}\""
    );
}
