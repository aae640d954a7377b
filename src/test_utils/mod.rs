#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod server;

pub(crate) use http::{assert_content_type, assert_json_detail};
pub(crate) use server::{get_test_server, post_transaction};
