//! Request middleware applied to every route.

pub mod json_body;
pub mod request_id;

pub use json_body::{json_body_layer, JsonBody};
pub use request_id::{request_id_layer, RequestId};
