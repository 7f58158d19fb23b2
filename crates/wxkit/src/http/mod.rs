//! HTTP transport and request dispatch.
//!
//! `HttpClient` performs a single call and checks the error envelope;
//! [`Dispatcher`] adds access-token handling on top of it.

mod client;
mod dispatcher;
mod endpoints;
mod request;

pub(crate) use client::HttpClient;
pub(crate) use endpoints::*;

pub use dispatcher::Dispatcher;
pub use request::{ApiRequest, Media};
