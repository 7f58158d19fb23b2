//! HTTP client for the platform API.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::error::{DecodeError, RemoteError, TransportError};
use crate::types::ApiUrl;

use super::request::ApiRequest;

/// Performs one HTTP call and normalizes the result.
///
/// The client knows nothing about tokens; parameters must already be resolved
/// on the [`ApiRequest`].
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base: ApiUrl,
}

impl HttpClient {
    /// Create a client with the default transport settings.
    pub fn new(base: ApiUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wxkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self { client, base })
    }

    /// Create a client over a caller-configured transport.
    pub fn with_client(client: reqwest::Client, base: ApiUrl) -> Self {
        Self { client, base }
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    /// Execute a request and return the decoded JSON body.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.base.endpoint(&request.path);
        debug!(%url, "sending request");

        let mut builder = self.client.request(request.method, &url);

        if let Some(params) = &request.params {
            builder = builder.query(params);
        }

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        if let Some((field, media)) = request.file {
            let form = reqwest::multipart::Form::new().part(field, media.into_part());
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;

        let status = response.status();
        trace!(status = %status, "response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes).map_err(DecodeError::Json)?;

        check_error_envelope(value)
    }
}

/// Reject a response whose `errcode` is present and non-zero.
///
/// Any other value is returned unchanged.
pub(crate) fn check_error_envelope(value: Value) -> Result<Value> {
    let code = value.get("errcode").and_then(|code| {
        code.as_i64()
            .or_else(|| code.as_str().and_then(|s| s.trim().parse().ok()))
    });

    match code {
        Some(code) if code != 0 => {
            let message = value
                .get("errmsg")
                .and_then(Value::as_str)
                .unwrap_or_default();
            debug!(code, message, "error envelope in response");
            Err(RemoteError::new(code, message).into())
        }
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn non_zero_errcode_is_a_remote_error() {
        let err = check_error_envelope(json!({
            "errcode": 40001,
            "errmsg": "invalid credential"
        }))
        .unwrap_err();

        match err {
            Error::Remote(remote) => {
                assert_eq!(remote.code, 40001);
                assert_eq!(remote.message, "invalid credential");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn zero_errcode_is_returned_unchanged() {
        let body = json!({"errcode": 0, "errmsg": "ok", "total_num": 1});
        assert_eq!(check_error_envelope(body.clone()).unwrap(), body);
    }

    #[test]
    fn absent_errcode_is_returned_unchanged() {
        let body = json!({"url": "http://mmbiz.qpic.cn/mmbiz/iaL1LJM1mF9aRKPZJkm/0"});
        assert_eq!(check_error_envelope(body.clone()).unwrap(), body);
    }

    #[test]
    fn missing_errmsg_yields_empty_message() {
        let err = check_error_envelope(json!({"errcode": -1})).unwrap_err();
        assert_eq!(err.as_remote().unwrap().message, "");
    }

    #[test]
    fn non_object_bodies_pass_through() {
        let body = json!([1, 2, 3]);
        assert_eq!(check_error_envelope(body.clone()).unwrap(), body);
    }

    #[test]
    fn client_creation() {
        let base = ApiUrl::default();
        let client = HttpClient::new(base.clone()).unwrap();
        assert_eq!(client.base(), &base);
    }
}
