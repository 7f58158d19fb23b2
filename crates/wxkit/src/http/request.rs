//! Outgoing request description.

use std::fmt;

use reqwest::Method;
use serde::Serialize;

use crate::Result;

/// A file sent as a multipart form field.
#[derive(Clone)]
pub struct Media {
    file_name: String,
    bytes: Vec<u8>,
}

impl Media {
    /// Create a media upload from a file name and its contents.
    ///
    /// The platform infers the format from the file name's extension
    /// (`jpg`, `jpeg`, `png`, `gif`).
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the size of the contents in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the contents are empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_part(self) -> reqwest::multipart::Part {
        reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name)
    }
}

impl fmt::Debug for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Media")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One call to the platform API.
///
/// When no query parameters are set, the dispatcher attaches the current
/// access token as the only parameter.
///
/// # Example
///
/// ```
/// use wxkit::ApiRequest;
/// use serde_json::json;
///
/// let request = ApiRequest::post("/card/get")
///     .json(&json!({"card_id": "pFS7Fjg8kV1IdDz01r4SQwMkuCKc"}))
///     .unwrap();
/// assert_eq!(request.path(), "/card/get");
/// ```
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) params: Option<Vec<(String, String)>>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) file: Option<(String, Media)>,
}

impl ApiRequest {
    /// Create a request with the given method and endpoint path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: None,
            body: None,
            file: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Set explicit query parameters, replacing the default access token.
    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = Some(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Serialize `body` to JSON bytes and send it as the request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Attach a file as the multipart form field `field`.
    pub fn file(mut self, field: impl Into<String>, media: Media) -> Self {
        self.file = Some((field.into(), media));
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub(crate) fn has_params(&self) -> bool {
        self.params.is_some()
    }
}

// Parameter values carry the secret or the access token
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let param_names: Option<Vec<&str>> = self
            .params
            .as_ref()
            .map(|params| params.iter().map(|(name, _)| name.as_str()).collect());

        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &param_names)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("file", &self.file)
            .finish()
    }
}
