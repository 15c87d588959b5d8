//! Response header injection
//!
//! The configured header list is validated once at startup and appended to
//! every outgoing response, after the content headers.

use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

use crate::error::ServeError;

/// Decoration step applied to every response
#[derive(Debug, Clone, Default)]
pub struct HeaderInjector {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderInjector {
    pub fn new(pairs: &[(String, String)]) -> Result<Self, ServeError> {
        let headers = pairs
            .iter()
            .map(|(name, value)| {
                let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    ServeError::InvalidHeader {
                        name: name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                let header_value =
                    HeaderValue::from_str(value).map_err(|e| ServeError::InvalidHeader {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
                Ok((header_name, header_value))
            })
            .collect::<Result<Vec<_>, ServeError>>()?;

        Ok(Self { headers })
    }

    /// Append the configured headers in order
    pub fn apply<B>(&self, response: &mut Response<B>) {
        let map = response.headers_mut();
        for (name, value) in &self.headers {
            map.append(name.clone(), value.clone());
        }
    }
}
