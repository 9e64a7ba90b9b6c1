use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// A logical API call. Cloneable so it can be dispatched a second time after
/// a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Where a logical request is in its lifecycle.
///
/// Only `First` may move into a refresh. A `Retry` carries the access token
/// issued by that refresh and its outcome is final, which caps every request
/// at one refresh-and-retry cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retry { access_token: String },
}

impl Attempt {
    pub fn is_retry(&self) -> bool {
        matches!(self, Attempt::Retry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_query_and_body() {
        let request = ApiRequest::get("/articles")
            .query("tag", "visa")
            .query("page", 2)
            .json(&serde_json::json!({"k": "v"}))
            .unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![
                ("tag".to_string(), "visa".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
        assert_eq!(request.body.unwrap()["k"], "v");
    }

    #[test]
    fn test_only_retry_is_marked() {
        assert!(!Attempt::First.is_retry());
        assert!(Attempt::Retry { access_token: "t".into() }.is_retry());
    }
}
