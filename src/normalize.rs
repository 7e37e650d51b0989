//! Failure normalization
//!
//! The backend reports validation problems as a JSON object mapping field
//! names to one message or a list of messages, e.g.
//! `{"email": ["already taken"], "password": ["too short"]}`.
//! A front end wants one line to show. `normalize_failure` is the only
//! place that turns a failed response into a `LaptopHubError`; which
//! line is picked is up to the `MessagePolicy` handed to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LaptopHubError;

/// Picks the user-facing message out of a field error body
pub trait MessagePolicy: Send + Sync + std::fmt::Debug {
    /// `None` when the body holds no usable message.
    fn extract(&self, body: &Map<String, Value>) -> Option<String>;
}

/// First non-blank string in body order, first entry within a field
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMessage;

impl MessagePolicy for FirstMessage {
    fn extract(&self, body: &Map<String, Value>) -> Option<String> {
        body.values().find_map(|v| messages(v).into_iter().next().map(String::from))
    }
}

/// Every non-blank message in body order, joined
#[derive(Debug, Clone)]
pub struct JoinedMessages {
    pub separator: String,
}

impl Default for JoinedMessages {
    fn default() -> Self {
        Self {
            separator: "; ".to_string(),
        }
    }
}

impl MessagePolicy for JoinedMessages {
    fn extract(&self, body: &Map<String, Value>) -> Option<String> {
        let all: Vec<&str> = body.values().flat_map(messages).collect();
        if all.is_empty() {
            None
        } else {
            Some(all.join(&self.separator))
        }
    }
}

/// Config-file name for the built-in policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicyKind {
    #[default]
    First,
    Joined,
}

impl MessagePolicyKind {
    pub fn policy(&self) -> Box<dyn MessagePolicy> {
        match self {
            MessagePolicyKind::First => Box::new(FirstMessage),
            MessagePolicyKind::Joined => Box::new(JoinedMessages::default()),
        }
    }
}

/// Strings inside one field value, depth first, in order.
fn messages(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.as_str()],
        Value::Array(items) => items.iter().flat_map(messages).collect(),
        Value::Object(fields) => fields.values().flat_map(messages).collect(),
        _ => Vec::new(),
    }
}

/// Failure for reads: the status code and nothing else.
pub fn status_failure(status: u16) -> LaptopHubError {
    LaptopHubError::http(status)
}

/// Failure for form and account calls.
///
/// Falls back to `HTTP {status}` when the body is empty, is not JSON, or
/// holds no message the policy accepts.
pub fn normalize_failure(status: u16, body: &str, policy: &dyn MessagePolicy) -> LaptopHubError {
    let extracted = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => policy.extract(&fields),
        // Some endpoints answer with a bare list of non-field errors.
        Ok(Value::Array(items)) => {
            let mut wrapped = Map::new();
            wrapped.insert("non_field_errors".to_string(), Value::Array(items));
            policy.extract(&wrapped)
        }
        _ => None,
    };

    match extracted {
        Some(message) => LaptopHubError::api(status, message),
        None => status_failure(status),
    }
}
