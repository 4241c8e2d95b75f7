// ubus JSON-RPC wire types
//
// Every request is a JSON-RPC 2.0 `call` whose params are
// `[session, namespace, method, args]`. Replies come back as an array in
// request order; each item carries either `result: [status, payload]` or
// an `error` object.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::session::SessionToken;

const JSONRPC_VERSION: &str = "2.0";
const CALL_METHOD: &str = "call";

/// One RPC to issue against the router: `namespace.method(params)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    namespace: String,
    method: String,
    params: Option<Map<String, Value>>,
}

impl RpcCall {
    pub fn new(namespace: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            method: method.into(),
            params: None,
        }
    }

    /// Add a single named argument.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.params.as_ref()
    }
}

impl fmt::Display for RpcCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.method)
    }
}

/// A serialized JSON-RPC request.
///
/// The id is advisory: the router answers positionally, but it still
/// rejects envelopes without one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (String, String, String, Value),
}

impl Envelope {
    pub(crate) fn new(id: u64, session: &SessionToken, call: &RpcCall) -> Self {
        let args = call
            .params
            .clone()
            .map_or_else(|| Value::Object(Map::new()), Value::Object);

        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: CALL_METHOD,
            params: (
                session.as_str().to_owned(),
                call.namespace.clone(),
                call.method.clone(),
                args,
            ),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The session token this envelope was stamped with.
    pub fn session(&self) -> &str {
        &self.params.0
    }
}

/// Pull the payload out of one positional reply item.
///
/// `result[0]` is a ubus status code that is ignored; the payload lives at
/// `result[1]`. Anything else is an error, with `error` members surfaced as
/// [`Error::Rpc`] so callers can spot access-denied replies.
pub(crate) fn extract_result(item: &Value) -> Result<Value, Error> {
    let Some(obj) = item.as_object() else {
        return Err(Error::Protocol {
            message: format!("reply item is not an object: {item}"),
        });
    };

    if let Some(err) = obj.get("error") {
        return Err(Error::Rpc {
            code: err.get("code").and_then(Value::as_i64),
            message: err.get("message").and_then(Value::as_str).map(String::from),
        });
    }

    match obj.get("result").and_then(Value::as_array) {
        Some(result) if result.len() > 1 => Ok(result[1].clone()),
        _ => Err(Error::Protocol {
            message: "reply item has no usable result array".into(),
        }),
    }
}
