// ztectl-api: Async Rust client for the ubus JSON-RPC API of ZTE routers

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod refresh;
pub mod rpc;
pub mod session;
pub mod snapshot;
pub mod transport;

pub use auth::login_digest;
pub use client::{ACCESS_DENIED_CODE, SESSION_EXPIRY_THRESHOLD, SessionClient};
pub use error::Error;
pub use rpc::{Envelope, RpcCall};
pub use session::{SessionToken, UNAUTHENTICATED_SESSION};
pub use snapshot::{Section, Snapshot};
pub use transport::{REQUEST_TIMEOUT, TransportConfig};
