// ztectl-core: Connection config and background polling between ztectl-api and consumers.

pub mod config;
pub mod error;
pub mod poller;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::RouterConfig;
pub use error::CoreError;
pub use poller::{PollUpdate, Poller, PollerHandle};

pub use ztectl_api::{Section, SessionClient, Snapshot};
