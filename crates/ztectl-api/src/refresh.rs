// Refresh cycle
//
// One refresh = (optional) login, then a single five-call batch whose
// positional results become a `Snapshot`. Never fails: an unreachable
// router produces an all-empty snapshot.

use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, info, warn};

use crate::client::SessionClient;
use crate::endpoints::section_call;
use crate::rpc::RpcCall;
use crate::snapshot::{Section, Snapshot};

impl SessionClient {
    /// Run one refresh cycle and return the merged snapshot.
    ///
    /// Logs in first when a password is configured and the session is
    /// anonymous (initially, or after the router expired it). A failed
    /// login is not fatal: the batch then runs anonymously and only the
    /// sections the router serves without auth come back.
    pub async fn refresh(&mut self) -> Snapshot {
        if self.has_credential() && !self.is_authenticated() {
            debug!("attempting to authenticate");
            if self.authenticate().await {
                info!(session = ?self.token(), "authentication successful");
            } else {
                warn!("authentication failed, using unauthenticated access");
            }
        }

        let authenticated = self.is_authenticated();
        let calls: Vec<RpcCall> = Section::iter()
            .map(|s| section_call(s, authenticated))
            .collect();
        debug!(
            method = calls.first().map(RpcCall::method),
            session = ?self.token(),
            "refreshing router data"
        );

        let snapshot = Snapshot::from_results(self.call_batch(&calls).await);

        let missing = snapshot.missing_sections();
        debug!(
            present = Section::COUNT - missing.len(),
            missing = ?missing,
            "refresh complete"
        );

        if !missing.is_empty() && self.is_authenticated() {
            let names: Vec<&str> = missing.iter().copied().map(Section::as_str).collect();
            warn!(
                missing = %names.join(", "),
                "failed to retrieve data despite authentication"
            );
        }

        snapshot
    }
}
