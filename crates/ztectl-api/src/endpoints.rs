// Router RPC catalogue
//
// Namespaces and methods exposed by the router firmware, plus the
// single-call getters built on them. The refresh batch draws its calls
// from `section_call` so batch order always follows `Section` order.

use serde_json::Value;
use tracing::debug;

use crate::client::SessionClient;
use crate::rpc::RpcCall;
use crate::snapshot::Section;

const WEB_NS: &str = "zwrt_web";
const ROUTER_NS: &str = "zwrt_router.api";
const NWINFO_NS: &str = "zte_nwinfo_api";
const DATA_NS: &str = "zwrt_data";
const WLAN_NS: &str = "zwrt_wlan";

const ROUTER_STATUS: &str = "router_get_status";
const ROUTER_STATUS_NO_AUTH: &str = "router_get_status_no_auth";

/// Field of the `web_login_info` reply holding the login salt.
/// (The misspelling is the firmware's.)
pub const SALT_FIELD: &str = "zte_web_sault";

pub fn login_info() -> RpcCall {
    RpcCall::new(WEB_NS, "web_login_info")
}

pub fn login(digest: &str) -> RpcCall {
    RpcCall::new(WEB_NS, "web_login").with_param("password", digest)
}

/// Router status; the firmware exposes a separate method for anonymous
/// sessions.
pub fn router_status(authenticated: bool) -> RpcCall {
    let method = if authenticated {
        ROUTER_STATUS
    } else {
        ROUTER_STATUS_NO_AUTH
    };
    RpcCall::new(ROUTER_NS, method)
}

pub fn network_info() -> RpcCall {
    RpcCall::new(NWINFO_NS, "nwinfo_get_netinfo")
}

/// WWAN traffic counters for the primary connection, as the web UI asks
/// for them.
pub fn data_usage() -> RpcCall {
    RpcCall::new(DATA_NS, "get_wwandst")
        .with_param("source_module", "web")
        .with_param("cid", 1)
        .with_param("type", 4)
}

pub fn user_count() -> RpcCall {
    RpcCall::new(ROUTER_NS, "router_get_user_list_num")
}

pub fn wlan_report() -> RpcCall {
    RpcCall::new(WLAN_NS, "report")
}

/// The call that fills `section` in a refresh.
pub fn section_call(section: Section, authenticated: bool) -> RpcCall {
    match section {
        Section::RouterStatus => router_status(authenticated),
        Section::NetworkInfo => network_info(),
        Section::DataUsage => data_usage(),
        Section::DeviceInfo => user_count(),
        Section::WlanInfo => wlan_report(),
    }
}

impl SessionClient {
    /// Fetch router status alone, picking the method for the current
    /// session state.
    pub async fn get_router_status(&mut self) -> Option<Value> {
        let call = router_status(self.is_authenticated());
        debug!(method = call.method(), "fetching router status");
        self.call_one(&call).await
    }

    /// Fetch network info (signal, operator, band) alone.
    pub async fn get_network_info(&mut self) -> Option<Value> {
        self.call_one(&network_info()).await
    }

    /// Fetch data-usage counters alone. Requires an authenticated session.
    pub async fn get_data_usage(&mut self) -> Option<Value> {
        self.call_one(&data_usage()).await
    }
}
