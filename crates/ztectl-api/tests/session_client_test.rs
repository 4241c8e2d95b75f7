#![allow(clippy::unwrap_used)]
// Integration tests for `SessionClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use ztectl_api::{RpcCall, Section, SessionClient, SessionToken, UNAUTHENTICATED_SESSION};

// ── Helpers ─────────────────────────────────────────────────────────

const SALT: &str = "ab12";
const PASS_DIGEST: &str = "B8DDE7DD4B78360D9BEFDEB4D52B65D4C33932B5297ED51F34BE623A20556718";

async fn setup(password: Option<&str>) -> (MockServer, SessionClient) {
    let server = MockServer::start().await;
    let client = SessionClient::new(
        server.address().to_string(),
        password.map(|p| SecretString::from(p.to_owned())),
    )
    .unwrap();
    (server, client)
}

fn ok(payload: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": 0, "result": [0, payload] })
}

fn rpc_error(code: i64) -> Value {
    json!({ "jsonrpc": "2.0", "id": 0, "error": { "code": code, "message": "Access denied" } })
}

fn reply(items: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(items)
}

async fn mount_login(server: &MockServer, login_reply: Value) {
    Mock::given(method("POST"))
        .and(path("/ubus/"))
        .and(body_string_contains("\"web_login_info\""))
        .respond_with(reply(json!([ok(json!({ "zte_web_sault": SALT }))])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ubus/"))
        .and(body_string_contains("\"web_login\""))
        .respond_with(reply(json!([ok(login_reply)])))
        .mount(server)
        .await;
}

async fn mount_batch(server: &MockServer, items: Value) {
    Mock::given(method("POST"))
        .and(path("/ubus/"))
        .and(body_string_contains("nwinfo_get_netinfo"))
        .respond_with(reply(items))
        .mount(server)
        .await;
}

fn body_json(req: &Request) -> Value {
    serde_json::from_slice(&req.body).unwrap()
}

async fn requests_containing(server: &MockServer, needle: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains(needle))
        .map(body_json)
        .collect()
}

fn three_calls() -> Vec<RpcCall> {
    vec![
        RpcCall::new("zte_nwinfo_api", "nwinfo_get_netinfo"),
        RpcCall::new("zwrt_wlan", "report"),
        RpcCall::new("zwrt_router.api", "router_get_user_list_num"),
    ]
}

// ── Wire format ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_request_wire_format() {
    let (server, mut client) = setup(None).await;
    mount_batch(&server, json!([ok(json!({})), ok(json!({})), ok(json!({}))])).await;

    client.call_batch(&three_calls()).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];

    let host = server.address().to_string();
    assert_eq!(req.headers["content-type"], "text/plain;charset=UTF-8");
    assert_eq!(req.headers["origin"], format!("http://{host}").as_str());
    assert_eq!(req.headers["referer"], format!("http://{host}/").as_str());

    let (key, stamp) = req.url.query_pairs().next().unwrap();
    assert_eq!(key, "t");
    assert!(stamp.parse::<i64>().unwrap() > 1_600_000_000_000);

    let body = body_json(req);
    assert_eq!(
        body,
        json!([
            { "jsonrpc": "2.0", "id": 1, "method": "call",
              "params": [UNAUTHENTICATED_SESSION, "zte_nwinfo_api", "nwinfo_get_netinfo", {}] },
            { "jsonrpc": "2.0", "id": 2, "method": "call",
              "params": [UNAUTHENTICATED_SESSION, "zwrt_wlan", "report", {}] },
            { "jsonrpc": "2.0", "id": 3, "method": "call",
              "params": [UNAUTHENTICATED_SESSION, "zwrt_router.api", "router_get_user_list_num", {}] },
        ])
    );
}

#[tokio::test]
async fn test_request_ids_continue_across_calls() {
    let (server, mut client) = setup(None).await;
    mount_batch(&server, json!([ok(json!({ "a": 1 }))])).await;

    client.call_one(&RpcCall::new("zte_nwinfo_api", "nwinfo_get_netinfo")).await;
    client.call_batch(&three_calls()).await;
    client.call_one(&RpcCall::new("zte_nwinfo_api", "nwinfo_get_netinfo")).await;

    let ids: Vec<u64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .flat_map(|r| {
            body_json(r)
                .as_array()
                .unwrap()
                .iter()
                .map(|e| e["id"].as_u64().unwrap())
                .collect::<Vec<_>>()
        })
        .collect();

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

// ── Single call ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_call_one_returns_payload() {
    let (server, mut client) = setup(None).await;
    mount_batch(&server, json!([ok(json!({ "network_type": "SA" }))])).await;

    let payload = client.get_network_info().await.unwrap();

    assert_eq!(payload, json!({ "network_type": "SA" }));
}

#[tokio::test]
async fn test_call_one_degrades_to_none() {
    let (server, mut client) = setup(None).await;

    Mock::given(method("POST"))
        .and(body_string_contains("nwinfo_get_netinfo"))
        .respond_with(reply(json!([{ "result": [6] }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("get_wwandst"))
        .respond_with(reply(json!([rpc_error(-32002)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("router_get_status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(client.get_network_info().await, None);
    assert_eq!(client.get_data_usage().await, None);
    assert_eq!(client.get_router_status().await, None);
}

#[tokio::test]
async fn test_router_status_method_tracks_session() {
    let (server, mut client) = setup(None).await;

    Mock::given(method("POST"))
        .and(body_string_contains("router_get_status_no_auth"))
        .respond_with(reply(json!([ok(json!({ "anon": true }))])))
        .mount(&server)
        .await;

    assert_eq!(
        client.get_router_status().await,
        Some(json!({ "anon": true }))
    );
}

// ── Batch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_call_batch_pads_short_reply() {
    let (server, mut client) = setup(None).await;
    mount_batch(
        &server,
        json!([ok(json!({ "rsrp": -90 })), rpc_error(-32601)]),
    )
    .await;

    let results = client.call_batch(&three_calls()).await;

    assert_eq!(results, vec![Some(json!({ "rsrp": -90 })), None, None]);
}

#[tokio::test]
async fn test_call_batch_truncates_long_reply() {
    let (server, mut client) = setup(None).await;
    mount_batch(
        &server,
        json!([
            ok(json!({ "a": 1 })),
            ok(json!({ "b": 2 })),
            ok(json!({ "c": 3 })),
            ok(json!({ "d": 4 })),
        ]),
    )
    .await;

    let results = client.call_batch(&three_calls()).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[2], Some(json!({ "c": 3 })));
}

#[tokio::test]
async fn test_call_batch_malformed_items() {
    let (server, mut client) = setup(None).await;
    mount_batch(&server, json!(["junk", { "result": [0] }, ok(json!(42))])).await;

    let results = client.call_batch(&three_calls()).await;

    assert_eq!(results, vec![None, None, Some(json!(42))]);
}

#[tokio::test]
async fn test_call_batch_non_array_body_fails_closed() {
    let (server, mut client) = setup(None).await;
    mount_batch(&server, json!({ "error": "not a batch" })).await;

    let results = client.call_batch(&three_calls()).await;

    assert_eq!(results, vec![None, None, None]);
}

#[tokio::test]
async fn test_call_batch_http_error_fails_closed() {
    let (server, mut client) = setup(None).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let results = client.call_batch(&three_calls()).await;

    assert_eq!(results, vec![None, None, None]);
}

#[tokio::test]
async fn test_call_batch_ignores_declared_content_type() {
    let (server, mut client) = setup(None).await;

    let body = serde_json::to_vec(&json!([ok(json!({ "x": 1 }))])).unwrap();
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;

    let results = client
        .call_batch(&[RpcCall::new("zwrt_wlan", "report")])
        .await;

    assert_eq!(results, vec![Some(json!({ "x": 1 }))]);
}

#[tokio::test]
async fn test_call_batch_unreachable_router() {
    let mut client = SessionClient::new("127.0.0.1:1", None).unwrap();

    let results = client.call_batch(&three_calls()).await;

    assert_eq!(results, vec![None, None, None]);
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_sends_salted_digest() {
    let (server, mut client) = setup(Some("pass")).await;
    mount_login(&server, json!({ "result": 0, "ubus_rpc_session": "T1" })).await;

    assert!(client.authenticate().await);
    assert_eq!(client.token(), &SessionToken::new("T1"));

    let logins = requests_containing(&server, "\"web_login\"").await;
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0][0]["params"][3], json!({ "password": PASS_DIGEST }));
    assert_eq!(logins[0][0]["params"][0], UNAUTHENTICATED_SESSION);
}

#[tokio::test]
async fn test_authenticate_string_result_code() {
    let (server, mut client) = setup(Some("pass")).await;
    mount_login(&server, json!({ "result": "0", "ubus_rpc_session": "T2" })).await;

    assert!(client.authenticate().await);
    assert_eq!(client.token().as_str(), "T2");
}

#[tokio::test]
async fn test_authenticate_success_without_session_keeps_token() {
    let (server, mut client) = setup(Some("pass")).await;
    mount_login(&server, json!({ "result": 0 })).await;

    assert!(client.authenticate().await);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_authenticate_rejections_leave_token() {
    for login_reply in [
        json!({ "result": 1, "login_fail_num": 2, "msg": "wrong" }),
        json!({ "result": "1" }),
        json!({ "result": 2, "login_fail_lock_lefttime": 300 }),
        json!({ "result": "2" }),
        json!({ "result": 9 }),
        json!({ "ubus_rpc_session": "NOPE" }),
    ] {
        let (server, mut client) = setup(Some("pass")).await;
        mount_login(&server, login_reply.clone()).await;

        assert!(!client.authenticate().await, "accepted {login_reply}");
        assert_eq!(client.token().as_str(), UNAUTHENTICATED_SESSION);
    }
}

#[tokio::test]
async fn test_authenticate_without_password() {
    let (server, mut client) = setup(None).await;

    assert!(!client.authenticate().await);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_password_never_logs_in() {
    let (server, mut client) = setup(Some("")).await;
    mount_login(&server, json!({ "result": 1, "login_fail_num": 1 })).await;
    mount_batch(&server, json!([ok(json!({ "wan_status": "connected" }))])).await;

    assert!(!client.has_credential());
    assert!(!client.authenticate().await);
    for _ in 0..3 {
        client.refresh().await;
    }

    assert!(requests_containing(&server, "web_login").await.is_empty());
    let batches = requests_containing(&server, "nwinfo_get_netinfo").await;
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0][0]["params"][2], "router_get_status_no_auth");
}

#[tokio::test]
async fn test_authenticate_missing_salt() {
    let (server, mut client) = setup(Some("pass")).await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"web_login_info\""))
        .respond_with(reply(json!([ok(json!({ "other": 1 }))])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("\"web_login\""))
        .respond_with(reply(json!([ok(json!({ "result": 0 }))])))
        .expect(0)
        .mount(&server)
        .await;

    assert!(!client.authenticate().await);
}

#[tokio::test]
async fn test_authenticate_no_login_reply() {
    let (server, mut client) = setup(Some("pass")).await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"web_login_info\""))
        .respond_with(reply(json!([ok(json!({ "zte_web_sault": SALT }))])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("\"web_login\""))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!client.authenticate().await);
    assert!(!client.is_authenticated());
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_anonymous_uses_no_auth_variant() {
    let (server, mut client) = setup(None).await;
    mount_batch(
        &server,
        json!([
            ok(json!({ "wan_status": "connected" })),
            ok(json!({ "network_type": "LTE" })),
            rpc_error(-32002),
            rpc_error(-32002),
            rpc_error(-32002),
        ]),
    )
    .await;

    let snapshot = client.refresh().await;

    assert_eq!(snapshot.router_status["wan_status"], "connected");
    assert_eq!(snapshot.network_info["network_type"], "LTE");
    assert_eq!(
        snapshot.missing_sections(),
        vec![Section::DataUsage, Section::DeviceInfo, Section::WlanInfo]
    );

    let batches = requests_containing(&server, "nwinfo_get_netinfo").await;
    assert_eq!(batches[0][0]["params"][2], "router_get_status_no_auth");
    assert!(requests_containing(&server, "web_login").await.is_empty());
}

#[tokio::test]
async fn test_refresh_logs_in_and_uses_session() {
    let (server, mut client) = setup(Some("pass")).await;
    mount_login(&server, json!({ "result": 0, "ubus_rpc_session": "T1" })).await;
    mount_batch(
        &server,
        json!([
            ok(json!({ "a": 1 })),
            ok(json!({ "b": 2 })),
            ok(json!({ "real_tx_speed": 10, "real_rx_speed": 20 })),
            ok(json!({ "wireless_num": 3, "lan_num": 1 })),
            ok(json!({ "ssid": "home" })),
        ]),
    )
    .await;

    let snapshot = client.refresh().await;

    assert!(snapshot.missing_sections().is_empty());
    assert_eq!(snapshot.device_info["wireless_num"], 3);
    assert_eq!(client.token().as_str(), "T1");

    let batch = &requests_containing(&server, "nwinfo_get_netinfo").await[0];
    let envelopes = batch.as_array().unwrap();
    assert_eq!(envelopes.len(), 5);
    assert!(envelopes.iter().all(|e| e["params"][0] == "T1"));
    assert_eq!(envelopes[0]["params"][2], "router_get_status");
    assert_eq!(
        envelopes[2]["params"][3],
        json!({ "source_module": "web", "cid": 1, "type": 4 })
    );
}

#[tokio::test]
async fn test_refresh_resets_expired_session() {
    let (server, mut client) = setup(Some("pass")).await;
    mount_login(&server, json!({ "result": 0, "ubus_rpc_session": "T1" })).await;
    mount_batch(
        &server,
        json!([
            ok(json!({ "wan_status": "connected" })),
            rpc_error(-32002),
            rpc_error(-32002),
            ok(json!({ "wireless_num": 2 })),
            ok(json!({ "ssid": "home" })),
        ]),
    )
    .await;

    let snapshot = client.refresh().await;

    assert_eq!(client.token().as_str(), UNAUTHENTICATED_SESSION);
    assert!(snapshot.network_info.is_empty());
    assert!(snapshot.data_usage.is_empty());
    assert!(!snapshot.router_status.is_empty());
    assert!(!snapshot.device_info.is_empty());
    assert!(!snapshot.wlan_info.is_empty());
}

#[tokio::test]
async fn test_single_access_denied_keeps_session() {
    let (server, mut client) = setup(Some("pass")).await;
    mount_login(&server, json!({ "result": 0, "ubus_rpc_session": "T1" })).await;
    mount_batch(
        &server,
        json!([
            ok(json!({ "a": 1 })),
            rpc_error(-32002),
            rpc_error(-32000),
            ok(json!({ "d": 4 })),
            ok(json!({ "e": 5 })),
        ]),
    )
    .await;

    let snapshot = client.refresh().await;

    assert_eq!(client.token().as_str(), "T1");
    assert!(snapshot.network_info.is_empty());
    assert!(snapshot.data_usage.is_empty());
}

#[tokio::test]
async fn test_refresh_reauthenticates_after_expiry() {
    let (server, mut client) = setup(Some("pass")).await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"web_login_info\""))
        .respond_with(reply(json!([ok(json!({ "zte_web_sault": SALT }))])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("\"web_login\""))
        .respond_with(reply(json!([ok(json!({ "result": 0, "ubus_rpc_session": "T1" }))])))
        .expect(2)
        .mount(&server)
        .await;
    mount_batch(
        &server,
        json!([
            ok(json!({ "a": 1 })),
            rpc_error(-32002),
            rpc_error(-32002),
            rpc_error(-32002),
            ok(json!({ "e": 5 })),
        ]),
    )
    .await;

    client.refresh().await;
    assert!(!client.is_authenticated());

    client.refresh().await;
    assert!(!client.is_authenticated());

    server.verify().await;
}

#[tokio::test]
async fn test_refresh_unreachable_router_is_empty() {
    let mut client =
        SessionClient::new("127.0.0.1:1", Some(SecretString::from("pass".to_owned()))).unwrap();

    let snapshot = client.refresh().await;

    assert!(!snapshot.has_data());
    assert_eq!(
        serde_json::to_value(&snapshot).unwrap(),
        json!({
            "router_status": {},
            "network_info": {},
            "data_usage": {},
            "device_info": {},
            "wlan_info": {}
        })
    );
    assert!(!client.is_authenticated());
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_close_is_idempotent_and_reopens() {
    let (server, mut client) = setup(None).await;
    mount_batch(&server, json!([ok(json!({ "x": 1 }))])).await;

    client.close();
    client.close();

    let payload = client.get_network_info().await;
    assert_eq!(payload, Some(json!({ "x": 1 })));

    client.close();
    let payload = client.get_network_info().await;
    assert_eq!(payload, Some(json!({ "x": 1 })));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
