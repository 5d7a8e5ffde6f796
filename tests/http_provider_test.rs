//! End-to-end tests for the HTTP provider against an in-process JSON-RPC server

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use zgs_node_client::{Client, Error, HttpProvider, Provider, ProviderOptions};

const ROOT: &str = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

#[derive(Default)]
struct ServerState {
    requests: AtomicUsize,
    flaky_calls: AtomicUsize,
}

fn json_response(status: StatusCode, body: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn handle(
    state: Arc<ServerState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let body = req.into_body().collect().await.unwrap().to_bytes();
    let request: Value = serde_json::from_slice(&body).unwrap();
    let id = request["id"].clone();
    let params = request["params"].as_array().cloned().unwrap_or_default();

    let ok = |result: Value| json_response(StatusCode::OK, json!({"jsonrpc": "2.0", "id": id, "result": result}));

    let response = match request["method"].as_str().unwrap_or_default() {
        "zgs_getStatus" => ok(json!({
            "connectedPeers": 4,
            "logSyncHeight": 2048,
            "logSyncBlock": ROOT,
            "nextTxSeq": 31
        })),
        "zgs_getFileInfo" => ok(Value::Null),
        "zgs_downloadSegment" => ok(json!("")),
        "admin_getSyncStatus" => {
            // Lower sequences answer later, so responses arrive out of order
            let seq = params[0].as_u64().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(100u64.saturating_sub(seq * 10))).await;
            ok(json!(format!("status-{}", seq)))
        }
        "test_rpcError" => json_response(
            StatusCode::OK,
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": "Method not found"}
            }),
        ),
        "test_slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            ok(json!(1))
        }
        "test_httpError" => json_response(StatusCode::INTERNAL_SERVER_ERROR, json!("boom")),
        "test_badRequest" => json_response(StatusCode::BAD_REQUEST, json!("rejected")),
        "test_nullIdError" => json_response(
            StatusCode::OK,
            json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {"code": -32700, "message": "Parse error"}
            }),
        ),
        "test_flaky" => {
            if state.flaky_calls.fetch_add(1, Ordering::SeqCst) < 2 {
                json_response(StatusCode::SERVICE_UNAVAILABLE, json!("try later"))
            } else {
                ok(json!("recovered"))
            }
        }
        "test_wrongId" => json_response(
            StatusCode::OK,
            json!({"jsonrpc": "2.0", "id": 999_999, "result": 1}),
        ),
        "test_garbage" => Response::new(Full::new(Bytes::from_static(b"<html>not json</html>"))),
        "test_echo" => ok(json!(params)),
        other => json_response(
            StatusCode::OK,
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": format!("unknown method {}", other)}
            }),
        ),
    };
    Ok(response)
}

/// Spawn a JSON-RPC server on an ephemeral port
async fn start_server() -> (SocketAddr, Arc<ServerState>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(ServerState::default());

    let server_state = state.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let state = server_state.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req| handle(state.clone(), req));
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (addr, state)
}

fn fast_options() -> ProviderOptions {
    ProviderOptions {
        request_timeout: Some(Duration::from_millis(500)),
        retry_interval: Duration::from_millis(10),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_status_over_http() {
    let (addr, state) = start_server().await;
    let client = Client::new(&format!("http://{}", addr)).unwrap();

    let status = client.zgs().get_status().await.unwrap();
    assert_eq!(status.connected_peers, 4);
    assert_eq!(status.next_tx_seq, 31);
    assert_eq!(status.log_sync_block.to_string(), ROOT);
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_params_reach_server_in_order() {
    let (addr, _) = start_server().await;
    let provider = HttpProvider::new(&format!("http://{}", addr), fast_options()).unwrap();

    let params = vec![json!(ROOT), json!(0), json!(u64::MAX), json!(true)];
    let echoed = provider.call("test_echo", params.clone()).await.unwrap();
    assert_eq!(echoed, Value::Array(params));
}

#[tokio::test]
async fn test_null_and_empty_results_over_http() {
    let (addr, _) = start_server().await;
    let client = Client::new(&format!("http://{}", addr)).unwrap();
    let root = ROOT.parse().unwrap();

    assert!(client.zgs().get_file_info(root).await.unwrap().is_none());
    assert_eq!(client.zgs().download_segment(root, 0, 1).await.unwrap(), None);
}

#[tokio::test]
async fn test_rpc_error_passthrough() {
    let (addr, _) = start_server().await;
    let provider = HttpProvider::new(&format!("http://{}", addr), fast_options()).unwrap();

    match provider.call("test_rpcError", vec![]).await {
        Err(Error::Rpc { code, message, data }) => {
            assert_eq!(code, -32601);
            assert_eq!(message, "Method not found");
            assert!(data.is_none());
        }
        other => panic!("Expected Rpc error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_rpc_error_is_not_retried() {
    let (addr, state) = start_server().await;
    let options = ProviderOptions {
        retry_count: 3,
        ..fast_options()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    assert!(matches!(provider.call("test_rpcError", vec![]).await, Err(Error::Rpc { .. })));
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_null_id_error_reaches_caller_once() {
    let (addr, state) = start_server().await;
    let options = ProviderOptions {
        retry_count: 3,
        ..fast_options()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    match provider.call("test_nullIdError", vec![]).await {
        Err(Error::Rpc { code, message, .. }) => {
            assert_eq!(code, -32700);
            assert_eq!(message, "Parse error");
        }
        other => panic!("Expected Rpc error, got: {:?}", other),
    }
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_http_error_status() {
    let (addr, _) = start_server().await;
    let provider = HttpProvider::new(&format!("http://{}", addr), fast_options()).unwrap();

    match provider.call("test_httpError", vec![]).await {
        Err(Error::Http { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("boom"), "{}", message);
        }
        other => panic!("Expected Http error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_client_http_error_is_not_retried() {
    let (addr, state) = start_server().await;
    let options = ProviderOptions {
        retry_count: 3,
        ..fast_options()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    let result = provider.call("test_badRequest", vec![]).await;
    assert!(matches!(result, Err(Error::Http { status: 400, .. })), "got: {:?}", result);
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failures() {
    let (addr, state) = start_server().await;
    let options = ProviderOptions {
        retry_count: 2,
        ..fast_options()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    let result = provider.call("test_flaky", vec![]).await.unwrap();
    assert_eq!(result, json!("recovered"));
    assert_eq!(state.requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let (addr, state) = start_server().await;
    let options = ProviderOptions {
        retry_count: 1,
        ..fast_options()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    assert!(matches!(
        provider.call("test_flaky", vec![]).await,
        Err(Error::Http { status: 503, .. })
    ));
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_request_timeout() {
    let (addr, _) = start_server().await;
    let options = ProviderOptions {
        request_timeout: Some(Duration::from_millis(100)),
        ..Default::default()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    match provider.call("test_slow", vec![]).await {
        Err(Error::Timeout(ms)) => assert_eq!(ms, 100),
        other => panic!("Expected Timeout error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_caller_deadline_cancels_call() {
    let (addr, _) = start_server().await;
    let options = ProviderOptions {
        request_timeout: None,
        ..Default::default()
    };
    let provider = HttpProvider::new(&format!("http://{}", addr), options).unwrap();

    let result = tokio::time::timeout(
        Duration::from_millis(100),
        provider.call("test_slow", vec![]),
    )
    .await;
    assert!(result.is_err(), "caller deadline should fire first");
}

#[tokio::test]
async fn test_mismatched_response_id() {
    let (addr, _) = start_server().await;
    let provider = HttpProvider::new(&format!("http://{}", addr), fast_options()).unwrap();

    assert!(matches!(provider.call("test_wrongId", vec![]).await, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_non_json_body() {
    let (addr, _) = start_server().await;
    let provider = HttpProvider::new(&format!("http://{}", addr), fast_options()).unwrap();

    assert!(matches!(provider.call("test_garbage", vec![]).await, Err(Error::Json(_))));
}

#[tokio::test]
async fn test_concurrent_calls_over_one_provider() {
    let (addr, _) = start_server().await;
    let client = Client::with_options(&format!("http://{}", addr), fast_options()).unwrap();

    let calls = (0..8u64).map(|seq| {
        let admin = client.admin().clone();
        async move { (seq, admin.get_sync_status(seq).await) }
    });
    let results = join_spawned(calls).await;

    for (seq, status) in results {
        assert_eq!(status.unwrap(), format!("status-{}", seq));
    }
}

/// Drive futures concurrently on spawned tasks and collect their outputs in order
async fn join_spawned<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}
