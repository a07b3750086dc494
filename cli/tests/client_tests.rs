use irsim_cli::client::{ClientError, SimulateClient};
use irsim_core::{EngineConfig, MethodId, SimulateRequest};
use std::time::Duration;
use tokio::net::TcpListener;

fn request(method_id: MethodId, query: &str) -> SimulateRequest {
    SimulateRequest {
        method_id,
        query: query.into(),
        documents: "rust memory safety\npython scripting\nrust systems".into(),
        relevant_doc_ids: None,
    }
}

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = irsim_server::build_app(EngineConfig::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn refused_connection_is_service_unavailable() {
    // grab a free port, then close it so nothing listens there
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SimulateClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let err = client.simulate(&request(MethodId::Vsm, "rust")).await.unwrap_err();
    assert!(err.is_service_unavailable(), "{err:?}");
    assert!(err.to_string().contains("start it with"));
}

#[tokio::test]
async fn remote_ranking() {
    let base = spawn_server().await;
    let client = SimulateClient::new(&base, Duration::from_secs(5)).unwrap();
    let out = client.simulate(&request(MethodId::Bm25, "rust")).await.unwrap();
    let ranked = out["rankedDocuments"].as_array().unwrap();
    assert_eq!(ranked.len(), 2);
}

#[tokio::test]
async fn application_errors_are_not_transport_errors() {
    let base = spawn_server().await;
    let client = SimulateClient::new(&base, Duration::from_secs(5)).unwrap();
    match client.simulate(&request(MethodId::Clustering, "0")).await {
        Err(ClientError::Application { status, message }) => {
            assert_eq!(status.as_u16(), 400);
            assert!(message.contains("clusters"));
        }
        other => panic!("expected application error, got {other:?}"),
    }
}

#[test]
fn invalid_base_url() {
    assert!(matches!(SimulateClient::new("not a url", Duration::from_secs(1)), Err(ClientError::InvalidUrl(_))));
}
