use irsim_core::{Engine, EngineConfig, IrError, MethodId, MethodOutput, SimulateRequest};
use serde_json::{json, Value};

fn request(method_id: MethodId, query: &str, documents: &str) -> SimulateRequest {
    SimulateRequest { method_id, query: query.into(), documents: documents.into(), relevant_doc_ids: None }
}

fn run_json(req: &SimulateRequest) -> Value {
    let out = Engine::default().run(req).unwrap();
    serde_json::to_value(out).unwrap()
}

const CORPUS: &str = "--- Document: rust.txt ---
Rust ownership and borrowing keep memory safe.

--- Document: python.txt ---
Python scripting favours quick prototypes.

--- Document: systems.txt ---
Systems programming in Rust gives memory control.
";

#[test]
fn regex_wire_shape() {
    let v = run_json(&request(MethodId::Regex, r"info\w+", "informasi dan informal"));
    assert_eq!(
        v,
        json!({"matches": [{"docId": 1, "name": "Document 1", "content": "informasi dan informal", "highlights": [[0, 9], [14, 22]]}]})
    );
}

#[test]
fn regex_no_match_message() {
    let v = run_json(&request(MethodId::Regex, "xyz+", CORPUS));
    assert!(v["message"].is_string());
    assert!(v.get("matches").is_none());
}

#[test]
fn boolean_wire_shape() {
    let v = run_json(&request(MethodId::Boolean, "memory AND NOT python", CORPUS));
    let names: Vec<&str> = v["matchedDocuments"].as_array().unwrap().iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["rust.txt", "systems.txt"]);
    assert!(v["matchedDocuments"][0].get("score").is_none());
}

#[test]
fn vsm_and_bm25_rank_descending() {
    for method in [MethodId::Vsm, MethodId::Bm25] {
        let v = run_json(&request(method, "rust memory", CORPUS));
        let ranked = v["rankedDocuments"].as_array().unwrap();
        assert_eq!(ranked.len(), 2, "{method}");
        let scores: Vec<f64> = ranked.iter().map(|d| d["score"].as_f64().unwrap()).collect();
        assert!(scores[0] >= scores[1]);
        assert!(ranked.iter().all(|d| d["docId"] != 2));
    }
}

#[test]
fn ranking_is_idempotent() {
    for method in [MethodId::Vsm, MethodId::Bm25, MethodId::Relevance] {
        let req = request(method, "memory rust programming", CORPUS);
        let a = Engine::default().run(&req).unwrap();
        let b = Engine::default().run(&req).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}

#[test]
fn clustering_wire_shape() {
    let docs = "galaxy stars telescope\nsoccer league striker\ngalaxy stars telescope\nsoccer league striker";
    let v = run_json(&request(MethodId::Clustering, "2", docs));
    assert_eq!(v["numClusters"], 2);
    let clusters = v["clusters"].as_object().unwrap();
    assert_eq!(clusters.len(), 2);
    let mut groups: Vec<Vec<u64>> = clusters
        .values()
        .map(|m| m.as_array().unwrap().iter().map(|d| d["docId"].as_u64().unwrap()).collect())
        .collect();
    groups.sort();
    assert_eq!(groups, vec![vec![1, 3], vec![2, 4]]);
    assert!(v["inertia"].as_f64().unwrap() >= 0.0);
}

#[test]
fn clustering_seed_is_configurable_and_reproducible() {
    let docs = "alpha beta\nbeta gamma\ngamma delta\ndelta alpha\nalpha gamma\nbeta delta";
    let engine = Engine::new(EngineConfig { kmeans_seed: 7, ..EngineConfig::default() });
    let req = request(MethodId::Clustering, "3", docs);
    assert_eq!(engine.run(&req).unwrap(), engine.run(&req).unwrap());
}

#[test]
fn relevance_round_trip() {
    let first = run_json(&request(MethodId::Relevance, "memory", CORPUS));
    assert!(first["message"].is_string());
    assert!(first.get("expandedQuery").is_none());

    let mut req = request(MethodId::Relevance, "memory", CORPUS);
    req.relevant_doc_ids = Some(vec![3]);
    let second = run_json(&req);
    let expanded = second["expandedQuery"].as_str().unwrap();
    assert!(expanded.starts_with("memory "));
    let added = second["addedTerms"].as_array().unwrap();
    assert!(!added.is_empty() && added.len() <= 3);
    assert_eq!(second["rankedDocuments"][0]["docId"], 3);

    req.relevant_doc_ids = Some(vec![]);
    assert_eq!(Engine::default().run(&req), Err(IrError::NoRelevantDocuments));
}

#[test]
fn output_variant_matches_method() {
    let engine = Engine::default();
    assert!(matches!(engine.run(&request(MethodId::Vsm, "rust", CORPUS)), Ok(MethodOutput::Ranked(_))));
    assert!(matches!(engine.run(&request(MethodId::Boolean, "rust", CORPUS)), Ok(MethodOutput::Boolean(_))));
    assert!(matches!(engine.run(&request(MethodId::Relevance, "rust", CORPUS)), Ok(MethodOutput::Feedback(_))));
}
