// E2E Test 2: Trained artifacts
// Tests the flow: artifact files on disk → startup probing → model path → rendered page

mod e2e;

use e2e::helpers::{rendered_prediction, TestServer};
use tempfile::TempDir;

const VECTORIZER: &str = r#"{
    "kind": "tfidf",
    "vocabulary": { "invoice": 0, "payment": 1, "meeting": 2 },
    "idf": [1.5, 1.5, 1.0]
}"#;

const NAIVE_BAYES: &str = r#"{
    "kind": "multinomial_nb",
    "class_log_prior": [-0.5, -0.9],
    "feature_log_prob": [[-3.0, -3.0, -0.2], [-0.4, -0.6, -4.0]],
    "classes": ["ham", "spam"]
}"#;

#[tokio::test]
async fn test_e2e_2_model_and_vectorizer() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("model.joblib"), NAIVE_BAYES).unwrap();
    std::fs::write(dir.path().join("vectorizer.joblib"), VECTORIZER).unwrap();

    let server = TestServer::start_with_artifacts(dir.path())
        .await
        .expect("server should start");

    let html = server.submit("Overdue invoice, payment required").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Spam"));

    let html = server.submit("Meeting notes").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Ham"));

    // The heuristic is not consulted while the model works
    let html = server.submit("WIN a FREE prize, meeting at noon").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Ham"));

    server.stop().await.expect("server should stop");
}

#[tokio::test]
async fn test_e2e_2_broken_artifacts_degrade_to_heuristic() {
    let dir = TempDir::new().unwrap();
    // Neither file deserializes, so both slots stay empty
    std::fs::write(dir.path().join("model.pkl"), b"\x80\x04\x95pickled").unwrap();
    std::fs::write(dir.path().join("vect.pkl"), b"\x80\x04\x95pickled").unwrap();

    let server = TestServer::start_with_artifacts(dir.path())
        .await
        .expect("server should start");

    let html = server.submit("WIN a FREE prize now").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Spam"));

    let html = server.submit("free stuff").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Ham"));

    server.stop().await.expect("server should stop");
}

#[tokio::test]
async fn test_e2e_2_mismatched_vectorizer_falls_back_per_request() {
    let dir = TempDir::new().unwrap();
    // Model expects 3 features, vectorizer emits 2: every prediction fails
    std::fs::write(dir.path().join("model.joblib"), NAIVE_BAYES).unwrap();
    std::fs::write(
        dir.path().join("vectorizer.joblib"),
        r#"{ "kind": "count", "vocabulary": { "invoice": 0, "payment": 1 } }"#,
    )
    .unwrap();

    let server = TestServer::start_with_artifacts(dir.path())
        .await
        .expect("server should start");

    let html = server.submit("Overdue invoice, payment required").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Ham"));

    let html = server.submit("urgent: claim your prize").await.unwrap();
    assert_eq!(rendered_prediction(&html), Some("Spam"));

    server.stop().await.expect("server should stop");
}
