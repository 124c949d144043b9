#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

use ollama_rag::client::{EmbeddingQuery, OllamaClient};
use ollama_rag::store::MemoryVectorStore;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS: [(&str, &str, [f32; 2]); 3] = [
    ("a", "Michael Burnham is the main character on Discovery", [1.0, 0.0]),
    ("b", "James T. Kirk is the captain of the USS Enterprise", [0.0, 1.0]),
    ("c", "Jean-Luc Picard commands the USS Enterprise-D", [0.9, 0.1]),
];

async fn mount_embedding(server: &MockServer, prompt: &str, embedding: &[f32]) {
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .and(body_partial_json(json!({ "prompt": prompt })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embedding": embedding })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn embed_store_and_rank_documents() {
    let server = MockServer::start().await;

    for (_, text, embedding) in &DOCS {
        mount_embedding(&server, text, embedding).await;
    }
    mount_embedding(&server, "Who commands the Enterprise-D?", &[1.0, 0.0]).await;

    let client = OllamaClient::from_url(&server.uri()).expect("mock server URI should parse");

    let mut store = MemoryVectorStore::new();
    for (id, text, _) in &DOCS {
        let record = client
            .create_embedding(
                EmbeddingQuery {
                    model: "test-embed".to_string(),
                    prompt: (*text).to_string(),
                },
                id,
            )
            .expect("embedding should succeed");
        store.upsert(record);
    }
    assert_eq!(store.len(), 3);

    let question = client
        .create_embedding(
            EmbeddingQuery {
                model: "test-embed".to_string(),
                prompt: "Who commands the Enterprise-D?".to_string(),
            },
            "question",
        )
        .expect("question embedding should succeed");

    let hits = store.search_top_n(&question.embedding, 0.5, 2);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].record.id, "a");
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert_eq!(hits[1].record.id, "c");
    assert!((hits[1].score - 0.994).abs() < 1e-3);
    assert!(!hits.iter().any(|hit| hit.record.id == "b"));
}
