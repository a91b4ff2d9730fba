//! Redis document store tests.
//!
//! These need a running Redis (`REDIS_URL`, default `redis://localhost:6379`):
//!   cargo test -p jobboard-store -- --ignored

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use jobboard_common::types::JobApplicationDocument;
use jobboard_store::documents::{JobDocumentStore, RedisJobDocumentStore, new_job_document};
use jobboard_store::jobs::CreateJobParams;

async fn connect() -> ConnectionManager {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    redis::Client::open(url.as_str())
        .unwrap()
        .get_connection_manager()
        .await
        .unwrap()
}

fn params(title: &str) -> CreateJobParams {
    CreateJobParams {
        title: title.to_string(),
        description: "Build the notifier".to_string(),
        min_salary: 100_000.0,
        max_salary: 140_000.0,
        company: "Acme".to_string(),
    }
}

async fn cleanup(conn: &ConnectionManager, key: &str) {
    let mut conn = conn.clone();
    let _: () = conn.del(key).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_save_load_scan() {
    let conn = connect().await;
    let key = format!("test:jobs:v2:{}", Uuid::new_v4());
    let store = RedisJobDocumentStore::with_key(conn.clone(), key.clone());

    assert!(store.scan().await.unwrap().is_empty());
    assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());

    let backend = new_job_document(&params("Backend Engineer"));
    let frontend = new_job_document(&params("Frontend Engineer"));
    store.save(&backend).await.unwrap();
    store.save(&frontend).await.unwrap();

    let loaded = store.load(backend.id).await.unwrap().unwrap();
    assert_eq!(loaded, backend);

    let mut titles: Vec<String> = store
        .scan()
        .await
        .unwrap()
        .into_iter()
        .map(|doc| doc.title)
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Backend Engineer", "Frontend Engineer"]);

    cleanup(&conn, &key).await;
}

#[tokio::test]
#[ignore]
async fn test_save_replaces_document_with_embedded_applications() {
    let conn = connect().await;
    let key = format!("test:jobs:v2:{}", Uuid::new_v4());
    let store = RedisJobDocumentStore::with_key(conn.clone(), key.clone());

    let mut job = new_job_document(&params("Platform Engineer"));
    store.save(&job).await.unwrap();

    job.applications.push(JobApplicationDocument {
        candidate_name: "Jane Doe".to_string(),
        candidate_email: "jane@x.io".to_string(),
        cv_url: None,
    });
    store.save(&job).await.unwrap();

    let loaded = store.load(job.id).await.unwrap().unwrap();
    assert_eq!(loaded.applications.len(), 1);
    assert_eq!(loaded.applications[0].candidate_email, "jane@x.io");
    assert_eq!(store.scan().await.unwrap().len(), 1);

    cleanup(&conn, &key).await;
}
