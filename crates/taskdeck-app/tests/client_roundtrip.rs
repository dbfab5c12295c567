//! End-to-end exercises of [`ApiClient`] against a real in-process service.

use std::sync::Arc;

use taskdeck_app::ApiClient;
use taskdeck_core::{TaskDraft, TaskId, TaskPatch};
use taskdeck_server::{AppState, router};
use taskdeck_store_json::JsonStore;
use tempfile::TempDir;

struct TestService {
    client: ApiClient,
    // Held so the store directory outlives the test body.
    _dir: TempDir,
}

impl TestService {
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let store = JsonStore::open(dir.path()).unwrap_or_else(|err| panic!("open store: {err}"));
        let app = router(Arc::new(AppState::new(store)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|err| panic!("bind: {err}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("local addr: {err}"));
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                panic!("server loop: {err}");
            }
        });
        Self {
            client: ApiClient::new(format!("http://{addr}")),
            _dir: dir,
        }
    }
}

#[tokio::test]
async fn probe_returns_greeting() {
    let service = TestService::spawn().await;
    let greeting = service
        .client
        .probe()
        .await
        .unwrap_or_else(|err| panic!("probe: {err}"));
    assert_eq!(greeting, "Hello World");
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let service = TestService::spawn().await;
    let created = service
        .client
        .create_task(&TaskDraft::with_text("Buy milk"))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));
    let tasks = service
        .client
        .list_tasks()
        .await
        .unwrap_or_else(|err| panic!("list: {err}"));
    assert_eq!(tasks, vec![created]);
}

#[tokio::test]
async fn blank_text_is_rejected_with_message() {
    let service = TestService::spawn().await;
    let err = match service
        .client
        .create_task(&TaskDraft::with_text("   "))
        .await
    {
        Ok(task) => panic!("blank text accepted: {task:?}"),
        Err(err) => err,
    };
    match err {
        taskdeck_app::ApiError::Rejected { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert!(!message.is_empty());
        }
        other => panic!("expected rejection, got {other}"),
    }
}

#[tokio::test]
async fn update_toggles_completion() {
    let service = TestService::spawn().await;
    let created = service
        .client
        .create_task(&TaskDraft::with_text("Walk dog"))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));
    let updated = service
        .client
        .update_task(created.id, &TaskPatch::completion(true))
        .await
        .unwrap_or_else(|err| panic!("update: {err}"));
    assert!(updated.completed);
    assert_eq!(updated.text, "Walk dog");
}

#[tokio::test]
async fn stale_delete_reports_not_found() {
    let service = TestService::spawn().await;
    let err = match service.client.delete_task(TaskId::new()).await {
        Ok(()) => panic!("delete of unknown id succeeded"),
        Err(err) => err,
    };
    assert!(err.is_not_found());
}

#[tokio::test]
async fn bulk_delete_commits_survivors_past_a_stale_id() {
    let service = TestService::spawn().await;
    let first = service
        .client
        .create_task(&TaskDraft::with_text("first"))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));
    let second = service
        .client
        .create_task(&TaskDraft::with_text("second"))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));

    let outcome = service
        .client
        .bulk_delete(&[first.id, TaskId::new(), second.id])
        .await;
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);

    let remaining = service
        .client
        .list_tasks()
        .await
        .unwrap_or_else(|err| panic!("list: {err}"));
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn bulk_complete_marks_every_listed_task() {
    let service = TestService::spawn().await;
    let mut ids = Vec::new();
    for text in ["one", "two", "three"] {
        let task = service
            .client
            .create_task(&TaskDraft::with_text(text))
            .await
            .unwrap_or_else(|err| panic!("create: {err}"));
        ids.push(task.id);
    }

    let outcome = service.client.bulk_complete(&ids).await;
    assert_eq!(outcome.succeeded, 3);
    assert_eq!(outcome.failed, 0);

    let tasks = service
        .client
        .list_tasks()
        .await
        .unwrap_or_else(|err| panic!("list: {err}"));
    assert!(tasks.iter().all(|task| task.completed));
}
