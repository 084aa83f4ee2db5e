use jobboard_backend::{
    client::{BoardController, HttpJobsApi, Intent, ToastKind},
    dto::job_dto::CreateJobPayload,
    models::job::JobStatus,
    routes, AppState,
};
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let app = routes::build_router(AppState::in_memory(), 1000);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn board_moves_job_through_stages_against_live_server() {
    let base = spawn_server().await;
    let api = HttpJobsApi::new(&base).unwrap();
    let (mut board, view) = BoardController::new(api);

    assert!(board.reload().await);
    assert!(board.state().jobs.is_empty());

    let job = board
        .create_job(CreateJobPayload::new("Acme", "Engineer"))
        .await
        .expect("job created");
    assert_eq!(job.status, JobStatus::Saved);
    assert_eq!(board.state().jobs.len(), 1);
    assert_eq!(board.state().stats().total, 1);

    board.dispatch(Intent::DragStart(job.id)).await;
    board.dispatch(Intent::DragOver(JobStatus::Interview)).await;
    assert_eq!(board.state().drag.over, Some(JobStatus::Interview));
    assert!(board.drop_on(JobStatus::Interview).await);
    assert_eq!(board.state().job(job.id).unwrap().status, JobStatus::Interview);
    assert!(board.state().drag.dragging.is_none());
    assert_eq!(board.state().stats().count(JobStatus::Interview), 1);

    let published = view.borrow().clone();
    assert_eq!(published.job(job.id).unwrap().status, JobStatus::Interview);
    assert!(published
        .toasts
        .iter()
        .any(|t| t.kind == ToastKind::Success && t.message.contains("Interview")));

    assert!(board.delete_job(job.id).await);
    assert!(board.state().jobs.is_empty());

    assert!(!board.move_job(job.id, JobStatus::Offer).await);
    assert!(!board.delete_job(job.id).await);
    assert!(board
        .state()
        .toasts
        .iter()
        .any(|t| t.kind == ToastKind::Error));
}

#[tokio::test]
async fn rejected_create_surfaces_server_message() {
    let base = spawn_server().await;
    let api = HttpJobsApi::new(&base).unwrap();
    let (mut board, _view) = BoardController::new(api);

    assert!(board.create_job(CreateJobPayload::new(" ", "Engineer")).await.is_none());
    let toast = board
        .state()
        .toasts
        .last()
        .expect("error toast")
        .clone();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("company"));
    assert!(!board.state().busy);
}
