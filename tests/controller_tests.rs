// Integration tests for the interview session controller
//
// The backend is scripted so each test controls what room provisioning and
// interviewer start return, and when.

use anyhow::Result;
use interview_room::config::ApiConfig;
use interview_room::gateway::{
    BackendGateway, EndpointSource, GatewayError, InterviewBackend, InterviewerAck,
    RoomProvisionResult,
};
use interview_room::media::{ConnectionState, MediaEvent};
use interview_room::session::{
    InterviewSubmission, InterviewerStatus, SessionController, SessionStatus,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

#[derive(Clone)]
enum RoomScript {
    Ready(RoomProvisionResult),
    HttpStatus(u16),
    Missing(Vec<&'static str>),
}

struct ScriptedBackend {
    room: RoomScript,
    /// Provisioning waits for this before answering
    room_gate: Option<Arc<Notify>>,
    /// Interviewer start waits for this before answering
    interviewer_gate: Option<Arc<Notify>>,
    interviewer_status: Option<u16>,
    interviewer_calls: Mutex<Vec<(String, String, String)>>,
    interviewer_done: AtomicUsize,
}

impl ScriptedBackend {
    fn new(room: RoomScript) -> Self {
        Self {
            room,
            room_gate: None,
            interviewer_gate: None,
            interviewer_status: None,
            interviewer_calls: Mutex::new(Vec::new()),
            interviewer_done: AtomicUsize::new(0),
        }
    }
}

fn http_error(status: u16) -> GatewayError {
    GatewayError::Status {
        status,
        reason: String::new(),
        body: String::new(),
    }
}

#[async_trait::async_trait]
impl InterviewBackend for ScriptedBackend {
    async fn provision_room(&self) -> Result<RoomProvisionResult, GatewayError> {
        if let Some(gate) = &self.room_gate {
            gate.notified().await;
        }
        match &self.room {
            RoomScript::Ready(room) => Ok(room.clone()),
            RoomScript::HttpStatus(status) => Err(http_error(*status)),
            RoomScript::Missing(missing) => Err(GatewayError::MissingFields {
                status: 200,
                missing: missing.clone(),
            }),
        }
    }

    async fn start_interviewer(
        &self,
        room_name: &str,
        resume: &str,
        job_description: &str,
    ) -> Result<InterviewerAck, GatewayError> {
        self.interviewer_calls.lock().await.push((
            room_name.to_string(),
            resume.to_string(),
            job_description.to_string(),
        ));
        if let Some(gate) = &self.interviewer_gate {
            gate.notified().await;
        }
        self.interviewer_done.fetch_add(1, Ordering::SeqCst);

        match self.interviewer_status {
            Some(status) => Err(http_error(status)),
            None => Ok(InterviewerAck {
                message: "Interviewer started".to_string(),
                room_name: room_name.to_string(),
            }),
        }
    }
}

fn room(endpoint_source: EndpointSource) -> RoomProvisionResult {
    RoomProvisionResult {
        room_name: "r1".to_string(),
        credential: "t1".to_string(),
        transport_endpoint: "ws://localhost:7880".to_string(),
        endpoint_source,
        message: Some("Room created".to_string()),
    }
}

fn submission() -> InterviewSubmission {
    InterviewSubmission::new("Ten years of systems work", "Senior Rust engineer").unwrap()
}

async fn wait_for_interviewer(
    controller: &SessionController,
    done: impl Fn(&InterviewerStatus) -> bool,
) -> InterviewerStatus {
    let mut rx = controller.subscribe_interviewer();
    let status = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| done(s)))
        .await
        .expect("interviewer outcome timed out")
        .expect("controller dropped")
        .clone();
    status
}

#[tokio::test]
async fn test_submit_enters_creating_room_before_backend_answers() -> Result<()> {
    let gate = Arc::new(Notify::new());
    let mut backend = ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Explicit)));
    backend.room_gate = Some(Arc::clone(&gate));
    let controller = SessionController::new(Arc::new(backend));

    let provisioning = controller.submit(submission())?;

    // Backend is still blocked on the gate
    assert_eq!(controller.status(), SessionStatus::CreatingRoom);
    assert!(controller.snapshot().connection().is_none());

    gate.notify_one();
    assert_eq!(provisioning.await?, SessionStatus::Active);
    Ok(())
}

#[tokio::test]
async fn test_successful_provisioning_populates_connection() -> Result<()> {
    for source in [
        EndpointSource::Explicit,
        EndpointSource::Alias("ws_url".to_string()),
        EndpointSource::Derived,
    ] {
        let backend = ScriptedBackend::new(RoomScript::Ready(room(source)));
        let controller = SessionController::new(Arc::new(backend));

        let status = controller.submit(submission())?.await?;
        let session = controller.snapshot();

        assert_eq!(status, SessionStatus::Active);
        assert_eq!(session.room_name(), Some("r1"));
        assert_eq!(session.credential(), Some("t1"));
        assert_eq!(session.transport_endpoint(), Some("ws://localhost:7880"));
        assert!(session.error_message().is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_interviewer_started_with_submission() -> Result<()> {
    let backend = Arc::new(ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Derived))));
    let controller = SessionController::new(backend.clone());

    controller.submit(submission())?.await?;
    let outcome = wait_for_interviewer(&controller, |s| {
        matches!(s, InterviewerStatus::Started { .. })
    })
    .await;

    match outcome {
        InterviewerStatus::Started { message, session_id } => {
            assert_eq!(message, "Interviewer started");
            assert_eq!(session_id, controller.snapshot().id());
        }
        other => panic!("unexpected interviewer status: {other:?}"),
    }

    let calls = backend.interviewer_calls.lock().await;
    assert_eq!(
        calls.as_slice(),
        &[(
            "r1".to_string(),
            "Ten years of systems work".to_string(),
            "Senior Rust engineer".to_string()
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_interviewer_failure_keeps_session_active() -> Result<()> {
    let mut backend = ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Derived)));
    backend.interviewer_status = Some(500);
    let controller = SessionController::new(Arc::new(backend));

    let status = controller.submit(submission())?.await?;
    assert_eq!(status, SessionStatus::Active);

    let outcome = wait_for_interviewer(&controller, |s| {
        matches!(s, InterviewerStatus::Failed { .. })
    })
    .await;
    assert!(matches!(outcome, InterviewerStatus::Failed { .. }));

    assert_eq!(controller.status(), SessionStatus::Active);
    assert!(controller.snapshot().error_message().is_none());
    Ok(())
}

#[tokio::test]
async fn test_missing_fields_end_in_error() -> Result<()> {
    let backend = ScriptedBackend::new(RoomScript::Missing(vec!["room_name"]));
    let controller = SessionController::new(Arc::new(backend));

    let status = controller.submit(submission())?.await?;
    let session = controller.snapshot();

    assert_eq!(status, SessionStatus::Error);
    assert!(session.error_message().unwrap().contains("room_name"));
    assert!(session.connection().is_none());
    assert_eq!(controller.interviewer_status(), InterviewerStatus::NotRequested);
    Ok(())
}

#[tokio::test]
async fn test_error_messages_by_status() -> Result<()> {
    let cases = [
        (401, "Authentication failed. Please check your API key."),
        (403, "Access denied. Please check your permissions."),
        (404, "Interview service endpoint not found."),
        (429, "Too many requests. Please wait before trying again."),
        (503, "Server error. Please try again in a few moments."),
    ];

    for (status, expected) in cases {
        let backend = ScriptedBackend::new(RoomScript::HttpStatus(status));
        let controller = SessionController::new(Arc::new(backend));

        controller.submit(submission())?.await?;

        assert_eq!(controller.status(), SessionStatus::Error);
        assert_eq!(controller.snapshot().error_message(), Some(expected));
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_reports_connectivity() -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let gateway = BackendGateway::new(&ApiConfig {
        base_url: format!("http://{}/api/resume-flow", addr),
        key: "test-key".to_string(),
    })?;
    let controller = SessionController::new(Arc::new(gateway));

    controller.submit(submission())?.await?;

    assert_eq!(controller.status(), SessionStatus::Error);
    assert_eq!(
        controller.snapshot().error_message(),
        Some("Cannot connect to server. Please ensure the interview service is running.")
    );
    Ok(())
}

#[tokio::test]
async fn test_second_submit_rejected_while_busy() -> Result<()> {
    let gate = Arc::new(Notify::new());
    let mut backend = ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Derived)));
    backend.room_gate = Some(Arc::clone(&gate));
    let controller = SessionController::new(Arc::new(backend));

    let provisioning = controller.submit(submission())?;
    assert!(controller.submit(submission()).is_err());

    gate.notify_one();
    provisioning.await?;
    assert!(controller.submit(submission()).is_err());
    Ok(())
}

#[tokio::test]
async fn test_leave_then_restart_clears_session() -> Result<()> {
    let backend = ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Derived)));
    let controller = SessionController::new(Arc::new(backend));

    controller.submit(submission())?.await?;
    let ended = controller.leave()?;
    assert_eq!(ended.status(), SessionStatus::Ended);
    assert!(ended.connection().is_none());

    let reset = controller.restart()?;
    assert_eq!(reset.status(), SessionStatus::Setup);
    assert!(reset.connection().is_none());
    assert!(reset.error_message().is_none());
    assert_eq!(controller.interviewer_status(), InterviewerStatus::NotRequested);
    Ok(())
}

#[tokio::test]
async fn test_restart_from_error() -> Result<()> {
    let backend = ScriptedBackend::new(RoomScript::HttpStatus(500));
    let controller = SessionController::new(Arc::new(backend));

    controller.submit(submission())?.await?;
    assert_eq!(controller.status(), SessionStatus::Error);

    let reset = controller.restart()?;
    assert_eq!(reset.status(), SessionStatus::Setup);
    assert!(reset.error_message().is_none());
    Ok(())
}

#[tokio::test]
async fn test_media_disconnect_ends_session() -> Result<()> {
    let backend = ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Derived)));
    let controller = SessionController::new(Arc::new(backend));

    controller.submit(submission())?.await?;

    let session = controller.handle_media_event(MediaEvent::Connected);
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(controller.connection_state(), ConnectionState::Connected);

    let session = controller.handle_media_event(MediaEvent::Error {
        message: "track publish failed".to_string(),
    });
    assert_eq!(session.status(), SessionStatus::Active);

    let session = controller.handle_media_event(MediaEvent::Disconnected);
    assert_eq!(session.status(), SessionStatus::Ended);
    assert_eq!(controller.connection_state(), ConnectionState::Disconnected);

    // A second disconnect after leaving is harmless
    let session = controller.handle_media_event(MediaEvent::Disconnected);
    assert_eq!(session.status(), SessionStatus::Ended);
    Ok(())
}

#[tokio::test]
async fn test_late_interviewer_outcome_is_dropped_after_restart() -> Result<()> {
    let gate = Arc::new(Notify::new());
    let mut backend = ScriptedBackend::new(RoomScript::Ready(room(EndpointSource::Derived)));
    backend.interviewer_gate = Some(Arc::clone(&gate));
    let backend = Arc::new(backend);
    let controller = SessionController::new(backend.clone());

    controller.submit(submission())?.await?;
    assert!(matches!(controller.interviewer_status(), InterviewerStatus::Pending { .. }));

    controller.leave()?;
    controller.restart()?;

    // Let the first interviewer call finish after the restart
    gate.notify_one();
    tokio::time::timeout(Duration::from_secs(5), async {
        while backend.interviewer_done.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
    })
    .await?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(controller.status(), SessionStatus::Setup);
    assert_eq!(controller.interviewer_status(), InterviewerStatus::NotRequested);
    Ok(())
}
