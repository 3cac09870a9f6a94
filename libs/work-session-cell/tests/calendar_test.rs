use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::SpecialtyService;
use shared_api::RestClient;
use shared_models::{AppError, SessionUser};
use shared_utils::telemetry::init_tracing;
use shared_utils::test_utils::{ManualClock, MockApiResponses, TestConfig, TestUser};
use work_session_cell::{
    CalendarError, EventScope, HeadlessWidget, MonthKey, ViewMode, WorkSessionCalendar, WorkSessionService,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn client_for(server: &MockServer) -> RestClient {
    RestClient::new(&TestConfig::with_base_url(server.uri()).to_app_config())
}

fn calendar_at(server: &MockServer, user: SessionUser, start: NaiveDate) -> WorkSessionCalendar<HeadlessWidget> {
    init_tracing("work_session_cell=debug");
    WorkSessionCalendar::new(
        Arc::new(WorkSessionService::with_client(client_for(server))),
        HeadlessWidget::new(ViewMode::Month, start),
        user,
        Arc::new(ManualClock::new(start)),
    )
}

async fn mount_month(server: &MockServer, route: &str, start: &str, end: &str, sessions: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("startDate", start))
        .and(query_param("endDate", end))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::envelope(json!(sessions))))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_next_from_march_31_requests_april() {
    let mock_server = MockServer::start().await;
    let specialty = Uuid::new_v4();

    mount_month(
        &mock_server,
        "/api/work-sessions",
        "2026-03-01",
        "2026-04-01",
        vec![MockApiResponses::work_session(
            Uuid::new_v4(),
            "2026-03-31T08:00:00",
            "2026-03-31T12:00:00",
            "APPROVED",
            specialty,
        )],
    )
    .await;
    mount_month(
        &mock_server,
        "/api/work-sessions",
        "2026-04-01",
        "2026-05-01",
        vec![
            MockApiResponses::work_session(Uuid::new_v4(), "2026-04-02T08:00:00", "2026-04-02T12:00:00", "PENDING", specialty),
            MockApiResponses::work_session(Uuid::new_v4(), "2026-04-03T13:00:00", "2026-04-03T17:00:00", "COMPLETED", specialty),
        ],
    )
    .await;

    let mut calendar = calendar_at(&mock_server, TestUser::admin(), date(2026, 3, 31));
    calendar.mount().await;
    assert_eq!(calendar.events().len(), 1);

    calendar.next().await;

    assert_eq!(calendar.visible_month(), MonthKey { year: 2026, month: 4 });
    assert_eq!(calendar.events().len(), 2);
    assert_eq!(calendar.events()[0].title, "Dr. Jane Roe - Booth 3");
}

#[tokio::test]
async fn test_failed_load_keeps_last_good_month_and_records_error() {
    let mock_server = MockServer::start().await;

    mount_month(
        &mock_server,
        "/api/work-sessions",
        "2026-03-01",
        "2026-04-01",
        vec![MockApiResponses::work_session(
            Uuid::new_v4(),
            "2026-03-10T08:00:00",
            "2026-03-10T12:00:00",
            "APPROVED",
            Uuid::new_v4(),
        )],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/work-sessions"))
        .and(query_param("startDate", "2026-04-01"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "Service unavailable"})))
        .mount(&mock_server)
        .await;

    let mut calendar = calendar_at(&mock_server, TestUser::admin(), date(2026, 3, 10));
    calendar.mount().await;
    calendar.next().await;

    assert_matches!(
        calendar.last_error(),
        Some(CalendarError::Load { month, source: AppError::ExternalService(_) })
            if *month == MonthKey { year: 2026, month: 4 }
    );
    assert_eq!(
        calendar.synchronizer().cache().month(),
        Some(MonthKey { year: 2026, month: 3 })
    );
    assert!(calendar.events().is_empty(), "March events must not show under April");

    calendar.prev().await;
    assert_eq!(calendar.events().len(), 1, "March is still cached");
}

#[tokio::test]
async fn test_month_to_week_clears_cached_events() {
    let mock_server = MockServer::start().await;

    mount_month(
        &mock_server,
        "/api/work-sessions",
        "2026-03-01",
        "2026-04-01",
        vec![MockApiResponses::work_session(
            Uuid::new_v4(),
            "2026-03-10T08:00:00",
            "2026-03-10T12:00:00",
            "APPROVED",
            Uuid::new_v4(),
        )],
    )
    .await;

    let mut calendar = calendar_at(&mock_server, TestUser::admin(), date(2026, 3, 10));
    calendar.mount().await;
    assert_eq!(calendar.events().len(), 1);

    calendar.set_view(ViewMode::Week).await;

    assert!(calendar.synchronizer().cache().is_empty());
    assert!(calendar.events().is_empty());
}

#[tokio::test]
async fn test_doctor_scope_uses_doctor_route() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    mount_month(&mock_server, "/api/work-sessions", "2026-03-01", "2026-04-01", vec![]).await;
    mount_month(
        &mock_server,
        &format!("/api/work-sessions/doctor/{}", doctor_id),
        "2026-03-01",
        "2026-04-01",
        vec![MockApiResponses::work_session(
            Uuid::new_v4(),
            "2026-03-12T08:00:00",
            "2026-03-12T12:00:00",
            "IN_PROGRESS",
            Uuid::new_v4(),
        )],
    )
    .await;

    let mut calendar = calendar_at(&mock_server, TestUser::admin(), date(2026, 3, 10));
    calendar.mount().await;
    calendar.set_scope(EventScope::Doctor(Some(doctor_id))).await.unwrap();

    assert_eq!(calendar.summary().in_progress, 1);
}

#[tokio::test]
async fn test_doctor_sees_own_schedule() {
    let mock_server = MockServer::start().await;

    mount_month(
        &mock_server,
        "/api/work-sessions/me",
        "2026-03-01",
        "2026-04-01",
        vec![MockApiResponses::work_session(
            Uuid::new_v4(),
            "2026-03-12T08:00:00",
            "2026-03-12T12:00:00",
            "APPROVED",
            Uuid::new_v4(),
        )],
    )
    .await;

    let mut calendar = calendar_at(&mock_server, TestUser::doctor(Uuid::new_v4()), date(2026, 3, 10));
    calendar.mount().await;

    assert_eq!(calendar.events().len(), 1);
}

#[tokio::test]
async fn test_specialty_selection_pushes_filtered_events() {
    let mock_server = MockServer::start().await;
    let cardiology = Uuid::new_v4();
    let dermatology = Uuid::new_v4();

    mount_month(
        &mock_server,
        "/api/work-sessions",
        "2026-03-01",
        "2026-04-01",
        vec![
            MockApiResponses::work_session(Uuid::new_v4(), "2026-03-02T08:00:00", "2026-03-02T12:00:00", "APPROVED", cardiology),
            MockApiResponses::work_session(Uuid::new_v4(), "2026-03-03T08:00:00", "2026-03-03T12:00:00", "APPROVED", dermatology),
            MockApiResponses::work_session(Uuid::new_v4(), "2026-03-04T08:00:00", "2026-03-04T12:00:00", "CANCELED", cardiology),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/specialties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::envelope(MockApiResponses::page(
            vec![
                MockApiResponses::specialty(cardiology, "CAR", "Cardiology"),
                MockApiResponses::specialty(dermatology, "DER", "Dermatology"),
            ],
            0,
            50,
            2,
        ))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pushed: Arc<Mutex<Vec<usize>>> = Arc::default();
    let sink = Arc::clone(&pushed);

    let mut calendar = calendar_at(&mock_server, TestUser::admin(), date(2026, 3, 10));
    calendar.on_filtered(Box::new(move |events| sink.lock().unwrap().push(events.len())));
    calendar.mount().await;

    let directory = SpecialtyService::with_client(client_for(&mock_server), 50);
    assert_eq!(calendar.ensure_specialties(&directory).await.unwrap().len(), 2);
    // Second call is served from memory.
    assert_eq!(calendar.ensure_specialties(&directory).await.unwrap().len(), 2);

    calendar.select_specialty(Some(cardiology));

    assert_eq!(calendar.events().len(), 2);
    assert_eq!(calendar.summary().canceled, 1);
    assert_eq!(*pushed.lock().unwrap(), vec![0, 3, 2]);
}

#[tokio::test]
async fn test_non_admin_never_filtered_or_offered_specialties() {
    let mock_server = MockServer::start().await;

    mount_month(
        &mock_server,
        "/api/work-sessions",
        "2026-03-01",
        "2026-04-01",
        vec![MockApiResponses::work_session(
            Uuid::new_v4(),
            "2026-03-02T08:00:00",
            "2026-03-02T12:00:00",
            "APPROVED",
            Uuid::new_v4(),
        )],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/specialties"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut calendar = calendar_at(&mock_server, TestUser::receptionist(), date(2026, 3, 10));
    calendar.mount().await;

    let directory = SpecialtyService::with_client(client_for(&mock_server), 50);
    assert!(calendar.ensure_specialties(&directory).await.unwrap().is_empty());

    calendar.select_specialty(Some(Uuid::new_v4()));
    assert_eq!(calendar.events().len(), 1);
}
