use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{Notice, NoticeLevel, Notifier, SessionUser, UserRole};

use crate::clock::Clock;

pub struct TestConfig {
    pub api_base_url: String,
    pub api_token: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            api_token: "test-token".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            api_token: self.api_token.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser;

impl TestUser {
    pub fn new(role: UserRole) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: Some(format!("{:?}@clinic.test", role).to_lowercase()),
            role,
            doctor_id: None,
        }
    }

    pub fn admin() -> SessionUser {
        Self::new(UserRole::Admin)
    }

    pub fn doctor(doctor_id: Uuid) -> SessionUser {
        SessionUser {
            doctor_id: Some(doctor_id),
            ..Self::new(UserRole::Doctor)
        }
    }

    pub fn receptionist() -> SessionUser {
        Self::new(UserRole::Receptionist)
    }
}

/// Clock whose instant and date only move when a test says so.
pub struct ManualClock {
    state: Mutex<(Instant, NaiveDate)>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: Mutex::new((Instant::now(), today)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap();
        state.0 += by;
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.state.lock().unwrap().1 = today;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().unwrap().0
    }

    fn today(&self) -> NaiveDate {
        self.state.lock().unwrap().1
    }
}

/// Notifier that keeps every notice for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct MockApiResponses;

impl MockApiResponses {
    pub fn envelope(data: Value) -> Value {
        json!({
            "data": data,
            "message": "Success"
        })
    }

    pub fn page(content: Vec<Value>, page: u32, size: u32, total_elements: u64) -> Value {
        let total_pages = if size == 0 {
            0
        } else {
            ((total_elements + size as u64 - 1) / size as u64) as u32
        };

        json!({
            "content": content,
            "page": page,
            "size": size,
            "totalElements": total_elements,
            "totalPages": total_pages
        })
    }

    pub fn work_session(
        id: Uuid,
        start_time: &str,
        end_time: &str,
        status: &str,
        specialty_id: Uuid,
    ) -> Value {
        json!({
            "id": id,
            "startTime": start_time,
            "endTime": end_time,
            "status": status,
            "doctor": {
                "id": Uuid::new_v4(),
                "specialtyId": specialty_id,
                "name": "Dr. Jane Roe",
                "code": "DOC001"
            },
            "technician": null,
            "services": [
                { "id": Uuid::new_v4(), "name": "General check-up" }
            ],
            "booth": {
                "id": Uuid::new_v4(),
                "name": "Booth 3",
                "code": "B03"
            }
        })
    }

    pub fn specialty(id: Uuid, code: &str, name: &str) -> Value {
        json!({
            "id": id,
            "code": code,
            "name": name
        })
    }

    pub fn doctor(id: Uuid, specialty_id: Uuid, name: &str) -> Value {
        json!({
            "id": id,
            "code": "DOC001",
            "name": name,
            "email": "doctor@clinic.test",
            "specialtyId": specialty_id
        })
    }

    pub fn appointment(code: &str, patient_profile_code: Option<&str>) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "code": code,
            "status": "CONFIRMED",
            "appointmentTime": "2026-03-10T09:30:00",
            "patientProfileCode": patient_profile_code,
            "patientName": "John Smith",
            "doctorName": "Dr. Jane Roe"
        })
    }

    pub fn patient_profile(code: &str, full_name: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "code": code,
            "fullName": full_name,
            "phone": "+353 1 555 0100",
            "dateOfBirth": "1985-04-12"
        })
    }
}
