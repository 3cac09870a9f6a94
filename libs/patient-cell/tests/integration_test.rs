use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::{PatientProfileService, PatientSearchQuery};
use shared_api::RestClient;
use shared_models::AppError;
use shared_utils::test_utils::{MockApiResponses, TestConfig};

fn service_for(server: &MockServer) -> PatientProfileService {
    let config = TestConfig::with_base_url(server.uri()).to_app_config();
    PatientProfileService::with_client(RestClient::new(&config))
}

#[tokio::test]
async fn test_get_profile_by_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/patient-profiles/code/PP0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::envelope(
            MockApiResponses::patient_profile("PP0001", "John Smith"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let profile = service_for(&mock_server).get_by_code(" PP0001 ").await.unwrap();

    assert_eq!(profile.code, "PP0001");
    assert_eq!(profile.full_name, "John Smith");
}

#[tokio::test]
async fn test_search_returns_page_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/patient-profiles/search"))
        .and(query_param("keyword", "smith"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::envelope(
            MockApiResponses::page(
                vec![
                    MockApiResponses::patient_profile("PP0001", "John Smith"),
                    MockApiResponses::patient_profile("PP0002", "Mary Smith"),
                ],
                0,
                10,
                2,
            ),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let profiles = service_for(&mock_server)
        .search(PatientSearchQuery::keyword("smith"))
        .await
        .unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].code, "PP0002");
}

#[tokio::test]
async fn test_blank_search_skips_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).search(PatientSearchQuery::keyword("   ")).await;

    assert_matches!(result, Err(AppError::Validation(_)));
}

#[tokio::test]
async fn test_unknown_profile_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/patient-profiles/code/PP9999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Patient profile not found"
        })))
        .mount(&mock_server)
        .await;

    let err = service_for(&mock_server).get_by_code("PP9999").await.unwrap_err();

    assert!(err.is_not_found());
}
