//! Integration tests for the REST store against a mock PostgREST server

use agenda::adapters::rest::{RestClient, RestStore};
use agenda::adapters::store::{AppointmentRepository, PatientDirectory};
use agenda::config::{secret_string, RestConfig};
use agenda::core::schedule::DayRange;
use agenda::domain::{
    AgendaError, AppointmentId, AppointmentPatch, NewAppointment, PatientId, StoreError, UserId,
};
use chrono::{NaiveDate, TimeZone, Utc};
use mockito::{Matcher, Server};

fn store(server: &Server) -> RestStore {
    let config = RestConfig {
        base_url: server.url(),
        api_key: secret_string("anon-key".to_string()),
        timeout_seconds: 5,
        tls_verify: true,
    };
    let client = RestClient::new(&config)
        .unwrap()
        .with_access_token(secret_string("user-jwt".to_string()));
    RestStore::new(client)
}

fn owner() -> UserId {
    UserId::new("u-1").unwrap()
}

fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

#[tokio::test]
async fn test_list_appointments_filters_by_owner_and_day() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/tb_appointments")
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer user-jwt")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), "eq.u-1".into()),
            // Both bounds share a key, which UrlEncoded cannot tell apart
            Matcher::Regex(
                r"appointment_datetime=gte\.2025-03-14T00%3A00%3A00\.000%2B00%3A00".into(),
            ),
            Matcher::Regex(
                r"appointment_datetime=lte\.2025-03-14T23%3A59%3A59\.999%2B00%3A00".into(),
            ),
            Matcher::UrlEncoded("order".into(), "appointment_datetime.asc".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[
                {"id":"a-1","patient_id":"p-1","appointment_datetime":"2025-03-14T09:00:00+00:00",
                 "duration_minutes":50,"notes":"first visit",
                 "tb_patients":{"id":"p-1","fullname":"Ana"}},
                {"id":"a-2","patient_id":"p-2","appointment_datetime":"2025-03-14T10:00:00+00:00",
                 "duration_minutes":null,"notes":null,
                 "tb_patients":[{"id":"p-2","fullname":"Bruno"}]}
            ]"#,
        )
        .create_async()
        .await;

    let day = DayRange::for_date(friday(), &Utc);
    let appointments = store(&server)
        .list_appointments_for_day(&owner(), &day)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].patient_name(), Some("Ana"));
    assert_eq!(appointments[0].notes_text(), Some("first visit"));
    assert_eq!(appointments[1].patient_name(), Some("Bruno"));
}

#[tokio::test]
async fn test_list_patients_orders_by_name() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/tb_patients")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), "eq.u-1".into()),
            Matcher::UrlEncoded("order".into(), "fullname.asc".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":"p-1","fullname":"Ana"},{"id":"p-2","fullname":"Bruno"}]"#)
        .create_async()
        .await;

    let patients = store(&server).list_patients(&owner()).await.unwrap();
    let names: Vec<_> = patients.iter().map(|p| p.fullname.as_str()).collect();
    assert_eq!(names, ["Ana", "Bruno"]);
}

#[tokio::test]
async fn test_unauthorized_listing_is_access_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/tb_patients")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"JWT expired"}"#)
        .create_async()
        .await;

    let err = store(&server).list_patients(&owner()).await.unwrap_err();
    match err {
        AgendaError::Access { what, message } => {
            assert_eq!(what, "patients");
            assert_eq!(message, "JWT expired");
        }
        other => panic!("expected access error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_sends_owner_and_instant() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/tb_appointments")
        .match_body(Matcher::PartialJsonString(
            r#"{"user_id":"u-1","patient_id":"p-1","notes":"first visit"}"#.to_string(),
        ))
        .with_status(201)
        .create_async()
        .await;

    let new = NewAppointment {
        user_id: owner(),
        patient_id: PatientId::new("p-1").unwrap(),
        appointment_datetime: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        notes: Some("first visit".to_string()),
    };
    store(&server).create_appointment(&new).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_duplicate_slot_is_write_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/rest/v1/tb_appointments")
        .with_status(409)
        .with_body(r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#)
        .create_async()
        .await;

    let new = NewAppointment {
        user_id: owner(),
        patient_id: PatientId::new("p-1").unwrap(),
        appointment_datetime: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        notes: None,
    };
    let err = store(&server).create_appointment(&new).await.unwrap_err();
    assert!(matches!(
        err,
        AgendaError::Write {
            action: "create",
            source: StoreError::ConstraintViolation(_)
        }
    ));
}

#[tokio::test]
async fn test_update_counts_affected_rows() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("PATCH", "/rest/v1/tb_appointments")
        .match_header("prefer", "return=representation")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "eq.a-1".into()),
            Matcher::UrlEncoded("user_id".into(), "eq.u-1".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":"a-1"}]"#)
        .create_async()
        .await;

    let patch = AppointmentPatch {
        notes: Some("moved".to_string()),
        ..AppointmentPatch::default()
    };
    let outcome = store(&server)
        .update_appointment(&AppointmentId::new("a-1").unwrap(), &owner(), &patch)
        .await
        .unwrap();
    assert!(!outcome.is_noop());
}

#[tokio::test]
async fn test_delete_of_missing_row_is_noop() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/rest/v1/tb_appointments")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.gone".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let outcome = store(&server)
        .delete_appointment(&AppointmentId::new("gone").unwrap(), &owner())
        .await
        .unwrap();
    assert!(outcome.is_noop());
}
