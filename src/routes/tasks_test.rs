use super::*;
use crate::services::house::HouseError;

#[test]
fn task_errors_map_to_statuses() {
    let id = Uuid::nil();
    assert_eq!(task_error_to_status(TaskError::NotFound(id)), StatusCode::NOT_FOUND);
    assert_eq!(task_error_to_status(TaskError::InvalidWeights), StatusCode::BAD_REQUEST);
    assert_eq!(
        task_error_to_status(TaskError::Database(sqlx::Error::PoolClosed)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn house_gate_errors_pass_through() {
    let id = Uuid::nil();
    assert_eq!(task_error_to_status(TaskError::House(HouseError::NotFound(id))), StatusCode::NOT_FOUND);
    assert_eq!(task_error_to_status(TaskError::House(HouseError::Forbidden(id))), StatusCode::FORBIDDEN);
}

#[test]
fn parse_rfc3339_accepts_offsets() {
    assert!(parse_rfc3339("2026-08-01T12:00:00Z").is_some());
    assert!(parse_rfc3339("2026-08-01T12:00:00+02:00").is_some());
}

#[test]
fn parse_rfc3339_rejects_missing_offset_and_garbage() {
    assert!(parse_rfc3339("2026-08-01T12:00:00").is_none());
    assert!(parse_rfc3339("2026-08-01").is_none());
    assert!(parse_rfc3339("yesterday").is_none());
}

#[test]
fn range_query_fields_are_optional_in_the_wire_shape() {
    let query: RangeQuery = serde_json::from_str("{}").unwrap();
    assert!(query.house_id.is_none());
    assert!(query.start_date.is_none());
    assert!(query.end_date.is_none());
}
