use super::*;

#[test]
fn house_errors_map_to_statuses() {
    let id = Uuid::nil();
    assert_eq!(house_error_to_status(HouseError::NotFound(id)), StatusCode::NOT_FOUND);
    // A removal target outside the member set reads as "no such member".
    assert_eq!(house_error_to_status(HouseError::NotMember(id)), StatusCode::NOT_FOUND);
    assert_eq!(house_error_to_status(HouseError::Forbidden(id)), StatusCode::FORBIDDEN);
    assert_eq!(
        house_error_to_status(HouseError::Database(sqlx::Error::PoolClosed)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn update_body_fields_are_optional() {
    let body: UpdateHouseBody = serde_json::from_str("{}").unwrap();
    assert!(body.name.is_none());
    assert!(body.image_name.is_none());

    let body: UpdateHouseBody = serde_json::from_str(r#"{"name":"Cabin"}"#).unwrap();
    assert_eq!(body.name.as_deref(), Some("Cabin"));
    assert!(body.image_name.is_none());
}
