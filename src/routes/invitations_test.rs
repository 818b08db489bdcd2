use super::*;

#[test]
fn invitation_errors_map_to_statuses() {
    assert_eq!(invitation_error_to_status(InvitationError::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(invitation_error_to_status(InvitationError::AlreadyMember), StatusCode::BAD_REQUEST);
    assert_eq!(
        invitation_error_to_status(InvitationError::Database(sqlx::Error::PoolClosed)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn malformed_token_is_unparseable() {
    // The accept handler maps a parse failure to the same 404 as an unknown
    // token.
    assert!(Uuid::parse_str("not-a-uuid").is_err());
    assert!(Uuid::parse_str(&Uuid::new_v4().to_string()).is_ok());
}
