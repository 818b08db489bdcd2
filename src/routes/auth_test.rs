use super::*;
use crate::services::account::AccountError;

#[test]
fn account_errors_map_to_statuses() {
    assert_eq!(account_error_to_status(AccountError::InvalidEmail), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(AccountError::WeakPassword), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(AccountError::EmailTaken), StatusCode::CONFLICT);
    assert_eq!(account_error_to_status(AccountError::InvalidCredentials), StatusCode::UNAUTHORIZED);
    assert_eq!(
        account_error_to_status(AccountError::Database(sqlx::Error::PoolClosed)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn env_bool_missing_var_is_none() {
    assert_eq!(env_bool("HEARTH_TEST_UNSET_FLAG"), None);
}

#[test]
fn session_cookie_is_scoped_and_http_only() {
    let cookie = session_cookie("abc123".to_owned());
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "abc123");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}
