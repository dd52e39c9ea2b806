use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for signup. Email is required here even though the
/// column is nullable.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for signin. At least one identifier must be supplied;
/// when both are, they must name the same account.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct AccountUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account summary plus a freshly issued bearer token. Every successful
/// signup, signin, read, and update response carries one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWithToken {
    pub token: String,
    pub username: String,
    pub email: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_logged_in: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInResponse {
    pub id: i64,
    pub authorized_account: AccountWithToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_envelope_is_camel_case() {
        let response = AccountInResponse {
            id: 1,
            authorized_account: AccountWithToken {
                token: "tok".into(),
                username: "alice".into(),
                email: Some("a@x.com".into()),
                is_verified: false,
                is_active: true,
                is_logged_in: true,
                created_at: OffsetDateTime::now_utc(),
                updated_at: None,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("authorizedAccount").is_some());
        let inner = &json["authorizedAccount"];
        assert_eq!(inner["username"], "alice");
        assert!(inner.get("isVerified").is_some());
        assert!(inner.get("isLoggedIn").is_some());
        assert!(inner.get("createdAt").is_some());
        assert!(inner.get("passwordHash").is_none());
    }
}
