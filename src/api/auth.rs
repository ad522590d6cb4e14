//! Caller identity.
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user id and role as headers, and handlers authorize against them.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::models::UserRole;

use super::response::ApiErrorResponse;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// The caller's user id.
    pub user_id: Uuid,
    /// The caller's role.
    pub role: UserRole,
}

impl Caller {
    /// Allows only hr and admin callers.
    pub fn require_reviewer(&self) -> Result<(), ApiErrorResponse> {
        if self.role.is_reviewer() {
            Ok(())
        } else {
            Err(ApiErrorResponse::forbidden("hr or admin role required"))
        }
    }

    /// Allows the user themselves, or any hr or admin caller.
    pub fn require_self_or_reviewer(&self, user_id: Uuid) -> Result<(), ApiErrorResponse> {
        if self.user_id == user_id || self.role.is_reviewer() {
            Ok(())
        } else {
            Err(ApiErrorResponse::forbidden(
                "cannot access another employee's records",
            ))
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiErrorResponse> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiErrorResponse::unauthorized(format!("missing {} header", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| ApiErrorResponse::unauthorized("invalid user id"))?;
        let role = header(parts, USER_ROLE_HEADER)?
            .parse::<UserRole>()
            .map_err(|_| ApiErrorResponse::unauthorized("invalid user role"))?;
        Ok(Caller { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(request: Request<()>) -> Result<Caller, ApiErrorResponse> {
        let (mut parts, _) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_caller_from_headers() {
        let user = Uuid::new_v4();
        let request = Request::builder()
            .header(USER_ID_HEADER, user.to_string())
            .header(USER_ROLE_HEADER, "hr")
            .body(())
            .unwrap();
        let caller = extract(request).await.unwrap();
        assert_eq!(caller.user_id, user);
        assert_eq!(caller.role, UserRole::Hr);
    }

    #[tokio::test]
    async fn test_missing_headers_are_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let error = extract(request).await.unwrap_err();
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_role_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, Uuid::new_v4().to_string())
            .header(USER_ROLE_HEADER, "superuser")
            .body(())
            .unwrap();
        assert_eq!(
            extract(request).await.unwrap_err().status,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_employees_only_see_themselves() {
        let me = Uuid::new_v4();
        let caller = Caller {
            user_id: me,
            role: UserRole::Employee,
        };
        assert!(caller.require_self_or_reviewer(me).is_ok());
        assert!(caller.require_self_or_reviewer(Uuid::new_v4()).is_err());
        assert!(caller.require_reviewer().is_err());

        let admin = Caller {
            user_id: me,
            role: UserRole::Admin,
        };
        assert!(admin.require_self_or_reviewer(Uuid::new_v4()).is_ok());
        assert!(admin.require_reviewer().is_ok());
    }
}
