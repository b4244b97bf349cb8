//! Bearer token extraction for protected endpoints.
//!
//! [`AuthContext`] is an extractor: declaring it as a handler argument makes
//! the endpoint require a valid `Authorization: Bearer` access token. The
//! verified claims become a policy [`Subject`] for authorisation checks.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::domain::auth::AccessClaims;
use crate::domain::policy::Subject;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;

/// The authenticated caller, recovered from a verified access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    claims: AccessClaims,
}

impl AuthContext {
    /// Id of the authenticated user.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.claims.user_id
    }

    /// Policy subject for authorisation checks.
    #[must_use]
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.claims.user_id,
            role: self.claims.role,
            is_staff: self.claims.is_staff,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthContext, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let token = bearer_token(req)?;
    let claims = state
        .tokens
        .verify_access(token)
        .map_err(|_| Error::unauthorized("access token is invalid or expired"))?;
    Ok(AuthContext { claims })
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Extractor behaviour against a wired in-memory state.
    use actix_web::http::StatusCode;
    use actix_web::{get, test, App, HttpResponse};
    use chrono::Duration;

    use super::*;
    use crate::inbound::http::ApiResult;

    #[get("/whoami")]
    async fn whoami(auth: AuthContext) -> ApiResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(auth.user_id()))
    }

    fn state() -> HttpState {
        HttpState::in_memory(b"test-secret", Duration::minutes(15), Duration::days(14), 4)
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let app =
            test::init_service(App::new().app_data(web::Data::new(state())).service(whoami)).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_tokens_are_unauthorized() {
        let app =
            test::init_service(App::new().app_data(web::Data::new(state())).service(whoami)).await;
        let request = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn issued_tokens_authenticate() {
        let state = state();
        let (user, pair) = state
            .users
            .signup(
                crate::domain::user::UserDraft::new("ada", "ada@example.com", "secret", None)
                    .expect("valid draft"),
            )
            .await
            .expect("signed up");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(whoami),
        )
        .await;
        let request = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", pair.access)))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Uuid = test::read_body_json(response).await;
        assert_eq!(body, user.id);
    }
}
