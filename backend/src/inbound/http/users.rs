//! Account and user management HTTP handlers.
//!
//! ```text
//! POST   /api/v1/users            (signup)
//! POST   /api/v1/users/login
//! POST   /api/v1/users/logout
//! GET    /api/v1/users
//! GET    /api/v1/users/{user_id}
//! PUT    /api/v1/users/{user_id}
//! DELETE /api/v1/users/{user_id}
//! ```
//!
//! Signup and login are open. Logout requires a valid access token. The
//! user collection is staff-only; a single record is visible to staff and
//! to the user themselves, and editable strictly by the user themselves.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use pagination::{Page, PageLimits, PageParams};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::TokenPair;
use crate::domain::policy::{authorize, Action};
use crate::domain::user::{User, UserDraft, UserPatch};
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::paging::{assemble_page, page_request};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, validation_error};
use crate::inbound::http::ApiResult;

/// Users per page when the query omits `page_size`.
const USER_PAGE_LIMITS: PageLimits = PageLimits::new(10);

/// Request payload for account registration.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display/login name.
    pub username: Option<String>,
    /// Unique login email.
    pub email: Option<String>,
    /// Plaintext password; stored only as a hash.
    pub password: Option<String>,
    /// Catalogue role, `editor` or `reader`; defaults to `reader`.
    pub role: Option<String>,
}

/// Request payload for login.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Request payload for logout.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// The refresh token to revoke.
    pub refresh: Option<String>,
}

/// Request payload for a self-service profile update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Replacement username, when provided.
    pub username: Option<String>,
    /// Replacement email, when provided.
    pub email: Option<String>,
    /// Replacement password, when provided.
    pub password: Option<String>,
    /// Replacement role, when provided.
    pub role: Option<String>,
}

/// Response payload for a user record; never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    pub id: Uuid,
    /// Display/login name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Catalogue role.
    pub role: String,
    /// Platform-level user-management flag.
    pub is_staff: bool,
    /// Creation instant, RFC 3339.
    pub created_at: String,
    /// Last modification instant, RFC 3339.
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            role: user.role.as_str().to_owned(),
            is_staff: user.is_staff,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Access and refresh tokens issued at signup and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Signed access JWT for the `Authorization` header.
    pub access: String,
    /// Opaque refresh token; present it to logout.
    pub refresh: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access,
            refresh: pair.refresh,
        }
    }
}

/// Response payload for a successful signup.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// The created account.
    pub user: UserResponse,
    /// First token pair for the account.
    pub tokens: TokenPairResponse,
}

/// Paginated envelope for user listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    /// Total registered users.
    pub count: u64,
    /// Link to the following page, when one exists.
    pub next: Option<String>,
    /// Link to the preceding page, when one exists.
    pub previous: Option<String>,
    /// Users on this page, oldest first.
    pub results: Vec<UserResponse>,
}

impl From<Page<UserResponse>> for UserListResponse {
    fn from(page: Page<UserResponse>) -> Self {
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.results,
        }
    }
}

/// Register an account and issue its first token pair.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 409, description = "Email already registered", body = Error),
    ),
    tags = ["auth"],
    operation_id = "signup"
)]
#[post("/users")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = payload
        .username
        .ok_or_else(|| missing_field_error("username"))?;
    let email = payload.email.ok_or_else(|| missing_field_error("email"))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;
    let draft = UserDraft::new(&username, &email, &password, payload.role.as_deref())
        .map_err(validation_error)?;

    let (user, pair) = state.users.signup(draft).await?;
    Ok(HttpResponse::Created().json(SignupResponse {
        user: UserResponse::from(user),
        tokens: TokenPairResponse::from(pair),
    }))
}

/// Exchange credentials for a token pair.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenPairResponse),
        (status = 400, description = "Unknown user or wrong password", body = Error),
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let email = payload.email.ok_or_else(|| missing_field_error("email"))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;

    let pair = state.users.authenticate(&email, &password).await?;
    Ok(HttpResponse::Ok().json(TokenPairResponse::from(pair)))
}

/// Revoke a refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Refresh token revoked"),
        (status = 400, description = "Token malformed, unknown, or already revoked", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/users/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    _auth: AuthContext,
    payload: web::Json<LogoutRequest>,
) -> ApiResult<HttpResponse> {
    let refresh = payload
        .into_inner()
        .refresh
        .ok_or_else(|| missing_field_error("refresh"))?;
    state.users.logout(&refresh).await?;
    Ok(HttpResponse::Ok().finish())
}

/// List registered users, oldest first. Staff only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("page" = Option<u32>, Query, description = "1-based page of results"),
        ("page_size" = Option<u32>, Query, description = "Results per page, capped at 100"),
    ),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 204, description = "No users are registered"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not staff", body = Error),
        (status = 404, description = "Page of results out of range", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<PageParams>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::ListUsers)?;
    let request = page_request(query.into_inner(), USER_PAGE_LIMITS)?;
    let (count, users) = state.users.list(request).await?;
    if count == 0 {
        return Ok(HttpResponse::NoContent().finish());
    }
    let results: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    let page = assemble_page(request, count, results, req.path())?;
    Ok(HttpResponse::Ok().json(UserListResponse::from(page)))
}

/// Fetch a user record. Staff or the user themselves.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user record", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller may not view this user", body = Error),
        (status = 404, description = "User does not exist", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    auth: AuthContext,
    user_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::RetrieveUser { target: *user_id })?;
    let user = state.users.get(*user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Update a user record. Strictly the user themselves.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not this user", body = Error),
        (status = 404, description = "User does not exist", body = Error),
        (status = 409, description = "Email already registered", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    auth: AuthContext,
    user_id: web::Path<Uuid>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::UpdateUser { target: *user_id })?;
    let payload = payload.into_inner();
    let patch = UserPatch::new(
        payload.username.as_deref(),
        payload.email.as_deref(),
        payload.password.as_deref(),
        payload.role.as_deref(),
    )
    .map_err(validation_error)?;
    let updated = state.users.update(*user_id, patch).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// Delete a user. Staff only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not staff", body = Error),
        (status = 404, description = "User does not exist", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    auth: AuthContext,
    user_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::DeleteUser)?;
    state.users.delete(*user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
