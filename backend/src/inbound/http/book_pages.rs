//! Book page HTTP handlers.
//!
//! ```text
//! GET  /api/v1/books/{book_id}/pages
//! POST /api/v1/books/{book_id}/pages
//! GET  /api/v1/books/{book_id}/pages/{page_id}
//! ```

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use pagination::{Page, PageLimits, PageParams};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::book::{BookPage, PageDraft};
use crate::domain::policy::{authorize, Action};
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::paging::{assemble_page, page_request};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, validation_error};
use crate::inbound::http::ApiResult;

/// Pages per page when the query omits `page_size`.
const PAGE_PAGE_LIMITS: PageLimits = PageLimits::new(10);

/// Request payload for a page, used on its own and nested in book creation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagePayload {
    /// Position within the book; unique per book.
    pub page_number: Option<u32>,
    /// Page body.
    pub content: Option<String>,
}

impl PagePayload {
    /// Validate the payload into a domain draft.
    pub fn into_draft(self) -> Result<PageDraft, Error> {
        let page_number = self
            .page_number
            .ok_or_else(|| missing_field_error("pageNumber"))?;
        let content = self.content.ok_or_else(|| missing_field_error("content"))?;
        PageDraft::new(page_number, content).map_err(validation_error)
    }
}

/// Response payload for a single page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPageResponse {
    /// Page identifier.
    pub id: Uuid,
    /// Owning book.
    pub book_id: Uuid,
    /// Position within the book.
    pub page_number: u32,
    /// Page body.
    pub content: String,
}

impl From<BookPage> for BookPageResponse {
    fn from(page: BookPage) -> Self {
        Self {
            id: page.id,
            book_id: page.book_id,
            page_number: page.page_number.value(),
            content: page.content.as_ref().to_owned(),
        }
    }
}

/// Paginated envelope for a book's pages.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPageListResponse {
    /// Total pages in the book.
    pub count: u64,
    /// Link to the following page of results, when one exists.
    pub next: Option<String>,
    /// Link to the preceding page of results, when one exists.
    pub previous: Option<String>,
    /// Pages on this page of results.
    pub results: Vec<BookPageResponse>,
}

impl From<Page<BookPageResponse>> for BookPageListResponse {
    fn from(page: Page<BookPageResponse>) -> Self {
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.results,
        }
    }
}

/// List a book's pages in page-number order.
#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}/pages",
    params(
        ("book_id" = Uuid, Path, description = "Owning book"),
        ("page" = Option<u32>, Query, description = "1-based page of results"),
        ("page_size" = Option<u32>, Query, description = "Results per page, capped at 100"),
    ),
    responses(
        (status = 200, description = "One page of the book's pages", body = BookPageListResponse),
        (status = 204, description = "The book has no pages"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Book missing or page of results out of range", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["pages"],
    operation_id = "listBookPages"
)]
#[get("/books/{book_id}/pages")]
pub async fn list_book_pages(
    state: web::Data<HttpState>,
    auth: AuthContext,
    book_id: web::Path<Uuid>,
    query: web::Query<PageParams>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::ReadBooks)?;
    let request = page_request(query.into_inner(), PAGE_PAGE_LIMITS)?;
    let (count, pages) = state.pages.list_for_book(*book_id, request).await?;
    if count == 0 {
        return Ok(HttpResponse::NoContent().finish());
    }
    let results: Vec<BookPageResponse> = pages.into_iter().map(BookPageResponse::from).collect();
    let page = assemble_page(request, count, results, req.path())?;
    Ok(HttpResponse::Ok().json(BookPageListResponse::from(page)))
}

/// Add a page to an existing book.
#[utoipa::path(
    post,
    path = "/api/v1/books/{book_id}/pages",
    params(("book_id" = Uuid, Path, description = "Owning book")),
    request_body = PagePayload,
    responses(
        (status = 201, description = "Page created", body = BookPageResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not an editor", body = Error),
        (status = 404, description = "Book does not exist", body = Error),
        (status = 409, description = "Page number already taken", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["pages"],
    operation_id = "createBookPage"
)]
#[post("/books/{book_id}/pages")]
pub async fn create_book_page(
    state: web::Data<HttpState>,
    auth: AuthContext,
    book_id: web::Path<Uuid>,
    payload: web::Json<PagePayload>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::MutateBooks)?;
    let draft = payload.into_inner().into_draft()?;
    let created = state.pages.create(*book_id, draft).await?;
    Ok(HttpResponse::Created().json(BookPageResponse::from(created)))
}

/// Fetch a single page of a book.
#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}/pages/{page_id}",
    params(
        ("book_id" = Uuid, Path, description = "Owning book"),
        ("page_id" = Uuid, Path, description = "Page identifier"),
    ),
    responses(
        (status = 200, description = "The page", body = BookPageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Book or page does not exist", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["pages"],
    operation_id = "getBookPage"
)]
#[get("/books/{book_id}/pages/{page_id}")]
pub async fn get_book_page(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::ReadBooks)?;
    let (book_id, page_id) = path.into_inner();
    let page = state.pages.get(book_id, page_id).await?;
    Ok(HttpResponse::Ok().json(BookPageResponse::from(page)))
}
