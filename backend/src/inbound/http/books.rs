//! Book HTTP handlers.
//!
//! ```text
//! GET    /api/v1/books
//! POST   /api/v1/books
//! GET    /api/v1/books/{book_id}
//! PUT    /api/v1/books/{book_id}
//! DELETE /api/v1/books/{book_id}
//! ```
//!
//! Every endpoint requires a Bearer access token. Reads are open to any
//! authenticated caller; mutations require the editor role.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use pagination::{Page, PageLimits, PageParams};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::book::{Book, BookDraft, BookPatch, BookWithPages};
use crate::domain::policy::{authorize, Action};
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::book_pages::{BookPageResponse, PagePayload};
use crate::inbound::http::paging::{assemble_page, page_request};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, validation_error};
use crate::inbound::http::ApiResult;

/// Books per page when the query omits `page_size`.
const BOOK_PAGE_LIMITS: PageLimits = PageLimits::new(5);

/// Request payload for creating a book, optionally with nested pages.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    /// Book title.
    pub title: Option<String>,
    /// Author as free text.
    pub author: Option<String>,
    /// Pages created atomically with the book.
    #[serde(default)]
    pub pages: Vec<PagePayload>,
}

/// Request payload for a partial book update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    /// Replacement title, when provided.
    pub title: Option<String>,
    /// Replacement author, when provided.
    pub author: Option<String>,
}

/// Response payload for a book in listings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    /// Book identifier.
    pub id: Uuid,
    /// Book title.
    pub title: String,
    /// Author as free text.
    pub author: String,
    /// Creation instant, RFC 3339.
    pub created_at: String,
    /// Last modification instant, RFC 3339.
    pub updated_at: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title.as_ref().to_owned(),
            author: book.author.as_ref().to_owned(),
            created_at: book.created_at.to_rfc3339(),
            updated_at: book.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for a single book with its pages.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetailResponse {
    /// The book itself.
    #[serde(flatten)]
    pub book: BookResponse,
    /// Pages ascending by page number.
    pub pages: Vec<BookPageResponse>,
}

impl From<BookWithPages> for BookDetailResponse {
    fn from(detail: BookWithPages) -> Self {
        Self {
            book: BookResponse::from(detail.book),
            pages: detail
                .pages
                .into_iter()
                .map(BookPageResponse::from)
                .collect(),
        }
    }
}

/// Paginated envelope for book listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookListResponse {
    /// Total books in the catalogue.
    pub count: u64,
    /// Link to the following page, when one exists.
    pub next: Option<String>,
    /// Link to the preceding page, when one exists.
    pub previous: Option<String>,
    /// Books on this page, newest first.
    pub results: Vec<BookResponse>,
}

impl From<Page<BookResponse>> for BookListResponse {
    fn from(page: Page<BookResponse>) -> Self {
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.results,
        }
    }
}

/// List books newest-first.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(
        ("page" = Option<u32>, Query, description = "1-based page of results"),
        ("page_size" = Option<u32>, Query, description = "Results per page, capped at 100"),
    ),
    responses(
        (status = 200, description = "One page of books", body = BookListResponse),
        (status = 204, description = "The catalogue is empty"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Page of results out of range", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["books"],
    operation_id = "listBooks"
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<PageParams>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::ReadBooks)?;
    let request = page_request(query.into_inner(), BOOK_PAGE_LIMITS)?;
    let (count, books) = state.books.list(request).await?;
    if count == 0 {
        return Ok(HttpResponse::NoContent().finish());
    }
    let results: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();
    let page = assemble_page(request, count, results, req.path())?;
    Ok(HttpResponse::Ok().json(BookListResponse::from(page)))
}

/// Create a book, atomically persisting any nested pages.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookDetailResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not an editor", body = Error),
        (status = 409, description = "Nested pages collide on page number", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["books"],
    operation_id = "createBook"
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<CreateBookRequest>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::MutateBooks)?;
    let payload = payload.into_inner();
    let title = payload.title.ok_or_else(|| missing_field_error("title"))?;
    let author = payload.author.ok_or_else(|| missing_field_error("author"))?;
    let pages = payload
        .pages
        .into_iter()
        .map(PagePayload::into_draft)
        .collect::<Result<Vec<_>, _>>()?;
    let draft = BookDraft::new(title, author, pages).map_err(validation_error)?;
    let created = state.books.create(draft).await?;
    Ok(HttpResponse::Created().json(BookDetailResponse::from(created)))
}

/// Fetch a book with its pages.
#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}",
    params(("book_id" = Uuid, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "The book with its pages", body = BookDetailResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Book does not exist", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["books"],
    operation_id = "getBook"
)]
#[get("/books/{book_id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    auth: AuthContext,
    book_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::ReadBooks)?;
    let detail = state.books.get(*book_id).await?;
    Ok(HttpResponse::Ok().json(BookDetailResponse::from(detail)))
}

/// Update a book's title and author.
#[utoipa::path(
    put,
    path = "/api/v1/books/{book_id}",
    params(("book_id" = Uuid, Path, description = "Book identifier")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not an editor", body = Error),
        (status = 404, description = "Book does not exist", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["books"],
    operation_id = "updateBook"
)]
#[put("/books/{book_id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    auth: AuthContext,
    book_id: web::Path<Uuid>,
    payload: web::Json<UpdateBookRequest>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::MutateBooks)?;
    let payload = payload.into_inner();
    let patch = BookPatch::new(payload.title.as_deref(), payload.author.as_deref())
        .map_err(validation_error)?;
    let updated = state.books.update(*book_id, patch).await?;
    Ok(HttpResponse::Ok().json(BookResponse::from(updated)))
}

/// Delete a book and its pages.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{book_id}",
    params(("book_id" = Uuid, Path, description = "Book identifier")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not an editor", body = Error),
        (status = 404, description = "Book does not exist", body = Error),
    ),
    security(("BearerAuth" = [])),
    tags = ["books"],
    operation_id = "deleteBook"
)]
#[delete("/books/{book_id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    auth: AuthContext,
    book_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    authorize(&auth.subject(), Action::MutateBooks)?;
    state.books.delete(*book_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
