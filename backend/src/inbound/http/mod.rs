//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod auth;
pub mod book_pages;
pub mod books;
pub mod error;
pub mod health;
pub mod paging;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every versioned API route under `/api/v1`.
///
/// Shared between the server binary and the integration tests so both run
/// the same routing table.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(users::signup)
            .service(users::login)
            .service(users::logout)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(books::list_books)
            .service(books::create_book)
            .service(books::get_book)
            .service(books::update_book)
            .service(books::delete_book)
            .service(book_pages::list_book_pages)
            .service(book_pages::create_book_page)
            .service(book_pages::get_book_page),
    );
}
