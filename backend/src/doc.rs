//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API: every
//! HTTP endpoint, the request/response schemas, and the Bearer token
//! security scheme. The document backs Swagger UI in debug builds and is
//! exported with `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the Bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/v1/users/login or signup.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Library backend API",
        description = "HTTP interface for the book catalogue and account management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::book_pages::list_book_pages,
        crate::inbound::http::book_pages::create_book_page,
        crate::inbound::http::book_pages::get_book_page,
        crate::inbound::http::health::healthz,
    ),
    tags(
        (name = "auth", description = "Signup, login, and logout"),
        (name = "books", description = "Book catalogue"),
        (name = "pages", description = "Pages nested under books"),
        (name = "users", description = "User management"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
