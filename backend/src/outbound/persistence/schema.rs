//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; Diesel uses them for
//! compile-time query validation.

diesel::table! {
    /// Catalogued books.
    books (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Book title.
        title -> Varchar,
        /// Author as free text.
        author -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pages owned by a book; `(book_id, page_number)` is unique.
    book_pages (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Owning book; cascade-deleted with it.
        book_id -> Uuid,
        /// Position within the book.
        page_number -> Int4,
        /// Page body.
        content -> Text,
    }
}

diesel::table! {
    /// Registered user accounts; `email` is unique.
    users (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Display/login name.
        username -> Varchar,
        /// Lowercased unique login identity.
        email -> Varchar,
        /// Password hash.
        password_hash -> Varchar,
        /// Catalogue role, `editor` or `reader`.
        role -> Varchar,
        /// Platform-level user-management flag.
        is_staff -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued refresh tokens, keyed by the SHA-256 digest of the client
    /// token.
    refresh_tokens (token_hash) {
        /// Hex digest of the client-facing token.
        token_hash -> Varchar,
        /// User the token was issued to.
        user_id -> Uuid,
        /// Issuance instant.
        issued_at -> Timestamptz,
        /// Expiry instant.
        expires_at -> Timestamptz,
        /// Set by logout.
        revoked -> Bool,
    }
}

diesel::joinable!(book_pages -> books (book_id));
diesel::joinable!(refresh_tokens -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(books, book_pages, users, refresh_tokens);
