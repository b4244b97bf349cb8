//! In-memory adapters for every persistence port.
//!
//! These back the no-database development mode and the service tests. They
//! enforce the same constraints as the SQL schema: unique emails, unique
//! `(book, page_number)` pairs, and cascade deletion of a book's pages.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::auth::RefreshTokenRecord;
use crate::domain::book::{Book, BookPage, BookWithPages};
use crate::domain::ports::{
    BookPagePersistenceError, BookPageRepository, BookPersistenceError, BookRepository,
    RefreshTokenPersistenceError, RefreshTokenRepository, RevocationOutcome, UserPersistenceError,
    UserRepository,
};
use crate::domain::user::{Email, User};

fn slice_page<T: Clone>(items: &[T], offset: u64, limit: u64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    items.iter().skip(offset).take(limit).cloned().collect()
}

#[derive(Debug, Default)]
struct CatalogueState {
    books: Vec<Book>,
    pages: Vec<BookPage>,
}

/// In-memory book and page store.
#[derive(Debug, Default)]
pub struct InMemoryCatalogue {
    state: RwLock<CatalogueState>,
}

impl InMemoryCatalogue {
    /// All stored pages of a book, ordered by page number.
    pub fn pages_for_book(&self, book_id: Uuid) -> Vec<BookPage> {
        let state = self.state.read().expect("catalogue lock poisoned");
        let mut pages: Vec<BookPage> = state
            .pages
            .iter()
            .filter(|page| page.book_id == book_id)
            .cloned()
            .collect();
        pages.sort_by_key(|page| page.page_number);
        pages
    }
}

#[async_trait]
impl BookRepository for InMemoryCatalogue {
    async fn create_with_pages(
        &self,
        book: &Book,
        pages: &[BookPage],
    ) -> Result<(), BookPersistenceError> {
        let mut state = self.state.write().expect("catalogue lock poisoned");
        state.books.push(book.clone());
        state.pages.extend_from_slice(pages);
        Ok(())
    }

    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<Book>), BookPersistenceError> {
        let state = self.state.read().expect("catalogue lock poisoned");
        let newest_first: Vec<Book> = state.books.iter().rev().cloned().collect();
        Ok((state.books.len() as u64, slice_page(&newest_first, offset, limit)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, BookPersistenceError> {
        let state = self.state.read().expect("catalogue lock poisoned");
        Ok(state.books.iter().find(|book| book.id == id).cloned())
    }

    async fn find_with_pages(
        &self,
        id: Uuid,
    ) -> Result<Option<BookWithPages>, BookPersistenceError> {
        let Some(book) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(Some(BookWithPages {
            book,
            pages: self.pages_for_book(id),
        }))
    }

    async fn update(&self, book: &Book) -> Result<bool, BookPersistenceError> {
        let mut state = self.state.write().expect("catalogue lock poisoned");
        match state.books.iter_mut().find(|stored| stored.id == book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BookPersistenceError> {
        let mut state = self.state.write().expect("catalogue lock poisoned");
        let before = state.books.len();
        state.books.retain(|book| book.id != id);
        if state.books.len() == before {
            return Ok(false);
        }
        state.pages.retain(|page| page.book_id != id);
        Ok(true)
    }
}

#[async_trait]
impl BookPageRepository for InMemoryCatalogue {
    async fn list_for_book(
        &self,
        book_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<BookPage>), BookPagePersistenceError> {
        let pages = self.pages_for_book(book_id);
        Ok((pages.len() as u64, slice_page(&pages, offset, limit)))
    }

    async fn find(
        &self,
        book_id: Uuid,
        page_id: Uuid,
    ) -> Result<Option<BookPage>, BookPagePersistenceError> {
        let state = self.state.read().expect("catalogue lock poisoned");
        Ok(state
            .pages
            .iter()
            .find(|page| page.book_id == book_id && page.id == page_id)
            .cloned())
    }

    async fn insert(&self, page: &BookPage) -> Result<(), BookPagePersistenceError> {
        let mut state = self.state.write().expect("catalogue lock poisoned");
        if !state.books.iter().any(|book| book.id == page.book_id) {
            return Err(BookPagePersistenceError::book_missing());
        }
        let taken = state.pages.iter().any(|stored| {
            stored.book_id == page.book_id && stored.page_number == page.page_number
        });
        if taken {
            return Err(BookPagePersistenceError::duplicate_page_number());
        }
        state.pages.push(page.clone());
        Ok(())
    }
}

/// In-memory user store with case-insensitive unique emails.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().expect("user lock poisoned");
        if users.iter().any(|stored| stored.email == user.email) {
            return Err(UserPersistenceError::email_taken());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().expect("user lock poisoned");
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().expect("user lock poisoned");
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.write().expect("user lock poisoned");
        let clash = users
            .iter()
            .any(|stored| stored.id != user.id && stored.email == user.email);
        if clash {
            return Err(UserPersistenceError::email_taken());
        }
        match users.iter_mut().find(|stored| stored.id == user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.write().expect("user lock poisoned");
        let before = users.len();
        users.retain(|user| user.id != id);
        Ok(users.len() != before)
    }

    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<User>), UserPersistenceError> {
        let users = self.users.read().expect("user lock poisoned");
        Ok((users.len() as u64, slice_page(&users, offset, limit)))
    }
}

/// In-memory refresh token blacklist keyed by token digest.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokens {
    records: RwLock<HashMap<String, RefreshTokenRecord>>,
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokens {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), RefreshTokenPersistenceError> {
        let mut records = self.records.write().expect("token lock poisoned");
        records.insert(record.token_hash.clone(), record.clone());
        Ok(())
    }

    async fn revoke(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<RevocationOutcome, RefreshTokenPersistenceError> {
        let mut records = self.records.write().expect("token lock poisoned");
        let Some(record) = records.get_mut(token_hash) else {
            return Ok(RevocationOutcome::Unknown);
        };
        if record.revoked || record.expires_at <= now {
            return Ok(RevocationOutcome::AlreadyRevoked);
        }
        record.revoked = true;
        Ok(RevocationOutcome::Revoked)
    }
}

#[cfg(test)]
mod tests {
    //! Constraint coverage the service tests do not reach directly.
    use chrono::Duration;

    use super::*;
    use crate::domain::auth::generate_refresh_token;
    use crate::domain::user::UserDraft;

    fn user(email: &str) -> User {
        let now = Utc::now();
        let draft = UserDraft::new("ada", email, "secret", None).expect("valid draft");
        User {
            id: Uuid::new_v4(),
            username: draft.username,
            email: draft.email,
            password_hash: "hash".to_owned(),
            role: draft.role,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn update_rejects_an_email_held_by_another_user() {
        let users = InMemoryUsers::default();
        users.insert(&user("ada@example.com")).await.expect("inserted");
        let mut second = user("grace@example.com");
        users.insert(&second).await.expect("inserted");

        second.email = Email::new("ada@example.com").expect("valid email");
        let error = users.update(&second).await.expect_err("email taken");
        assert!(matches!(error, UserPersistenceError::EmailTaken));
    }

    #[tokio::test]
    async fn expired_tokens_revoke_as_already_revoked() {
        let store = InMemoryRefreshTokens::default();
        let issued = generate_refresh_token();
        let now = Utc::now();
        store
            .insert(&RefreshTokenRecord {
                token_hash: issued.token_hash.clone(),
                user_id: Uuid::new_v4(),
                issued_at: now - Duration::days(30),
                expires_at: now - Duration::days(16),
                revoked: false,
            })
            .await
            .expect("inserted");

        let outcome = store
            .revoke(&issued.token_hash, now)
            .await
            .expect("revocation ran");
        assert_eq!(outcome, RevocationOutcome::AlreadyRevoked);
    }

    #[tokio::test]
    async fn unknown_digests_report_unknown() {
        let store = InMemoryRefreshTokens::default();
        let outcome = store
            .revoke("0000", Utc::now())
            .await
            .expect("revocation ran");
        assert_eq!(outcome, RevocationOutcome::Unknown);
    }
}
