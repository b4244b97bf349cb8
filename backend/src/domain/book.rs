//! Book catalogue data model.
//!
//! Validation lives in the constructors of the field newtypes and draft
//! types, so a constructed [`Book`] or [`BookPage`] is always well formed:
//! non-empty trimmed title/author/content, a page number that fits the
//! store, and no duplicate page numbers inside a creation draft.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Largest page number the relational store can hold.
pub const PAGE_NUMBER_MAX: u32 = i32::MAX as u32;

/// Validation errors raised by book and page constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// The title is empty after trimming.
    EmptyTitle,
    /// The author is empty after trimming.
    EmptyAuthor,
    /// The page content is empty after trimming.
    EmptyPageContent,
    /// The page number does not fit the store's integer column.
    PageNumberTooLarge {
        /// Largest accepted page number.
        max: u32,
    },
    /// Two pages in one draft share a page number.
    DuplicatePageNumber {
        /// The repeated page number.
        page_number: u32,
    },
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::EmptyPageContent => write!(f, "page content must not be empty"),
            Self::PageNumberTooLarge { max } => {
                write!(f, "page number must be at most {max}")
            }
            Self::DuplicatePageNumber { page_number } => {
                write!(f, "page number {page_number} appears more than once")
            }
        }
    }
}

impl std::error::Error for BookValidationError {}

/// Non-empty book title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTitle(String);

impl BookTitle {
    /// Validate and construct a title, trimming surrounding whitespace.
    pub fn new(title: impl AsRef<str>) -> Result<Self, BookValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BookTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-empty book author.
///
/// The author is a plain string attribute, not a user reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAuthor(String);

impl BookAuthor {
    /// Validate and construct an author, trimming surrounding whitespace.
    pub fn new(author: impl AsRef<str>) -> Result<Self, BookValidationError> {
        let trimmed = author.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BookAuthor {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-negative page number bounded by the store's integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageNumber(u32);

impl PageNumber {
    /// Validate and construct a page number.
    pub fn new(page_number: u32) -> Result<Self, BookValidationError> {
        if page_number > PAGE_NUMBER_MAX {
            return Err(BookValidationError::PageNumberTooLarge {
                max: PAGE_NUMBER_MAX,
            });
        }
        Ok(Self(page_number))
    }

    /// The underlying value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent(String);

impl PageContent {
    /// Validate and construct page content.
    pub fn new(content: impl Into<String>) -> Result<Self, BookValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(BookValidationError::EmptyPageContent);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for PageContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A catalogued book.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Stable identifier.
    pub id: Uuid,
    /// Title shown in listings.
    pub title: BookTitle,
    /// Author as free text.
    pub author: BookAuthor,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// A page owned by a book; cascade-deleted with its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning book.
    pub book_id: Uuid,
    /// Unique within the owning book.
    pub page_number: PageNumber,
    /// Page body.
    pub content: PageContent,
}

/// A book together with its pages ordered by page number.
#[derive(Debug, Clone, PartialEq)]
pub struct BookWithPages {
    /// The owning book.
    pub book: Book,
    /// Pages ascending by page number.
    pub pages: Vec<BookPage>,
}

/// Validated input for creating a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDraft {
    /// Position within the book.
    pub page_number: PageNumber,
    /// Page body.
    pub content: PageContent,
}

impl PageDraft {
    /// Validate raw input into a page draft.
    pub fn new(page_number: u32, content: impl Into<String>) -> Result<Self, BookValidationError> {
        Ok(Self {
            page_number: PageNumber::new(page_number)?,
            content: PageContent::new(content)?,
        })
    }
}

/// Validated input for creating a book, optionally with nested pages.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    /// Title of the new book.
    pub title: BookTitle,
    /// Author of the new book.
    pub author: BookAuthor,
    /// Pages created atomically with the book.
    pub pages: Vec<PageDraft>,
}

impl BookDraft {
    /// Validate raw input into a book draft.
    ///
    /// Rejects duplicate page numbers inside the draft so the whole create
    /// fails before anything is persisted.
    pub fn new(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        pages: Vec<PageDraft>,
    ) -> Result<Self, BookValidationError> {
        let title = BookTitle::new(title)?;
        let author = BookAuthor::new(author)?;
        let mut seen = std::collections::HashSet::new();
        for page in &pages {
            if !seen.insert(page.page_number.value()) {
                return Err(BookValidationError::DuplicatePageNumber {
                    page_number: page.page_number.value(),
                });
            }
        }
        Ok(Self {
            title,
            author,
            pages,
        })
    }
}

/// Partial update for a book; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    /// Replacement title, when provided.
    pub title: Option<BookTitle>,
    /// Replacement author, when provided.
    pub author: Option<BookAuthor>,
}

impl BookPatch {
    /// Validate raw optional fields into a patch.
    pub fn new(title: Option<&str>, author: Option<&str>) -> Result<Self, BookValidationError> {
        Ok(Self {
            title: title.map(BookTitle::new).transpose()?,
            author: author.map(BookAuthor::new).transpose()?,
        })
    }
}
