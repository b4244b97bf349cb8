//! Page-number pagination primitives shared by backend list endpoints.
//!
//! List endpoints accept `page` and `page_size` query parameters, clamp the
//! requested size to a per-resource maximum, and reply with an envelope that
//! carries the total record count, `next`/`previous` links, and the ordered
//! `results` slice.
//!
//! The flow is: deserialise [`PageParams`] from the query string, resolve a
//! validated [`PageRequest`] against the endpoint's [`PageLimits`], fetch one
//! page worth of records plus the total count, then build a [`Page`] with
//! [`Page::assemble`]. Requesting a page past the last one fails with
//! [`PageError::OutOfRange`] rather than returning an empty page.

use serde::{Deserialize, Serialize};

/// Hard ceiling applied to client-supplied page sizes.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw pagination query parameters as sent by the client.
///
/// Both fields are optional; absent values fall back to the endpoint's
/// [`PageLimits`]. Values of zero are rejected when resolving the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Requested records per page.
    pub page_size: Option<u32>,
}

/// Per-endpoint defaults and ceiling for page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_size: u32,
    max_size: u32,
}

impl PageLimits {
    /// Create limits with the given default size and the shared
    /// [`MAX_PAGE_SIZE`] ceiling.
    ///
    /// # Panics
    /// Panics if `default_size` is zero or exceeds [`MAX_PAGE_SIZE`]; limits
    /// are compile-time constants chosen per endpoint.
    #[must_use]
    pub const fn new(default_size: u32) -> Self {
        assert!(default_size > 0, "default page size must be positive");
        assert!(
            default_size <= MAX_PAGE_SIZE,
            "default page size must not exceed the maximum",
        );
        Self {
            default_size,
            max_size: MAX_PAGE_SIZE,
        }
    }

    /// Default page size applied when the client does not supply one.
    #[must_use]
    pub const fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Largest page size honoured for this endpoint.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Validation failures raised while resolving a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    /// The client asked for page zero; pages are 1-based.
    #[error("page must be a positive integer")]
    ZeroPage,
    /// The client asked for zero records per page.
    #[error("page_size must be a positive integer")]
    ZeroPageSize,
}

/// A validated page request: 1-based page number plus effective page size.
///
/// Client sizes above the endpoint ceiling are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Resolve raw client parameters against endpoint limits.
    pub fn from_params(params: PageParams, limits: PageLimits) -> Result<Self, PageParamsError> {
        let number = match params.page {
            Some(0) => return Err(PageParamsError::ZeroPage),
            Some(page) => page,
            None => 1,
        };
        let size = match params.page_size {
            Some(0) => return Err(PageParamsError::ZeroPageSize),
            Some(size) => size.min(limits.max_size()),
            None => limits.default_size(),
        };
        Ok(Self { number, size })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Effective records per page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of records to skip when fetching this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number as u64 - 1) * self.size as u64
    }

    /// Number of records to fetch for this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size as u64
    }
}

/// Failures raised while assembling a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// The requested page lies past the last available page.
    #[error("page {requested} is out of range; last page is {available}")]
    OutOfRange {
        /// Page number the client asked for.
        requested: u32,
        /// Last page that holds records.
        available: u32,
    },
}

/// Builds `next`/`previous` links for a paginated endpoint.
///
/// Links are relative URLs: the endpoint path with `page` and `page_size`
/// query parameters appended. The path is percent-encoding-agnostic; it is
/// emitted verbatim and only the query string is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    path: String,
}

impl PageLinks {
    /// Create a link builder for the given endpoint path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Render the link for the given page number at the given size.
    #[must_use]
    pub fn url_for(&self, page: u32, size: u32) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &size.to_string())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

/// Response envelope for paginated collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of records across all pages.
    pub count: u64,
    /// Link to the following page, when one exists.
    pub next: Option<String>,
    /// Link to the preceding page, when one exists.
    pub previous: Option<String>,
    /// Records on this page, in endpoint order.
    pub results: Vec<T>,
}

/// Last page number for a collection of `count` records at `size` per page.
///
/// An empty collection still has one (empty) page so that page 1 is always
/// addressable.
#[must_use]
pub const fn last_page(count: u64, size: u32) -> u32 {
    if count == 0 {
        return 1;
    }
    let pages = count.div_ceil(size as u64);
    if pages > u32::MAX as u64 {
        u32::MAX
    } else {
        pages as u32
    }
}

impl<T> Page<T> {
    /// Assemble the envelope for one fetched page.
    ///
    /// `count` is the total record count and `results` the slice fetched for
    /// `request`. Fails with [`PageError::OutOfRange`] when the requested
    /// page lies past the last page.
    pub fn assemble(
        request: PageRequest,
        count: u64,
        results: Vec<T>,
        links: &PageLinks,
    ) -> Result<Self, PageError> {
        let available = last_page(count, request.size());
        if request.number() > available {
            return Err(PageError::OutOfRange {
                requested: request.number(),
                available,
            });
        }
        let next = (request.number() < available)
            .then(|| links.url_for(request.number() + 1, request.size()));
        let previous =
            (request.number() > 1).then(|| links.url_for(request.number() - 1, request.size()));
        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request resolution and envelope assembly.
    use rstest::rstest;

    use super::*;

    const LIMITS: PageLimits = PageLimits::new(5);

    fn params(page: Option<u32>, page_size: Option<u32>) -> PageParams {
        PageParams { page, page_size }
    }

    #[rstest]
    #[case(params(None, None), 1, 5)]
    #[case(params(Some(3), None), 3, 5)]
    #[case(params(None, Some(2)), 1, 2)]
    #[case(params(Some(2), Some(250)), 2, MAX_PAGE_SIZE)]
    fn resolves_requests_within_limits(
        #[case] input: PageParams,
        #[case] number: u32,
        #[case] size: u32,
    ) {
        let request = PageRequest::from_params(input, LIMITS).expect("valid params");
        assert_eq!(request.number(), number);
        assert_eq!(request.size(), size);
    }

    #[rstest]
    #[case(params(Some(0), None), PageParamsError::ZeroPage)]
    #[case(params(None, Some(0)), PageParamsError::ZeroPageSize)]
    fn rejects_zero_parameters(#[case] input: PageParams, #[case] expected: PageParamsError) {
        let error = PageRequest::from_params(input, LIMITS).expect_err("invalid params");
        assert_eq!(error, expected);
    }

    #[rstest]
    #[case(0, 5, 1)]
    #[case(1, 5, 1)]
    #[case(5, 5, 1)]
    #[case(6, 5, 2)]
    #[case(21, 5, 5)]
    fn computes_last_page(#[case] count: u64, #[case] size: u32, #[case] expected: u32) {
        assert_eq!(last_page(count, size), expected);
    }

    #[test]
    fn offset_and_limit_follow_the_page_number() {
        let request = PageRequest::from_params(params(Some(3), Some(10)), LIMITS).expect("valid");
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn assembles_middle_page_with_both_links() {
        let request = PageRequest::from_params(params(Some(2), Some(5)), LIMITS).expect("valid");
        let links = PageLinks::new("/api/v1/books");
        let page = Page::assemble(request, 21, vec![1, 2, 3, 4, 5], &links).expect("in range");

        assert_eq!(page.count, 21);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/books?page=3&page_size=5")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/books?page=1&page_size=5")
        );
        assert_eq!(page.results.len(), 5);
    }

    #[test]
    fn first_and_last_pages_omit_the_missing_link() {
        let links = PageLinks::new("/api/v1/books");
        let first = PageRequest::from_params(params(Some(1), Some(5)), LIMITS).expect("valid");
        let first_page = Page::assemble(first, 21, vec![0; 5], &links).expect("in range");
        assert!(first_page.previous.is_none());
        assert!(first_page.next.is_some());

        let last = PageRequest::from_params(params(Some(5), Some(5)), LIMITS).expect("valid");
        let final_page = Page::assemble(last, 21, vec![0; 1], &links).expect("in range");
        assert!(final_page.next.is_none());
        assert!(final_page.previous.is_some());
    }

    #[test]
    fn page_past_the_end_is_an_error_not_an_empty_page() {
        let request = PageRequest::from_params(params(Some(6), Some(5)), LIMITS).expect("valid");
        let links = PageLinks::new("/api/v1/books");
        let error = Page::<u8>::assemble(request, 21, Vec::new(), &links).expect_err("past end");
        assert_eq!(
            error,
            PageError::OutOfRange {
                requested: 6,
                available: 5,
            }
        );
    }

    #[test]
    fn empty_collection_keeps_page_one_addressable() {
        let request = PageRequest::from_params(params(None, None), LIMITS).expect("valid");
        let links = PageLinks::new("/api/v1/books");
        let page = Page::<u8>::assemble(request, 0, Vec::new(), &links).expect("page one");
        assert_eq!(page.count, 0);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
        assert!(page.results.is_empty());
    }

    #[test]
    fn envelope_serialises_with_stable_field_names() {
        let request = PageRequest::from_params(params(None, None), LIMITS).expect("valid");
        let links = PageLinks::new("/api/v1/books");
        let page = Page::assemble(request, 2, vec!["a", "b"], &links).expect("in range");
        let value = serde_json::to_value(&page).expect("serialises");
        assert_eq!(value["count"], 2);
        assert_eq!(value["next"], serde_json::Value::Null);
        assert_eq!(value["results"], serde_json::json!(["a", "b"]));
    }
}
