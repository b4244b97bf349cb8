//! Pagination glue between query parameters and the response envelope.

use pagination::{Page, PageError, PageLimits, PageLinks, PageParams, PageRequest};

use crate::domain::Error;

/// Build a validated page request from query parameters.
///
/// Zero pages and zero page sizes fail with `invalid_request`; oversized
/// page sizes were already clamped by the pagination crate.
pub fn page_request(params: PageParams, limits: PageLimits) -> Result<PageRequest, Error> {
    PageRequest::from_params(params, limits).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Assemble the response envelope for one page of results.
///
/// Requests beyond the last available page fail with `not_found`, matching
/// the behaviour of an absent resource.
pub fn assemble_page<T>(
    request: PageRequest,
    count: u64,
    results: Vec<T>,
    path: &str,
) -> Result<Page<T>, Error> {
    let links = PageLinks::new(path);
    Page::assemble(request, count, results, &links).map_err(|err| match err {
        PageError::OutOfRange { .. } => Error::not_found("invalid page"),
    })
}
