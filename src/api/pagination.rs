use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::IntoParams;

use super::error::ApiError;
use crate::store::{Page, PageRequest};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Raw values so that junk never fails the extractor.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting at 1
    pub page: Option<String>,
    /// Items per page (default 50, max 100)
    pub page_size: Option<String>,
}

impl PageParams {
    /// `page_size` that is not a positive integer falls back to the default;
    /// a `page` that is not a positive integer is an invalid page.
    pub fn resolve(&self) -> Result<PageRequest, ApiError> {
        let page_size = self
            .page_size
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .map_or(DEFAULT_PAGE_SIZE, |v| v.min(MAX_PAGE_SIZE));

        let page = match self.page.as_deref() {
            None => 1,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(ApiError::invalid_page)?,
        };
        // no page whose offset overflows can hold rows
        page.checked_sub(1)
            .and_then(|p| p.checked_mul(page_size))
            .ok_or_else(ApiError::invalid_page)?;

        Ok(PageRequest { page, page_size })
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Pages past the last are invalid, except an empty first page.
pub fn paginate<T>(
    req: &HttpRequest,
    request: PageRequest,
    page: Page<T>,
) -> Result<Paginated<T>, ApiError> {
    let num_pages = page.count.div_ceil(request.page_size).max(1);
    if request.page > num_pages {
        return Err(ApiError::invalid_page());
    }

    let next = (request.page < num_pages).then(|| page_link(req, Some(request.page + 1)));
    let previous = (request.page > 1).then(|| {
        let target = request.page - 1;
        page_link(req, (target > 1).then_some(target))
    });

    Ok(Paginated {
        count: page.count,
        next,
        previous,
        results: page.items,
    })
}

/// The current URL with `page` replaced, or dropped when `None`.
fn page_link(req: &HttpRequest, page: Option<u64>) -> String {
    let info = req.connection_info();
    let base = format!("{}://{}{}", info.scheme(), info.host(), req.path());
    let Ok(mut url) = Url::parse(&base) else {
        return base;
    };

    let kept: Vec<(String, String)> = url::form_urlencoded::parse(req.query_string().as_bytes())
        .filter(|(key, _)| key != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        if let Some(page) = page {
            query.append_pair("page", &page.to_string());
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    url.into()
}
