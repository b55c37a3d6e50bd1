//! Headers that make outbound calls look like they come from the frontend.

use reqwest::header::{
    HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER,
};

const ACCEPT_ANY_JSON: &str = "application/json, text/plain, */*";

/// Precomputed header sets for the two upstream calls.
#[derive(Debug, Clone)]
pub struct SpoofedHeaders {
    session_init: HeaderMap,
    bill: HeaderMap,
}

impl SpoofedHeaders {
    /// Build the header sets presenting `frontend_origin` as Origin and Referer.
    pub fn new(frontend_origin: &str) -> Result<Self, InvalidHeaderValue> {
        let origin = HeaderValue::from_str(frontend_origin)?;

        let mut session_init = HeaderMap::new();
        session_init.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY_JSON));
        session_init.insert(ORIGIN, origin.clone());
        session_init.insert(REFERER, origin);

        let mut bill = session_init.clone();
        bill.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self { session_init, bill })
    }

    /// Headers for `GET /api/v1/session-init`.
    pub fn session_init(&self) -> HeaderMap {
        self.session_init.clone()
    }

    /// Headers for `POST /api/v1/bill`.
    pub fn bill(&self) -> HeaderMap {
        self.bill.clone()
    }
}
