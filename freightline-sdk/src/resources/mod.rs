//! Typed clients for the Freightline API resources.
//!
//! Each client holds a shared [`crate::client::HttpClient`] and exposes the
//! read surface of one resource: a detail fetch, a single-page list, and a
//! ready-configured [`crate::paginate::Paginator`] over the list endpoint.

pub mod invoices;
pub mod trips;
pub mod truckers;
