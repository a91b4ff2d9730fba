//! HTTP surface of the job board: relational `/jobs` routes, CV uploads and
//! the document-backed `/v2/jobs` routes.

pub mod routes;
pub mod state;
