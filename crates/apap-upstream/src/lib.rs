pub mod client;
pub mod error;
pub mod query;
pub mod request;

pub use client::{ItemLookup, PaapiClient};
pub use error::UpstreamError;
pub use request::{Credentials, LookupRequest};

pub use bytes::Bytes;
pub use reqwest::StatusCode;
