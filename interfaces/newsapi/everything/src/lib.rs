//! Client for the NewsAPI `/v2/everything` search endpoint.

pub mod index;
