//! Recommendation service clients for LightNavi.
//!
//! All clients implement the `lightnavi_core::RecommendationService` trait.

pub mod http;

pub use http::HttpRecommendationService;
