//! TMDB catalog access: wire types and the HTTP client.

mod client;
mod types;

pub use client::{
    image_url, CatalogClient, CatalogError, CatalogOptions, DEFAULT_API_BASE, DEFAULT_IMAGE_BASE,
    DEFAULT_LANGUAGE,
};
pub use types::{
    format_runtime, format_usd, Genre, ListingMode, MovieDetail, MovieSummary, ProductionCompany,
    ResultPage, SpokenLanguage,
};
