//! Wire types for the TMDB catalog API.
//!
//! Fields the API may omit or null out are `#[serde(default)]` so a sparse
//! record still decodes. Only `id` is mandatory: a record without one is a
//! malformed response.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Which remote collection backs the unfiltered movie grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListingMode {
    /// Movies now playing in theaters.
    #[default]
    New,
    Popular,
}

impl ListingMode {
    /// Parse a mode name from config or CLI (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "now_playing" | "now-playing" => Some(Self::New),
            "popular" => Some(Self::Popular),
            _ => None,
        }
    }

    /// Heading shown above the grid.
    pub fn heading(self) -> &'static str {
        match self {
            Self::New => "New Added Movies",
            Self::Popular => "Popular Movies",
        }
    }

    /// Short tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Popular => "Popular",
        }
    }
}

/// Lightweight catalog record returned by the listing and search endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    /// Present on multi-search results; listing endpoints omit it.
    #[serde(default)]
    pub media_type: Option<String>,
}

impl MovieSummary {
    /// Localized title, falling back to the original title.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.original_title
        } else {
            &self.title
        }
    }

    /// Parsed release date. TMDB sends `""` for unknown dates.
    pub fn release(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release().map(|d| d.year())
    }

    /// Rating formatted to one decimal, as shown on cards.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl SpokenLanguage {
    pub fn label(&self) -> &str {
        match self.english_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.name.is_empty() => &self.name,
            _ => &self.iso_639_1,
        }
    }
}

/// Extended record for exactly one movie, fetched when it is selected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl MovieDetail {
    /// Tagline, treating an empty string as absent.
    pub fn tagline(&self) -> Option<&str> {
        non_empty(self.tagline.as_deref())
    }

    /// Runtime in minutes; `0` means unknown.
    pub fn runtime(&self) -> Option<u32> {
        self.runtime.filter(|m| *m > 0)
    }

    /// Budget in USD; `0` means unknown.
    pub fn budget(&self) -> Option<u64> {
        self.budget.filter(|b| *b > 0)
    }

    /// Revenue in USD; `0` means unknown.
    pub fn revenue(&self) -> Option<u64> {
        self.revenue.filter(|r| *r > 0)
    }

    pub fn imdb_id(&self) -> Option<&str> {
        non_empty(self.imdb_id.as_deref())
    }

    pub fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    pub fn homepage(&self) -> Option<&str> {
        non_empty(self.homepage.as_deref())
    }

    /// Comma-joined genre names, or `None` when the list is empty.
    pub fn genre_line(&self) -> Option<String> {
        join_names(self.genres.iter().map(|g| g.name.as_str()))
    }

    pub fn company_line(&self) -> Option<String> {
        join_names(self.production_companies.iter().map(|c| c.name.as_str()))
    }

    pub fn language_line(&self) -> Option<String> {
        join_names(self.spoken_languages.iter().map(SpokenLanguage::label))
    }
}

/// Envelope shared by the listing and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub page: Option<u32>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let names: Vec<&str> = names.filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// TMDB occasionally sends `null` for numeric and list fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format a USD amount with thousands separators, e.g. `$1,250,000`.
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a runtime in minutes as `2h 15m`.
pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
