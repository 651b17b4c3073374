use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A single structured recommendation, either parsed from API text or taken
/// from the fallback table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub genre: String,
    pub description: String,
    pub rating: String,
    pub year: Option<String>,
    pub platform: Option<String>,
    pub poster: Option<String>,
}

#[derive(Default)]
struct Fields {
    title: Option<String>,
    genre: Option<String>,
    year: Option<String>,
    platform: Option<String>,
    rating: Option<String>,
    description: Option<String>,
    poster: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Recommendation {
    /// Parses a `KEY: value` block. Returns `None` unless TITLE, GENRE,
    /// DESCRIPTION and RATING are all present and non-empty, in which case
    /// the text should be shown as plain prose.
    pub fn parse(text: &str) -> Option<Self> {
        let mut fields = Fields::default();

        for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
            let (key, value) = line.split_once(':').unwrap_or((line, ""));
            let value = value.trim().to_string();

            let slot = match key.trim().to_uppercase().as_str() {
                "TITLE" => &mut fields.title,
                "GENRE" => &mut fields.genre,
                "YEAR" => &mut fields.year,
                "PLATFORM" => &mut fields.platform,
                "RATING" => &mut fields.rating,
                "DESCRIPTION" => &mut fields.description,
                "POSTER" => &mut fields.poster,
                _ => continue,
            };
            *slot = Some(value);
        }

        Some(Self {
            title: required(fields.title)?,
            genre: required(fields.genre)?,
            description: required(fields.description)?,
            rating: required(fields.rating)?,
            year: required(fields.year),
            platform: required(fields.platform),
            poster: required(fields.poster),
        })
    }

    /// Serializes into the same `KEY: value` convention the API is asked to
    /// answer in, so fallback records go through [`Recommendation::parse`] too.
    pub fn to_block(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TITLE: {}", self.title);
        let _ = writeln!(out, "GENRE: {}", self.genre);
        if let Some(year) = &self.year {
            let _ = writeln!(out, "YEAR: {}", year);
        }
        if let Some(platform) = &self.platform {
            let _ = writeln!(out, "PLATFORM: {}", platform);
        }
        let _ = writeln!(out, "RATING: {}", self.rating);
        let _ = writeln!(out, "DESCRIPTION: {}", self.description);
        if let Some(poster) = &self.poster {
            let _ = write!(out, "POSTER: {}", poster);
        }
        out
    }
}
