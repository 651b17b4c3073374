use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Anime,
    Movies,
    WebSeries,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Anime, Category::Movies, Category::WebSeries];

    /// Lenient lookup: anything unrecognised is treated as movies.
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; using movies", e);
            Category::Movies
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Anime => "anime",
            Category::Movies => "movies",
            Category::WebSeries => "web-series",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Anime => "Anime Recommendations",
            Category::Movies => "Movie Recommendations",
            Category::WebSeries => "Web Series & K-Drama",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Anime => "Tell me about your anime preferences!",
            Category::Movies => "What kind of movies do you enjoy?",
            Category::WebSeries => "Share your web series and K-drama preferences!",
        }
    }

    /// Sample prompts shown at the start of a chat.
    pub fn examples(self) -> [&'static str; 3] {
        match self {
            Category::Anime => [
                "I love action anime like Attack on Titan",
                "Recommend romantic anime series",
                "I want something similar to Death Note",
            ],
            Category::Movies => [
                "I love sci-fi movies like Interstellar",
                "Recommend comedy movies",
                "I want thriller movies like Gone Girl",
            ],
            Category::WebSeries => [
                "I love K-dramas like Crash Landing on You",
                "Recommend mystery web series",
                "I want something like Stranger Things",
            ],
        }
    }

    pub fn greeting(self) -> String {
        format!(
            "Hello! I'm your {} assistant. {} I'll provide you with one perfect recommendation with detailed information. What are you in the mood for?",
            self.title().to_lowercase(),
            self.description()
        )
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anime" => Ok(Category::Anime),
            "movies" => Ok(Category::Movies),
            "web-series" => Ok(Category::WebSeries),
            other => Err(format!(
                "unknown category '{}' (expected anime, movies or web-series)",
                other
            )),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
