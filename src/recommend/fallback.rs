use std::sync::LazyLock;

use crate::category::Category;

use super::parser::Recommendation;

struct Rule {
    keywords: &'static [&'static str],
    record: Recommendation,
}

struct CategoryFallbacks {
    rules: Vec<Rule>,
    default: Recommendation,
}

impl CategoryFallbacks {
    fn select(&self, lowered_input: &str) -> &Recommendation {
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered_input.contains(k)))
            .map(|rule| &rule.record)
            .unwrap_or(&self.default)
    }

    fn records(&self) -> impl Iterator<Item = &Recommendation> {
        self.rules
            .iter()
            .map(|rule| &rule.record)
            .chain(std::iter::once(&self.default))
    }
}

fn record(
    title: &str,
    genre: &str,
    year: &str,
    platform: Option<&str>,
    rating: &str,
    description: &str,
    poster: &str,
) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        genre: genre.to_string(),
        description: description.to_string(),
        rating: rating.to_string(),
        year: Some(year.to_string()),
        platform: platform.map(str::to_string),
        poster: Some(poster.to_string()),
    }
}

static ANIME: LazyLock<CategoryFallbacks> = LazyLock::new(|| CategoryFallbacks {
    rules: vec![
        Rule {
            keywords: &["action", "fight"],
            record: record(
                "Demon Slayer: Kimetsu no Yaiba",
                "Action, Supernatural, Historical",
                "2019",
                None,
                "9/10",
                "A visually stunning anime with breathtaking animation and compelling characters. Follows Tanjiro's journey to save his demon-turned sister while fighting other demons. The fight scenes are absolutely incredible and the emotional depth makes every battle meaningful. Perfect for fans of action-packed stories with heart.",
                "/placeholder.svg?height=400&width=300&text=Demon+Slayer+Poster",
            ),
        },
        Rule {
            keywords: &["romance", "love"],
            record: record(
                "Your Name",
                "Romance, Supernatural, Drama",
                "2016",
                None,
                "9/10",
                "A beautiful and emotionally powerful film about two teenagers who mysteriously swap bodies. The animation is gorgeous and the story is deeply moving, exploring themes of connection, fate, and love across time and space. This masterpiece will leave you emotionally invested and thinking about it long after the credits roll.",
                "/placeholder.svg?height=400&width=300&text=Your+Name+Poster",
            ),
        },
    ],
    default: record(
        "Attack on Titan",
        "Action, Drama, Dark Fantasy",
        "2013",
        None,
        "9.5/10",
        "A gripping and intense series that keeps you on the edge of your seat. The story evolves dramatically with each season, featuring complex characters and shocking plot twists that will leave you questioning everything. Known for its mature themes, incredible world-building, and one of the most satisfying conclusions in anime history.",
        "/placeholder.svg?height=400&width=300&text=Attack+on+Titan+Poster",
    ),
});

static MOVIES: LazyLock<CategoryFallbacks> = LazyLock::new(|| CategoryFallbacks {
    rules: vec![
        Rule {
            keywords: &["sci-fi", "science"],
            record: record(
                "Everything Everywhere All at Once",
                "Sci-Fi, Comedy, Drama",
                "2022",
                None,
                "9.5/10",
                "A mind-bending multiverse adventure that perfectly balances absurd humor with genuine emotion. It's creative, heartfelt, and visually spectacular, exploring themes of family, identity, and infinite possibilities. This film manages to be both the most ridiculous and most touching movie you'll ever see, with incredible performances and groundbreaking visual effects.",
                "/placeholder.svg?height=400&width=300&text=Everything+Everywhere+All+at+Once+Poster",
            ),
        },
        Rule {
            keywords: &["thriller", "suspense"],
            record: record(
                "Parasite",
                "Thriller, Drama, Dark Comedy",
                "2019",
                None,
                "9.5/10",
                "A masterful social thriller that examines class inequality with sharp wit and unexpected turns. Bong Joon-ho's direction is flawless, creating a film that's both entertaining and deeply thought-provoking. The movie builds tension masterfully while delivering biting social commentary, making it both a thrilling watch and an important cultural statement.",
                "/placeholder.svg?height=400&width=300&text=Parasite+Poster",
            ),
        },
    ],
    default: record(
        "Inception",
        "Sci-Fi, Action, Thriller",
        "2010",
        None,
        "9/10",
        "Christopher Nolan's complex and visually stunning exploration of dreams within dreams. The action sequences and concept are equally impressive, creating a unique cinematic experience that rewards multiple viewings. With its intricate plot, stunning practical effects, and Hans Zimmer's iconic score, this film redefined what blockbuster cinema could achieve.",
        "/placeholder.svg?height=400&width=300&text=Inception+Poster",
    ),
});

static WEB_SERIES: LazyLock<CategoryFallbacks> = LazyLock::new(|| CategoryFallbacks {
    rules: vec![
        Rule {
            keywords: &["k-drama", "korean"],
            record: record(
                "Crash Landing on You",
                "Romance, Drama, Comedy",
                "2019",
                Some("Netflix"),
                "9.5/10",
                "One of the best K-dramas ever made, telling the unlikely love story between a South Korean heiress and North Korean officer. Perfect mix of romance, comedy, and cultural exploration with outstanding performances. The show beautifully balances humor and heart while providing insight into Korean culture and the divide between North and South Korea.",
                "/placeholder.svg?height=400&width=300&text=Crash+Landing+on+You+Poster",
            ),
        },
        Rule {
            keywords: &["mystery", "thriller"],
            record: record(
                "Stranger Things",
                "Sci-Fi, Horror, Drama",
                "2016",
                Some("Netflix"),
                "9/10",
                "A perfect blend of 80s nostalgia, supernatural horror, and heartfelt friendship. The characters are lovable and the mysteries are compelling, creating an addictive viewing experience. With its perfect mix of horror, humor, and heart, plus incredible performances from both adult and child actors, this series captures the magic of childhood adventure stories.",
                "/placeholder.svg?height=400&width=300&text=Stranger+Things+Poster",
            ),
        },
    ],
    default: record(
        "The Queen's Gambit",
        "Drama, Coming-of-age",
        "2020",
        Some("Netflix"),
        "9.5/10",
        "A beautifully crafted series about a chess prodigy's rise to fame while battling addiction. Anya Taylor-Joy's performance is exceptional, and the show makes chess surprisingly thrilling. The series combines stunning period details with compelling character development, creating a story that's both visually gorgeous and emotionally resonant.",
        "/placeholder.svg?height=400&width=300&text=The+Queens+Gambit+Poster",
    ),
});

fn table(category: Category) -> &'static CategoryFallbacks {
    match category {
        Category::Anime => &ANIME,
        Category::Movies => &MOVIES,
        Category::WebSeries => &WEB_SERIES,
    }
}

/// Picks the canned recommendation for `category` whose keywords appear in
/// `user_input` (case-insensitive), or the category default.
pub fn select_fallback(category: Category, user_input: &str) -> &'static Recommendation {
    table(category).select(&user_input.to_lowercase())
}

/// The three records a category can fall back to, in rule order.
pub fn fallbacks_for(category: Category) -> Vec<&'static Recommendation> {
    table(category).records().collect()
}

pub fn all_fallbacks() -> Vec<&'static Recommendation> {
    Category::ALL.into_iter().flat_map(fallbacks_for).collect()
}
