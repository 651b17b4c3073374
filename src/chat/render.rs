use crate::recommend::Recommendation;

use super::{ChatMessage, MessageSource, Role};

/// Tag chips in display order; absent optional fields are skipped.
pub fn chips(rec: &Recommendation) -> Vec<&str> {
    let mut chips = vec![rec.genre.as_str()];
    chips.extend(rec.year.as_deref());
    chips.extend(rec.platform.as_deref());
    chips.push(rec.rating.as_str());
    chips
}

pub fn render_card(rec: &Recommendation) -> String {
    let chips = chips(rec)
        .into_iter()
        .map(|chip| format!("[{}]", chip))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{}\n{}\n\n{}\n",
        rec.title,
        chips,
        wrap(&rec.description, 78)
    )
}

pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };

    match message.recommendation() {
        Some(rec) => {
            let mut out = format!("{}>\n{}", speaker, render_card(&rec));
            if message.source == MessageSource::Fallback {
                out.push_str("(curated recommendation)\n");
            }
            out.push_str("Type /save to add it to your watchlist.\n");
            out
        }
        None => format!("{}> {}\n", speaker, message.content),
    }
}

fn wrap(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::recommend::select_fallback;

    #[test]
    fn anime_card_has_no_platform_chip() {
        let rec = select_fallback(Category::Anime, "action");
        assert_eq!(chips(rec), vec!["Action, Supernatural, Historical", "2019", "9/10"]);
    }

    #[test]
    fn web_series_card_has_platform_chip() {
        let rec = select_fallback(Category::WebSeries, "korean");
        assert_eq!(
            chips(rec),
            vec!["Romance, Drama, Comedy", "2019", "Netflix", "9.5/10"]
        );
        let card = render_card(rec);
        assert!(card.starts_with("Crash Landing on You\n[Romance, Drama, Comedy] [2019] [Netflix] [9.5/10]\n"));
    }

    #[test]
    fn description_is_wrapped() {
        let rec = select_fallback(Category::Movies, "");
        let card = render_card(rec);
        assert!(card.lines().all(|l| l.chars().count() <= 78));
        assert!(card.contains("Christopher Nolan's complex"));
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(wrap("a bb ccc", 4), "a bb\nccc");
        assert_eq!(wrap("supercalifragilistic x", 5), "supercalifragilistic\nx");
        assert_eq!(wrap("", 10), "");
    }
}
