use crate::category::Category;

const DESCRIPTION_FIELD: &str = "DESCRIPTION: [Detailed description explaining why it matches their taste, what makes it special, and what to expect. Make this 3-4 sentences long.]";

const CLOSING: &str = "Provide only ONE recommendation that best matches their request. Make sure to include all fields exactly as shown above.";

/// Builds the single user-role message sent to the completion API.
pub fn build_prompt(category: Category, user_input: &str) -> String {
    let (role, subject, title_hint) = match category {
        Category::Anime => ("an anime recommendation expert", "anime", "Anime Name"),
        Category::Movies => ("a movie recommendation expert", "movie", "Movie Name"),
        Category::WebSeries => (
            "a web series and K-drama recommendation expert",
            "",
            "Series Name",
        ),
    };

    let subject = if subject.is_empty() {
        String::new()
    } else {
        format!("{} ", subject)
    };

    let mut fields = vec![
        format!("TITLE: [{}]", title_hint),
        "GENRE: [Genres]".to_string(),
        "YEAR: [Release Year]".to_string(),
    ];
    if category == Category::WebSeries {
        fields.push("PLATFORM: [Where to watch]".to_string());
    }
    fields.push("RATING: [Rating/10]".to_string());
    fields.push(DESCRIPTION_FIELD.to_string());

    format!(
        "You are {role}. Based on the user's preferences, provide exactly ONE specific {subject}recommendation with detailed explanation. Format your response EXACTLY as follows:\n\n{fields}\n\nUser preference: {input}\n\n{closing}",
        role = role,
        subject = subject,
        fields = fields.join("\n"),
        input = user_input,
        closing = CLOSING,
    )
}

/// Same as [`build_prompt`] but takes the raw category name.
pub fn build_prompt_for(category: &str, user_input: &str) -> String {
    build_prompt(Category::resolve(category), user_input)
}
