//! Renders filters into generation prompts.
//!
//! Only constrained fields are rendered. An "Any" or empty field produces no
//! text at all, so the model never sees unconstrained dimensions.

use crate::models::filters::{is_unconstrained, ItineraryFilters};
use std::collections::BTreeSet;

const ITINERARY_PREAMBLE: &str = "You are \"Swarajya Trail\", an expert travel planner for the historical forts of Maharashtra, India. Write a personalized, practical and inspiring trekking itinerary for the user.";

const ITINERARY_CONSTRAINT_HEADER: &str =
    "IMPORTANT: Please adhere to the following user preferences:\n";

const ITINERARY_INSTRUCTIONS: &str = r#"**Itinerary Generation Instructions:**
Keep the tone encouraging and knowledgeable. If you are recommending a fort, briefly explain why it matches the user's preferences. For each fort or travel segment cover:

1.  **Overview:** A short, exciting summary of the journey ahead.
2.  **Route & Transportation 🚌:** Directions from a major city (such as Pune or Mumbai) or between forts, private vehicle and public transport options (MSRTC buses, trains, local jeeps), key base villages, and realistic travel times.
3.  **Best Time to Visit ⏰:** The ideal season and why.
4.  **Accommodation & Food 🍽️:** Stay options near the base village and local Maharashtrian dishes to try.
5.  **The Fort Experience 🚩:** A brief history, a numbered list of points of interest, and the time needed to explore.
6.  **Pro-Tips ✨:** What to carry, trek difficulty, entry fees and mobile network availability."#;

const COORDINATE_TRAILER: &str = "**IMPORTANT**: At the very end of your response, give the coordinates of the main fort on a separate line in exactly this format: `Coordinates: 18.2345, 73.4456`. This must be the last line of the response. Do not write anything after it.";

const FORMATTING_CONTRACT: &str = r#"Structure the whole response as clean, hierarchical markdown:
-   **Main Title:** a single level 1 heading (#) for the trip title.
-   **Main Sections:** level 2 headings (##) for each section above.
-   **Sub-sections:** level 3 headings (###) for individual forts or points within a section.
-   **Lists:** bulleted lists (*) for unordered items, numbered lists (1., 2., 3.) for sequences and points of interest.
-   **Emphasis:** bold (**) for important names and keywords.
-   **DO NOT** put headings inside lists.
-   **DO NOT** use triple backticks (```) anywhere in the response."#;

const INSPIRATION_CONSTRAINT_HEADER: &str =
    "\n\nThe suggestion must match the following user preferences:\n";

const INSPIRATION_TRAILER: &str = "\n\nReturn ONLY the name of the fort. For example: 'Raigad'. Do not add any extra text, markdown, or quotation marks.";

fn join(set: &BTreeSet<String>, separator: &str) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(separator)
}

fn itinerary_constraints(filters: &ItineraryFilters) -> Vec<String> {
    let mut lines = Vec::new();

    if !filters.difficulty.is_any() {
        lines.push(format!(
            "*   **Trek Difficulty:** The user has asked for **{}** treks. Make sure the suggested treks and routes match this level.",
            filters.difficulty
        ));
    }
    if !filters.regions.is_empty() {
        lines.push(format!(
            "*   **Region/District:** Focus on forts within **{}**.",
            join(&filters.regions, ", ")
        ));
    }
    if !is_unconstrained(&filters.proximity) {
        lines.push(format!(
            "*   **Proximity to City:** Forts should be easily accessible from **{}**.",
            filters.proximity
        ));
    }
    if !is_unconstrained(&filters.mountain_range) {
        lines.push(format!(
            "*   **Mountain Range:** Prefer forts in the **{}** range.",
            filters.mountain_range
        ));
    }
    if !is_unconstrained(&filters.trek_duration) {
        lines.push(format!(
            "*   **Trek Duration:** The trek should take **{}**.",
            filters.trek_duration
        ));
    }
    if !filters.trail_types.is_empty() {
        lines.push(format!(
            "*   **Trail Type:** The trail should feature **{}**.",
            join(&filters.trail_types, ", ")
        ));
    }
    if !is_unconstrained(&filters.historical_significance) {
        lines.push(format!(
            "*   **Historical Period:** The fort should have significant history from the **{}** period.",
            filters.historical_significance
        ));
    }
    if !is_unconstrained(&filters.fort_type) {
        lines.push(format!(
            "*   **Fort Type:** The fort should be a **{}** fort.",
            filters.fort_type
        ));
    }
    if !filters.key_features.is_empty() {
        lines.push(format!(
            "*   **Key Features:** The fort should have **{}**.",
            join(&filters.key_features, ", ")
        ));
    }

    lines
}

fn inspiration_constraints(filters: &ItineraryFilters) -> Vec<String> {
    let mut lines = Vec::new();

    if !filters.difficulty.is_any() {
        lines.push(format!("*   **Trek Difficulty:** {}.", filters.difficulty));
    }
    if !filters.regions.is_empty() {
        lines.push(format!(
            "*   **Region/District:** Within {}.",
            join(&filters.regions, " or ")
        ));
    }
    if !is_unconstrained(&filters.proximity) {
        lines.push(format!("*   **Proximity to City:** Near {}.", filters.proximity));
    }
    if !is_unconstrained(&filters.mountain_range) {
        lines.push(format!(
            "*   **Mountain Range:** In the {} range.",
            filters.mountain_range
        ));
    }
    if !is_unconstrained(&filters.trek_duration) {
        lines.push(format!(
            "*   **Trek Duration:** Should take {}.",
            filters.trek_duration
        ));
    }
    if !filters.trail_types.is_empty() {
        lines.push(format!(
            "*   **Trail Type:** Features {}.",
            join(&filters.trail_types, ", ")
        ));
    }
    if !is_unconstrained(&filters.historical_significance) {
        lines.push(format!(
            "*   **Historical Period:** From the {} period.",
            filters.historical_significance
        ));
    }
    if !is_unconstrained(&filters.fort_type) {
        lines.push(format!("*   **Fort Type:** A **{}** fort.", filters.fort_type));
    }
    if !filters.key_features.is_empty() {
        lines.push(format!(
            "*   **Key Features:** Has **{}**.",
            join(&filters.key_features, ", ")
        ));
    }

    lines
}

pub fn build_itinerary_prompt(filters: &ItineraryFilters) -> String {
    let forts = filters.forts_list.trim();
    let directive = if forts.is_empty() {
        "The user has not specified a fort. Based on their preferences below, please **recommend one or two suitable forts** and then generate a detailed itinerary for them.".to_string()
    } else {
        format!(
            "The user wants to visit the following fort(s): **{}**. Create a detailed itinerary for exactly this request.",
            forts
        )
    };

    let constraints = itinerary_constraints(filters);

    let mut prompt = String::new();
    prompt.push_str(ITINERARY_PREAMBLE);
    prompt.push_str("\n\n**User's Request:**\n");
    prompt.push_str(&directive);
    prompt.push_str("\n\n");

    if !constraints.is_empty() {
        prompt.push_str(ITINERARY_CONSTRAINT_HEADER);
        for line in &constraints {
            prompt.push_str(line);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str(ITINERARY_INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(COORDINATE_TRAILER);
    prompt.push_str("\n\n");
    prompt.push_str(FORMATTING_CONTRACT);
    prompt.push('\n');

    prompt
}

pub fn build_inspiration_prompt(filters: &ItineraryFilters) -> String {
    let constraints = inspiration_constraints(filters);

    let mut prompt = if constraints.is_empty() {
        "Suggest one interesting and popular fort in Maharashtra for a trek.".to_string()
    } else {
        "Suggest one interesting fort in Maharashtra for a trek.".to_string()
    };

    if !constraints.is_empty() {
        prompt.push_str(INSPIRATION_CONSTRAINT_HEADER);
        for line in &constraints {
            prompt.push_str(line);
            prompt.push('\n');
        }
    }

    prompt.push_str(INSPIRATION_TRAILER);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::Difficulty;

    fn bullets(prompt: &str) -> Vec<&str> {
        prompt.lines().filter(|l| l.starts_with("*   **")).collect()
    }

    #[test]
    fn test_named_fort_without_constraints() {
        let filters = ItineraryFilters {
            forts_list: "Raigad".to_string(),
            ..Default::default()
        };
        let prompt = build_itinerary_prompt(&filters);

        assert!(prompt.contains("following fort(s): **Raigad**"));
        assert!(!prompt.contains("recommend one or two"));
        assert!(!prompt.contains(ITINERARY_CONSTRAINT_HEADER.trim()));
        assert!(bullets(&prompt).is_empty());
        assert!(prompt.contains("`Coordinates: 18.2345, 73.4456`"));
        assert!(prompt.contains("(###)"));
    }

    #[test]
    fn test_recommend_mode_with_sparse_constraints() {
        let filters = ItineraryFilters {
            difficulty: Difficulty::Hard,
            regions: ["Pune".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let prompt = build_itinerary_prompt(&filters);

        assert!(prompt.contains("recommend one or two suitable forts"));
        assert!(prompt.contains(ITINERARY_CONSTRAINT_HEADER.trim()));

        let lines = bullets(&prompt);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("**Hard**"));
        assert!(lines[1].contains("**Pune**"));

        for absent in [
            "Proximity",
            "Mountain Range",
            "Trek Duration",
            "Trail Type",
            "Historical Period",
            "Fort Type",
            "Key Features",
        ] {
            assert!(!prompt.contains(absent), "{} should be omitted", absent);
        }
    }

    #[test]
    fn test_whitespace_only_forts_list_recommends() {
        let filters = ItineraryFilters {
            forts_list: "   ".to_string(),
            ..Default::default()
        };
        assert!(build_itinerary_prompt(&filters).contains("recommend one or two"));
    }

    #[test]
    fn test_all_constraints_in_fixed_order() {
        let filters = ItineraryFilters {
            forts_list: "Torna".to_string(),
            difficulty: Difficulty::Medium,
            regions: ["Satara".to_string(), "Pune".to_string()].into_iter().collect(),
            proximity: "Near Pune".to_string(),
            mountain_range: "Sahyadri".to_string(),
            trek_duration: "3-6 hours".to_string(),
            trail_types: ["Ridge Walk".to_string()].into_iter().collect(),
            historical_significance: "Maratha Empire".to_string(),
            fort_type: "Hill".to_string(),
            key_features: ["Caves".to_string(), "Temples".to_string()].into_iter().collect(),
        };
        let prompt = build_itinerary_prompt(&filters);
        let lines = bullets(&prompt);

        assert_eq!(lines.len(), 9);
        assert_eq!(itinerary_constraints(&filters).len(), 9);
        assert!(lines[1].contains("**Pune, Satara**"));
        assert!(lines[8].contains("**Caves, Temples**"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let filters = ItineraryFilters {
            fort_type: "Sea".to_string(),
            ..Default::default()
        };
        assert_eq!(build_itinerary_prompt(&filters), build_itinerary_prompt(&filters));
    }

    #[test]
    fn test_inspiration_without_constraints() {
        let prompt = build_inspiration_prompt(&ItineraryFilters::default());
        assert!(prompt.starts_with("Suggest one interesting and popular fort"));
        assert!(!prompt.contains("must match"));
        assert!(prompt.ends_with("quotation marks."));
    }

    #[test]
    fn test_inspiration_with_constraints() {
        let filters = ItineraryFilters {
            regions: ["Pune".to_string(), "Raigad".to_string()].into_iter().collect(),
            fort_type: "Sea".to_string(),
            ..Default::default()
        };
        let prompt = build_inspiration_prompt(&filters);

        assert!(prompt.starts_with("Suggest one interesting fort"));
        assert!(prompt.contains("Within Pune or Raigad."));
        assert!(prompt.contains("A **Sea** fort."));
        assert_eq!(bullets(&prompt).len(), 2);
        assert!(!prompt.contains("Coordinates"));
    }
}
