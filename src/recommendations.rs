//! Packing recommendations
//!
//! The beach list is rule-based. The general packing list and the travel
//! guide come from a text generator; this module only owns their prompts and
//! the text shown when generation is unavailable.

use crate::models::WeatherObservation;

pub const PACKING_LIST_MAX_ITEMS: usize = 8;

pub const PACKING_DISABLED: &str = "🔑 Enable OpenAI API for smart packing suggestions";
pub const PACKING_FAILED: &str = "❌ Couldn't generate AI packing list";
pub const GUIDE_DISABLED: &str = "🔑 Enable OpenAI API for location guide";

const BEACH_ESSENTIALS: [&str; 5] = [
    "🧴 SPF 50+ Sunscreen",
    "🩱 Swimwear",
    "🏖️ Beach towel",
    "🕶️ UV-protection sunglasses",
    "💧 Reusable water bottle",
];

struct PackingRule {
    applies: fn(&WeatherObservation, f64) -> bool,
    item: &'static str,
}

// Appended in this order, never deduplicated.
const BEACH_EXTRAS: [PackingRule; 4] = [
    PackingRule {
        applies: |_, uv| uv > 8.0,
        item: "🧢 UV-protective hat/clothing",
    },
    PackingRule {
        applies: |w, _| w.temperature > 30.0,
        item: "🌬️ Portable fan/misting bottle",
    },
    PackingRule {
        applies: |w, _| w.wind_speed_kmh > 15.0,
        item: "🧥 Light windbreaker",
    },
    PackingRule {
        applies: |w, _| w.conditions.to_lowercase().contains("rain"),
        item: "☔ Waterproof bag/cover",
    },
];

/// Beach packing list: five essentials plus weather-driven extras
#[must_use]
pub fn generate_beach_packing_list(weather: &WeatherObservation, uv_index: f64) -> Vec<String> {
    let extras = BEACH_EXTRAS
        .iter()
        .filter(|rule| (rule.applies)(weather, uv_index))
        .map(|rule| rule.item);

    BEACH_ESSENTIALS
        .into_iter()
        .chain(extras)
        .map(str::to_string)
        .collect()
}

/// Prompt for the AI packing list
#[must_use]
pub fn packing_list_prompt(location: &str, weather: &WeatherObservation, safety_score: f64) -> String {
    format!(
        "Generate a concise packing list for traveling to {location} with:\n\
         - Weather: {conditions} ({temp:.1}°C)\n\
         - Humidity: {humidity:.1}%\n\
         - Wind: {wind:.1} km/h\n\
         - Safety rating: {safety_score:.1}/10\n\
         Format as bullet points with emojis. Max {max} items. Be specific to the location.",
        conditions = weather.conditions,
        temp = weather.temperature,
        humidity = weather.humidity,
        wind = weather.wind_speed_kmh,
        max = PACKING_LIST_MAX_ITEMS,
    )
}

/// Prompt for the three-paragraph travel guide
#[must_use]
pub fn location_guide_prompt(location: &str, weather: &WeatherObservation) -> String {
    format!(
        "Create a comprehensive travel guide for {location} in exactly 3 paragraphs \
         (about 700 words total).\n\
         Include the following sections:\n\n\
         Paragraph 1 (About the Place):\n\
         - Brief introduction to the location\n\
         - How to reach\n\
         - Historical significance\n\
         - Cultural highlights\n\
         - Current weather: {conditions} at {temp:.1}°C\n\n\
         Paragraph 2 (Things to Do and See):\n\
         - Top attractions and landmarks\n\
         - Popular activities\n\
         - Famous sites\n\n\
         Paragraph 3 (Food and Culture):\n\
         - Local cuisine and must-try dishes\n\
         - Cultural experiences\n\
         - Shopping recommendations\n\
         - Travel tips\n\n\
         Write in an engaging, informative style similar to a travel blogger.",
        conditions = weather.conditions,
        temp = weather.temperature,
    )
}

/// Text shown in place of a guide that failed to generate
#[must_use]
pub fn guide_error_placeholder(error: &str) -> String {
    format!("❌ Error generating guide: {error}")
}
