use serde::{Deserialize, Serialize};

/// Number of characters of instructions kept for an online result
pub const INSTRUCTIONS_PREVIEW_CHARS: usize = 200;

pub const NO_INSTRUCTIONS_PLACEHOLDER: &str = "No instructions available.";

/// A record as returned by the recipe search collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
}

/// Search envelope. `meals` is `null` when nothing matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealSearchResponse {
    #[serde(default)]
    pub meals: Option<Vec<MealRecord>>,
}

/// An online result mapped into the local recipe shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineRecipe {
    pub id: String,
    pub name: String,
    pub image: String,
    pub instructions: String,
}

impl MealSearchResponse {
    pub fn into_records(self) -> Vec<MealRecord> {
        self.meals.unwrap_or_default()
    }
}

impl From<MealRecord> for OnlineRecipe {
    fn from(record: MealRecord) -> Self {
        Self {
            instructions: preview_instructions(record.instructions.as_deref()),
            id: record.id,
            name: record.name,
            image: record.thumbnail.unwrap_or_default(),
        }
    }
}

/// First 200 characters plus `...`, or the placeholder when there is nothing to show.
pub fn preview_instructions(instructions: Option<&str>) -> String {
    match instructions {
        Some(text) if !text.is_empty() => {
            let preview: String = text.chars().take(INSTRUCTIONS_PREVIEW_CHARS).collect();
            format!("{}...", preview)
        }
        _ => NO_INSTRUCTIONS_PLACEHOLDER.to_string(),
    }
}
