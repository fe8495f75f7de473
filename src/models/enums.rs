use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two views of the recipe browser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Local collection, filtered by name
    #[default]
    MyRecipes,
    /// Results from the external search collaborator
    Search,
}

impl ViewMode {
    /// Parse an optional `tab` query value, falling back to My Recipes
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_search(&self) -> bool {
        matches!(self, ViewMode::Search)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::MyRecipes => write!(f, "my-recipes"),
            ViewMode::Search => write!(f, "search"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "my-recipes" => Ok(ViewMode::MyRecipes),
            "search" => Ok(ViewMode::Search),
            _ => Err(format!("Invalid view mode: {}", s)),
        }
    }
}
