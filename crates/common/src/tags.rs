//! Tag rules for expertise classification
//!
//! A tag rule maps case-insensitive substring patterns to a named skill or
//! area with a weight. The category decides what a rule matches against:
//! AREA rules look at changed file paths, ROLE rules at PR titles, and TECH
//! rules at both.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagCategory {
    Area,
    Role,
    Tech,
}

impl TagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "AREA",
            Self::Role => "ROLE",
            Self::Tech => "TECH",
        }
    }

    /// Rules in this category match against changed file paths
    pub fn matches_paths(&self) -> bool {
        matches!(self, Self::Area | Self::Tech)
    }

    /// Rules in this category match against PR titles
    pub fn matches_titles(&self) -> bool {
        matches!(self, Self::Role | Self::Tech)
    }
}

/// A single pattern-to-weight rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRule {
    pub name: String,
    pub category: TagCategory,
    pub patterns: Vec<String>,
    pub weight: f64,
}

impl TagRule {
    /// Whether any pattern matches the path (used for the PR area
    /// multiplier, where one hit per rule is enough)
    pub fn matches_path(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.patterns
            .iter()
            .any(|pattern| path.contains(&pattern.to_lowercase()))
    }

    /// Number of patterns matching the path. Hits accumulate per pattern:
    /// a path matching two patterns of the same rule contributes the
    /// rule's weight twice.
    pub fn path_hits(&self, path: &str) -> usize {
        let path = path.to_lowercase();
        self.patterns
            .iter()
            .filter(|pattern| path.contains(&pattern.to_lowercase()))
            .count()
    }

    /// Number of patterns matching the title
    pub fn title_hits(&self, title: &str) -> usize {
        let title = title.to_lowercase();
        self.patterns
            .iter()
            .filter(|pattern| title.contains(&pattern.to_lowercase()))
            .count()
    }
}

/// The full rule set, grouped by category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRuleSet {
    pub area: Vec<TagRule>,
    pub role: Vec<TagRule>,
    pub tech: Vec<TagRule>,
}

impl TagRuleSet {
    pub fn iter_all(&self) -> impl Iterator<Item = &TagRule> {
        self.area.iter().chain(self.role.iter()).chain(self.tech.iter())
    }

    /// Rules whose category matches file paths, used for PR area multipliers
    pub fn area_rules(&self) -> impl Iterator<Item = &TagRule> {
        self.area
            .iter()
            .filter(|rule| rule.category == TagCategory::Area)
    }
}
