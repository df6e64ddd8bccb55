//! Course catalog browsing.

use std::fmt::Display;
use std::str::FromStr;

use database::{course, Course, Database, Level};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::Result;

/// Catalog filters. Every set field must match; an empty filter matches
/// every course.
///
/// Deserializes from query strings. A blank value such as `?level=` leaves
/// that filter unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CourseFilters {
    /// Exact category name.
    #[serde(deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub level: Option<Level>,
    /// Inclusive lower price bound.
    #[serde(deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    /// Case-insensitive substring of title, instructor or description.
    #[serde(deserialize_with = "blank_as_none")]
    pub search: Option<String>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl CourseFilters {
    /// Whether a course passes every set filter.
    pub fn matches(&self, course: &Course) -> bool {
        if let Some(category) = set(&self.category) {
            if course.category != category {
                return false;
            }
        }

        if let Some(level) = self.level {
            if course.level != level {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if course.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if course.price > max {
                return false;
            }
        }

        if let Some(search) = set(&self.search) {
            let needle = search.to_lowercase();
            let hit = [&course.title, &course.instructor, &course.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Read-only view over the course collection.
#[derive(Debug, Clone)]
pub struct Catalog {
    db: Database,
}

impl Catalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List courses passing `filters`, oldest first.
    pub async fn list(&self, filters: &CourseFilters) -> Result<Vec<Course>> {
        let courses = course::list_courses(self.db.pool()).await?;
        let total = courses.len();

        let matched: Vec<Course> = courses
            .into_iter()
            .filter(|course| filters.matches(course))
            .collect();

        debug!(total, matched = matched.len(), "Catalog filtered");
        Ok(matched)
    }

    /// Get one course; a missing id is [`crate::ServiceError::NotFound`].
    pub async fn get(&self, id: &str) -> Result<Course> {
        Ok(course::get_course(self.db.pool(), id).await?)
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = course::list_courses(self.db.pool())
            .await?
            .into_iter()
            .map(|course| course.category)
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, category: &str, level: Level, price: f64) -> Course {
        Course {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            description: "An introduction".to_string(),
            instructor: "Ada Lovelace".to_string(),
            price,
            level,
            category: category.to_string(),
            lessons: Vec::new(),
            materials: Vec::new(),
            ai_system_prompt: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let c = course("Web Basics", "Web", Level::Beginner, 0.0);
        assert!(CourseFilters::default().matches(&c));
    }

    #[test]
    fn test_blank_text_filters_are_ignored() {
        let c = course("Web Basics", "Web", Level::Beginner, 0.0);
        let filters = CourseFilters {
            category: Some(String::new()),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&c));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let c = course("Web Basics", "Web", Level::Beginner, 20.0);
        let filters = CourseFilters {
            min_price: Some(20.0),
            max_price: Some(20.0),
            ..Default::default()
        };
        assert!(filters.matches(&c));

        let filters = CourseFilters {
            max_price: Some(19.99),
            ..Default::default()
        };
        assert!(!filters.matches(&c));
    }

    #[test]
    fn test_search_covers_instructor_case_insensitively() {
        let c = course("Web Basics", "Web", Level::Beginner, 20.0);
        let filters = CourseFilters {
            search: Some("LOVELACE".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&c));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let c = course("Web Basics", "Web", Level::Beginner, 20.0);
        let filters = CourseFilters {
            category: Some("Web".to_string()),
            level: Some(Level::Advanced),
            ..Default::default()
        };
        assert!(!filters.matches(&c));
    }
}
