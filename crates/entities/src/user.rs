//! User-related entity definitions.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department::DEFAULT_DEPARTMENT;

/// Display accent colors assigned to new users.
pub const USER_COLORS: &[&str] = &[
    "#ef4444", // red
    "#f97316", // orange
    "#f59e0b", // amber
    "#84cc16", // lime
    "#10b981", // emerald
    "#06b6d4", // cyan
    "#3b82f6", // blue
    "#6366f1", // indigo
    "#8b5cf6", // violet
    "#d946ef", // fuchsia
    "#f43f5e", // rose
];

/// An employee on the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Display accent color, assigned at creation.
    pub color: String,
    /// Department name; `None` reads as the default department.
    pub department: Option<String>,
    /// Display code, independent of `id`.
    pub employee_id: Option<String>,
    /// Position within the department and, transitively, global sort order.
    pub rank: Option<i64>,
}

impl User {
    /// Creates a new user with a random accent color and employee code.
    pub fn new(name: impl Into<String>) -> Self {
        let mut rng = rand::rng();
        let color = USER_COLORS
            .choose(&mut rng)
            .copied()
            .unwrap_or("#3b82f6")
            .to_string();
        let employee_id = rng.random_range(1000..10000).to_string();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color,
            department: None,
            employee_id: Some(employee_id),
            rank: None,
        }
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets the rank.
    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Returns the department name, falling back to the default sentinel.
    pub fn department_or_default(&self) -> &str {
        self.department.as_deref().unwrap_or(DEFAULT_DEPARTMENT)
    }

    /// Returns the rank used for ordering; absent ranks sort first.
    pub fn sort_rank(&self) -> i64 {
        self.rank.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Alice").with_department("Radiology");

        assert_eq!(user.name, "Alice");
        assert_eq!(user.department_or_default(), "Radiology");
        assert!(USER_COLORS.contains(&user.color.as_str()));
        let code = user.employee_id.unwrap();
        assert_eq!(code.len(), 4);
    }

    #[test]
    fn test_department_fallback() {
        let user = User::new("Bob");
        assert_eq!(user.department_or_default(), DEFAULT_DEPARTMENT);
        assert_eq!(user.sort_rank(), 0);
    }
}
