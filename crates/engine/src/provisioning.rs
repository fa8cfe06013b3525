//! Default categories handed to every new user.

use serde::Serialize;

/// `(name, color)` pairs created for each user.
pub const DEFAULT_CATEGORIES: [(&str, &str); 13] = [
    ("Food & Dining", "#FF5733"),
    ("Transportation", "#33A8FF"),
    ("Entertainment", "#FF33E9"),
    ("Shopping", "#33FF57"),
    ("Housing", "#9B33FF"),
    ("Utilities", "#FFB533"),
    ("Healthcare", "#33FFC1"),
    ("Personal", "#FF3369"),
    ("Education", "#337DFF"),
    ("Salary", "#33FF33"),
    ("Investments", "#F033FF"),
    ("Gifts", "#FF8A33"),
    ("Other", "#A0A0A0"),
];

/// Outcome of a seeding run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: usize,
    /// Defaults the user already had, matched by name.
    pub existing: usize,
}
