//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// Account management lives outside this core; users appear here only as
/// article authors and session holders.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Only the owning author may edit an article.
    pub fn owns(&self, author_id: i64) -> bool {
        self.id == author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns() {
        let user = User {
            id: 3,
            username: "alice".to_string(),
            created_at: Utc::now(),
        };
        assert!(user.owns(3));
        assert!(!user.owns(4));
    }
}
