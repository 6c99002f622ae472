//! Row types for the bot store.

/// A user-authored note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub name: String,
    pub content: String,
    pub author_id: i64,
    /// Unix seconds.
    pub created_at: i64,
}

/// A Discord user's linked game-stats membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: i64,
    pub membership_id: i64,
    pub name: String,
    pub code: i64,
    pub platform: String,
}
