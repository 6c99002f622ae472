//! Note CRUD.

use sqlx::Row;

use super::db::{unix_timestamp, Pool};
use super::types::Note;
use super::{map_insert_err, PoolError};

fn note_from_row(row: &sqlx::sqlite::SqliteRow) -> Note {
    Note {
        name: row.get("name"),
        content: row.get("content"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
    }
}

impl Pool {
    pub async fn put_note(
        &self,
        name: &str,
        content: &str,
        author_id: i64,
    ) -> Result<(), PoolError> {
        sqlx::query(
            r#"
            INSERT INTO notes (name, content, author_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(content)
        .bind(author_id)
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, format!("you already have a note named {name:?}")))?;
        Ok(())
    }

    /// All notes, oldest first. Errors with `NotFound` when there are none.
    pub async fn fetch_notes(&self) -> Result<Vec<Note>, PoolError> {
        let rows = sqlx::query("SELECT * FROM notes ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(PoolError::NotFound("no notes found".to_owned()));
        }
        Ok(rows.iter().map(note_from_row).collect())
    }

    /// Notes authored by one user.
    pub async fn fetch_notes_for(&self, author_id: i64) -> Result<Vec<Note>, PoolError> {
        let rows = sqlx::query("SELECT * FROM notes WHERE author_id = ?1 ORDER BY created_at ASC")
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(PoolError::NotFound(format!(
                "no notes found for user {author_id}"
            )));
        }
        Ok(rows.iter().map(note_from_row).collect())
    }

    pub async fn update_note(
        &self,
        name: &str,
        new_content: &str,
        author_id: i64,
    ) -> Result<(), PoolError> {
        let result = sqlx::query(
            r#"
            UPDATE notes SET content = ?1
            WHERE name = ?2 AND author_id = ?3
            "#,
        )
        .bind(new_content)
        .bind(name)
        .bind(author_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(PoolError::NotFound(format!("no note named {name:?}")));
        }
        Ok(())
    }

    /// Remove notes for an author. With `strict`, everything they own goes;
    /// otherwise only the note matching `name` is removed.
    pub async fn remove_note(
        &self,
        author_id: i64,
        strict: bool,
        name: Option<&str>,
    ) -> Result<(), PoolError> {
        if strict {
            sqlx::query("DELETE FROM notes WHERE author_id = ?1")
                .bind(author_id)
                .execute(&self.pool)
                .await?;
            return Ok(());
        }

        if let Some(name) = name {
            let result = sqlx::query("DELETE FROM notes WHERE author_id = ?1 AND name = ?2")
                .bind(author_id)
                .bind(name)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(PoolError::NotFound(format!("no note named {name:?}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::db::open_memory;
    use super::*;

    #[tokio::test]
    async fn put_and_fetch_notes() {
        let db = open_memory().await.unwrap();
        db.put_note("todo", "buy milk", 1).await.unwrap();
        db.put_note("todo", "call mom", 2).await.unwrap();

        let all = db.fetch_notes().await.unwrap();
        assert_eq!(all.len(), 2);

        let mine = db.fetch_notes_for(1).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].content, "buy milk");
    }

    #[tokio::test]
    async fn duplicate_note_is_already_exists() {
        let db = open_memory().await.unwrap();
        db.put_note("todo", "a", 1).await.unwrap();
        let err = db.put_note("todo", "b", 1).await.unwrap_err();
        assert!(matches!(err, PoolError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let db = open_memory().await.unwrap();
        assert!(matches!(
            db.fetch_notes().await,
            Err(PoolError::NotFound(_))
        ));
        assert!(matches!(
            db.update_note("ghost", "x", 1).await,
            Err(PoolError::NotFound(_))
        ));
        assert!(matches!(
            db.remove_note(1, false, Some("ghost")).await,
            Err(PoolError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_and_remove() {
        let db = open_memory().await.unwrap();
        db.put_note("todo", "a", 1).await.unwrap();
        db.update_note("todo", "b", 1).await.unwrap();
        assert_eq!(db.fetch_notes_for(1).await.unwrap()[0].content, "b");

        db.remove_note(1, false, Some("todo")).await.unwrap();
        assert!(db.fetch_notes_for(1).await.is_err());
    }

    #[tokio::test]
    async fn strict_remove_clears_all_for_author() {
        let db = open_memory().await.unwrap();
        db.put_note("a", "1", 1).await.unwrap();
        db.put_note("b", "2", 1).await.unwrap();
        db.put_note("c", "3", 2).await.unwrap();

        db.remove_note(1, true, None).await.unwrap();
        assert!(db.fetch_notes_for(1).await.is_err());
        assert_eq!(db.fetch_notes_for(2).await.unwrap().len(), 1);
    }
}
