//! Linked game-stats membership CRUD.

use sqlx::Row;

use super::db::Pool;
use super::types::Member;
use super::{map_insert_err, PoolError};

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Member {
    Member {
        user_id: row.get("user_id"),
        membership_id: row.get("membership_id"),
        name: row.get("name"),
        code: row.get("code"),
        platform: row.get("platform"),
    }
}

impl Pool {
    pub async fn put_member(&self, member: &Member) -> Result<(), PoolError> {
        sqlx::query(
            r#"
            INSERT INTO members (user_id, membership_id, name, code, platform)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(member.user_id)
        .bind(member.membership_id)
        .bind(&member.name)
        .bind(member.code)
        .bind(&member.platform)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_insert_err(
                e,
                format!("user {}:{} already linked", member.user_id, member.name),
            )
        })?;
        Ok(())
    }

    pub async fn fetch_member(&self, user_id: i64) -> Result<Member, PoolError> {
        let row = sqlx::query("SELECT * FROM members WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(member_from_row(&row)),
            None => Err(PoolError::NotFound(format!("user {user_id} not linked"))),
        }
    }

    pub async fn fetch_members(&self) -> Result<Vec<Member>, PoolError> {
        let rows = sqlx::query("SELECT * FROM members ORDER BY user_id ASC")
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(PoolError::NotFound("no linked members".to_owned()));
        }
        Ok(rows.iter().map(member_from_row).collect())
    }

    pub async fn remove_member(&self, user_id: i64) -> Result<(), PoolError> {
        let result = sqlx::query("DELETE FROM members WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(PoolError::NotFound(format!("user {user_id} not linked")));
        }
        Ok(())
    }
}
