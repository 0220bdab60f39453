//! User lookup and mutation (auth collaborator of the ordering core).

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::instrument;

use pizzeria_auth::User;
use pizzeria_core::{DomainError, UserId};

use crate::error::StoreResult;

/// A user record ready for insertion; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

/// User store.
#[derive(Debug, Clone)]
pub struct Users {
    pool: SqlitePool,
}

impl Users {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, first_name, last_name, is_admin, \
                    created_at, updated_at \
             FROM user WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| user_from_row(&row)).transpose()
    }

    pub async fn get(&self, user_id: UserId) -> StoreResult<User> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, first_name, last_name, is_admin, \
                    created_at, updated_at \
             FROM user WHERE id = ?",
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => user_from_row(&row),
            None => Err(DomainError::not_found().into()),
        }
    }

    /// Insert a new user. A duplicate email maps to `Conflict`.
    #[instrument(skip(self, new_user), fields(email = %new_user.email), err)]
    pub async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO user (email, password_hash, first_name, last_name, is_admin, \
                               created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(new_user.is_admin)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::conflict("a user with this email already exists").into()
            }
            _ => crate::error::StoreError::from(e),
        })?;

        Ok(User {
            id: UserId::new(result.last_insert_rowid()),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            is_admin: new_user.is_admin,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn update_password(&self, user_id: UserId, password_hash: &str) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE user SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(user_id.as_i64())
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    pub async fn update_name(
        &self,
        user_id: UserId,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE user SET first_name = ?, last_name = ?, updated_at = ? WHERE id = ?",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(Utc::now())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    /// Delete a user; their orders cascade.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, user_id: UserId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }
}

fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        is_admin: row.try_get("is_admin")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
