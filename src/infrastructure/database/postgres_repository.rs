use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CreateUserError, NewUser, Repository, User};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    wallet_address: String,
    email: String,
    fullname: String,
    auth_strategy: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    // ---
    fn from(r: UserRow) -> Self {
        // ---
        User {
            id: r.id,
            username: r.username,
            wallet_address: r.wallet_address,
            email: r.email,
            fullname: r.fullname,
            auth_strategy: r.auth_strategy,
            created_at: r.created_at,
        }
    }
}

const SELECT_USER: &str =
    "SELECT id, username, wallet_address, email, fullname, auth_strategy, created_at FROM users";

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

/// Classify an insert failure. Unique violations are mapped back to the
/// column they guard via the constraint name; everything else is a
/// storage failure.
fn classify_insert_error(e: sqlx::Error) -> CreateUserError {
    // ---
    let constraint = match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            db_err.constraint().map(str::to_owned)
        }
        _ => None,
    };

    match constraint.as_deref() {
        Some("users_username_key") => CreateUserError::UsernameTaken,
        Some("users_wallet_address_key") => CreateUserError::WalletTaken,
        _ => CreateUserError::Storage(e.into()),
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn create_user(&self, new_user: NewUser) -> Result<User, CreateUserError> {
        // ---
        let user = User::new(new_user);

        sqlx::query(
            "INSERT INTO users (id, username, wallet_address, email, fullname, auth_strategy, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.wallet_address)
        .bind(&user.email)
        .bind(&user.fullname)
        .bind(&user.auth_strategy)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(classify_insert_error)?;

        Ok(user)
    }

    async fn get_user_by_wallet(&self, wallet_address: &str) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE wallet_address = $1"))
            .bind(wallet_address)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }
}
