//! User repository

use chrono::Utc;
use jobboard_common::{is_unique_violation, Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::User;

pub(crate) const USER_COLUMNS: &str = "id, email, username, first_name, last_name, password_hash, \
     role, phone, bio, profile_pic, location, resume_url, linkedin_url, github_url, \
     website_url, is_active, last_login, created_at, updated_at";

/// Profile fields a user may change about themselves
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
}

impl ProfileChanges {
    /// Apply the changes to an in-memory user, leaving unset fields untouched
    pub fn apply_to(self, user: &mut User) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        replace_if_set(&mut user.phone, self.phone);
        replace_if_set(&mut user.bio, self.bio);
        replace_if_set(&mut user.profile_pic, self.profile_pic);
        replace_if_set(&mut user.location, self.location);
        replace_if_set(&mut user.resume_url, self.resume_url);
        replace_if_set(&mut user.linkedin_url, self.linkedin_url);
        replace_if_set(&mut user.github_url, self.github_url);
        replace_if_set(&mut user.website_url, self.website_url);
        user.updated_at = Utc::now();
    }
}

fn replace_if_set(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}

/// Map a unique violation on `users` to a field-level validation error
fn map_user_write_error(err: sqlx::Error) -> Error {
    if is_unique_violation(&err) {
        let constraint = match &err {
            sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or_default().to_string(),
            _ => String::new(),
        };
        if constraint.contains("username") {
            return Error::Validation("A user with that username already exists".to_string());
        }
        return Error::Validation("A user with this email already exists".to_string());
    }
    Error::Database(err)
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a new user
    pub async fn create(&self, user: &User) -> Result<User> {
        let query = format!(
            "INSERT INTO users ({USER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.phone)
            .bind(&user.bio)
            .bind(&user.profile_pic)
            .bind(&user.location)
            .bind(&user.resume_url)
            .bind(&user.linkedin_url)
            .bind(&user.github_url)
            .bind(&user.website_url)
            .bind(user.is_active)
            .bind(user.last_login)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_user_write_error)
    }

    /// Persist the editable profile fields of an already-validated user
    pub async fn update_profile(&self, user: &User) -> Result<User> {
        let query = format!(
            "UPDATE users SET \
                username = $2, first_name = $3, last_name = $4, phone = $5, bio = $6, \
                profile_pic = $7, location = $8, resume_url = $9, linkedin_url = $10, \
                github_url = $11, website_url = $12, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(&user.bio)
            .bind(&user.profile_pic)
            .bind(&user.location)
            .bind(&user.resume_url)
            .bind(&user.linkedin_url)
            .bind(&user.github_url)
            .bind(&user.website_url)
            .fetch_one(&self.pool)
            .await
            .map_err(map_user_write_error)
    }

    /// Record a successful login
    pub async fn touch_last_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
