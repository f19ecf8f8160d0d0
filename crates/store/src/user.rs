use async_trait::async_trait;
use aurum_core::store::entity::{NewUser, User, UserPatch};
use aurum_core::store::error::StoreError;
use aurum_core::store::port::UserStore;
use chrono::{DateTime, Utc};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;

/// 系统数据库文件名
const APP_DB: &str = "app.db";

/// 行元组别名，列顺序与 SELECT 保持一致。
type UserRow = (
    i64,
    String,
    String,
    Option<String>,
    bool,
    String,
    DateTime<Utc>,
);

const USER_COLUMNS: &str = "id, username, email, full_name, is_active, hashed_password, created_at";

/// UserStore 的 SQLite 实现。
///
/// # Summary
/// 在中心化的 SQLite 数据库 (`app.db`) 中管理用户账号。
///
/// # Invariants
/// * `username` 与 `email` 的唯一性由 UNIQUE 约束保证。
/// * 数据库结构在存储实例创建时初始化。
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// 创建新的 SqliteUserStore 并初始化用户表。
    ///
    /// # Logic
    /// 1. 获取配置的数据根目录并确保其存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 执行 DDL 初始化 `users` 表。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例或数据库错误。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::InitError(e.to_string()))?;

        let options = SqliteConnectOptions::new()
            .filename(root.join(APP_DB))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::InitError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                full_name TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                hashed_password TEXT NOT NULL,
                created_at DATETIME NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        Ok(Self { pool })
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users WHERE {} = ?",
            USER_COLUMNS, column
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(into_user))
    }
}

/// 将 sqlx 错误映射到存储层错误，唯一约束冲突单独标记。
fn map_db_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        _ => StoreError::Database(e.to_string()),
    }
}

fn into_user(r: UserRow) -> User {
    User {
        id: r.0,
        username: r.1,
        email: r.2,
        full_name: r.3,
        is_active: r.4,
        hashed_password: r.5,
        created_at: r.6,
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    /// # Summary
    /// 创建用户。
    ///
    /// # Logic
    /// 1. 插入 `users` 表，唯一约束冲突映射为 `Conflict`。
    /// 2. 按自增主键回读完整实体。
    ///
    /// # Arguments
    /// * `user` - 待创建的用户数据。
    ///
    /// # Returns
    /// * `Result<User, StoreError>` - 创建后的完整实体。
    async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let res = sqlx::query(
            r#"
            INSERT INTO users (username, email, full_name, is_active, hashed_password, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(&user.password)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        let id = res.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::Database("inserted row not found".into()))
    }

    /// 根据 ID 查询 `users` 表。
    async fn get(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(into_user))
    }

    /// 根据用户名查询。
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.fetch_one_by("username", username).await
    }

    /// 根据邮箱查询。
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.fetch_one_by("email", email).await
    }

    /// 按主键升序分页列出用户。
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY id ASC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(into_user).collect())
    }

    /// # Summary
    /// 部分更新用户，未提供的字段保持原值。
    ///
    /// # Logic
    /// 1. 回读现有实体，不存在返回 `NotFound`。
    /// 2. 合并补丁后整行 UPDATE。
    ///
    /// # Arguments
    /// * `id` - 用户主键。
    /// * `patch` - 字段补丁。
    ///
    /// # Returns
    /// * `Result<User, StoreError>` - 更新后的完整实体。
    async fn update(&self, id: i64, patch: &UserPatch) -> Result<User, StoreError> {
        let existing = self.get(id).await?.ok_or(StoreError::NotFound)?;

        let email = patch.email.clone().unwrap_or(existing.email);
        let full_name = patch.full_name.clone().or(existing.full_name);
        let password = patch
            .password
            .clone()
            .unwrap_or(existing.hashed_password);
        let is_active = patch.is_active.unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE users
            SET email = ?, full_name = ?, hashed_password = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&email)
        .bind(&full_name)
        .bind(&password)
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        self.get(id).await?.ok_or(StoreError::NotFound)
    }

    /// 删除用户，目标不存在返回 `NotFound`。
    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
