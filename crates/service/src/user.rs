use aurum_core::store::entity::{NewUser, User, UserPatch};
use aurum_core::store::error::StoreError;
use aurum_core::store::port::UserStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// 列表查询未指定分页参数时的默认值。
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// # Summary
/// 用户服务的统一错误类型。
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("User not found: {0}")]
    NotFound(i64),
    #[error("{0}")]
    Duplicate(String),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => UserError::Duplicate(msg),
            other => UserError::Store(other),
        }
    }
}

/// # Summary
/// 用户账号管理服务。
///
/// # Invariants
/// - 用户名与邮箱唯一性先行校验，竞态下由存储层 UNIQUE 约束兜底。
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// # Summary
    /// 创建用户，拒绝重复的用户名或邮箱。
    ///
    /// # Logic
    /// 1. 分别按用户名与邮箱预查，存在即返回 `Duplicate`。
    /// 2. 写入存储层，并发冲突由 UNIQUE 约束映射为 `Duplicate`。
    ///
    /// # Arguments
    /// * `user` - 待创建的用户数据。
    ///
    /// # Returns
    /// * `Result<User, UserError>` - 创建后的完整实体。
    pub async fn create(&self, user: &NewUser) -> Result<User, UserError> {
        if self.store.get_by_username(&user.username).await?.is_some() {
            return Err(UserError::Duplicate(String::from("用户名已存在")));
        }
        if self.store.get_by_email(&user.email).await?.is_some() {
            return Err(UserError::Duplicate(String::from("邮箱已被注册")));
        }

        let created = self.store.create(user).await?;
        info!("创建用户 {} (id={})", created.username, created.id);
        Ok(created)
    }

    /// 按主键查询用户，不存在返回 `NotFound`。
    pub async fn get(&self, id: i64) -> Result<User, UserError> {
        self.store.get(id).await?.ok_or(UserError::NotFound(id))
    }

    /// 按主键升序分页列出用户。
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, UserError> {
        Ok(self.store.list(offset, limit).await?)
    }

    /// # Summary
    /// 部分更新用户，未提供的字段保持原值。
    ///
    /// # Logic
    /// 1. 更新邮箱时预查新邮箱是否已被他人占用。
    /// 2. 委托存储层合并补丁，目标不存在映射为 `NotFound`。
    ///
    /// # Arguments
    /// * `id` - 用户主键。
    /// * `patch` - 字段补丁。
    ///
    /// # Returns
    /// * `Result<User, UserError>` - 更新后的完整实体。
    pub async fn update(&self, id: i64, patch: &UserPatch) -> Result<User, UserError> {
        if let Some(email) = &patch.email
            && let Some(owner) = self.store.get_by_email(email).await?
            && owner.id != id
        {
            return Err(UserError::Duplicate(String::from("邮箱已被注册")));
        }

        self.store.update(id, patch).await.map_err(|e| match e {
            StoreError::NotFound => UserError::NotFound(id),
            other => other.into(),
        })
    }

    /// 删除用户，目标不存在返回 `NotFound`。
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        self.store.delete(id).await.map_err(|e| match e {
            StoreError::NotFound => UserError::NotFound(id),
            other => other.into(),
        })
    }
}
