use super::entity::{NewUser, PriceRecord, SyncMetadata, User, UserPatch};
use super::error::StoreError;
use crate::common::Market;
use crate::feed::entity::PricePoint;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// # Summary
/// 黄金价格存储接口，负责价格记录与同步元数据的持久化。
///
/// # Invariants
/// - (market, date) 的唯一性必须由存储层约束保证，而非仅靠应用逻辑。
/// - 批量写入必须在单个事务内完成。
#[async_trait]
pub trait GoldStore: Send + Sync {
    /// # Summary
    /// 查询指定市场在闭区间内的价格记录。
    ///
    /// # Logic
    /// 按日期升序返回 `[start, end]` 内的全部记录。
    ///
    /// # Arguments
    /// * `market`: 市场类型。
    /// * `start`: 开始日期（含）。
    /// * `end`: 结束日期（含）。
    ///
    /// # Returns
    /// 返回按日期升序的记录列表。
    async fn query(
        &self,
        market: Market,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, StoreError>;

    /// # Summary
    /// 批量写入价格数据，跳过已存在的 (market, date) 行。
    ///
    /// # Logic
    /// 1. 开启事务。
    /// 2. 逐行执行原子化的"冲突即忽略"插入。
    /// 3. 提交失败时整批回滚并报告 0 条写入。
    ///
    /// # Arguments
    /// * `points`: 待写入的数据点。
    ///
    /// # Returns
    /// 返回实际新插入的行数；单行冲突不会中断整批。
    async fn upsert_batch(&self, points: &[PricePoint]) -> Result<u64, StoreError>;

    /// # Summary
    /// 将指定市场的同步时间戳更新为当前时间，行不存在则创建。
    ///
    /// # Logic
    /// 执行 `INSERT .. ON CONFLICT DO UPDATE`，幂等。
    ///
    /// # Arguments
    /// * `market`: 市场类型。
    ///
    /// # Returns
    /// 操作结果。
    async fn upsert_metadata(&self, market: Market) -> Result<(), StoreError>;

    /// # Summary
    /// 列出全部市场的同步元数据。
    ///
    /// # Returns
    /// 返回元数据列表（可能为空）。
    async fn list_metadata(&self) -> Result<Vec<SyncMetadata>, StoreError>;
}

/// # Summary
/// 用户数据存储接口。
///
/// # Invariants
/// - `username` 与 `email` 的唯一性由存储层约束保证。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 创建用户，唯一约束冲突时返回 `StoreError::Conflict`。
    async fn create(&self, user: &NewUser) -> Result<User, StoreError>;

    /// 根据 ID 获取用户。
    async fn get(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// 根据用户名获取用户。
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// 根据邮箱获取用户。
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// 分页列出用户。
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, StoreError>;

    /// 部分更新用户，返回更新后的实体；不存在返回 `StoreError::NotFound`。
    async fn update(&self, id: i64, patch: &UserPatch) -> Result<User, StoreError>;

    /// 删除用户；不存在返回 `StoreError::NotFound`。
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
