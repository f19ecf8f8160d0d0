//! # 用户管理路由控制器
//!
//! 实现 `/api/v1/users` 路径下的 REST 接口：基础的账号 CRUD。
//! 不含鉴权：口令原样入库，散列由上层鉴权系统负责。

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, CreateUserRequest, UpdateUserRequest, UserResponse};
use aurum_core::store::entity::{NewUser, UserPatch};
use aurum_service::user::DEFAULT_LIST_LIMIT;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ListUsersQuery {
    /// 跳过的记录数，默认 0
    pub offset: Option<i64>,
    /// 返回数量限制，默认 100
    pub limit: Option<i64>,
}

/// 分页列出用户
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "用户 (Users)",
    params(
        ("offset" = Option<i64>, Query, description = "跳过的记录数，默认 0"),
        ("limit" = Option<i64>, Query, description = "返回数量限制，默认 100")
    ),
    responses(
        (status = 200, description = "用户列表获取成功", body = ApiResponse<Vec<UserResponse>>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let offset = query.offset.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(0);

    let users = state.users.list(offset, limit).await?;
    let responses = users.iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::ok(responses)))
}

/// 创建用户
///
/// 用户名与邮箱必须全局唯一，重复时返回 400。
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "用户 (Users)",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "用户创建成功", body = ApiResponse<UserResponse>),
        (status = 400, description = "用户名或邮箱已存在")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let new_user = NewUser {
        username: req.username,
        email: req.email,
        full_name: req.full_name,
        password: req.password,
        is_active: req.is_active.unwrap_or(true),
    };

    let created = state.users.create(&new_user).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&created))))
}

/// 获取单个用户详情
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "用户 (Users)",
    params(
        ("id" = i64, Path, description = "用户 ID")
    ),
    responses(
        (status = 200, description = "用户详情获取成功", body = ApiResponse<UserResponse>),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// 部分更新用户
///
/// 未提供的字段保持原值；更新邮箱时同样校验唯一性。
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "用户 (Users)",
    params(
        ("id" = i64, Path, description = "用户 ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "用户更新成功", body = ApiResponse<UserResponse>),
        (status = 400, description = "邮箱已被占用"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let patch = UserPatch {
        email: req.email,
        full_name: req.full_name,
        password: req.password,
        is_active: req.is_active,
    };

    let updated = state.users.update(id, &patch).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&updated))))
}

/// 删除用户
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "用户 (Users)",
    params(
        ("id" = i64, Path, description = "用户 ID")
    ),
    responses(
        (status = 200, description = "用户已删除", body = ApiResponse<String>),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.users.delete(id).await?;
    Ok(Json(ApiResponse::ok(String::from("用户已删除"))))
}
