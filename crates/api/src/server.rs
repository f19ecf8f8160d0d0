//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use aurum_service::gold::GoldPriceService;
use aurum_service::user::UserService;

use crate::routes::{gold, user};
use crate::types::HealthResponse;

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 两个服务在启动前由 DI 容器注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 黄金价格服务 (Facade)
    pub gold: Arc<GoldPriceService>,
    /// 用户管理服务
    pub users: Arc<UserService>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aurum 黄金价格 API",
        version = "0.1.0",
        description = "国内外黄金价格的同步、查询与对比服务。上游不可用时自动降级为模拟数据。",
        license(name = "MIT")
    ),
    tags(
        (name = "黄金价格 (Gold)", description = "价格同步、区间查询、摘要与市场对比"),
        (name = "用户 (Users)", description = "后台账号的基础 CRUD"),
        (name = "系统 (System)", description = "健康检查")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 健康检查
#[utoipa::path(
    get,
    path = "/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务正常", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// 根据配置构建 CORS 层，包含 "*" 或为空时放开全部来源。
fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 构建完整的 axum 应用路由树 (含 Swagger UI 与 CORS)。
///
/// 独立于端口绑定，便于集成测试在随机端口上直接挂载。
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_router = OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(gold::sync_prices))
        .routes(routes!(gold::get_price_data))
        .routes(routes!(gold::get_summary))
        .routes(routes!(gold::get_comparison))
        .routes(routes!(gold::get_latest))
        .routes(routes!(gold::get_metadata))
        .routes(routes!(user::list_users, user::create_user))
        .routes(routes!(user::get_user, user::update_user, user::delete_user));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api_router)
        .with_state(state)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(build_cors(cors_origins))
}

/// 构建路由树并启动 HTTP 监听。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
/// * `cors_origins` - 允许的跨域来源列表
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
    cors_origins: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state, cors_origins);

    tracing::info!("🚀 Aurum API Server listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
