// Web服务器实现
use std::path::PathBuf;
use std::sync::Arc;
use axum::{
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::logcommon::{AppError, Result, ServerConfig};
use crate::logstore::SharedStore;

use super::handlers;

/// 请求处理共享状态
pub struct AppState {
    /// 注入的日志存储
    pub store: SharedStore,
    /// index.html 和静态资源目录
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: SharedStore, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            static_dir: static_dir.into(),
        }
    }
}

/// 创建路由
pub fn create_app(state: Arc<AppState>, enable_cors: bool) -> Router {
    let static_service = ServeDir::new(&state.static_dir);

    let app = Router::new()
        .route("/", get(handlers::index_handler))
        .route(
            "/logs",
            get(handlers::query_logs_handler).post(handlers::ingest_log_handler),
        )
        .route("/health", get(handlers::health_handler))
        .nest_service("/static", static_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// 在已绑定的监听器上运行，Ctrl+C 时优雅退出
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::WebServerError(format!("获取监听地址失败: {}", e)))?;
    info!("Web服务器启动在 http://{}", addr);

    match axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        Ok(_) => info!("Web服务器已关闭"),
        Err(e) => {
            error!("Web服务器错误: {}", e);
            return Err(AppError::WebServerError(format!("Web服务器错误: {}", e)));
        }
    }

    Ok(())
}

/// 启动Web服务器
pub async fn start_web_server(config: &ServerConfig, store: SharedStore) -> Result<()> {
    let state = Arc::new(AppState::new(store, &config.web.static_dir));
    let app = create_app(state, config.web.enable_cors);
    info!(
        cors = config.web.enable_cors,
        static_dir = %config.web.static_dir,
        "路由已创建: /, /logs, /health, /static"
    );

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::WebServerError(format!("绑定地址失败 {}: {}", bind_addr, e)))?;

    serve(listener, app).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭Web服务器");
}
