use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use docshare::application::ports::document_repository::DocumentRepository;
use docshare::application::ports::user_repository::UserRepository;
use docshare::bootstrap::app_context::{AppContext, AppServices};
use docshare::bootstrap::config::{Config, StoreBackend};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            docshare::presentation::http::documents::list_documents,
            docshare::presentation::http::documents::create_document,
            docshare::presentation::http::documents::lookup_document,
            docshare::presentation::http::documents::get_document,
            docshare::presentation::http::documents::delete_document,
            docshare::presentation::http::sharing::list_role_assignments,
            docshare::presentation::http::sharing::grant_role,
            docshare::presentation::http::sharing::remove_role,
            docshare::presentation::http::health::health,
        ),
        components(schemas(
            docshare::presentation::http::documents::Document,
            docshare::presentation::http::documents::VisibleDocumentItem,
            docshare::presentation::http::documents::DocumentListResponse,
            docshare::presentation::http::documents::CreateDocumentRequest,
            docshare::presentation::http::sharing::RoleAssignmentItem,
            docshare::presentation::http::sharing::RoleChangeRequest,
            docshare::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Documents", description = "Documents management"),
            (name = "Sharing", description = "Role assignments on documents"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn allowed_methods() -> [http::Method; 4] {
    [
        http::Method::GET,
        http::Method::POST,
        http::Method::DELETE,
        http::Method::OPTIONS,
    ]
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(allowed_methods())
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // FRONTEND_URL is mandatory in production; deny everything if it is unusable
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "docshare=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(api_port = cfg.api_port, backend = ?cfg.store_backend, "Starting docshare API");

    let (document_repo, user_repo): (Arc<dyn DocumentRepository>, Arc<dyn UserRepository>) =
        match cfg.store_backend {
            StoreBackend::Postgres => {
                let pool = docshare::infrastructure::db::connect_pool(&cfg.database_url).await?;
                docshare::infrastructure::db::migrate(&pool).await?;
                let documents: Arc<dyn DocumentRepository> = Arc::new(
                    docshare::infrastructure::db::repositories::document_repository_sqlx::SqlxDocumentRepository::new(
                        pool.clone(),
                    ),
                );
                let users: Arc<dyn UserRepository> = Arc::new(
                    docshare::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
                        pool,
                    ),
                );
                (documents, users)
            }
            StoreBackend::Memory => {
                tracing::warn!("memory_store_enabled_data_is_not_persisted");
                let documents: Arc<dyn DocumentRepository> =
                    Arc::new(docshare::infrastructure::memory::MemoryDocumentRepository::default());
                let users: Arc<dyn UserRepository> =
                    Arc::new(docshare::infrastructure::memory::MemoryUserRepository::default());
                (documents, users)
            }
        };

    let services = AppServices::new(document_repo, user_repo);
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest("/api", docshare::presentation::http::health::routes(ctx.clone()))
        .nest("/api", docshare::presentation::http::documents::routes(ctx.clone()))
        .nest("/api", docshare::presentation::http::sharing::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown_signal_received");
        })
        .await?;
    Ok(())
}
