use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{donations, projects, report, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Basic auth against the `users` table.
///
/// The authenticated `user::Model` is stored in the request extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = user::Entity::find_by_id(auth_header.username().to_string())
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("failed to load user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .filter(|user| user.password == auth_header.password())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let public = Router::new().route("/charity_project", get(projects::list));

    let authenticated = Router::new()
        .route(
            "/charity_project",
            axum::routing::post(projects::project_new),
        )
        .route(
            "/charity_project/{project_id}",
            patch(projects::update).delete(projects::delete),
        )
        .route(
            "/donation",
            get(donations::list).post(donations::donation_new),
        )
        .route("/donation/my", get(donations::mine))
        .route("/report", get(report::get))
        .route("/report/csv", get(report::export_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    public.merge(authenticated).with_state(state)
}

/// Build the application router, ready to be served or driven in tests.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, db)).await
}
