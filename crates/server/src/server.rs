use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{expenses, products, suppliers, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Resolves the Basic credentials to a user and hands it, with its store, to
/// the handlers.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("failed to load user: {err}");
            StatusCode::UNAUTHORIZED
        })?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expenses", post(expenses::create))
        .route("/expenses/{id}", get(expenses::get).patch(expenses::update))
        .route("/expenses/{id}/items", post(expenses::item_create))
        .route(
            "/expenses/{id}/items/{item_id}",
            patch(expenses::item_update).delete(expenses::item_delete),
        )
        .route("/products/{id}", get(products::get))
        .route("/suppliers/{id}", get(suppliers::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    const STORE: &str = "store-1";

    struct Harness {
        router: Router,
        engine: Arc<Engine>,
        supplier: Uuid,
        product: Uuid,
    }

    async fn harness() -> Harness {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        for (username, store) in [("alice", STORE), ("mallory", "store-2")] {
            db.execute(Statement::from_sql_and_values(
                backend,
                "INSERT INTO users (username, password, store_id) VALUES (?, ?, ?)",
                vec![username.into(), "secret".into(), store.into()],
            ))
            .await
            .unwrap();
        }

        let engine = Arc::new(
            Engine::builder()
                .database(db.clone())
                .build()
                .await
                .unwrap(),
        );
        let supplier = engine.new_supplier(STORE, "Fresh Farms").await.unwrap();
        let product = engine.new_product(STORE, "Flour", 10).await.unwrap();
        let state = ServerState {
            engine: engine.clone(),
            db,
        };
        Harness {
            router: router(state),
            engine,
            supplier,
            product,
        }
    }

    fn basic(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        user: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic(user, "secret"));
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn missing_or_wrong_credentials_are_rejected() {
        let h = harness().await;
        let uri = format!("/products/{}", h.product);

        let request = Request::builder().uri(&uri).body(Body::empty()).unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();
        assert_ne!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri(&uri)
            .header(header::AUTHORIZATION, basic("alice", "wrong"))
            .body(Body::empty())
            .unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expense_item_flow_over_http() {
        let h = harness().await;

        let (status, body) = send(
            &h.router,
            Method::POST,
            "/expenses",
            "alice",
            Some(json!({ "supplier_id": h.supplier, "payer_id": "bob" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let expense_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &h.router,
            Method::POST,
            &format!("/expenses/{expense_id}/items"),
            "alice",
            Some(json!({ "product_id": h.product, "quantity": 2, "price_minor": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let item_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &h.router,
            Method::PATCH,
            &format!("/expenses/{expense_id}/items/{item_id}"),
            "alice",
            Some(json!({ "is_arrived": true, "arrival_date": "2026-10-05" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount_minor"], 200);
        assert_eq!(body["items"][0]["is_arrived"], true);

        let (status, body) = send(
            &h.router,
            Method::GET,
            &format!("/products/{}", h.product),
            "alice",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stock"], 12);

        let (status, body) = send(
            &h.router,
            Method::PATCH,
            &format!("/expenses/{expense_id}/items/{item_id}"),
            "alice",
            Some(json!({ "price_minor": 150 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("price"));

        let (status, _) = send(
            &h.router,
            Method::DELETE,
            &format!("/expenses/{expense_id}/items/{item_id}"),
            "alice",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &h.router,
            Method::PATCH,
            &format!("/expenses/{expense_id}"),
            "alice",
            Some(json!({ "is_reimbursed": true, "reimbursed_at": "2026-10-06T12:00:00Z" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_reimbursed"], true);
    }

    #[tokio::test]
    async fn invalid_input_maps_to_422() {
        let h = harness().await;
        let expense_id = h
            .engine
            .create_expense(engine::CreateExpenseCmd::new(STORE, "alice", h.supplier))
            .await
            .unwrap();

        let (status, body) = send(
            &h.router,
            Method::POST,
            &format!("/expenses/{expense_id}/items"),
            "alice",
            Some(json!({
                "product_id": h.product,
                "quantity": 1,
                "price_minor": 100,
                "is_arrived": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("arrival_date"));
    }

    #[tokio::test]
    async fn other_store_sees_not_found() {
        let h = harness().await;
        let expense_id = h
            .engine
            .create_expense(engine::CreateExpenseCmd::new(STORE, "alice", h.supplier))
            .await
            .unwrap();

        let (status, _) = send(
            &h.router,
            Method::GET,
            &format!("/expenses/{expense_id}"),
            "mallory",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &h.router,
            Method::GET,
            &format!("/products/{}", h.product),
            "mallory",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn supplier_is_scoped_to_the_callers_store() {
        let h = harness().await;
        let uri = format!("/suppliers/{}", h.supplier);

        let (status, body) = send(&h.router, Method::GET, &uri, "alice", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Fresh Farms");
        assert_eq!(body["id"], h.supplier.to_string());

        let (status, _) = send(&h.router, Method::GET, &uri, "mallory", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &h.router,
            Method::GET,
            &format!("/suppliers/{}", Uuid::new_v4()),
            "alice",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_over_a_bound_listener() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(run_with_listener(engine, db, listener));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET /products/{} HTTP/1.1\r\nHost: {addr}\r\nAuthorization: {}\r\nConnection: close\r\n\r\n",
            Uuid::new_v4(),
            basic("nobody", "secret"),
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 401"), "{response}");

        server.abort();
    }
}
