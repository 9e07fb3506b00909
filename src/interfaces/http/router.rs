//! API router with Swagger documentation

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    AdminService, AvailabilityResolver, BookingAdmission, GuestService, UserService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::{JwtConfig, TokenRevocations};
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{
    admin_middleware, auth_middleware, optional_auth_middleware, staff_middleware, AuthState,
};
use crate::interfaces::http::modules::{
    admin::{self, AdminState},
    auth::{self, AuthHandlerState},
    bookings::{self, BookingState},
    guest::{self, GuestState},
    health::{self, HealthState},
    metrics::{http_metrics_middleware, prometheus_metrics, MetricsState},
    request_id::request_id_middleware,
    rooms::{self, RoomState},
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "Room listing, booking admission and booking administration",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Rooms", description = "Public room categories"),
        (name = "Bookings", description = "Booking submission"),
        (name = "Guest", description = "Signed-in guest's bookings"),
        (name = "Admin", description = "Booking dashboard and room maintenance"),
        (name = "Authentication", description = "Login, registration and logout")
    ),
    paths(
        // Health
        health::health_check,
        // Rooms
        rooms::list_categories,
        rooms::list_rooms,
        rooms::create_room,
        rooms::update_room,
        // Bookings
        bookings::create_booking,
        bookings::booking_confirmation,
        // Guest
        guest::my_bookings,
        // Admin
        admin::get_dashboard,
        admin::export_csv,
        admin::mark_paid,
        admin::delete_booking,
        // Authentication
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::logout,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            rooms::RoomCategoryDto,
            rooms::RoomDto,
            rooms::CreateRoomRequest,
            rooms::UpdateRoomRequest,
            bookings::BookingForm,
            bookings::BookingDto,
            bookings::ConfirmationResponse,
            admin::DashboardMetricsDto,
            admin::DashboardResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Everything the router needs to build its handler states
pub struct ApiContext {
    pub repos: Arc<dyn RepositoryProvider>,
    /// `None` in in-memory mode
    pub db: Option<DatabaseConnection>,
    pub jwt_config: JwtConfig,
    pub revocations: Arc<TokenRevocations>,
    pub users: Arc<UserService>,
    pub max_nights: u32,
    pub confirmation_path: String,
    pub prometheus: Option<PrometheusHandle>,
}

/// Create the HTTP router
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
        revocations: ctx.revocations.clone(),
    };

    let admin_service = Arc::new(AdminService::new(ctx.repos.clone()));

    let health_state = HealthState {
        db: ctx.db.clone(),
        started_at: Arc::new(Instant::now()),
    };
    let room_state = RoomState {
        availability: Arc::new(AvailabilityResolver::new(ctx.repos.clone())),
        admin: admin_service.clone(),
    };
    let booking_state = BookingState {
        admission: Arc::new(BookingAdmission::new(ctx.repos.clone(), ctx.max_nights)),
        confirmation_path: Arc::from(ctx.confirmation_path.as_str()),
    };
    let guest_state = GuestState {
        guest: Arc::new(GuestService::new(ctx.repos.clone())),
    };
    let admin_state = AdminState {
        admin: admin_service,
    };
    let auth_handler_state = AuthHandlerState {
        users: ctx.users.clone(),
    };

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let public_room_routes = Router::new()
        .route("/api/v1/rooms/categories", get(rooms::list_categories))
        .with_state(room_state.clone());

    // Bookings may be anonymous; a valid token links them to the account
    let booking_routes = Router::new()
        .route("/api/v1/bookings", post(bookings::create_booking))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            optional_auth_middleware,
        ))
        .with_state(booking_state)
        .route(&ctx.confirmation_path, get(bookings::booking_confirmation));

    let guest_routes = Router::new()
        .route("/api/v1/me/bookings", get(guest::my_bookings))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            optional_auth_middleware,
        ))
        .with_state(guest_state);

    let public_auth_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .with_state(auth_handler_state.clone());

    let protected_auth_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::get_current_user))
        .route("/api/v1/auth/logout", post(auth::logout))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    // Staff and admins; the auth layer is outermost so it runs first
    let admin_booking_routes = Router::new()
        .route("/api/v1/admin/bookings", get(admin::get_dashboard))
        .route("/api/v1/admin/bookings/export.csv", get(admin::export_csv))
        .route("/api/v1/admin/bookings/{id}/mark-paid", post(admin::mark_paid))
        .route("/api/v1/admin/bookings/{id}", delete(admin::delete_booking))
        .layer(middleware::from_fn(staff_middleware))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(admin_state);

    let admin_room_routes = Router::new()
        .route(
            "/api/v1/admin/rooms",
            get(rooms::list_rooms).post(rooms::create_room),
        )
        .route("/api/v1/admin/rooms/{id}", put(rooms::update_room))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(room_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(public_room_routes)
        .merge(booking_routes)
        .merge(guest_routes)
        .merge(public_auth_routes)
        .merge(protected_auth_routes)
        .merge(admin_booking_routes)
        .merge(admin_room_routes);

    if let Some(handle) = ctx.prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{Duration, Local, NaiveDate};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::domain::{Room, UserRole};
    use crate::infrastructure::crypto::{create_token, JwtConfig};
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::Money;

    const SECRET: &str = "router-test-secret";

    fn room(id: i32, name: &str, price: i64) -> Room {
        Room {
            id,
            name: name.into(),
            description: format!("{} room", name),
            price_per_night: Money::from_major(price),
            image_url: None,
        }
    }

    fn app_with(repos: Arc<InMemoryRepositoryProvider>) -> Router {
        let jwt_config = JwtConfig::new(SECRET, 1);
        let revocations = Arc::new(TokenRevocations::new());
        let users = Arc::new(
            UserService::new(repos.clone(), jwt_config.clone(), revocations.clone())
                .with_bcrypt_cost(crate::infrastructure::crypto::password::MIN_COST),
        );
        create_api_router(ApiContext {
            repos,
            db: None,
            jwt_config,
            revocations,
            users,
            max_nights: 30,
            confirmation_path: "/reserva-confirmada".to_string(),
            prometheus: None,
        })
    }

    fn app() -> (Router, Arc<InMemoryRepositoryProvider>) {
        let repos = Arc::new(InMemoryRepositoryProvider::with_rooms([
            room(1, "Doble", 75),
            room(2, "Doble", 75),
            room(3, "Suite", 200),
        ]));
        (app_with(repos.clone()), repos)
    }

    fn token(role: UserRole) -> String {
        let (token, _) =
            create_token("u-1", "someone", role, &JwtConfig::new(SECRET, 1)).unwrap();
        token
    }

    fn day(offset: i64) -> NaiveDate {
        Local::now().date_naive() + Duration::days(offset)
    }

    fn booking_form(room_id: i32, check_in: NaiveDate, check_out: NaiveDate) -> String {
        format!(
            "room_id={}&check_in={}&check_out={}&client_name=Ana&client_email=ana%40example.com&price=150.00",
            room_id, check_in, check_out
        )
    }

    fn post_form(uri: &str, body: String) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_in_memory_store() {
        let (app, _) = app();
        let response = app.oneshot(get_with("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json_body(response).await;
        assert_eq!(body["database"]["status"], "in-memory");
    }

    #[tokio::test]
    async fn categories_are_grouped_by_name() {
        let (app, _) = app();
        let response = app
            .oneshot(get_with("/api/v1/rooms/categories", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let categories = body["data"].as_array().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["name"], "Doble");
        assert_eq!(categories[0]["available_count"], 2);
        assert_eq!(categories[0]["first_available_id"], 1);
        assert_eq!(categories[1]["name"], "Suite");
    }

    #[tokio::test]
    async fn booking_redirects_then_conflicts() {
        let (app, repos) = app();

        let response = app
            .clone()
            .oneshot(post_form("/api/v1/bookings", booking_form(1, day(30), day(32))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/reserva-confirmada"
        );
        assert_eq!(repos.booking_count(), 1);

        let response = app
            .clone()
            .oneshot(post_form("/api/v1/bookings", booking_form(1, day(31), day(33))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(repos.booking_count(), 1);

        // Back-to-back stay is fine
        let response = app
            .oneshot(post_form("/api/v1/bookings", booking_form(1, day(32), day(34))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(repos.booking_count(), 2);
    }

    #[tokio::test]
    async fn confirmation_page_is_served() {
        let (app, _) = app();
        let response = app
            .oneshot(get_with("/reserva-confirmada", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_booking_input_is_rejected() {
        let (app, repos) = app();

        let bad_email = format!(
            "room_id=1&check_in={}&check_out={}&client_name=Ana&client_email=not-an-email",
            day(30),
            day(32)
        );
        let response = app
            .clone()
            .oneshot(post_form("/api/v1/bookings", bad_email))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let inverted = booking_form(1, day(32), day(30));
        let response = app
            .clone()
            .oneshot(post_form("/api/v1/bookings", inverted))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .oneshot(post_form("/api/v1/bookings", booking_form(99, day(30), day(32))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(repos.booking_count(), 0);
    }

    #[tokio::test]
    async fn guest_bookings_require_sign_in() {
        let (app, _) = app();
        let response = app
            .oneshot(get_with("/api/v1/me/bookings", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn signed_in_booking_shows_on_guest_dashboard() {
        let (app, _) = app();
        let guest = token(UserRole::Guest);

        let mut request = post_form("/api/v1/bookings", booking_form(3, day(40), day(41)));
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", guest).parse().unwrap(),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(get_with("/api/v1/me/bookings", Some(&guest)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let mine = body["data"].as_array().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["room_id"], 3);
        assert_eq!(mine[0]["status"], "pendiente");
        // Server-side price: one Suite night
        assert_eq!(mine[0]["total_price"], "200.00");
    }

    #[tokio::test]
    async fn admin_routes_check_roles() {
        let (app, _) = app();

        let response = app
            .clone()
            .oneshot(get_with("/api/v1/admin/bookings", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(get_with(
                "/api/v1/admin/bookings",
                Some(&token(UserRole::Guest)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(get_with(
                "/api/v1/admin/bookings",
                Some(&token(UserRole::Staff)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Room maintenance is admin only
        let response = app
            .oneshot(get_with(
                "/api/v1/admin/rooms",
                Some(&token(UserRole::Staff)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn dashboard_mark_paid_and_export() {
        let (app, _) = app();
        let admin = token(UserRole::Admin);

        app.clone()
            .oneshot(post_form("/api/v1/bookings", booking_form(1, day(30), day(32))))
            .await
            .unwrap();

        let body = json_body(
            app.clone()
                .oneshot(get_with("/api/v1/admin/bookings", Some(&admin)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["metrics"]["booking_count"], 1);
        assert_eq!(body["data"]["metrics"]["pending_count"], 1);
        // Revenue counts every booking, paid or not
        assert_eq!(body["data"]["metrics"]["total_revenue"], "150.00");
        let id = body["data"]["bookings"][0]["id"].as_i64().unwrap();

        let request = Request::post(format!("/api/v1/admin/bookings/{}/mark-paid", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(
            app.clone()
                .oneshot(get_with("/api/v1/admin/bookings", Some(&admin)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["metrics"]["pending_count"], 0);
        assert_eq!(body["data"]["metrics"]["total_revenue"], "150.00");

        let response = app
            .oneshot(get_with(
                "/api/v1/admin/bookings/export.csv",
                Some(&admin),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("reservas.csv"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("Doble"));
        assert!(csv.contains("pagado"));
    }

    #[tokio::test]
    async fn delete_unknown_booking_is_ok() {
        let (app, _) = app();
        let request = Request::delete("/api/v1/admin/bookings/999")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token(UserRole::Staff)),
            )
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_creates_and_updates_rooms() {
        let (app, _) = app();
        let admin = token(UserRole::Admin);

        let mut request = post_json(
            "/api/v1/admin/rooms",
            serde_json::json!({
                "name": "Individual",
                "description": "Single bed",
                "price_per_night": "49.90"
            }),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", admin).parse().unwrap(),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["data"]["price_per_night"], "49.90");

        let request = Request::put("/api/v1/admin/rooms/42")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"price_per_night":"80.00"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn register_login_me_and_logout() {
        let (app, _) = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/register",
                serde_json::json!({
                    "username": "marta",
                    "email": "marta@example.com",
                    "password": "s3cret-pass"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/login",
                serde_json::json!({ "username": "marta", "password": "s3cret-pass" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["user"]["role"], "guest");

        let response = app
            .clone()
            .oneshot(get_with("/api/v1/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::post("/api/v1/auth/logout")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_with("/api/v1/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                serde_json::json!({ "username": "nobody", "password": "whatever" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _) = app();
        let response = app
            .oneshot(get_with("/api-doc/openapi.json", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["paths"]["/api/v1/bookings"].is_object());
    }
}
