//! Customer route configuration.
//!
//! One router value describes the whole group; the top-level router nests it
//! under both mount prefixes, so the prefixes cannot drift apart.

use crate::api::handlers::{
    delete_customer_handler, get_customer_handler, list_customers_handler, login_handler,
    logout_handler, me_handler, register_handler, update_customer_handler,
};
use crate::api::middleware::{auth, rate_limit};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// The customer route group.
///
/// # Endpoints
///
/// - `POST   /register` - Create an account and open a session
/// - `POST   /login`    - Authenticate (wrapped by the login rate limiter)
/// - `GET    /logout`   - Clear the session cookie
/// - `GET    /me`       - Current account (session required)
/// - `GET    /`         - List accounts (admin only)
/// - `GET    /{id}`     - Fetch an account (self or admin)
/// - `PUT    /{id}`     - Update an account (self or admin)
/// - `DELETE /{id}`     - Delete an account (self or admin)
pub fn customer_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register_handler))
        .route(
            "/login",
            post(login_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::login_admission,
            )),
        )
        .route("/logout", get(logout_handler));

    let protected = Router::new()
        .route("/", get(list_customers_handler))
        .route("/me", get(me_handler))
        .route(
            "/{id}",
            get(get_customer_handler)
                .put(update_customer_handler)
                .delete(delete_customer_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::layer));

    public.merge(protected)
}
