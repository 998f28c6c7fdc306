pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

/// Public read routes plus the bearer-protected `/api/admin` surface.
pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/posts", get(handlers::list_published_posts))
        .route("/api/posts/{slug}", get(handlers::get_published_post))
        .route("/api/tags", get(handlers::list_public_tags))
        .route("/api/pages/{slug}", get(handlers::get_published_page))
        .route("/api/nav-links", get(handlers::list_public_nav_links))
        .route("/api/social-links", get(handlers::list_public_social_links))
        .route("/api/travels", get(handlers::list_visited_countries))
        .route("/api/travels/wishlist", get(handlers::list_wishlist_countries))
        .route("/api/profile", get(handlers::get_profile))
        .route("/api/uploads/{file}", get(handlers::serve_upload))
        .route("/api/letterboxd", get(handlers::recent_films))
        .route("/api/rawg/search", get(handlers::search_games))
        .route("/api/rawg/games/{id}", get(handlers::game_details))
        .route("/api/auth/login", post(handlers::login))
        .nest("/api/admin", admin_routes(state.clone()))
        .with_state(state)
}

fn admin_routes(state: ApiState) -> Router<ApiState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/tags", post(handlers::create_tag))
        .route("/tags/{id}", delete(handlers::delete_tag))
        .route(
            "/pages",
            get(handlers::list_pages).post(handlers::create_page),
        )
        .route(
            "/pages/{id}",
            get(handlers::get_page)
                .put(handlers::update_page)
                .delete(handlers::delete_page),
        )
        .route(
            "/nav-links",
            get(handlers::list_nav_links).post(handlers::create_nav_link),
        )
        .route("/nav-links/reorder", put(handlers::reorder_nav_links))
        .route(
            "/nav-links/{id}",
            delete(handlers::delete_nav_link),
        )
        .route(
            "/social-links",
            get(handlers::list_social_links).post(handlers::create_social_link),
        )
        .route("/social-links/reorder", put(handlers::reorder_social_links))
        .route(
            "/social-links/{id}",
            delete(handlers::delete_social_link),
        )
        .route(
            "/travels",
            get(handlers::list_visited).post(handlers::add_visited),
        )
        .route(
            "/travels/wishlist",
            get(handlers::list_wishlist).post(handlers::add_wishlist),
        )
        .route(
            "/travels/wishlist/{id}",
            delete(handlers::delete_wishlist),
        )
        .route(
            "/travels/{id}",
            delete(handlers::delete_visited),
        )
        .route("/profile", put(handlers::update_profile))
        .route("/profile/photo", post(handlers::upload_profile_photo))
        .route("/password", put(handlers::change_password))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::admin_auth,
        ))
}
