//! Route definitions for Enterprises domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{enterprises, groups, managers};
use super::middleware::EnterprisesState;

/// Create enterprise management routes
fn enterprise_routes() -> Router<EnterprisesState> {
    Router::new()
        .route(
            "/admin/enterprises",
            get(enterprises::list_enterprises).post(enterprises::create_enterprise),
        )
        .route(
            "/admin/enterprises/{id}",
            get(enterprises::get_enterprise)
                .patch(enterprises::update_enterprise)
                .delete(enterprises::delete_enterprise),
        )
}

/// Create enterprise manager routes
fn manager_routes() -> Router<EnterprisesState> {
    Router::new()
        .route(
            "/admin/enterprises/{id}/managers",
            get(managers::list_managers).post(managers::add_manager),
        )
        .route(
            "/admin/enterprises/{id}/managers/{user_id}",
            delete(managers::remove_manager),
        )
}

/// Create enterprise group routes
fn group_routes() -> Router<EnterprisesState> {
    Router::new()
        .route(
            "/admin/enterprise_groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            "/admin/enterprise_groups/{id}",
            get(groups::get_group)
                .patch(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/admin/enterprise_groups/{id}/move_up", post(groups::move_up))
        .route(
            "/admin/enterprise_groups/{id}/move_down",
            post(groups::move_down),
        )
}

/// Create all Enterprises domain API routes
pub fn routes() -> Router<EnterprisesState> {
    Router::new()
        .merge(enterprise_routes())
        .merge(manager_routes())
        .merge(group_routes())
}
