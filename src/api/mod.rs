//! JSON HTTP API.
//!
//! Every record route acts on behalf of the user named in the `x-user-email`
//! header; the calculators, diagrams and simulations are public.

mod cohorts;
mod diagrams;
mod documents;
mod error;
mod growth;
mod metrics;
mod roadmaps;
mod simulations;
mod stickiness;
mod users;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::automation::SimulationRegistry;
use crate::config::ServerConfig;
use crate::db::Database;
use crate::models::{Prd, UatForm};

pub use error::{ApiError, ApiResult};
pub use users::{ActingUser, USER_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub simulations: SimulationRegistry,
}

impl AppState {
    pub fn new(db: Database, config: &ServerConfig) -> Self {
        Self {
            db,
            simulations: SimulationRegistry::new(config.simulation_step),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // Users
        .route("/api/users", post(users::register_user))
        .route("/api/users/me", get(users::current_user))
        // Cohort dashboard
        .route(
            "/api/cohorts",
            get(cohorts::list_cohorts).post(cohorts::create_cohort),
        )
        .route("/api/cohorts/analysis", get(cohorts::cohort_analysis))
        .route(
            "/api/cohorts/{id}",
            get(cohorts::get_cohort)
                .put(cohorts::update_cohort)
                .delete(cohorts::delete_cohort),
        )
        // Stickiness dashboard
        .route(
            "/api/stickiness",
            get(stickiness::list_stickiness).post(stickiness::create_stickiness),
        )
        .route("/api/stickiness/analysis", get(stickiness::stickiness_analysis))
        .route(
            "/api/stickiness/{id}",
            get(stickiness::get_stickiness)
                .put(stickiness::update_stickiness)
                .delete(stickiness::delete_stickiness),
        )
        // Documents
        .route(
            "/api/prds",
            get(documents::list_documents::<Prd>).post(documents::create_document::<Prd>),
        )
        .route(
            "/api/prds/{id}",
            get(documents::get_document::<Prd>)
                .put(documents::update_document::<Prd>)
                .delete(documents::delete_document::<Prd>),
        )
        .route("/api/prds/{id}/export", get(documents::export::<Prd>))
        .route(
            "/api/uat-forms",
            get(documents::list_documents::<UatForm>)
                .post(documents::create_document::<UatForm>),
        )
        .route(
            "/api/uat-forms/{id}",
            get(documents::get_document::<UatForm>)
                .put(documents::update_document::<UatForm>)
                .delete(documents::delete_document::<UatForm>),
        )
        .route("/api/uat-forms/{id}/export", get(documents::export::<UatForm>))
        // Roadmaps
        .route(
            "/api/roadmaps",
            get(roadmaps::list_roadmaps).post(roadmaps::create_roadmap),
        )
        .route(
            "/api/roadmaps/{id}",
            get(roadmaps::get_roadmap)
                .put(roadmaps::update_roadmap)
                .delete(roadmaps::delete_roadmap),
        )
        // Stateless analysis
        .route("/api/metrics/retention", post(metrics::analyze_retention))
        .route("/api/metrics/stickiness", post(metrics::analyze_stickiness))
        // Growth calculators
        .route("/api/growth/referral", post(growth::referral))
        .route("/api/growth/viral-loop", post(growth::viral_loop))
        .route("/api/growth/funnel", post(growth::funnel))
        .route("/api/growth/retention-curve", post(growth::retention_curve))
        .route("/api/growth/churn-reduction", post(growth::churn_reduction))
        .route("/api/growth/activation", post(growth::activation))
        .route("/api/growth/ab-test", post(growth::ab_test))
        // Automation simulations
        .route("/api/simulations/scenarios", get(simulations::list_scenarios))
        .route(
            "/api/simulations",
            get(simulations::list_runs).post(simulations::start_run),
        )
        .route("/api/simulations/{id}", get(simulations::get_run))
        // Tutorial diagrams
        .route("/api/diagrams", get(diagrams::list_diagrams))
        .route("/api/diagrams/{name}", get(diagrams::get_diagram))
        .route("/api/diagrams/{name}/flows/{flow}", get(diagrams::trace_flow))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
