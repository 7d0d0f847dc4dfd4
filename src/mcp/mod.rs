use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router,
    schemars::JsonSchema,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::diagrams;
use crate::growth::{self, ChurnReductionInput, FunnelInput, FunnelStageInput, ReferralInput};
use crate::metrics;
use crate::models::User;

#[derive(Clone)]
pub struct McpServer {
    db: Database,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserMetricsRequest {
    #[schemars(description = "Email of the user whose saved records to analyze")]
    pub user_email: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReferralGrowthRequest {
    #[schemars(description = "Users at the start")]
    pub initial_users: u64,
    #[schemars(description = "Growth multiplier applied each referral cycle")]
    pub multiplier: f64,
    #[schemars(description = "Number of referral cycles (at most 10)")]
    pub cycles: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FunnelStageRequest {
    #[schemars(description = "Stage name, e.g. Acquisition")]
    pub name: String,
    #[schemars(description = "Percentage of the previous stage reaching this one")]
    pub rate: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FunnelRequest {
    #[schemars(description = "Visitors entering the funnel")]
    pub visitors: u64,
    #[schemars(description = "Ordered funnel stages")]
    pub stages: Vec<FunnelStageRequest>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ChurnReductionRequest {
    #[schemars(description = "Current churn rate in percent")]
    pub base_churn_rate: f64,
    #[schemars(description = "Habit formation score, 0-100")]
    pub habit_score: f64,
    #[schemars(description = "Personalization score, 0-100")]
    pub personalization_score: f64,
    #[schemars(description = "Re-engagement score, 0-100")]
    pub reengagement_score: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiagramFlowRequest {
    #[schemars(description = "Diagram name: sql, auth or microservices")]
    pub diagram: String,
    #[schemars(description = "Flow name within the diagram")]
    pub flow: String,
}

impl McpServer {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            tool_router: Self::tool_router(),
        }
    }

    fn find_user(&self, email: &str) -> Result<User, McpError> {
        self.db
            .find_user_by_email(email)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?
            .ok_or_else(|| McpError::invalid_params(format!("Unknown user '{}'", email), None))
    }

    fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    fn invalid<E: std::fmt::Display>(err: E) -> McpError {
        McpError::invalid_params(err.to_string(), None)
    }
}

#[tool_router]
impl McpServer {
    #[tool(description = "Analyze a user's saved cohorts: retention rate per cohort, change versus the previous cohort and a recommendation")]
    async fn analyze_retention(
        &self,
        params: Parameters<UserMetricsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let user = self.find_user(&params.0.user_email)?;
        let cohorts = self
            .db
            .list_cohorts(user.id)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Self::json_result(&metrics::analyze_cohorts(&cohorts))
    }

    #[tool(description = "Analyze a user's saved DAU/MAU snapshots: stickiness ratio, change and recommendation")]
    async fn analyze_stickiness(
        &self,
        params: Parameters<UserMetricsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let user = self.find_user(&params.0.user_email)?;
        let snapshots = self
            .db
            .list_stickiness(user.id)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Self::json_result(&metrics::analyze_stickiness(&snapshots))
    }

    #[tool(description = "Project referral growth: total = initial_users * multiplier ^ cycles")]
    async fn referral_growth(
        &self,
        params: Parameters<ReferralGrowthRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let result = growth::referral_growth(&ReferralInput {
            initial_users: req.initial_users,
            multiplier: req.multiplier,
            cycles: req.cycles,
        })
        .map_err(Self::invalid)?;
        Self::json_result(&result)
    }

    #[tool(description = "Simulate a conversion funnel: each stage keeps rate% of the previous stage")]
    async fn simulate_funnel(
        &self,
        params: Parameters<FunnelRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let result = growth::simulate_funnel(&FunnelInput {
            visitors: req.visitors,
            stages: req
                .stages
                .into_iter()
                .map(|s| FunnelStageInput {
                    name: s.name,
                    rate: s.rate,
                })
                .collect(),
        })
        .map_err(Self::invalid)?;
        Self::json_result(&result)
    }

    #[tool(description = "Estimate churn after habit, personalization and re-engagement improvements")]
    async fn churn_reduction(
        &self,
        params: Parameters<ChurnReductionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let result = growth::churn_reduction(&ChurnReductionInput {
            base_churn_rate: req.base_churn_rate,
            habit_score: req.habit_score,
            personalization_score: req.personalization_score,
            reengagement_score: req.reengagement_score,
        })
        .map_err(Self::invalid)?;
        Self::json_result(&result)
    }

    #[tool(description = "Walk a tutorial diagram flow and list the edges it highlights")]
    async fn trace_diagram_flow(
        &self,
        params: Parameters<DiagramFlowRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let trace = diagrams::trace_flow(&req.diagram, &req.flow).map_err(Self::invalid)?;
        Self::json_result(&trace)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "pmkit MCP server: retention and stickiness analysis plus growth calculators for product managers".into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(db: Database) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(db);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
