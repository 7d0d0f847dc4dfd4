use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use super::{ApiError, ApiResult};
use crate::diagrams::{self, Diagram, DiagramError, FlowTrace, DIAGRAMS};

#[derive(Debug, Serialize)]
pub struct DiagramSummary {
    pub name: &'static str,
    pub title: &'static str,
    pub flows: Vec<&'static str>,
}

pub async fn list_diagrams() -> Json<Vec<DiagramSummary>> {
    Json(
        DIAGRAMS
            .iter()
            .map(|d| DiagramSummary {
                name: d.name,
                title: d.title,
                flows: d.flows.iter().map(|f| f.name).collect(),
            })
            .collect(),
    )
}

pub async fn get_diagram(Path(name): Path<String>) -> ApiResult<Json<&'static Diagram>> {
    diagrams::find_diagram(&name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(DiagramError::UnknownDiagram(name).to_string()))
}

pub async fn trace_flow(
    Path((name, flow)): Path<(String, String)>,
) -> ApiResult<Json<FlowTrace>> {
    diagrams::trace_flow(&name, &flow).map(Json).map_err(|err| match err {
        DiagramError::UnknownDiagram(_) | DiagramError::UnknownFlow { .. } => {
            ApiError::NotFound(err.to_string())
        }
        _ => ApiError::Internal(err.into()),
    })
}
