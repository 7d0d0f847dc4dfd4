use axum::Json;

use super::ApiResult;
use crate::metrics::{self, MetricAnalysis, RetentionSample, StickinessSample};

pub async fn analyze_retention(
    Json(samples): Json<Vec<RetentionSample>>,
) -> ApiResult<Json<MetricAnalysis>> {
    for sample in &samples {
        sample.validate()?;
    }
    Ok(Json(metrics::analyze_cohorts(&samples)))
}

pub async fn analyze_stickiness(
    Json(samples): Json<Vec<StickinessSample>>,
) -> ApiResult<Json<MetricAnalysis>> {
    for sample in &samples {
        sample.validate()?;
    }
    Ok(Json(metrics::analyze_stickiness(&samples)))
}
