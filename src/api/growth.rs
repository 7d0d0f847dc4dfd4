use axum::Json;

use super::ApiResult;
use crate::growth::{
    self, AbTestInput, AbTestResult, ActivationInput, ActivationResult, ChurnReductionInput,
    ChurnReductionResult, FunnelInput, FunnelResult, ReferralInput, ReferralResult,
    RetentionCurveInput, RetentionPeriod, ViralLoopInput, ViralLoopResult,
};

pub async fn referral(Json(input): Json<ReferralInput>) -> ApiResult<Json<ReferralResult>> {
    Ok(Json(growth::referral_growth(&input)?))
}

pub async fn viral_loop(Json(input): Json<ViralLoopInput>) -> ApiResult<Json<ViralLoopResult>> {
    Ok(Json(growth::viral_loop(&input)?))
}

pub async fn funnel(Json(input): Json<FunnelInput>) -> ApiResult<Json<FunnelResult>> {
    Ok(Json(growth::simulate_funnel(&input)?))
}

pub async fn retention_curve(
    Json(input): Json<RetentionCurveInput>,
) -> ApiResult<Json<Vec<RetentionPeriod>>> {
    Ok(Json(growth::retention_curve(&input)?))
}

pub async fn churn_reduction(
    Json(input): Json<ChurnReductionInput>,
) -> ApiResult<Json<ChurnReductionResult>> {
    Ok(Json(growth::churn_reduction(&input)?))
}

pub async fn activation(Json(input): Json<ActivationInput>) -> ApiResult<Json<ActivationResult>> {
    Ok(Json(growth::activation_rate(&input)?))
}

pub async fn ab_test(Json(input): Json<AbTestInput>) -> ApiResult<Json<AbTestResult>> {
    Ok(Json(growth::simulate_ab_test(&input)?))
}
