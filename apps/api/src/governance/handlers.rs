use axum::Json;
use serde::{Deserialize, Serialize};

use super::heuristics::{contains_quantifiable_claim, hallucination_risk};
use super::HALLUCINATION_RISK_THRESHOLD;
use crate::auth::CallerIdentity;

#[derive(Deserialize)]
pub struct RiskRequest {
    pub original: String,
    pub generated: String,
}

#[derive(Debug, Serialize)]
pub struct RiskResponse {
    pub hallucination_risk: f64,
    pub exceeds_threshold: bool,
    pub quantifiable_claim: bool,
}

/// POST /api/v1/governance/risk
pub async fn handle_risk(_caller: CallerIdentity, Json(req): Json<RiskRequest>) -> Json<RiskResponse> {
    let risk = hallucination_risk(&req.original, &req.generated);
    Json(RiskResponse {
        hallucination_risk: risk,
        exceeds_threshold: risk >= HALLUCINATION_RISK_THRESHOLD,
        quantifiable_claim: contains_quantifiable_claim(&req.generated),
    })
}
