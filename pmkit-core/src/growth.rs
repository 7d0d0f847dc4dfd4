//! Growth teaching formulas.
//!
//! Each calculator is a closed-form formula over a handful of inputs. The
//! heuristic weights (churn reduction, activation) are illustrative teaching
//! constants, not fitted models.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_CYCLES: u32 = 10;
pub const MAX_RETENTION_PERIODS: u32 = 24;
pub const MAX_AB_SAMPLE: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrowthError {
    #[error("{field} must be {constraint}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
    },

    #[error("a funnel needs at least one stage")]
    EmptyFunnel,
}

fn check_percent(field: &'static str, value: f64) -> Result<(), GrowthError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(GrowthError::OutOfRange {
            field,
            constraint: "between 0 and 100",
        });
    }
    Ok(())
}

fn check_cycles(cycles: u32) -> Result<(), GrowthError> {
    if cycles > MAX_CYCLES {
        return Err(GrowthError::OutOfRange {
            field: "cycles",
            constraint: "at most 10",
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Referral growth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReferralInput {
    pub initial_users: u64,
    pub multiplier: f64,
    pub cycles: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GrowthCycle {
    pub cycle: u32,
    pub users: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferralResult {
    pub total_users: f64,
    pub series: Vec<GrowthCycle>,
}

/// `total = initial × multiplier^cycles`.
pub fn referral_growth(input: &ReferralInput) -> Result<ReferralResult, GrowthError> {
    check_cycles(input.cycles)?;
    if !input.multiplier.is_finite() || input.multiplier < 0.0 {
        return Err(GrowthError::OutOfRange {
            field: "multiplier",
            constraint: "a non-negative number",
        });
    }

    let initial = input.initial_users as f64;
    let series: Vec<GrowthCycle> = (0..=input.cycles)
        .map(|cycle| GrowthCycle {
            cycle,
            users: initial * input.multiplier.powi(cycle as i32),
        })
        .collect();
    let total_users = initial * input.multiplier.powi(input.cycles as i32);

    Ok(ReferralResult {
        total_users,
        series,
    })
}

// ---------------------------------------------------------------------------
// Viral loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViralLoopInput {
    pub initial_users: u64,
    pub invites_per_user: f64,
    /// Percentage of invites that sign up.
    pub conversion_rate: f64,
    pub cycles: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViralCycle {
    pub cycle: u32,
    pub new_users: f64,
    pub total_users: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViralLoopResult {
    pub k_factor: f64,
    pub is_viral: bool,
    pub total_users: f64,
    pub cycles: Vec<ViralCycle>,
}

pub fn viral_loop(input: &ViralLoopInput) -> Result<ViralLoopResult, GrowthError> {
    check_cycles(input.cycles)?;
    check_percent("conversion_rate", input.conversion_rate)?;
    if !input.invites_per_user.is_finite() || input.invites_per_user < 0.0 {
        return Err(GrowthError::OutOfRange {
            field: "invites_per_user",
            constraint: "a non-negative number",
        });
    }

    let k_factor = input.invites_per_user * input.conversion_rate / 100.0;
    let mut new_users = input.initial_users as f64;
    let mut total_users = new_users;
    let mut cycles = vec![ViralCycle {
        cycle: 0,
        new_users,
        total_users,
    }];
    for cycle in 1..=input.cycles {
        new_users *= k_factor;
        total_users += new_users;
        cycles.push(ViralCycle {
            cycle,
            new_users,
            total_users,
        });
    }

    Ok(ViralLoopResult {
        k_factor,
        is_viral: k_factor > 1.0,
        total_users,
        cycles,
    })
}

// ---------------------------------------------------------------------------
// Funnel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelStageInput {
    pub name: String,
    /// Percentage of the previous stage that reaches this one.
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelInput {
    pub visitors: u64,
    pub stages: Vec<FunnelStageInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelStage {
    pub name: String,
    pub rate: f64,
    pub users: u64,
    pub dropped: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelResult {
    pub visitors: u64,
    pub stages: Vec<FunnelStage>,
    pub overall_conversion: f64,
}

/// `stage_n = round(stage_(n-1) × rate_n / 100)`.
pub fn simulate_funnel(input: &FunnelInput) -> Result<FunnelResult, GrowthError> {
    if input.stages.is_empty() {
        return Err(GrowthError::EmptyFunnel);
    }
    for stage in &input.stages {
        check_percent("rate", stage.rate)?;
    }

    let mut previous = input.visitors;
    let mut stages = Vec::with_capacity(input.stages.len());
    for stage in &input.stages {
        let users = (previous as f64 * stage.rate / 100.0).round() as u64;
        stages.push(FunnelStage {
            name: stage.name.clone(),
            rate: stage.rate,
            users,
            dropped: previous.saturating_sub(users),
        });
        previous = users;
    }

    let overall_conversion = if input.visitors == 0 {
        0.0
    } else {
        previous as f64 / input.visitors as f64 * 100.0
    };

    Ok(FunnelResult {
        visitors: input.visitors,
        stages,
        overall_conversion,
    })
}

// ---------------------------------------------------------------------------
// Retention slider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetentionCurveInput {
    pub users: u64,
    /// Percentage of remaining users lost each period.
    pub churn_rate: f64,
    pub periods: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RetentionPeriod {
    pub period: u32,
    pub retained_users: u64,
    pub retention_rate: f64,
}

pub fn retention_curve(input: &RetentionCurveInput) -> Result<Vec<RetentionPeriod>, GrowthError> {
    check_percent("churn_rate", input.churn_rate)?;
    if input.periods > MAX_RETENTION_PERIODS {
        return Err(GrowthError::OutOfRange {
            field: "periods",
            constraint: "at most 24",
        });
    }

    let keep = 1.0 - input.churn_rate / 100.0;
    Ok((0..=input.periods)
        .map(|period| {
            let share = keep.powi(period as i32);
            RetentionPeriod {
                period,
                retained_users: (input.users as f64 * share).round() as u64,
                retention_rate: share * 100.0,
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Churn reduction heuristic
// ---------------------------------------------------------------------------

const HABIT_WEIGHT: f64 = 0.40;
const PERSONALIZATION_WEIGHT: f64 = 0.35;
const REENGAGEMENT_WEIGHT: f64 = 0.25;
/// Share of the base churn a perfect score can remove.
const MAX_CHURN_REDUCTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChurnReductionInput {
    pub base_churn_rate: f64,
    pub habit_score: f64,
    pub personalization_score: f64,
    pub reengagement_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChurnReductionResult {
    pub weighted_score: f64,
    pub reduction_points: f64,
    pub projected_churn_rate: f64,
}

pub fn churn_reduction(input: &ChurnReductionInput) -> Result<ChurnReductionResult, GrowthError> {
    check_percent("base_churn_rate", input.base_churn_rate)?;
    check_percent("habit_score", input.habit_score)?;
    check_percent("personalization_score", input.personalization_score)?;
    check_percent("reengagement_score", input.reengagement_score)?;

    let weighted_score = (input.habit_score * HABIT_WEIGHT
        + input.personalization_score * PERSONALIZATION_WEIGHT
        + input.reengagement_score * REENGAGEMENT_WEIGHT)
        .clamp(0.0, 100.0);
    let reduction_points = input.base_churn_rate * (weighted_score / 100.0) * MAX_CHURN_REDUCTION;
    let projected_churn_rate =
        (input.base_churn_rate - reduction_points).clamp(0.0, input.base_churn_rate);

    Ok(ChurnReductionResult {
        weighted_score,
        reduction_points,
        projected_churn_rate,
    })
}

// ---------------------------------------------------------------------------
// Activation heuristic
// ---------------------------------------------------------------------------

const BASE_ACTIVATION: f64 = 85.0;
const STEP_PENALTY: f64 = 7.0;
const FIELD_PENALTY: f64 = 2.5;
const SOCIAL_LOGIN_BONUS: f64 = 5.0;
const MIN_ACTIVATION: f64 = 10.0;
const MAX_ACTIVATION: f64 = 95.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivationInput {
    pub signup_steps: u32,
    pub required_fields: u32,
    #[serde(default)]
    pub social_login: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Friction {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ActivationResult {
    pub activation_rate: f64,
    pub friction: Friction,
}

pub fn activation_rate(input: &ActivationInput) -> Result<ActivationResult, GrowthError> {
    if input.signup_steps == 0 {
        return Err(GrowthError::OutOfRange {
            field: "signup_steps",
            constraint: "at least 1",
        });
    }

    let bonus = if input.social_login {
        SOCIAL_LOGIN_BONUS
    } else {
        0.0
    };
    let activation_rate = (BASE_ACTIVATION
        - STEP_PENALTY * f64::from(input.signup_steps - 1)
        - FIELD_PENALTY * f64::from(input.required_fields)
        + bonus)
        .clamp(MIN_ACTIVATION, MAX_ACTIVATION);

    let friction = if activation_rate >= 70.0 {
        Friction::Low
    } else if activation_rate >= 40.0 {
        Friction::Medium
    } else {
        Friction::High
    };

    Ok(ActivationResult {
        activation_rate,
        friction,
    })
}

// ---------------------------------------------------------------------------
// A/B illustration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbTestInput {
    pub control_rate: f64,
    pub variant_rate: f64,
    /// Visitors per arm.
    pub sample_size: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AbArm {
    pub visitors: u32,
    pub conversions: u32,
    pub observed_rate: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AbWinner {
    Control,
    Variant,
    Tie,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AbTestResult {
    pub control: AbArm,
    pub variant: AbArm,
    /// Relative uplift of the variant over control, in percent.
    pub uplift: Option<f64>,
    pub winner: AbWinner,
}

pub fn simulate_ab_test(input: &AbTestInput) -> Result<AbTestResult, GrowthError> {
    simulate_ab_test_with(input, &mut rand::rng())
}

pub fn simulate_ab_test_with<R: Rng>(
    input: &AbTestInput,
    rng: &mut R,
) -> Result<AbTestResult, GrowthError> {
    check_percent("control_rate", input.control_rate)?;
    check_percent("variant_rate", input.variant_rate)?;
    if input.sample_size == 0 || input.sample_size > MAX_AB_SAMPLE {
        return Err(GrowthError::OutOfRange {
            field: "sample_size",
            constraint: "between 1 and 100000",
        });
    }

    let control = simulate_arm(input.sample_size, input.control_rate, rng);
    let variant = simulate_arm(input.sample_size, input.variant_rate, rng);

    let uplift = crate::metrics::percentage_change(control.observed_rate, variant.observed_rate);
    let winner = match variant.conversions.cmp(&control.conversions) {
        std::cmp::Ordering::Greater => AbWinner::Variant,
        std::cmp::Ordering::Less => AbWinner::Control,
        std::cmp::Ordering::Equal => AbWinner::Tie,
    };

    Ok(AbTestResult {
        control,
        variant,
        uplift,
        winner,
    })
}

fn simulate_arm<R: Rng>(visitors: u32, rate: f64, rng: &mut R) -> AbArm {
    let p = rate / 100.0;
    let conversions = (0..visitors).filter(|_| rng.random_bool(p)).count() as u32;
    AbArm {
        visitors,
        conversions,
        observed_rate: f64::from(conversions) / f64::from(visitors) * 100.0,
    }
}
