// src/services/calculators.rs
use anyhow::{ensure, Result};

use crate::models::{
    CompoundInput, CompoundProjection, DcaInput, DcaProjection, DcaScenarios, MonthlyPoint,
    RetirementInput, RetirementPlan, RiskBand, TargetReturn, TargetReturnInput, YearlyCheckpoint,
};

/// Annual returns above this are treated as unrealistic for planning purposes.
const ACHIEVABLE_ANNUAL_RETURN: f64 = 0.15;

/// Simulation horizons come straight from request bodies; cap them so the
/// month counter can never overflow and the per-month vectors stay small.
const MAX_PROJECTION_YEARS: u32 = 100;
const MAX_AGE: u32 = 120;

/// Month-by-month compounding with a fixed contribution.
///
/// The contribution is applied at the end of every month, including the
/// first; the same convention drives [`dca_projection`], so
/// `total_investment = principal + contribution * months` holds for both.
pub fn compound_interest(input: &CompoundInput) -> Result<CompoundProjection> {
    ensure!(
        input.principal.is_finite() && input.principal >= 0.0,
        "principal must be a non-negative number"
    );
    ensure!(
        input.monthly_contribution.is_finite() && input.monthly_contribution >= 0.0,
        "monthly contribution must be a non-negative number"
    );
    ensure!(input.annual_rate_percent.is_finite(), "annual rate must be a finite number");
    ensure!(
        (1..=MAX_PROJECTION_YEARS).contains(&input.years),
        "years must be between 1 and {}",
        MAX_PROJECTION_YEARS
    );

    let monthly_rate = input.annual_rate_percent / 100.0 / 12.0;
    let total_months = input.years * 12;

    let mut balance = input.principal;
    let mut contributed = input.principal;
    let mut yearly = Vec::with_capacity(input.years as usize);

    for month in 1..=total_months {
        balance *= 1.0 + monthly_rate;
        balance += input.monthly_contribution;
        contributed += input.monthly_contribution;

        if month % 12 == 0 {
            yearly.push(YearlyCheckpoint {
                year: month / 12,
                cumulative_contributions: contributed,
                balance,
                yearly_gain: balance - contributed,
            });
        }
    }

    let total_investment = contributed;
    let final_amount = balance;
    let total_return = final_amount - total_investment;
    let return_rate_percent = if total_investment > 0.0 {
        total_return / total_investment * 100.0
    } else {
        0.0
    };

    Ok(CompoundProjection {
        total_investment,
        final_amount,
        total_return,
        return_rate_percent,
        yearly,
    })
}

/// Closed-form annualized return needed to grow `current_asset` into
/// `target_asset` over `years`.
pub fn target_return(input: &TargetReturnInput) -> Result<TargetReturn> {
    ensure!(
        input.current_asset.is_finite() && input.current_asset > 0.0,
        "current asset must be positive"
    );
    ensure!(
        input.target_asset.is_finite() && input.target_asset > 0.0,
        "target asset must be positive"
    );
    ensure!(input.years >= 1, "years must be at least 1");

    let annual = (input.target_asset / input.current_asset).powf(1.0 / input.years as f64) - 1.0;
    // target/current > 0 keeps annual > -1, so the monthly root is defined
    let monthly = (1.0 + annual).powf(1.0 / 12.0) - 1.0;

    let risk_band = if annual <= 0.07 {
        RiskBand::Low
    } else if annual <= 0.12 {
        RiskBand::Medium
    } else {
        RiskBand::High
    };

    Ok(TargetReturn {
        required_annual_return_percent: annual * 100.0,
        required_monthly_return_percent: monthly * 100.0,
        risk_band,
        achievable: annual <= ACHIEVABLE_ANNUAL_RETURN,
    })
}

/// Dollar-cost-averaging projection: the base simulation plus pessimistic and
/// optimistic variants offset by the volatility.
pub fn dca_projection(input: &DcaInput) -> Result<DcaProjection> {
    ensure!(
        input.monthly_investment.is_finite() && input.monthly_investment >= 0.0,
        "monthly investment must be a non-negative number"
    );
    ensure!(
        (1..=MAX_PROJECTION_YEARS).contains(&input.years),
        "years must be between 1 and {}",
        MAX_PROJECTION_YEARS
    );
    ensure!(
        input.annual_return_percent.is_finite(),
        "annual return must be a finite number"
    );
    ensure!(
        input.volatility_percent.is_finite() && input.volatility_percent >= 0.0,
        "volatility must be a non-negative number"
    );

    let months = input.years * 12;
    let realistic = simulate_monthly(input.monthly_investment, input.annual_return_percent, months);
    let pessimistic = simulate_monthly(
        input.monthly_investment,
        input.annual_return_percent - input.volatility_percent,
        months,
    );
    let optimistic = simulate_monthly(
        input.monthly_investment,
        input.annual_return_percent + input.volatility_percent,
        months,
    );

    let total_investment = input.monthly_investment * months as f64;
    let estimated_value = final_value(&realistic);
    let total_return = estimated_value - total_investment;
    let return_rate_percent = if total_investment > 0.0 {
        total_return / total_investment * 100.0
    } else {
        0.0
    };

    Ok(DcaProjection {
        total_investment,
        estimated_value,
        total_return,
        return_rate_percent,
        scenarios: DcaScenarios {
            pessimistic: final_value(&pessimistic),
            realistic: estimated_value,
            optimistic: final_value(&optimistic),
        },
        monthly: realistic,
    })
}

fn simulate_monthly(contribution: f64, annual_rate_percent: f64, months: u32) -> Vec<MonthlyPoint> {
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let mut balance = 0.0;
    let mut invested = 0.0;
    let mut points = Vec::with_capacity(months as usize);

    for month in 1..=months {
        balance *= 1.0 + monthly_rate;
        balance += contribution;
        invested += contribution;
        points.push(MonthlyPoint {
            month,
            cumulative_investment: invested,
            estimated_value: balance,
        });
    }
    points
}

fn final_value(points: &[MonthlyPoint]) -> f64 {
    points.last().map(|p| p.estimated_value).unwrap_or(0.0)
}

/// Retirement shortfall: inflate today's expense to the retirement date,
/// size the corpus over the retirement years, project current assets forward
/// and solve the monthly saving that closes the gap.
///
/// The corpus sum discounts each retirement year's inflated expense by the
/// inflation rate itself rather than a risk-adjusted rate. The terms cancel
/// by construction; the loop mirrors the defined model rather than the
/// collapsed product.
pub fn retirement_plan(input: &RetirementInput) -> Result<RetirementPlan> {
    ensure!(
        input.retirement_age > input.current_age,
        "retirement age must be greater than current age"
    );
    ensure!(
        input.life_expectancy > input.retirement_age,
        "life expectancy must be greater than retirement age"
    );
    ensure!(
        input.life_expectancy <= MAX_AGE,
        "life expectancy must be at most {}",
        MAX_AGE
    );
    ensure!(
        input.current_asset.is_finite() && input.current_asset >= 0.0,
        "current asset must be a non-negative number"
    );
    ensure!(
        input.monthly_expense.is_finite() && input.monthly_expense >= 0.0,
        "monthly expense must be a non-negative number"
    );
    ensure!(
        input.inflation_rate_percent.is_finite() && input.inflation_rate_percent >= 0.0,
        "inflation rate must be a non-negative number"
    );
    ensure!(
        input.expected_return_percent.is_finite() && input.expected_return_percent >= 0.0,
        "expected return must be a non-negative number"
    );

    let years_to_retirement = input.retirement_age - input.current_age;
    let retirement_years = input.life_expectancy - input.retirement_age;

    let inflation = input.inflation_rate_percent / 100.0;
    let expected = input.expected_return_percent / 100.0;

    let monthly_expense_at_retirement =
        input.monthly_expense * (1.0 + inflation).powi(years_to_retirement as i32);

    let mut required_amount = 0.0;
    for year in 0..retirement_years {
        let inflated_annual_expense =
            monthly_expense_at_retirement * 12.0 * (1.0 + inflation).powi(year as i32);
        required_amount += inflated_annual_expense / (1.0 + inflation).powi(year as i32);
    }

    let projected_asset = input.current_asset * (1.0 + expected).powi(years_to_retirement as i32);
    let current_shortfall = (required_amount - projected_asset).max(0.0);

    let months = years_to_retirement * 12;
    let monthly_rate = expected / 12.0;
    let monthly_contribution_needed = if current_shortfall == 0.0 {
        0.0
    } else if monthly_rate == 0.0 {
        // zero-rate annuity degenerates to linear saving
        current_shortfall / months as f64
    } else {
        current_shortfall * monthly_rate / ((1.0 + monthly_rate).powi(months as i32) - 1.0)
    };

    Ok(RetirementPlan {
        required_amount,
        current_shortfall,
        monthly_contribution_needed,
        years_to_retirement,
        monthly_income_at_retirement: monthly_expense_at_retirement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn compound_input(principal: f64, contribution: f64, rate: f64, years: u32) -> CompoundInput {
        CompoundInput {
            principal,
            monthly_contribution: contribution,
            annual_rate_percent: rate,
            years,
        }
    }

    #[test]
    fn compound_one_year_emits_single_checkpoint() {
        let projection =
            compound_interest(&compound_input(1_000_000.0, 500_000.0, 7.0, 1)).unwrap();
        assert_eq!(projection.yearly.len(), 1);
        assert_eq!(projection.yearly[0].year, 1);
        // 12 contributions on top of the principal
        assert_eq!(projection.total_investment, 1_000_000.0 + 500_000.0 * 12.0);
        assert_eq!(projection.yearly[0].balance, projection.final_amount);
    }

    #[test]
    fn compound_without_contributions_matches_closed_form() {
        let projection = compound_interest(&compound_input(10_000.0, 0.0, 6.0, 5)).unwrap();
        let expected = 10_000.0 * (1.0 + 0.06 / 12.0_f64).powi(60);
        assert_approx(projection.final_amount, expected, 1e-6);
        assert_eq!(projection.yearly.len(), 5);
    }

    #[test]
    fn compound_is_monotonic_in_rate() {
        let low = compound_interest(&compound_input(10_000.0, 200.0, 3.0, 10)).unwrap();
        let high = compound_interest(&compound_input(10_000.0, 200.0, 8.0, 10)).unwrap();
        assert!(high.final_amount >= low.final_amount);
    }

    #[test]
    fn compound_accepts_negative_rates() {
        let projection = compound_interest(&compound_input(10_000.0, 0.0, -5.0, 3)).unwrap();
        assert!(projection.final_amount < 10_000.0);
        assert!(projection.total_return < 0.0);
    }

    #[test]
    fn compound_checkpoint_gain_is_balance_minus_contributions() {
        let projection = compound_interest(&compound_input(5_000.0, 100.0, 4.0, 3)).unwrap();
        for checkpoint in &projection.yearly {
            assert_approx(
                checkpoint.yearly_gain,
                checkpoint.balance - checkpoint.cumulative_contributions,
                1e-9,
            );
        }
    }

    #[test]
    fn compound_rejects_invalid_input() {
        assert!(compound_interest(&compound_input(-1.0, 0.0, 5.0, 1)).is_err());
        assert!(compound_interest(&compound_input(1.0, -1.0, 5.0, 1)).is_err());
        assert!(compound_interest(&compound_input(1.0, 0.0, f64::NAN, 1)).is_err());
        assert!(compound_interest(&compound_input(1.0, 0.0, 5.0, 0)).is_err());
    }

    #[test]
    fn compound_rejects_horizons_past_the_cap() {
        // years * 12 must never wrap the month counter
        assert!(compound_interest(&compound_input(1.0, 0.0, 5.0, 400_000_000)).is_err());
        assert!(compound_interest(&compound_input(1.0, 0.0, 5.0, MAX_PROJECTION_YEARS + 1)).is_err());
        assert!(compound_interest(&compound_input(1.0, 0.0, 5.0, MAX_PROJECTION_YEARS)).is_ok());
    }

    #[test]
    fn target_return_matches_worked_example() {
        let result = target_return(&TargetReturnInput {
            current_asset: 5_000_000.0,
            target_asset: 100_000_000.0,
            years: 10,
            monthly_contribution: 0.0,
        })
        .unwrap();

        // 20x over 10 years: 20^(1/10) - 1 = 34.93%
        assert_approx(result.required_annual_return_percent, 34.93, 0.1);
        assert_eq!(result.risk_band, RiskBand::High);
        assert!(!result.achievable);
    }

    #[test]
    fn target_return_risk_bands() {
        let solve = |target: f64| {
            target_return(&TargetReturnInput {
                current_asset: 100.0,
                target_asset: target,
                years: 1,
                monthly_contribution: 0.0,
            })
            .unwrap()
        };
        assert_eq!(solve(105.0).risk_band, RiskBand::Low);
        assert_eq!(solve(110.0).risk_band, RiskBand::Medium);
        assert_eq!(solve(120.0).risk_band, RiskBand::High);
        assert!(solve(114.0).achievable);
        assert!(!solve(116.0).achievable);
    }

    #[test]
    fn target_return_round_trips_through_compound_projection() {
        let current = 5_000_000.0;
        let target = 100_000_000.0;
        let years = 10;
        let solved = target_return(&TargetReturnInput {
            current_asset: current,
            target_asset: target,
            years,
            monthly_contribution: 0.0,
        })
        .unwrap();

        // The projector compounds monthly, so feed it the nominal monthly
        // equivalent of the solved effective-annual rate.
        let nominal_annual = solved.required_monthly_return_percent * 12.0;
        let projection =
            compound_interest(&compound_input(current, 0.0, nominal_annual, years)).unwrap();
        assert_approx(projection.final_amount, target, 1.0);
    }

    #[test]
    fn target_return_rejects_non_positive_assets() {
        assert!(target_return(&TargetReturnInput {
            current_asset: 0.0,
            target_asset: 100.0,
            years: 10,
            monthly_contribution: 0.0,
        })
        .is_err());
        assert!(target_return(&TargetReturnInput {
            current_asset: 100.0,
            target_asset: -5.0,
            years: 10,
            monthly_contribution: 0.0,
        })
        .is_err());
    }

    fn dca_input(rate: f64, volatility: f64) -> DcaInput {
        DcaInput {
            monthly_investment: 1_000_000.0,
            years: 10,
            annual_return_percent: rate,
            volatility_percent: volatility,
        }
    }

    #[test]
    fn dca_scenarios_are_ordered() {
        let projection = dca_projection(&dca_input(8.0, 15.0)).unwrap();
        assert!(projection.scenarios.pessimistic <= projection.scenarios.realistic);
        assert!(projection.scenarios.realistic <= projection.scenarios.optimistic);
    }

    #[test]
    fn dca_zero_volatility_collapses_scenarios() {
        let projection = dca_projection(&dca_input(8.0, 0.0)).unwrap();
        assert_eq!(projection.scenarios.pessimistic, projection.scenarios.realistic);
        assert_eq!(projection.scenarios.realistic, projection.scenarios.optimistic);
    }

    #[test]
    fn dca_invests_every_month_including_the_first() {
        let projection = dca_projection(&dca_input(8.0, 15.0)).unwrap();
        assert_eq!(projection.monthly.len(), 120);
        assert_eq!(projection.monthly[0].cumulative_investment, 1_000_000.0);
        assert_eq!(projection.total_investment, 1_000_000.0 * 120.0);
        // first month earns one month of growth before the check
        assert!(projection.monthly[0].estimated_value >= 1_000_000.0);
    }

    #[test]
    fn dca_and_compound_share_the_contribution_convention() {
        // A DCA run equals a compound run with zero principal and the same
        // contribution and rate.
        let dca = dca_projection(&dca_input(8.0, 0.0)).unwrap();
        let compound =
            compound_interest(&compound_input(0.0, 1_000_000.0, 8.0, 10)).unwrap();
        assert_approx(dca.estimated_value, compound.final_amount, 1e-6);
        assert_approx(dca.total_investment, compound.total_investment, 1e-9);
    }

    #[test]
    fn dca_rejects_negative_volatility() {
        assert!(dca_projection(&dca_input(8.0, -1.0)).is_err());
    }

    #[test]
    fn dca_rejects_horizons_past_the_cap() {
        let mut input = dca_input(8.0, 15.0);
        input.years = 400_000_000;
        assert!(dca_projection(&input).is_err());
        input.years = MAX_PROJECTION_YEARS + 1;
        assert!(dca_projection(&input).is_err());
        input.years = MAX_PROJECTION_YEARS;
        assert!(dca_projection(&input).is_ok());
    }

    fn retirement_input() -> RetirementInput {
        RetirementInput {
            current_age: 30,
            retirement_age: 60,
            current_asset: 50_000_000.0,
            monthly_expense: 3_000_000.0,
            life_expectancy: 85,
            inflation_rate_percent: 2.5,
            expected_return_percent: 6.0,
        }
    }

    #[test]
    fn retirement_plan_matches_model_arithmetic() {
        let plan = retirement_plan(&retirement_input()).unwrap();

        assert_eq!(plan.years_to_retirement, 30);
        let expense_at_retirement = 3_000_000.0 * 1.025_f64.powi(30);
        assert_approx(plan.monthly_income_at_retirement, expense_at_retirement, 1e-3);
        // self-discounting corpus: 25 years of the inflated annual expense
        assert_approx(plan.required_amount, expense_at_retirement * 12.0 * 25.0, 1e-2);
        assert!(plan.current_shortfall > 0.0);
        assert!(plan.monthly_contribution_needed > 0.0);
    }

    #[test]
    fn retirement_shortfall_is_never_negative() {
        let mut input = retirement_input();
        input.current_asset = 100_000_000_000.0;
        let plan = retirement_plan(&input).unwrap();
        assert_eq!(plan.current_shortfall, 0.0);
        assert_eq!(plan.monthly_contribution_needed, 0.0);
    }

    #[test]
    fn retirement_zero_rate_falls_back_to_linear_saving() {
        let mut input = retirement_input();
        input.inflation_rate_percent = 0.0;
        input.expected_return_percent = 0.0;
        let plan = retirement_plan(&input).unwrap();

        let required = 3_000_000.0 * 12.0 * 25.0;
        assert_approx(plan.required_amount, required, 1e-6);
        let shortfall = required - 50_000_000.0;
        assert_approx(plan.current_shortfall, shortfall, 1e-6);
        assert_approx(plan.monthly_contribution_needed, shortfall / 360.0, 1e-6);
    }

    #[test]
    fn retirement_rejects_misordered_ages() {
        let mut input = retirement_input();
        input.retirement_age = 30;
        assert!(retirement_plan(&input).is_err());

        let mut input = retirement_input();
        input.life_expectancy = 60;
        assert!(retirement_plan(&input).is_err());
    }

    #[test]
    fn retirement_rejects_implausible_ages() {
        let mut input = retirement_input();
        input.retirement_age = 300_000_000;
        input.life_expectancy = 400_000_000;
        assert!(retirement_plan(&input).is_err());

        let mut input = retirement_input();
        input.life_expectancy = MAX_AGE;
        assert!(retirement_plan(&input).is_ok());
    }
}
