//! What-if simulation over the monthly baseline: price, volume, cost and
//! promotion spend.

use serde::{Deserialize, Serialize};

use foodsight_core::{Error, Result};
use foodsight_data::aggregates as agg;
use foodsight_data::FixtureDataset;

/// Percentages are whole numbers: `5.0` means +5%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioInput {
    pub price_change_pct: f64,
    pub volume_change_pct: f64,
    pub cost_change_pct: f64,
    /// Extra promotion spend, in pesos.
    pub promo_investment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub baseline_revenue: f64,
    pub projected_revenue: f64,
    pub revenue_change: f64,
    pub revenue_change_pct: f64,
    pub baseline_margin_pct: f64,
    pub projected_margin_pct: f64,
    pub baseline_gross_profit: f64,
    pub projected_gross_profit: f64,
    pub gross_profit_change: f64,
    pub gross_profit_change_pct: f64,
    /// Revenue returned per peso of promotion spend.
    pub promotion_multiplier: f64,
}

impl ScenarioInput {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("priceChangePct", self.price_change_pct),
            ("volumeChangePct", self.volume_change_pct),
            ("costChangePct", self.cost_change_pct),
            ("promoInvestment", self.promo_investment),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::Validation(format!("{} must be a finite number", name)));
            }
        }
        if self.promo_investment < 0.0 {
            return Err(Error::Validation("promoInvestment cannot be negative".into()));
        }
        Ok(())
    }
}

fn change_pct(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from.abs() * 100.0
    }
}

/// Margin after a price factor `p` and cost factor `1 + c`, in percent.
fn projected_margin_pct(base_margin_pct: f64, price_factor: f64, cost_factor: f64) -> f64 {
    if price_factor <= 0.0 {
        return 0.0;
    }
    let m = base_margin_pct / 100.0;
    (price_factor - (1.0 - m) * cost_factor) / price_factor * 100.0
}

pub fn simulate(dataset: &FixtureDataset, input: &ScenarioInput) -> Result<ScenarioResult> {
    input.validate()?;

    let price = 1.0 + input.price_change_pct / 100.0;
    let volume = 1.0 + input.volume_change_pct / 100.0;
    let cost = 1.0 + input.cost_change_pct / 100.0;

    let baseline_revenue = agg::total_revenue(dataset);
    let multiplier = agg::promotion_multiplier(dataset);
    let projected_revenue = baseline_revenue * price * volume + input.promo_investment * multiplier;

    let baseline_margin_pct = agg::weighted_margin_pct(dataset);
    let projected_margin_pct = projected_margin_pct(baseline_margin_pct, price, cost);

    let baseline_gross_profit = baseline_revenue * baseline_margin_pct / 100.0;
    let projected_gross_profit = projected_revenue * projected_margin_pct / 100.0;

    Ok(ScenarioResult {
        baseline_revenue,
        projected_revenue,
        revenue_change: projected_revenue - baseline_revenue,
        revenue_change_pct: change_pct(baseline_revenue, projected_revenue),
        baseline_margin_pct,
        projected_margin_pct,
        baseline_gross_profit,
        projected_gross_profit,
        gross_profit_change: projected_gross_profit - baseline_gross_profit,
        gross_profit_change_pct: change_pct(baseline_gross_profit, projected_gross_profit),
        promotion_multiplier: multiplier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_no_change_is_identity() {
        let ds = FixtureDataset::standard();
        let r = simulate(&ds, &ScenarioInput::default()).unwrap();
        assert_eq!(r.baseline_revenue, 4_495_400.0);
        assert!(close(r.projected_revenue, r.baseline_revenue));
        assert!(close(r.projected_margin_pct, r.baseline_margin_pct));
        assert!(close(r.gross_profit_change, 0.0));
        assert!(close(r.revenue_change_pct, 0.0));
    }

    #[test]
    fn test_price_increase_raises_margin() {
        let ds = FixtureDataset::standard();
        let input = ScenarioInput {
            price_change_pct: 10.0,
            ..Default::default()
        };
        let r = simulate(&ds, &input).unwrap();
        assert!(close(r.projected_revenue, 4_495_400.0 * 1.1));
        assert!(r.projected_margin_pct > r.baseline_margin_pct);
        assert!(close(r.revenue_change_pct, 10.0));
    }

    #[test]
    fn test_cost_increase_lowers_margin_only() {
        let ds = FixtureDataset::standard();
        let input = ScenarioInput {
            cost_change_pct: 5.0,
            ..Default::default()
        };
        let r = simulate(&ds, &input).unwrap();
        assert!(close(r.projected_revenue, r.baseline_revenue));
        let m = r.baseline_margin_pct / 100.0;
        assert!(close(r.projected_margin_pct, (1.0 - (1.0 - m) * 1.05) * 100.0));
        assert!(r.gross_profit_change < 0.0);
    }

    #[test]
    fn test_promo_investment_uses_multiplier() {
        let ds = FixtureDataset::standard();
        let input = ScenarioInput {
            promo_investment: 10_000.0,
            ..Default::default()
        };
        let r = simulate(&ds, &input).unwrap();
        let multiplier = agg::promotion_multiplier(&ds);
        assert!(close(r.projected_revenue, 4_495_400.0 + 10_000.0 * multiplier));

        let empty = simulate(&FixtureDataset::empty(), &input).unwrap();
        assert_eq!(empty.projected_revenue, 0.0);
        assert_eq!(empty.revenue_change_pct, 0.0);
    }

    #[test]
    fn test_price_wipeout_guard() {
        let input = ScenarioInput {
            price_change_pct: -100.0,
            ..Default::default()
        };
        let r = simulate(&FixtureDataset::standard(), &input).unwrap();
        assert_eq!(r.projected_margin_pct, 0.0);
        assert!(r.projected_margin_pct.is_finite());
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let ds = FixtureDataset::standard();
        let nan = ScenarioInput {
            volume_change_pct: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(simulate(&ds, &nan), Err(Error::Validation(_))));
        let negative = ScenarioInput {
            promo_investment: -1.0,
            ..Default::default()
        };
        assert!(matches!(simulate(&ds, &negative), Err(Error::Validation(_))));
    }
}
