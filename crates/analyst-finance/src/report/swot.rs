//! Rule-based SWOT analysis
//!
//! Each bullet comes from a fixed threshold on one snapshot field. A field
//! the quote API did not return never fires a rule.

use super::{company_block, heavy_rule, light_rule, title};
use crate::model::CompanySnapshot;
use serde::Serialize;

const POSITIVE_RATINGS: &[&str] = &["buy", "strong_buy"];
const NEGATIVE_RATINGS: &[&str] = &["sell", "strong_sell", "underperform"];

/// The four SWOT quadrants, each non-empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl Swot {
    pub fn from_snapshot(s: &CompanySnapshot) -> Self {
        let above = |value: Option<f64>, limit: f64| value.filter(|v| *v > limit);
        let between = |value: Option<f64>, low: f64, high: f64| value.filter(|v| *v > low && *v < high);
        let industry = s.industry.as_deref().unwrap_or("the industry");
        let rating = s.recommendation_key.as_deref().map(str::to_lowercase);
        let rating = rating.as_deref();

        let mut strengths = Vec::new();
        if let Some(v) = above(s.profit_margins, 0.15) {
            strengths.push(format!("Strong profit margin of {:.1}%", v * 100.0));
        }
        if let Some(v) = above(s.return_on_equity, 0.15) {
            strengths.push(format!("Excellent ROE of {:.1}%", v * 100.0));
        }
        if let Some(v) = above(s.current_ratio, 1.5) {
            strengths.push(format!("Healthy liquidity with current ratio of {v:.2}"));
        }
        if let Some(v) = above(s.revenue_growth, 0.10) {
            strengths.push(format!("Strong revenue growth of {:.1}%", v * 100.0));
        }
        if let Some(r) = rating.filter(|r| POSITIVE_RATINGS.contains(r)) {
            strengths.push(format!("Positive analyst sentiment: {r}"));
        }
        if strengths.is_empty() {
            strengths.push("Established market presence".to_string());
        }

        let mut weaknesses = Vec::new();
        if let Some(v) = above(s.debt_to_equity, 2.0) {
            weaknesses.push(format!("High debt-to-equity ratio of {v:.2}"));
        }
        if let Some(v) = between(s.current_ratio, 0.0, 1.0) {
            weaknesses.push(format!("Low liquidity with current ratio of {v:.2}"));
        }
        if let Some(v) = above(s.trailing_pe, 30.0) {
            weaknesses.push(format!("High P/E ratio of {v:.2} may indicate overvaluation"));
        }
        if let Some(v) = between(s.operating_margins, 0.0, 0.05) {
            weaknesses.push(format!("Low operating margin of {:.1}%", v * 100.0));
        }
        if weaknesses.is_empty() {
            weaknesses.push("Limited public data available for detailed assessment".to_string());
        }

        let mut opportunities = Vec::new();
        if above(s.revenue_growth, 0.0).is_some() {
            opportunities.push("Continue expanding in growing markets".to_string());
        }
        if between(s.peg_ratio, 0.0, 1.0).is_some() {
            opportunities.push("Potential undervaluation based on growth prospects".to_string());
        }
        if let (Some(current), Some(target)) = (above(s.price(), 0.0), s.target_mean_price) {
            if target > current * 1.1 {
                let upside = (target - current) / current * 100.0;
                opportunities.push(format!(
                    "Analyst target price suggests {upside:.1}% upside potential"
                ));
            }
        }
        opportunities.push(format!("Leverage position in {industry}"));

        let mut threats = Vec::new();
        if let Some(v) = above(s.beta, 1.5) {
            threats.push(format!("High market volatility (beta: {v:.2})"));
        }
        if above(s.debt_to_equity, 1.5).is_some() {
            threats.push("Elevated debt levels may limit financial flexibility".to_string());
        }
        if let Some(r) = rating.filter(|r| NEGATIVE_RATINGS.contains(r)) {
            threats.push(format!("Negative analyst sentiment: {r}"));
        }
        threats.push(format!("Competition in {industry}"));
        threats.push("Macroeconomic uncertainties and market volatility".to_string());

        Self {
            strengths,
            weaknesses,
            opportunities,
            threats,
        }
    }

    fn sections(&self) -> [(&'static str, &[String]); 4] {
        [
            ("STRENGTHS", self.strengths.as_slice()),
            ("WEAKNESSES", self.weaknesses.as_slice()),
            ("OPPORTUNITIES", self.opportunities.as_slice()),
            ("THREATS", self.threats.as_slice()),
        ]
    }
}

/// `SWOT Analysis for {TICKER}`
pub fn render_swot(snapshot: &CompanySnapshot) -> String {
    let swot = Swot::from_snapshot(snapshot);

    let mut output = title(&format!("SWOT Analysis for {}", snapshot.ticker));
    output.push_str(&company_block(snapshot));
    output.push('\n');
    output.push_str(&heavy_rule());
    output.push_str("\n\n");

    for (heading, items) in swot.sections() {
        output.push_str(&format!("{heading}\n{}\n", light_rule()));
        for (i, item) in items.iter().enumerate() {
            output.push_str(&format!("{}. {item}\n", i + 1));
        }
        output.push('\n');
    }

    output.push_str(&heavy_rule());
    output.push('\n');
    output.push_str("Note: This SWOT analysis is generated from publicly available financial data\n");
    output.push_str("and should be used as a starting point for further research and analysis.\n");
    output
}
