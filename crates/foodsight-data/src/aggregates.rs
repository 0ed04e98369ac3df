//! Derived figures computed from the fixture dataset at answer time.
//!
//! Every function is pure and tolerates empty inputs: sums return 0, rankings
//! return empty vectors, and averages return 0 instead of NaN.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::*;

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// ---------------------------------------------------------------
// Products and inventory
// ---------------------------------------------------------------

pub fn total_revenue(ds: &FixtureDataset) -> f64 {
    ds.products.iter().map(|p| p.monthly_revenue).sum()
}

pub fn total_units(ds: &FixtureDataset) -> u64 {
    ds.products.iter().map(|p| p.monthly_units as u64).sum()
}

pub fn total_backorders(ds: &FixtureDataset) -> u64 {
    ds.products.iter().map(|p| p.backorders as u64).sum()
}

/// Products with open backorders, largest first.
pub fn products_with_backorders(ds: &FixtureDataset) -> Vec<&Product> {
    let mut list: Vec<&Product> = ds.products.iter().filter(|p| p.backorders > 0).collect();
    list.sort_by(|a, b| b.backorders.cmp(&a.backorders));
    list
}

/// Products at or below reorder point that still have stock, tightest first.
pub fn low_stock_products(ds: &FixtureDataset) -> Vec<&Product> {
    let mut list: Vec<&Product> = ds.products.iter().filter(|p| p.is_low_stock()).collect();
    list.sort_by(|a, b| asc(coverage(a), coverage(b)));
    list
}

fn coverage(p: &Product) -> f64 {
    if p.reorder_point == 0 {
        f64::MAX
    } else {
        p.stock_units as f64 / p.reorder_point as f64
    }
}

/// Branch stock records flagged out of stock, in dataset order.
pub fn out_of_stock_records(ds: &FixtureDataset) -> Vec<&StockStatus> {
    ds.stock_status.iter().filter(|s| s.is_out_of_stock).collect()
}

pub fn out_of_stock_products(ds: &FixtureDataset) -> Vec<&Product> {
    ds.products.iter().filter(|p| p.is_out_of_stock()).collect()
}

pub fn top_margin_products(ds: &FixtureDataset, n: usize) -> Vec<&Product> {
    let mut list: Vec<&Product> = ds.products.iter().collect();
    list.sort_by(|a, b| desc(a.margin_pct, b.margin_pct));
    list.truncate(n);
    list
}

pub fn lowest_margin_products(ds: &FixtureDataset, n: usize) -> Vec<&Product> {
    let mut list: Vec<&Product> = ds.products.iter().collect();
    list.sort_by(|a, b| asc(a.margin_pct, b.margin_pct));
    list.truncate(n);
    list
}

pub fn top_products_by_revenue(ds: &FixtureDataset, n: usize) -> Vec<&Product> {
    let mut list: Vec<&Product> = ds.products.iter().collect();
    list.sort_by(|a, b| desc(a.monthly_revenue, b.monthly_revenue));
    list.truncate(n);
    list
}

/// Products whose sales trend is negative, steepest decline first.
pub fn declining_products(ds: &FixtureDataset) -> Vec<&Product> {
    let mut list: Vec<&Product> = ds.products.iter().filter(|p| p.trend_pct < 0.0).collect();
    list.sort_by(|a, b| asc(a.trend_pct, b.trend_pct));
    list
}

/// Revenue-weighted average gross margin, in percent.
pub fn weighted_margin_pct(ds: &FixtureDataset) -> f64 {
    let revenue = total_revenue(ds);
    if revenue <= 0.0 {
        return 0.0;
    }
    ds.products
        .iter()
        .map(|p| p.margin_pct * p.monthly_revenue)
        .sum::<f64>()
        / revenue
}

pub fn gross_profit(ds: &FixtureDataset) -> f64 {
    ds.products
        .iter()
        .map(|p| p.monthly_revenue * p.margin_pct / 100.0)
        .sum()
}

/// Revenue and weighted margin per product category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRollup {
    pub category: String,
    pub revenue: f64,
    pub margin_pct: f64,
    pub products: usize,
    pub trend_pct: f64,
}

/// Category rollups sorted by revenue, largest first.
pub fn category_rollup(ds: &FixtureDataset) -> Vec<CategoryRollup> {
    let mut groups: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
    for p in &ds.products {
        groups.entry(p.category.as_str()).or_default().push(p);
    }

    let mut rollups: Vec<CategoryRollup> = groups
        .into_iter()
        .map(|(category, products)| {
            let revenue: f64 = products.iter().map(|p| p.monthly_revenue).sum();
            let weighted = |f: fn(&Product) -> f64| {
                if revenue > 0.0 {
                    products.iter().map(|&p| f(p) * p.monthly_revenue).sum::<f64>() / revenue
                } else {
                    0.0
                }
            };
            CategoryRollup {
                category: category.to_string(),
                revenue,
                margin_pct: weighted(|p| p.margin_pct),
                trend_pct: weighted(|p| p.trend_pct),
                products: products.len(),
            }
        })
        .collect();
    rollups.sort_by(|a, b| desc(a.revenue, b.revenue));
    rollups
}

// ---------------------------------------------------------------
// Clients and receivables
// ---------------------------------------------------------------

/// Clients with `overdue_days > 0`, most days overdue first.
pub fn overdue_clients(ds: &FixtureDataset) -> Vec<&Client> {
    let mut list: Vec<&Client> = ds.clients.iter().filter(|c| c.is_overdue()).collect();
    list.sort_by(|a, b| b.overdue_days.cmp(&a.overdue_days));
    list
}

/// Sum of `overdue_amount` across clients with `overdue_days > 0`.
pub fn overdue_total(ds: &FixtureDataset) -> f64 {
    ds.clients
        .iter()
        .filter(|c| c.is_overdue())
        .map(|c| c.overdue_amount)
        .sum()
}

pub fn high_risk_clients(ds: &FixtureDataset) -> Vec<&Client> {
    let mut list: Vec<&Client> = ds
        .clients
        .iter()
        .filter(|c| c.risk == RiskLevel::High)
        .collect();
    list.sort_by(|a, b| desc(a.overdue_amount, b.overdue_amount));
    list
}

pub fn top_clients_by_volume(ds: &FixtureDataset, n: usize) -> Vec<&Client> {
    let mut list: Vec<&Client> = ds.clients.iter().collect();
    list.sort_by(|a, b| desc(a.monthly_volume, b.monthly_volume));
    list.truncate(n);
    list
}

pub fn total_client_volume(ds: &FixtureDataset) -> f64 {
    ds.clients.iter().map(|c| c.monthly_volume).sum()
}

/// Chain accounts buying below their monthly budget, largest gap first.
pub fn chains_below_budget(ds: &FixtureDataset) -> Vec<&Client> {
    let mut list: Vec<&Client> = ds
        .clients
        .iter()
        .filter(|c| c.segment == ClientSegment::Chain && c.monthly_volume < c.monthly_budget)
        .collect();
    list.sort_by(|a, b| {
        desc(
            a.monthly_budget - a.monthly_volume,
            b.monthly_budget - b.monthly_volume,
        )
    });
    list
}

pub fn clients_in_region<'a>(ds: &'a FixtureDataset, region: &str) -> Vec<&'a Client> {
    ds.clients
        .iter()
        .filter(|c| c.region.eq_ignore_ascii_case(region))
        .collect()
}

/// Clients grouped by payment terms (days), shortest terms first.
pub fn clients_by_payment_terms(ds: &FixtureDataset) -> BTreeMap<u32, Vec<&Client>> {
    let mut groups: BTreeMap<u32, Vec<&Client>> = BTreeMap::new();
    for c in &ds.clients {
        groups.entry(c.payment_terms_days).or_default().push(c);
    }
    groups
}

/// Volume-weighted average payment terms in days.
pub fn average_payment_terms(ds: &FixtureDataset) -> f64 {
    let volume = total_client_volume(ds);
    if volume <= 0.0 {
        return 0.0;
    }
    ds.clients
        .iter()
        .map(|c| c.payment_terms_days as f64 * c.monthly_volume)
        .sum::<f64>()
        / volume
}

pub fn invoices_with_status(ds: &FixtureDataset, status: InvoiceStatus) -> Vec<&Invoice> {
    let mut list: Vec<&Invoice> = ds.invoices.iter().filter(|i| i.status == status).collect();
    list.sort_by(|a, b| a.due_on.cmp(&b.due_on));
    list
}

pub fn invoice_total(invoices: &[&Invoice]) -> f64 {
    invoices.iter().map(|i| i.amount).sum()
}

// ---------------------------------------------------------------
// Regions, reps, promotions, channels
// ---------------------------------------------------------------

pub fn total_target(ds: &FixtureDataset) -> f64 {
    ds.regions.iter().map(|r| r.target_revenue).sum()
}

pub fn total_regional_revenue(ds: &FixtureDataset) -> f64 {
    ds.regions.iter().map(|r| r.current_revenue).sum()
}

/// Regions ranked by attainment, best first.
pub fn regions_by_attainment(ds: &FixtureDataset) -> Vec<&Region> {
    let mut list: Vec<&Region> = ds.regions.iter().collect();
    list.sort_by(|a, b| desc(a.attainment_pct(), b.attainment_pct()));
    list
}

/// Regions under target, furthest behind first.
pub fn regions_below_target(ds: &FixtureDataset) -> Vec<&Region> {
    let mut list: Vec<&Region> = ds
        .regions
        .iter()
        .filter(|r| r.current_revenue < r.target_revenue)
        .collect();
    list.sort_by(|a, b| asc(a.attainment_pct(), b.attainment_pct()));
    list
}

pub fn find_region<'a>(ds: &'a FixtureDataset, name: &str) -> Option<&'a Region> {
    ds.regions.iter().find(|r| r.name.eq_ignore_ascii_case(name))
}

/// Reps ranked by performance, best first.
pub fn reps_by_performance(ds: &FixtureDataset) -> Vec<&SalesRep> {
    let mut list: Vec<&SalesRep> = ds.sales_reps.iter().collect();
    list.sort_by(|a, b| desc(a.performance_pct(), b.performance_pct()));
    list
}

pub fn average_rep_performance(ds: &FixtureDataset) -> f64 {
    if ds.sales_reps.is_empty() {
        return 0.0;
    }
    ds.sales_reps.iter().map(|r| r.performance_pct()).sum::<f64>() / ds.sales_reps.len() as f64
}

/// Promotions ranked by ROI, best first.
pub fn promotions_by_roi(ds: &FixtureDataset) -> Vec<&Promotion> {
    let mut list: Vec<&Promotion> = ds.promotions.iter().collect();
    list.sort_by(|a, b| desc(a.roi_pct(), b.roi_pct()));
    list
}

pub fn promotion_investment(ds: &FixtureDataset) -> f64 {
    ds.promotions.iter().map(|p| p.investment).sum()
}

pub fn promotion_revenue(ds: &FixtureDataset) -> f64 {
    ds.promotions.iter().map(|p| p.revenue_generated).sum()
}

/// Revenue returned per peso invested across all promotions (0 with none).
pub fn promotion_multiplier(ds: &FixtureDataset) -> f64 {
    let investment = promotion_investment(ds);
    if investment <= 0.0 {
        0.0
    } else {
        promotion_revenue(ds) / investment
    }
}

/// A channel with its share of total channel revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelShare<'a> {
    pub channel: &'a Channel,
    pub share_pct: f64,
}

/// Channels with revenue share, largest first.
pub fn channel_shares(ds: &FixtureDataset) -> Vec<ChannelShare<'_>> {
    let total: f64 = ds.channels.iter().map(|c| c.revenue).sum();
    let mut shares: Vec<ChannelShare<'_>> = ds
        .channels
        .iter()
        .map(|channel| ChannelShare {
            channel,
            share_pct: ratio_pct(channel.revenue, total),
        })
        .collect();
    shares.sort_by(|a, b| desc(a.channel.revenue, b.channel.revenue));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> FixtureDataset {
        FixtureDataset::standard()
    }

    #[test]
    fn test_totals() {
        let ds = standard();
        assert_eq!(total_revenue(&ds), 4_495_400.0);
        assert_eq!(total_backorders(&ds), 3_830);
        assert_eq!(overdue_total(&ds), 306_700.0);
    }

    #[test]
    fn test_overdue_total_matches_filter() {
        let ds = standard();
        let expected: f64 = overdue_clients(&ds).iter().map(|c| c.overdue_amount).sum();
        assert_eq!(overdue_total(&ds), expected);
        assert_eq!(overdue_clients(&ds)[0].name, "Mercados Peninsulares");
    }

    #[test]
    fn test_rankings() {
        let ds = standard();
        let top = top_margin_products(&ds, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "Mole Poblano 250g");
        assert!(top.windows(2).all(|w| w[0].margin_pct >= w[1].margin_pct));

        let low = lowest_margin_products(&ds, 3);
        assert_eq!(low[0].name, "Tortillas de Maíz 1kg");

        let best = top_products_by_revenue(&ds, 1);
        assert_eq!(best[0].name, "Tortillas de Maíz 1kg");

        let declining = declining_products(&ds);
        assert_eq!(declining[0].name, "Nopales en Escabeche 440g");
        assert!(declining.iter().all(|p| p.trend_pct < 0.0));
    }

    #[test]
    fn test_inventory_filters() {
        let ds = standard();
        let out: Vec<&str> = out_of_stock_records(&ds).iter().map(|s| s.branch.as_str()).collect();
        assert_eq!(out.len(), 5);
        assert!(out.contains(&"CEDIS León"));

        let low: Vec<&str> = low_stock_products(&ds).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low, vec!["Chocolate de Mesa 540g", "Tostadas Horneadas 300g"]);

        assert_eq!(products_with_backorders(&ds)[0].name, "Chiles Chipotle 200g");
    }

    #[test]
    fn test_chains_and_regions() {
        let ds = standard();
        let chains: Vec<&str> = chains_below_budget(&ds).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(chains.len(), 4);
        assert!(!chains.contains(&"Tiendas La Canasta"));
        assert!(chains_below_budget(&ds)
            .iter()
            .all(|c| c.segment == ClientSegment::Chain));

        let behind: Vec<&str> = regions_below_target(&ds).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(behind, vec!["Occidente", "Centro", "Sureste"]);

        assert_eq!(reps_by_performance(&ds)[0].name, "Alejandra Treviño");
        assert!(find_region(&ds, "norte").is_some());
    }

    #[test]
    fn test_promotions_and_channels() {
        let ds = standard();
        let ranked = promotions_by_roi(&ds);
        assert_eq!(ranked[0].name, "2x1 Salsa Verde Cuaresma");
        assert!(ranked.last().unwrap().roi_pct() < 0.0);

        let shares = channel_shares(&ds);
        let total_share: f64 = shares.iter().map(|s| s.share_pct).sum();
        assert!((total_share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dataset_is_safe() {
        let ds = FixtureDataset::empty();
        assert_eq!(total_revenue(&ds), 0.0);
        assert_eq!(weighted_margin_pct(&ds), 0.0);
        assert_eq!(average_rep_performance(&ds), 0.0);
        assert_eq!(average_payment_terms(&ds), 0.0);
        assert_eq!(promotion_multiplier(&ds), 0.0);
        assert!(overdue_clients(&ds).is_empty());
        assert!(category_rollup(&ds).is_empty());
        assert!(channel_shares(&ds).is_empty());
    }
}
