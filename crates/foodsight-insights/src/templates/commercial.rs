//! Promotions, channels, forecast and revenue answers.

use std::collections::HashMap;

use foodsight_data::aggregates as agg;
use foodsight_data::FixtureDataset;

use super::{insert, Template, TemplateContext};
use crate::classifier::Category;
use crate::format::*;

/// Days used to turn monthly figures into daily estimates.
const DAYS_PER_MONTH: f64 = 30.0;

pub(super) fn register(map: &mut HashMap<Category, Template>) {
    insert(map, Category::PromotionRoi, promo_roi_es, promo_roi_en);
    insert(map, Category::PromotionsOverview, promos_es, promos_en);
    insert(map, Category::ChannelPerformance, channels_es, channels_en);
    insert(map, Category::Forecast, forecast_es, forecast_en);
    insert(map, Category::RevenueVsTarget, vs_target_es, vs_target_en);
    insert(map, Category::SalesSummary, summary_es, summary_en);
}

fn roi_span(roi: f64) -> String {
    if roi > 0.0 {
        positive(&pct(roi))
    } else if roi < 0.0 {
        negative(&pct(roi))
    } else {
        neutral(&pct(roi))
    }
}

fn promo_roi_es(ctx: &TemplateContext<'_>) -> String {
    let ranked = agg::promotions_by_roi(ctx.dataset);
    let (Some(best), Some(worst)) = (ranked.first(), ranked.last()) else {
        return "No hay promociones registradas para evaluar su retorno.".to_string();
    };
    let lines = ranked.iter().map(|p| {
        format!(
            "{} ({}): inversión {} · venta generada {} · ROI {}",
            strong(&p.name),
            p.product,
            money(p.investment),
            money(p.revenue_generated),
            roi_span(p.roi_pct())
        )
    });
    format!(
        "🎯 {}<br><br>{}<br><br>La más rentable es {}; la de menor retorno es {}. \
         Cada peso invertido en promociones regresó {} en ventas.",
        strong("Retorno de promociones"),
        numbered(lines),
        strong(&best.name),
        strong(&worst.name),
        strong(&format!("${:.2}", agg::promotion_multiplier(ctx.dataset)))
    )
}

fn promo_roi_en(ctx: &TemplateContext<'_>) -> String {
    let ranked = agg::promotions_by_roi(ctx.dataset);
    let (Some(best), Some(worst)) = (ranked.first(), ranked.last()) else {
        return "There are no promotions on file to evaluate.".to_string();
    };
    let lines = ranked.iter().map(|p| {
        format!(
            "{} ({}): invested {} · revenue {} · ROI {}",
            strong(&p.name),
            p.product,
            money(p.investment),
            money(p.revenue_generated),
            roi_span(p.roi_pct())
        )
    });
    format!(
        "🎯 {}<br><br>{}<br><br>Best performer is {}; weakest is {}. \
         Every peso invested in promotions returned {} in sales.",
        strong("Promotion ROI"),
        numbered(lines),
        strong(&best.name),
        strong(&worst.name),
        strong(&format!("${:.2}", agg::promotion_multiplier(ctx.dataset)))
    )
}

fn promos_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    if ds.promotions.is_empty() {
        return "No hay promociones activas en este momento.".to_string();
    }
    let lines = ds
        .promotions
        .iter()
        .map(|p| format!("{}: {} en {}", strong(&p.name), money(p.investment), p.product));
    format!(
        "📣 {}<br><br>{}<br><br>Inversión total: {} · Venta generada: {}",
        strong(&format!("Promociones activas ({})", ds.promotions.len())),
        bullets(lines),
        money(agg::promotion_investment(ds)),
        positive(&money(agg::promotion_revenue(ds)))
    )
}

fn promos_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    if ds.promotions.is_empty() {
        return "There are no active promotions right now.".to_string();
    }
    let lines = ds
        .promotions
        .iter()
        .map(|p| format!("{}: {} on {}", strong(&p.name), money(p.investment), p.product));
    format!(
        "📣 {}<br><br>{}<br><br>Total investment: {} · Revenue generated: {}",
        strong(&format!("Active promotions ({})", ds.promotions.len())),
        bullets(lines),
        money(agg::promotion_investment(ds)),
        positive(&money(agg::promotion_revenue(ds)))
    )
}

fn channels_es(ctx: &TemplateContext<'_>) -> String {
    let shares = agg::channel_shares(ctx.dataset);
    if shares.is_empty() {
        return "No hay información de canales de venta.".to_string();
    }
    let lines = shares.iter().map(|s| {
        format!(
            "{}: {} ({} del total) · crecimiento {}",
            strong(&s.channel.name),
            money(s.channel.revenue),
            pct(s.share_pct),
            trend(s.channel.growth_pct)
        )
    });
    format!("🛒 {}<br><br>{}", strong("Ventas por canal"), bullets(lines))
}

fn channels_en(ctx: &TemplateContext<'_>) -> String {
    let shares = agg::channel_shares(ctx.dataset);
    if shares.is_empty() {
        return "There is no sales-channel data available.".to_string();
    }
    let lines = shares.iter().map(|s| {
        format!(
            "{}: {} ({} of total) · growth {}",
            strong(&s.channel.name),
            money(s.channel.revenue),
            pct(s.share_pct),
            trend(s.channel.growth_pct)
        )
    });
    format!("🛒 {}<br><br>{}", strong("Sales by channel"), bullets(lines))
}

/// Next month's revenue if every product keeps its current trend.
pub(crate) fn forecast_revenue(ds: &FixtureDataset) -> f64 {
    ds.products
        .iter()
        .map(|p| p.monthly_revenue * (1.0 + p.trend_pct / 100.0))
        .sum()
}

fn forecast_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    if ds.products.is_empty() {
        return "No hay productos con historial para proyectar ventas.".to_string();
    }
    let current = agg::total_revenue(ds);
    let projected = forecast_revenue(ds);
    let change = if current > 0.0 { (projected - current) / current * 100.0 } else { 0.0 };
    format!(
        "🔮 {}<br><br>• Venta actual: {}<br>• Proyección: {}<br>• Variación: {}<br><br>\
         La proyección extiende la tendencia mensual de cada producto; no considera \
         estacionalidad ni promociones nuevas.",
        strong("Pronóstico del próximo mes"),
        money(current),
        strong(&money(projected)),
        trend(change)
    )
}

fn forecast_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    if ds.products.is_empty() {
        return "There are no products with history to forecast from.".to_string();
    }
    let current = agg::total_revenue(ds);
    let projected = forecast_revenue(ds);
    let change = if current > 0.0 { (projected - current) / current * 100.0 } else { 0.0 };
    format!(
        "🔮 {}<br><br>• Current sales: {}<br>• Projection: {}<br>• Change: {}<br><br>\
         The projection extends each product's monthly trend; it does not account for \
         seasonality or new promotions.",
        strong("Next-month forecast"),
        money(current),
        strong(&money(projected)),
        trend(change)
    )
}

fn vs_target_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let target = agg::total_target(ds);
    if target <= 0.0 {
        return "No hay metas de venta registradas.".to_string();
    }
    let current = agg::total_regional_revenue(ds);
    let attained = current / target * 100.0;
    let gap = current - target;
    let gap_text = if gap >= 0.0 {
        positive(&format!("+{}", money(gap)))
    } else {
        negative(&money(gap))
    };
    format!(
        "🎯 {}<br><br>• Venta acumulada: {}<br>• Meta: {}<br>• Cumplimiento: {}<br>\
         • Diferencia: {}<br><br>Regiones por debajo de su meta: {}.",
        strong("Ventas contra meta"),
        money(current),
        money(target),
        attainment(attained),
        gap_text,
        agg::regions_below_target(ds).len()
    )
}

fn vs_target_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let target = agg::total_target(ds);
    if target <= 0.0 {
        return "There are no sales targets on file.".to_string();
    }
    let current = agg::total_regional_revenue(ds);
    let attained = current / target * 100.0;
    let gap = current - target;
    let gap_text = if gap >= 0.0 {
        positive(&format!("+{}", money(gap)))
    } else {
        negative(&money(gap))
    };
    format!(
        "🎯 {}<br><br>• Revenue to date: {}<br>• Target: {}<br>• Attainment: {}<br>\
         • Difference: {}<br><br>Regions below target: {}.",
        strong("Revenue vs target"),
        money(current),
        money(target),
        attainment(attained),
        gap_text,
        agg::regions_below_target(ds).len()
    )
}

/// Revenue estimate for the requested timeframe, derived from monthly totals.
fn timeframe_revenue(ds: &FixtureDataset, timeframe: &str) -> f64 {
    let monthly = agg::total_revenue(ds);
    match timeframe {
        "today" | "yesterday" => monthly / DAYS_PER_MONTH,
        "week" => monthly / DAYS_PER_MONTH * 7.0,
        _ => monthly,
    }
}

fn summary_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let timeframe = ctx.classification.param("timeframe").unwrap_or("month");
    let label = match timeframe {
        "today" => "de hoy",
        "yesterday" => "de ayer",
        "week" => "de la semana",
        _ => "del mes",
    };
    let revenue = timeframe_revenue(ds, timeframe);
    let top = agg::top_products_by_revenue(ds, 1);
    let leader = match top.first() {
        Some(p) => format!("{} ({})", strong(&p.name), money(p.monthly_revenue)),
        None => "sin productos registrados".to_string(),
    };
    format!(
        "💵 {}<br><br>• Ventas estimadas: {}<br>• Unidades del mes: {}<br>\
         • Producto líder del mes: {}<br>• Margen ponderado: {}",
        strong(&format!("Ventas {}", label)),
        strong(&money(revenue)),
        units(agg::total_units(ds)),
        leader,
        pct(agg::weighted_margin_pct(ds))
    )
}

fn summary_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let timeframe = ctx.classification.param("timeframe").unwrap_or("month");
    let label = match timeframe {
        "today" => "Today's sales",
        "yesterday" => "Yesterday's sales",
        "week" => "This week's sales",
        _ => "This month's sales",
    };
    let revenue = timeframe_revenue(ds, timeframe);
    let top = agg::top_products_by_revenue(ds, 1);
    let leader = match top.first() {
        Some(p) => format!("{} ({})", strong(&p.name), money(p.monthly_revenue)),
        None => "no products on file".to_string(),
    };
    format!(
        "💵 {}<br><br>• Estimated sales: {}<br>• Units this month: {}<br>\
         • Leading product this month: {}<br>• Weighted margin: {}",
        strong(label),
        strong(&money(revenue)),
        units(agg::total_units(ds)),
        leader,
        pct(agg::weighted_margin_pct(ds))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;

    fn render(
        f: fn(&TemplateContext<'_>) -> String,
        ds: &FixtureDataset,
        classification: &Classification,
    ) -> String {
        f(&TemplateContext {
            dataset: ds,
            classification,
        })
    }

    fn with_timeframe(tf: &str) -> Classification {
        let mut c = Classification {
            category: Category::SalesSummary,
            confidence: 0.88,
            parameters: Default::default(),
        };
        c.parameters.insert("timeframe".to_string(), tf.to_string());
        c
    }

    #[test]
    fn test_promo_roi_names_best_and_worst() {
        let ds = FixtureDataset::standard();
        let text = render(promo_roi_en, &ds, &Classification::general());
        assert!(text.contains("Best performer is <strong>2x1 Salsa Verde Cuaresma</strong>"));
        assert!(text.contains("weakest is <strong>Combo Desayuno Frijoles</strong>"));
        assert!(text.contains("performance-negative"));
    }

    #[test]
    fn test_sales_summary_timeframes() {
        let ds = FixtureDataset::standard();
        let month = render(summary_en, &ds, &with_timeframe("month"));
        assert!(month.contains("This month's sales"));
        assert!(month.contains("$4,495,400"));

        let week = render(summary_en, &ds, &with_timeframe("week"));
        assert!(week.contains("This week's sales"));
        assert!(week.contains(&money(4_495_400.0 / 30.0 * 7.0)));

        let yesterday = render(summary_es, &ds, &with_timeframe("yesterday"));
        assert!(yesterday.contains("Ventas de ayer"));
        assert!(yesterday.contains(&money(4_495_400.0 / 30.0)));

        let default = render(summary_es, &ds, &Classification::general());
        assert!(default.contains("Ventas del mes"));
    }

    #[test]
    fn test_forecast_applies_trends() {
        let mut ds = FixtureDataset::standard();
        for p in &mut ds.products {
            p.trend_pct = 0.0;
        }
        assert_eq!(forecast_revenue(&ds), agg::total_revenue(&ds));
        let text = render(forecast_en, &ds, &Classification::general());
        assert!(text.contains("performance-neutral"));
    }

    #[test]
    fn test_empty_dataset_messages() {
        let ds = FixtureDataset::empty();
        let c = Classification::general();
        assert_eq!(
            render(promo_roi_en, &ds, &c),
            "There are no promotions on file to evaluate."
        );
        assert_eq!(render(vs_target_en, &ds, &c), "There are no sales targets on file.");
        assert!(render(summary_en, &ds, &c).contains("no products on file"));
    }
}
