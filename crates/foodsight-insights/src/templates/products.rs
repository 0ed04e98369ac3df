//! Product margin, trend and category answers.

use std::collections::HashMap;

use foodsight_data::aggregates as agg;

use super::{insert, Template, TemplateContext};
use crate::classifier::Category;
use crate::format::*;

const TOP_N: usize = 5;

pub(super) fn register(map: &mut HashMap<Category, Template>) {
    insert(map, Category::TopMarginProducts, top_margin_es, top_margin_en);
    insert(map, Category::LowMarginProducts, low_margin_es, low_margin_en);
    insert(map, Category::MarginOverview, margin_overview_es, margin_overview_en);
    insert(map, Category::DecliningProducts, declining_es, declining_en);
    insert(map, Category::TopProducts, top_products_es, top_products_en);
    insert(map, Category::CategoryPerformance, categories_es, categories_en);
}

fn no_products(spanish: bool) -> String {
    if spanish {
        "No hay productos registrados en el catálogo para analizar.".to_string()
    } else {
        "There are no products in the catalog to analyze.".to_string()
    }
}

fn top_margin_es(ctx: &TemplateContext<'_>) -> String {
    let top = agg::top_margin_products(ctx.dataset, TOP_N);
    if top.is_empty() {
        return no_products(true);
    }
    let lines = top.iter().map(|p| {
        format!(
            "{} — margen {} · ventas {} · tendencia {}",
            strong(&p.name),
            positive(&pct(p.margin_pct)),
            money(p.monthly_revenue),
            trend(p.trend_pct)
        )
    });
    format!(
        "💰 {}<br><br>{}<br><br>Margen promedio ponderado de la compañía: {}.<br>\
         Impulsar estos productos en exhibición y promociones eleva la rentabilidad total.",
        strong("Productos con mayor margen"),
        numbered(lines),
        strong(&pct(agg::weighted_margin_pct(ctx.dataset)))
    )
}

fn top_margin_en(ctx: &TemplateContext<'_>) -> String {
    let top = agg::top_margin_products(ctx.dataset, TOP_N);
    if top.is_empty() {
        return no_products(false);
    }
    let lines = top.iter().map(|p| {
        format!(
            "{} — margin {} · sales {} · trend {}",
            strong(&p.name),
            positive(&pct(p.margin_pct)),
            money(p.monthly_revenue),
            trend(p.trend_pct)
        )
    });
    format!(
        "💰 {}<br><br>{}<br><br>Company revenue-weighted margin: {}.<br>\
         Giving these products more shelf space and promotion lifts overall profitability.",
        strong("Highest-margin products"),
        numbered(lines),
        strong(&pct(agg::weighted_margin_pct(ctx.dataset)))
    )
}

fn low_margin_es(ctx: &TemplateContext<'_>) -> String {
    let low = agg::lowest_margin_products(ctx.dataset, 3);
    if low.is_empty() {
        return no_products(true);
    }
    let lines = low.iter().map(|p| {
        format!(
            "{} — margen {} · ventas {}",
            strong(&p.name),
            negative(&pct(p.margin_pct)),
            money(p.monthly_revenue)
        )
    });
    format!(
        "📉 {}<br><br>{}<br><br>Revisar costos de materia prima y precio de lista de estos \
         productos; un ajuste de 2 puntos en precio tiene impacto directo en margen.",
        strong("Productos con menor margen"),
        numbered(lines)
    )
}

fn low_margin_en(ctx: &TemplateContext<'_>) -> String {
    let low = agg::lowest_margin_products(ctx.dataset, 3);
    if low.is_empty() {
        return no_products(false);
    }
    let lines = low.iter().map(|p| {
        format!(
            "{} — margin {} · sales {}",
            strong(&p.name),
            negative(&pct(p.margin_pct)),
            money(p.monthly_revenue)
        )
    });
    format!(
        "📉 {}<br><br>{}<br><br>Review raw-material costs and list prices for these products; \
         a 2-point price adjustment flows straight to margin.",
        strong("Lowest-margin products"),
        numbered(lines)
    )
}

fn margin_overview_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let best = agg::top_margin_products(ds, 1);
    let worst = agg::lowest_margin_products(ds, 1);
    let (Some(best), Some(worst)) = (best.first(), worst.first()) else {
        return no_products(true);
    };
    format!(
        "📊 {}<br><br>• Ventas mensuales: {}<br>• Utilidad bruta: {}<br>\
         • Margen ponderado: {}<br>• Mayor margen: {} ({})<br>• Menor margen: {} ({})",
        strong("Rentabilidad"),
        money(agg::total_revenue(ds)),
        money(agg::gross_profit(ds)),
        strong(&pct(agg::weighted_margin_pct(ds))),
        best.name,
        positive(&pct(best.margin_pct)),
        worst.name,
        negative(&pct(worst.margin_pct))
    )
}

fn margin_overview_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let best = agg::top_margin_products(ds, 1);
    let worst = agg::lowest_margin_products(ds, 1);
    let (Some(best), Some(worst)) = (best.first(), worst.first()) else {
        return no_products(false);
    };
    format!(
        "📊 {}<br><br>• Monthly sales: {}<br>• Gross profit: {}<br>\
         • Weighted margin: {}<br>• Highest margin: {} ({})<br>• Lowest margin: {} ({})",
        strong("Profitability"),
        money(agg::total_revenue(ds)),
        money(agg::gross_profit(ds)),
        strong(&pct(agg::weighted_margin_pct(ds))),
        best.name,
        positive(&pct(best.margin_pct)),
        worst.name,
        negative(&pct(worst.margin_pct))
    )
}

fn declining_es(ctx: &TemplateContext<'_>) -> String {
    let declining = agg::declining_products(ctx.dataset);
    if declining.is_empty() {
        return format!(
            "✅ {}<br><br>Ningún producto muestra tendencia negativa este mes.",
            strong("Tendencias de venta")
        );
    }
    let lines = declining.iter().map(|p| {
        format!(
            "{}: {} (ventas {})",
            strong(&p.name),
            trend(p.trend_pct),
            money(p.monthly_revenue)
        )
    });
    let at_risk: f64 = declining.iter().map(|p| p.monthly_revenue).sum();
    format!(
        "📉 {}<br><br>{}<br><br>Ingreso mensual expuesto: {}.<br>\
         Recomendamos revisar precio en anaquel y activar degustaciones para {}.",
        strong("Productos en declive"),
        bullets(lines),
        negative(&money(at_risk)),
        strong(&declining[0].name)
    )
}

fn declining_en(ctx: &TemplateContext<'_>) -> String {
    let declining = agg::declining_products(ctx.dataset);
    if declining.is_empty() {
        return format!(
            "✅ {}<br><br>No product shows a negative trend this month.",
            strong("Sales trends")
        );
    }
    let lines = declining.iter().map(|p| {
        format!(
            "{}: {} (sales {})",
            strong(&p.name),
            trend(p.trend_pct),
            money(p.monthly_revenue)
        )
    });
    let at_risk: f64 = declining.iter().map(|p| p.monthly_revenue).sum();
    format!(
        "📉 {}<br><br>{}<br><br>Monthly revenue exposed: {}.<br>\
         We suggest reviewing shelf price and running in-store tastings for {}.",
        strong("Declining products"),
        bullets(lines),
        negative(&money(at_risk)),
        strong(&declining[0].name)
    )
}

fn top_products_es(ctx: &TemplateContext<'_>) -> String {
    let top = agg::top_products_by_revenue(ctx.dataset, TOP_N);
    if top.is_empty() {
        return no_products(true);
    }
    let total = agg::total_revenue(ctx.dataset);
    let lines = top.iter().map(|p| {
        format!(
            "{} — {} ({} del total) · {} unidades · {}",
            strong(&p.name),
            money(p.monthly_revenue),
            pct(share(p.monthly_revenue, total)),
            units(p.monthly_units as u64),
            trend(p.trend_pct)
        )
    });
    format!(
        "🏆 {}<br><br>{}",
        strong("Productos más vendidos del mes"),
        numbered(lines)
    )
}

fn top_products_en(ctx: &TemplateContext<'_>) -> String {
    let top = agg::top_products_by_revenue(ctx.dataset, TOP_N);
    if top.is_empty() {
        return no_products(false);
    }
    let total = agg::total_revenue(ctx.dataset);
    let lines = top.iter().map(|p| {
        format!(
            "{} — {} ({} of total) · {} units · {}",
            strong(&p.name),
            money(p.monthly_revenue),
            pct(share(p.monthly_revenue, total)),
            units(p.monthly_units as u64),
            trend(p.trend_pct)
        )
    });
    format!(
        "🏆 {}<br><br>{}",
        strong("Best-selling products this month"),
        numbered(lines)
    )
}

fn categories_es(ctx: &TemplateContext<'_>) -> String {
    let rollup = agg::category_rollup(ctx.dataset);
    if rollup.is_empty() {
        return no_products(true);
    }
    let lines = rollup.iter().map(|c| {
        format!(
            "{} ({} productos): ventas {} · margen {} · tendencia {}",
            strong(&c.category),
            c.products,
            money(c.revenue),
            pct(c.margin_pct),
            trend(c.trend_pct)
        )
    });
    format!("🗂️ {}<br><br>{}", strong("Desempeño por categoría"), bullets(lines))
}

fn categories_en(ctx: &TemplateContext<'_>) -> String {
    let rollup = agg::category_rollup(ctx.dataset);
    if rollup.is_empty() {
        return no_products(false);
    }
    let lines = rollup.iter().map(|c| {
        format!(
            "{} ({} products): sales {} · margin {} · trend {}",
            strong(&c.category),
            c.products,
            money(c.revenue),
            pct(c.margin_pct),
            trend(c.trend_pct)
        )
    });
    format!("🗂️ {}<br><br>{}", strong("Performance by category"), bullets(lines))
}

fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
