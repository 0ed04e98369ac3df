//! Overview, executive summary, recommendations, help and greeting.

use std::collections::HashMap;

use foodsight_data::aggregates as agg;
use foodsight_data::FixtureDataset;

use super::{insert, Template, TemplateContext};
use crate::classifier::Category;
use crate::format::*;

pub(super) fn register(map: &mut HashMap<Category, Template>) {
    insert(map, Category::Recommendations, recommendations_es, recommendations_en);
    insert(map, Category::ExecutiveSummary, executive_es, executive_en);
    insert(map, Category::Help, help_es, help_en);
    insert(map, Category::Greeting, greeting_es, greeting_en);
    insert(map, Category::GeneralQuery, overview_es, overview_en);
}

fn top_product_line(ds: &FixtureDataset, none: &str) -> String {
    match agg::top_products_by_revenue(ds, 1).first() {
        Some(p) => format!("{} ({})", strong(&p.name), money(p.monthly_revenue)),
        None => none.to_string(),
    }
}

/// The general business overview.
pub(super) fn overview_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    format!(
        "📊 {}<br><br>\
         • Ventas del mes: {}<br>\
         • Producto líder: {}<br>\
         • Margen ponderado: {}<br>\
         • Cartera vencida: {} en {} clientes<br>\
         • Registros sin existencia: {}<br>\
         • Regiones debajo de la meta: {} de {}<br><br>\
         Puedo profundizar en inventario, márgenes, clientes, regiones, promociones o canales.",
        strong(&format!("Análisis exhaustivo de {}", ds.company)),
        strong(&money(agg::total_revenue(ds))),
        top_product_line(ds, "sin productos registrados"),
        pct(agg::weighted_margin_pct(ds)),
        negative(&money(agg::overdue_total(ds))),
        agg::overdue_clients(ds).len(),
        agg::out_of_stock_records(ds).len(),
        agg::regions_below_target(ds).len(),
        ds.regions.len()
    )
}

pub(super) fn overview_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    format!(
        "📊 {}<br><br>\
         • Monthly sales: {}<br>\
         • Top product: {}<br>\
         • Weighted margin: {}<br>\
         • Overdue receivables: {} across {} clients<br>\
         • Out-of-stock records: {}<br>\
         • Regions below target: {} of {}<br><br>\
         I can dig into inventory, margins, clients, regions, promotions or channels.",
        strong(&format!("Comprehensive analysis of {}", ds.company)),
        strong(&money(agg::total_revenue(ds))),
        top_product_line(ds, "no products on file"),
        pct(agg::weighted_margin_pct(ds)),
        negative(&money(agg::overdue_total(ds))),
        agg::overdue_clients(ds).len(),
        agg::out_of_stock_records(ds).len(),
        agg::regions_below_target(ds).len(),
        ds.regions.len()
    )
}

fn executive_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let target = agg::total_target(ds);
    let attained = if target > 0.0 {
        agg::total_regional_revenue(ds) / target * 100.0
    } else {
        0.0
    };
    let mut kpis = vec![
        format!("Ventas mensuales: {}", strong(&money(agg::total_revenue(ds)))),
        format!("Utilidad bruta: {}", money(agg::gross_profit(ds))),
        format!("Cumplimiento de meta: {}", attainment(attained)),
        format!("Desempeño promedio de vendedores: {}", pct(agg::average_rep_performance(ds))),
    ];
    if let Some(r) = agg::regions_by_attainment(ds).first() {
        kpis.push(format!("Mejor región: {} ({})", r.name, attainment(r.attainment_pct())));
    }
    if let Some(p) = agg::promotions_by_roi(ds).first() {
        kpis.push(format!("Mejor promoción: {} (ROI {})", p.name, pct(p.roi_pct())));
    }
    let alerts = [
        (agg::out_of_stock_records(ds).len(), "registros sin existencia"),
        (agg::overdue_clients(ds).len(), "clientes con pagos vencidos"),
        (agg::chains_below_budget(ds).len(), "cadenas bajo presupuesto"),
    ];
    let alert_lines: Vec<String> = alerts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", negative(&n.to_string()), label))
        .collect();
    let alerts_text = if alert_lines.is_empty() {
        positive("Sin alertas activas.")
    } else {
        bullets(alert_lines)
    };
    format!(
        "📈 {}<br><br>{}<br><br>{}<br>{}",
        strong("Resumen ejecutivo"),
        bullets(kpis),
        strong("Alertas:"),
        alerts_text
    )
}

fn executive_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let target = agg::total_target(ds);
    let attained = if target > 0.0 {
        agg::total_regional_revenue(ds) / target * 100.0
    } else {
        0.0
    };
    let mut kpis = vec![
        format!("Monthly sales: {}", strong(&money(agg::total_revenue(ds)))),
        format!("Gross profit: {}", money(agg::gross_profit(ds))),
        format!("Target attainment: {}", attainment(attained)),
        format!("Average rep performance: {}", pct(agg::average_rep_performance(ds))),
    ];
    if let Some(r) = agg::regions_by_attainment(ds).first() {
        kpis.push(format!("Best region: {} ({})", r.name, attainment(r.attainment_pct())));
    }
    if let Some(p) = agg::promotions_by_roi(ds).first() {
        kpis.push(format!("Best promotion: {} (ROI {})", p.name, pct(p.roi_pct())));
    }
    let alerts = [
        (agg::out_of_stock_records(ds).len(), "out-of-stock records"),
        (agg::overdue_clients(ds).len(), "clients overdue"),
        (agg::chains_below_budget(ds).len(), "chains below budget"),
    ];
    let alert_lines: Vec<String> = alerts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", negative(&n.to_string()), label))
        .collect();
    let alerts_text = if alert_lines.is_empty() {
        positive("No active alerts.")
    } else {
        bullets(alert_lines)
    };
    format!(
        "📈 {}<br><br>{}<br><br>{}<br>{}",
        strong("Executive summary"),
        bullets(kpis),
        strong("Alerts:"),
        alerts_text
    )
}

fn recommendations_es(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let mut actions = Vec::new();
    if let Some(r) = agg::out_of_stock_records(ds).first() {
        actions.push(format!(
            "Reabastecer {} en {} y los demás SKUs agotados.",
            strong(&r.product),
            r.branch
        ));
    }
    if let Some(c) = agg::overdue_clients(ds).first() {
        actions.push(format!(
            "Cobrar a {} ({} con {} días de atraso).",
            strong(&c.name),
            money(c.overdue_amount),
            c.overdue_days
        ));
    }
    if let Some(r) = agg::regions_below_target(ds).first() {
        actions.push(format!(
            "Reforzar la región {} (cumplimiento {}).",
            strong(&r.name),
            attainment(r.attainment_pct())
        ));
    }
    if let Some(p) = agg::promotions_by_roi(ds).first() {
        actions.push(format!(
            "Repetir la promoción {} (ROI {}).",
            strong(&p.name),
            positive(&pct(p.roi_pct()))
        ));
    }
    if let Some(p) = agg::declining_products(ds).first() {
        actions.push(format!(
            "Revisar precio y exhibición de {} ({}).",
            strong(&p.name),
            trend(p.trend_pct)
        ));
    }
    if actions.is_empty() {
        return format!(
            "✅ {}<br><br>No hay acciones urgentes con la información disponible.",
            strong("Recomendaciones")
        );
    }
    format!("💡 {}<br><br>{}", strong("Recomendaciones prioritarias"), numbered(actions))
}

fn recommendations_en(ctx: &TemplateContext<'_>) -> String {
    let ds = ctx.dataset;
    let mut actions = Vec::new();
    if let Some(r) = agg::out_of_stock_records(ds).first() {
        actions.push(format!(
            "Restock {} at {} and the other out-of-stock SKUs.",
            strong(&r.product),
            r.branch
        ));
    }
    if let Some(c) = agg::overdue_clients(ds).first() {
        actions.push(format!(
            "Collect from {} ({} overdue by {} days).",
            strong(&c.name),
            money(c.overdue_amount),
            c.overdue_days
        ));
    }
    if let Some(r) = agg::regions_below_target(ds).first() {
        actions.push(format!(
            "Support the {} region (attainment {}).",
            strong(&r.name),
            attainment(r.attainment_pct())
        ));
    }
    if let Some(p) = agg::promotions_by_roi(ds).first() {
        actions.push(format!(
            "Repeat the {} promotion (ROI {}).",
            strong(&p.name),
            positive(&pct(p.roi_pct()))
        ));
    }
    if let Some(p) = agg::declining_products(ds).first() {
        actions.push(format!(
            "Review price and placement for {} ({}).",
            strong(&p.name),
            trend(p.trend_pct)
        ));
    }
    if actions.is_empty() {
        return format!(
            "✅ {}<br><br>Nothing urgent stands out in the available data.",
            strong("Recommendations")
        );
    }
    format!("💡 {}<br><br>{}", strong("Priority recommendations"), numbered(actions))
}

fn help_es(_ctx: &TemplateContext<'_>) -> String {
    format!(
        "🤖 {}<br><br>{}<br><br>Pregunta en español o en inglés.",
        strong("Esto es lo que puedo responder"),
        bullets([
            "Inventario: productos agotados, pedidos pendientes, existencia baja",
            "Productos: márgenes, más vendidos, en declive, por categoría",
            "Clientes: cartera vencida, riesgo, facturas, términos de pago",
            "Regiones y vendedores: metas, cumplimiento, mejor vendedor",
            "Comercial: promociones y ROI, canales, pronóstico, ventas por periodo",
            "Resumen ejecutivo y recomendaciones",
        ])
    )
}

fn help_en(_ctx: &TemplateContext<'_>) -> String {
    format!(
        "🤖 {}<br><br>{}<br><br>Ask in English or Spanish.",
        strong("Here is what I can answer"),
        bullets([
            "Inventory: stockouts, backorders, low stock",
            "Products: margins, best sellers, declining items, categories",
            "Clients: overdue accounts, risk, invoices, payment terms",
            "Regions and reps: targets, attainment, top performer",
            "Commercial: promotions and ROI, channels, forecast, sales by period",
            "Executive summary and recommendations",
        ])
    )
}

fn greeting_es(ctx: &TemplateContext<'_>) -> String {
    format!(
        "👋 ¡Hola! Soy el asistente de inteligencia comercial de {}. \
         Este mes llevamos {} en ventas. ¿Qué te gustaría revisar?",
        strong(&ctx.dataset.company),
        strong(&money(agg::total_revenue(ctx.dataset)))
    )
}

fn greeting_en(ctx: &TemplateContext<'_>) -> String {
    format!(
        "👋 Hello! I'm the business intelligence assistant for {}. \
         Sales this month stand at {}. What would you like to look at?",
        strong(&ctx.dataset.company),
        strong(&money(agg::total_revenue(ctx.dataset)))
    )
}
