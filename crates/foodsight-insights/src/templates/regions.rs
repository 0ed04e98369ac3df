//! Regional targets and sales-rep answers.

use std::collections::HashMap;

use foodsight_data::aggregates as agg;
use foodsight_data::Region;

use super::{insert, Template, TemplateContext};
use crate::classifier::Category;
use crate::format::*;

pub(super) fn register(map: &mut HashMap<Category, Template>) {
    insert(map, Category::RegionBelowTarget, below_target_es, below_target_en);
    insert(map, Category::RegionPerformance, region_es, region_en);
    insert(map, Category::TopSalesRep, top_rep_es, top_rep_en);
    insert(map, Category::SalesRepPerformance, reps_es, reps_en);
}

fn no_regions(spanish: bool) -> String {
    if spanish {
        "No hay regiones con metas registradas.".to_string()
    } else {
        "There are no regions with targets on file.".to_string()
    }
}

/// The region named in the question, if any and if it exists.
fn requested_region<'a>(ctx: &TemplateContext<'a>) -> Option<&'a Region> {
    let name = ctx.classification.param("region")?;
    agg::find_region(ctx.dataset, name)
}

fn below_target_es(ctx: &TemplateContext<'_>) -> String {
    let behind = agg::regions_below_target(ctx.dataset);
    if behind.is_empty() {
        return format!(
            "✅ {}<br><br>Todas las regiones están en o por encima de su meta.",
            strong("Metas regionales")
        );
    }
    let lines = behind.iter().map(|r| {
        format!(
            "{}: {} de {} ({}) · faltan {} · responsable {}",
            strong(&r.name),
            money(r.current_revenue),
            money(r.target_revenue),
            attainment(r.attainment_pct()),
            negative(&money(-r.gap())),
            r.rep
        )
    });
    let gap: f64 = behind.iter().map(|r| -r.gap()).sum();
    format!(
        "📍 {}<br><br>{}<br><br>Brecha combinada: {}. La región más rezagada es {}; \
         conviene reforzar visitas a sus clientes clave.",
        strong("Regiones por debajo de la meta"),
        bullets(lines),
        negative(&money(gap)),
        strong(&behind[0].name)
    )
}

fn below_target_en(ctx: &TemplateContext<'_>) -> String {
    let behind = agg::regions_below_target(ctx.dataset);
    if behind.is_empty() {
        return format!(
            "✅ {}<br><br>Every region is at or above its target.",
            strong("Regional targets")
        );
    }
    let lines = behind.iter().map(|r| {
        format!(
            "{}: {} of {} ({}) · {} short · owner {}",
            strong(&r.name),
            money(r.current_revenue),
            money(r.target_revenue),
            attainment(r.attainment_pct()),
            negative(&money(-r.gap())),
            r.rep
        )
    });
    let gap: f64 = behind.iter().map(|r| -r.gap()).sum();
    format!(
        "📍 {}<br><br>{}<br><br>Combined gap: {}. The furthest behind is {}; \
         step up visits to its key accounts.",
        strong("Regions below target"),
        bullets(lines),
        negative(&money(gap)),
        strong(&behind[0].name)
    )
}

fn region_es(ctx: &TemplateContext<'_>) -> String {
    if let Some(region) = requested_region(ctx) {
        let clients = agg::clients_in_region(ctx.dataset, &region.name);
        let client_lines = clients
            .iter()
            .map(|c| format!("{}: {}", c.name, money(c.monthly_volume)));
        let mut text = format!(
            "📍 {}<br><br>• Ventas: {}<br>• Meta: {}<br>• Cumplimiento: {}<br>• Responsable: {}",
            strong(&format!("Región {}", region.name)),
            money(region.current_revenue),
            money(region.target_revenue),
            attainment(region.attainment_pct()),
            region.rep
        );
        if !clients.is_empty() {
            text.push_str(&format!("<br><br>{}<br>{}", strong("Clientes:"), bullets(client_lines)));
        }
        return text;
    }

    let ranked = agg::regions_by_attainment(ctx.dataset);
    if ranked.is_empty() {
        return no_regions(true);
    }
    let lines = ranked.iter().map(|r| {
        format!(
            "{}: {} de {} ({})",
            strong(&r.name),
            money(r.current_revenue),
            money(r.target_revenue),
            attainment(r.attainment_pct())
        )
    });
    format!(
        "🗺️ {}<br><br>{}<br><br>Total: {} contra una meta de {} ({}).",
        strong("Desempeño por región"),
        numbered(lines),
        money(agg::total_regional_revenue(ctx.dataset)),
        money(agg::total_target(ctx.dataset)),
        attainment(pct_of(
            agg::total_regional_revenue(ctx.dataset),
            agg::total_target(ctx.dataset)
        ))
    )
}

fn region_en(ctx: &TemplateContext<'_>) -> String {
    if let Some(region) = requested_region(ctx) {
        let clients = agg::clients_in_region(ctx.dataset, &region.name);
        let client_lines = clients
            .iter()
            .map(|c| format!("{}: {}", c.name, money(c.monthly_volume)));
        let mut text = format!(
            "📍 {}<br><br>• Sales: {}<br>• Target: {}<br>• Attainment: {}<br>• Owner: {}",
            strong(&format!("{} region", region.name)),
            money(region.current_revenue),
            money(region.target_revenue),
            attainment(region.attainment_pct()),
            region.rep
        );
        if !clients.is_empty() {
            text.push_str(&format!("<br><br>{}<br>{}", strong("Clients:"), bullets(client_lines)));
        }
        return text;
    }

    let ranked = agg::regions_by_attainment(ctx.dataset);
    if ranked.is_empty() {
        return no_regions(false);
    }
    let lines = ranked.iter().map(|r| {
        format!(
            "{}: {} of {} ({})",
            strong(&r.name),
            money(r.current_revenue),
            money(r.target_revenue),
            attainment(r.attainment_pct())
        )
    });
    format!(
        "🗺️ {}<br><br>{}<br><br>Total: {} against a target of {} ({}).",
        strong("Performance by region"),
        numbered(lines),
        money(agg::total_regional_revenue(ctx.dataset)),
        money(agg::total_target(ctx.dataset)),
        attainment(pct_of(
            agg::total_regional_revenue(ctx.dataset),
            agg::total_target(ctx.dataset)
        ))
    )
}

fn top_rep_es(ctx: &TemplateContext<'_>) -> String {
    let ranked = agg::reps_by_performance(ctx.dataset);
    let Some(best) = ranked.first() else {
        return "No hay vendedores registrados.".to_string();
    };
    format!(
        "🏅 {}<br><br>{} ({}) lidera con {} de su cuota: {} vendidos contra {} de meta.<br><br>\
         El promedio del equipo es {}.",
        strong("Mejor vendedor del periodo"),
        strong(&best.name),
        best.region,
        attainment(best.performance_pct()),
        money(best.achieved),
        money(best.target),
        pct(agg::average_rep_performance(ctx.dataset))
    )
}

fn top_rep_en(ctx: &TemplateContext<'_>) -> String {
    let ranked = agg::reps_by_performance(ctx.dataset);
    let Some(best) = ranked.first() else {
        return "There are no sales reps on file.".to_string();
    };
    format!(
        "🏅 {}<br><br>{} ({}) leads at {} of quota: {} sold against a {} target.<br><br>\
         Team average is {}.",
        strong("Top sales rep this period"),
        strong(&best.name),
        best.region,
        attainment(best.performance_pct()),
        money(best.achieved),
        money(best.target),
        pct(agg::average_rep_performance(ctx.dataset))
    )
}

fn reps_es(ctx: &TemplateContext<'_>) -> String {
    let ranked = agg::reps_by_performance(ctx.dataset);
    if ranked.is_empty() {
        return "No hay vendedores registrados.".to_string();
    }
    let lines = ranked.iter().map(|r| {
        format!(
            "{} ({}): {} de {} · {}",
            strong(&r.name),
            r.region,
            money(r.achieved),
            money(r.target),
            attainment(r.performance_pct())
        )
    });
    format!(
        "👥 {}<br><br>{}<br><br>Promedio del equipo: {}.",
        strong("Desempeño del equipo de ventas"),
        numbered(lines),
        pct(agg::average_rep_performance(ctx.dataset))
    )
}

fn reps_en(ctx: &TemplateContext<'_>) -> String {
    let ranked = agg::reps_by_performance(ctx.dataset);
    if ranked.is_empty() {
        return "There are no sales reps on file.".to_string();
    }
    let lines = ranked.iter().map(|r| {
        format!(
            "{} ({}): {} of {} · {}",
            strong(&r.name),
            r.region,
            money(r.achieved),
            money(r.target),
            attainment(r.performance_pct())
        )
    });
    format!(
        "👥 {}<br><br>{}<br><br>Team average: {}.",
        strong("Sales team performance"),
        numbered(lines),
        pct(agg::average_rep_performance(ctx.dataset))
    )
}

fn pct_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
