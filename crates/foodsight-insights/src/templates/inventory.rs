//! Stockouts, backorders and low-stock answers.

use std::collections::HashMap;

use foodsight_data::aggregates as agg;

use super::{insert, Template, TemplateContext};
use crate::classifier::Category;
use crate::format::*;

pub(super) fn register(map: &mut HashMap<Category, Template>) {
    insert(map, Category::Stockouts, stockouts_es, stockouts_en);
    insert(map, Category::Backorders, backorders_es, backorders_en);
    insert(map, Category::LowStock, low_stock_es, low_stock_en);
}

fn stockouts_es(ctx: &TemplateContext<'_>) -> String {
    let records = agg::out_of_stock_records(ctx.dataset);
    if records.is_empty() {
        return format!(
            "📦 {}<br><br>Actualmente no hay productos agotados en ningún CEDIS. {}",
            strong("Estado de inventario"),
            positive("Todas las sucursales tienen existencias.")
        );
    }

    let lines = records.iter().map(|r| {
        format!(
            "{} — {} (reabasto en {} días)",
            strong(&r.product),
            r.branch,
            r.days_to_restock
        )
    });
    let backorders = agg::total_backorders(ctx.dataset);

    format!(
        "🚨 {}<br><br>Hay {} registros de sucursal sin existencias:<br>{}<br><br>\
         Pedidos pendientes acumulados: {} unidades.<br><br>\
         {}<br>• Priorizar producción de los SKUs agotados en la siguiente corrida.<br>\
         • Reasignar inventario entre CEDIS donde haya excedente.<br>\
         • Informar a las cadenas afectadas la fecha estimada de reabasto.",
        strong("Productos agotados"),
        negative(&records.len().to_string()),
        bullets(lines),
        units(backorders),
        strong("Acciones recomendadas:")
    )
}

fn stockouts_en(ctx: &TemplateContext<'_>) -> String {
    let records = agg::out_of_stock_records(ctx.dataset);
    if records.is_empty() {
        return format!(
            "📦 {}<br><br>No products are currently out of stock at any branch. {}",
            strong("Inventory status"),
            positive("Every branch has stock on hand.")
        );
    }

    let lines = records.iter().map(|r| {
        format!(
            "{} — {} (restock in {} days)",
            strong(&r.product),
            r.branch,
            r.days_to_restock
        )
    });
    let backorders = agg::total_backorders(ctx.dataset);

    format!(
        "🚨 {}<br><br>{} branch records are out of stock:<br>{}<br><br>\
         Accumulated backorders: {} units.<br><br>\
         {}<br>• Prioritize the out-of-stock SKUs in the next production run.<br>\
         • Rebalance inventory between branches with surplus.<br>\
         • Tell affected chains the expected restock date.",
        strong("Out-of-stock products"),
        negative(&records.len().to_string()),
        bullets(lines),
        units(backorders),
        strong("Recommended actions:")
    )
}

fn backorders_es(ctx: &TemplateContext<'_>) -> String {
    let products = agg::products_with_backorders(ctx.dataset);
    let Some(worst) = products.first() else {
        return format!(
            "✅ {}<br><br>No hay pedidos pendientes por surtir en este momento.",
            strong("Pedidos pendientes")
        );
    };
    let total = agg::total_backorders(ctx.dataset);
    let lines = products.iter().map(|p| {
        format!(
            "{}: {} unidades pendientes (existencia {})",
            strong(&p.name),
            units(p.backorders as u64),
            units(p.stock_units as u64)
        )
    });

    format!(
        "📋 {}<br><br>Total de unidades pendientes: {}<br><br>{}<br><br>\
         El mayor rezago es {} con {} unidades. Recomendamos programar un turno extra \
         de producción para liberar estos pedidos esta semana.",
        strong("Pedidos pendientes (backorders)"),
        negative(&units(total)),
        bullets(lines),
        strong(&worst.name),
        units(worst.backorders as u64)
    )
}

fn backorders_en(ctx: &TemplateContext<'_>) -> String {
    let products = agg::products_with_backorders(ctx.dataset);
    let Some(worst) = products.first() else {
        return format!(
            "✅ {}<br><br>There are no open backorders right now.",
            strong("Backorders")
        );
    };
    let total = agg::total_backorders(ctx.dataset);
    let lines = products.iter().map(|p| {
        format!(
            "{}: {} units on backorder ({} in stock)",
            strong(&p.name),
            units(p.backorders as u64),
            units(p.stock_units as u64)
        )
    });

    format!(
        "📋 {}<br><br>Total units on backorder: {}<br><br>{}<br><br>\
         The largest gap is {} with {} units. Consider an extra production shift \
         to clear these orders this week.",
        strong("Backorders"),
        negative(&units(total)),
        bullets(lines),
        strong(&worst.name),
        units(worst.backorders as u64)
    )
}

fn low_stock_es(ctx: &TemplateContext<'_>) -> String {
    let low = agg::low_stock_products(ctx.dataset);
    let out = agg::out_of_stock_products(ctx.dataset);
    if low.is_empty() && out.is_empty() {
        return format!(
            "✅ {}<br><br>Ningún producto está por debajo de su punto de reorden.",
            strong("Niveles de inventario")
        );
    }

    let mut text = format!("⚠️ {}<br><br>", strong("Productos por reabastecer"));
    if low.is_empty() {
        text.push_str("No hay productos con existencia baja.<br>");
    } else {
        let lines = low.iter().map(|p| {
            format!(
                "{}: {} unidades (punto de reorden {})",
                strong(&p.name),
                neutral(&units(p.stock_units as u64)),
                units(p.reorder_point as u64)
            )
        });
        text.push_str(&format!("Existencia baja:<br>{}<br>", bullets(lines)));
    }
    if !out.is_empty() {
        let names = out.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
        text.push_str(&format!("<br>Ya agotados: {}<br>", negative(&names)));
    }
    text.push_str("<br>Sugerencia: emitir órdenes de producción antes del cierre semanal.");
    text
}

fn low_stock_en(ctx: &TemplateContext<'_>) -> String {
    let low = agg::low_stock_products(ctx.dataset);
    let out = agg::out_of_stock_products(ctx.dataset);
    if low.is_empty() && out.is_empty() {
        return format!(
            "✅ {}<br><br>No product is below its reorder point.",
            strong("Stock levels")
        );
    }

    let mut text = format!("⚠️ {}<br><br>", strong("Products to replenish"));
    if low.is_empty() {
        text.push_str("No products are running low.<br>");
    } else {
        let lines = low.iter().map(|p| {
            format!(
                "{}: {} units (reorder point {})",
                strong(&p.name),
                neutral(&units(p.stock_units as u64)),
                units(p.reorder_point as u64)
            )
        });
        text.push_str(&format!("Low stock:<br>{}<br>", bullets(lines)));
    }
    if !out.is_empty() {
        let names = out.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
        text.push_str(&format!("<br>Already out of stock: {}<br>", negative(&names)));
    }
    text.push_str("<br>Suggestion: issue production orders before the weekly close.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use foodsight_data::FixtureDataset;

    fn render(f: fn(&TemplateContext<'_>) -> String, ds: &FixtureDataset) -> String {
        let classification = Classification::general();
        f(&TemplateContext {
            dataset: ds,
            classification: &classification,
        })
    }

    #[test]
    fn test_stockouts_list_every_out_of_stock_record() {
        let ds = FixtureDataset::standard();
        let text = render(stockouts_en, &ds);
        let records = agg::out_of_stock_records(&ds);
        for r in &records {
            assert!(text.contains(&format!("{}</strong> — {}", r.product, r.branch)));
        }
        assert!(!text.contains("Tortillas de Maíz 1kg"));
        assert_eq!(text.matches("restock in").count(), records.len());
    }

    #[test]
    fn test_empty_states() {
        let ds = FixtureDataset::empty();
        assert!(render(stockouts_es, &ds).contains("no hay productos agotados"));
        assert!(render(stockouts_en, &ds).contains("No products are currently out of stock"));
        assert!(render(backorders_en, &ds).contains("no open backorders"));
        assert!(render(low_stock_en, &ds).contains("No product is below its reorder point"));
    }

    #[test]
    fn test_backorders_total() {
        let ds = FixtureDataset::standard();
        let text = render(backorders_en, &ds);
        assert!(text.contains(&units(agg::total_backorders(&ds))));
        assert!(text.contains("Chiles Chipotle 200g"));
    }
}
