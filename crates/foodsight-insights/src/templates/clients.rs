//! Client, receivables and invoice answers.

use std::collections::HashMap;

use foodsight_data::aggregates as agg;
use foodsight_data::InvoiceStatus;

use super::{insert, Template, TemplateContext};
use crate::classifier::Category;
use crate::format::*;

pub const NO_OVERDUE_ES: &str = "Actualmente no hay clientes con pagos vencidos.";
pub const NO_OVERDUE_EN: &str = "Currently no clients are overdue.";

pub(super) fn register(map: &mut HashMap<Category, Template>) {
    insert(map, Category::ChainBelowBudget, chains_es, chains_en);
    insert(map, Category::OverdueClients, overdue_es, overdue_en);
    insert(map, Category::HighRiskClients, risk_es, risk_en);
    insert(map, Category::PaymentTerms, terms_es, terms_en);
    insert(map, Category::PendingInvoices, invoices_es, invoices_en);
    insert(map, Category::TopClients, top_clients_es, top_clients_en);
}

fn chains_es(ctx: &TemplateContext<'_>) -> String {
    let chains = agg::chains_below_budget(ctx.dataset);
    if chains.is_empty() {
        return format!(
            "✅ {}<br><br>Todas las cadenas están en o por encima de su presupuesto mensual.",
            strong("Cadenas vs presupuesto")
        );
    }
    let gap: f64 = chains.iter().map(|c| c.monthly_budget - c.monthly_volume).sum();
    let lines = chains.iter().map(|c| {
        format!(
            "{} ({}): {} de {} — cumplimiento {}",
            strong(&c.name),
            c.region,
            money(c.monthly_volume),
            money(c.monthly_budget),
            attainment(c.budget_attainment_pct())
        )
    });
    format!(
        "🏬 {}<br><br>{}<br><br>Brecha total contra presupuesto: {}.<br><br>\
         {}<br>• Revisar espacio en anaquel y precios con cada comprador.<br>\
         • Negociar exhibiciones adicionales para los SKUs de mayor rotación.",
        strong("Cadenas por debajo del presupuesto"),
        bullets(lines),
        negative(&money(gap)),
        strong("Siguientes pasos:")
    )
}

fn chains_en(ctx: &TemplateContext<'_>) -> String {
    let chains = agg::chains_below_budget(ctx.dataset);
    if chains.is_empty() {
        return format!(
            "✅ {}<br><br>Every chain is at or above its monthly budget.",
            strong("Chains vs budget")
        );
    }
    let gap: f64 = chains.iter().map(|c| c.monthly_budget - c.monthly_volume).sum();
    let lines = chains.iter().map(|c| {
        format!(
            "{} ({}): {} of {} — attainment {}",
            strong(&c.name),
            c.region,
            money(c.monthly_volume),
            money(c.monthly_budget),
            attainment(c.budget_attainment_pct())
        )
    });
    format!(
        "🏬 {}<br><br>{}<br><br>Total gap to budget: {}.<br><br>\
         {}<br>• Review shelf space and pricing with each buyer.<br>\
         • Negotiate extra displays for the fastest-moving SKUs.",
        strong("Chains below budget"),
        bullets(lines),
        negative(&money(gap)),
        strong("Next steps:")
    )
}

fn overdue_es(ctx: &TemplateContext<'_>) -> String {
    let overdue = agg::overdue_clients(ctx.dataset);
    if overdue.is_empty() {
        return format!("✅ {}<br><br>{}", strong("Cartera vencida"), NO_OVERDUE_ES);
    }
    let lines = overdue.iter().map(|c| {
        format!(
            "{}: {} con {} días de atraso (riesgo {})",
            strong(&c.name),
            negative(&money(c.overdue_amount)),
            c.overdue_days,
            c.risk.label_es()
        )
    });
    format!(
        "💳 {}<br><br>Monto vencido total: {} en {} clientes.<br><br>{}<br><br>\
         Prioridad de cobranza: {} ({} días).",
        strong("Clientes con pagos vencidos"),
        negative(&money(agg::overdue_total(ctx.dataset))),
        overdue.len(),
        bullets(lines),
        strong(&overdue[0].name),
        overdue[0].overdue_days
    )
}

fn overdue_en(ctx: &TemplateContext<'_>) -> String {
    let overdue = agg::overdue_clients(ctx.dataset);
    if overdue.is_empty() {
        return format!("✅ {}<br><br>{}", strong("Receivables"), NO_OVERDUE_EN);
    }
    let lines = overdue.iter().map(|c| {
        format!(
            "{}: {} overdue by {} days ({} risk)",
            strong(&c.name),
            negative(&money(c.overdue_amount)),
            c.overdue_days,
            c.risk.label_en()
        )
    });
    format!(
        "💳 {}<br><br>Total overdue: {} across {} clients.<br><br>{}<br><br>\
         Collections priority: {} ({} days).",
        strong("Overdue clients"),
        negative(&money(agg::overdue_total(ctx.dataset))),
        overdue.len(),
        bullets(lines),
        strong(&overdue[0].name),
        overdue[0].overdue_days
    )
}

fn risk_es(ctx: &TemplateContext<'_>) -> String {
    let risky = agg::high_risk_clients(ctx.dataset);
    if risky.is_empty() {
        return format!(
            "✅ {}<br><br>No hay clientes clasificados con riesgo alto.",
            strong("Riesgo de clientes")
        );
    }
    let exposure: f64 = risky.iter().map(|c| c.overdue_amount).sum();
    let lines = risky.iter().map(|c| {
        format!(
            "{} ({}, {}): volumen {} · vencido {}",
            strong(&c.name),
            c.region,
            c.segment.label_es(),
            money(c.monthly_volume),
            negative(&money(c.overdue_amount))
        )
    });
    format!(
        "⚠️ {}<br><br>{}<br><br>Exposición vencida: {}. Sugerimos reducir límites de crédito \
         y condicionar nuevos pedidos al pago de saldos.",
        strong("Clientes de alto riesgo"),
        bullets(lines),
        negative(&money(exposure))
    )
}

fn risk_en(ctx: &TemplateContext<'_>) -> String {
    let risky = agg::high_risk_clients(ctx.dataset);
    if risky.is_empty() {
        return format!(
            "✅ {}<br><br>No clients are rated high risk.",
            strong("Client risk")
        );
    }
    let exposure: f64 = risky.iter().map(|c| c.overdue_amount).sum();
    let lines = risky.iter().map(|c| {
        format!(
            "{} ({}, {}): volume {} · overdue {}",
            strong(&c.name),
            c.region,
            c.segment.label_en(),
            money(c.monthly_volume),
            negative(&money(c.overdue_amount))
        )
    });
    format!(
        "⚠️ {}<br><br>{}<br><br>Overdue exposure: {}. Consider lowering credit limits \
         and holding new orders until balances are paid.",
        strong("High-risk clients"),
        bullets(lines),
        negative(&money(exposure))
    )
}

fn terms_es(ctx: &TemplateContext<'_>) -> String {
    let groups = agg::clients_by_payment_terms(ctx.dataset);
    if groups.is_empty() {
        return "No hay clientes registrados para revisar términos de pago.".to_string();
    }
    let lines = groups.iter().map(|(days, clients)| {
        let names = clients.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ");
        format!("{} días: {}", strong(&days.to_string()), names)
    });
    format!(
        "🗓️ {}<br><br>{}<br><br>Plazo promedio ponderado por volumen: {:.0} días.",
        strong("Términos de pago por cliente"),
        bullets(lines),
        agg::average_payment_terms(ctx.dataset)
    )
}

fn terms_en(ctx: &TemplateContext<'_>) -> String {
    let groups = agg::clients_by_payment_terms(ctx.dataset);
    if groups.is_empty() {
        return "There are no clients on file to review payment terms.".to_string();
    }
    let lines = groups.iter().map(|(days, clients)| {
        let names = clients.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ");
        format!("{} days: {}", strong(&days.to_string()), names)
    });
    format!(
        "🗓️ {}<br><br>{}<br><br>Volume-weighted average terms: {:.0} days.",
        strong("Payment terms by client"),
        bullets(lines),
        agg::average_payment_terms(ctx.dataset)
    )
}

fn invoices_es(ctx: &TemplateContext<'_>) -> String {
    let pending = agg::invoices_with_status(ctx.dataset, InvoiceStatus::Pending);
    let overdue = agg::invoices_with_status(ctx.dataset, InvoiceStatus::Overdue);
    if pending.is_empty() && overdue.is_empty() {
        return format!(
            "✅ {}<br><br>No hay facturas pendientes ni vencidas.",
            strong("Facturas")
        );
    }
    let line = |i: &&foodsight_data::Invoice| {
        format!(
            "{} · {} · {} · vence {}",
            i.number,
            strong(&i.client),
            money(i.amount),
            i.due_on.format("%d/%m/%Y")
        )
    };
    let mut text = format!("🧾 {}<br><br>", strong("Facturas por cobrar"));
    if !overdue.is_empty() {
        text.push_str(&format!(
            "Vencidas ({}): {}<br>{}<br><br>",
            overdue.len(),
            negative(&money(agg::invoice_total(&overdue))),
            bullets(overdue.iter().map(line))
        ));
    }
    if !pending.is_empty() {
        text.push_str(&format!(
            "Pendientes ({}): {}<br>{}",
            pending.len(),
            neutral(&money(agg::invoice_total(&pending))),
            bullets(pending.iter().map(line))
        ));
    }
    text
}

fn invoices_en(ctx: &TemplateContext<'_>) -> String {
    let pending = agg::invoices_with_status(ctx.dataset, InvoiceStatus::Pending);
    let overdue = agg::invoices_with_status(ctx.dataset, InvoiceStatus::Overdue);
    if pending.is_empty() && overdue.is_empty() {
        return format!(
            "✅ {}<br><br>There are no pending or overdue invoices.",
            strong("Invoices")
        );
    }
    let line = |i: &&foodsight_data::Invoice| {
        format!(
            "{} · {} · {} · due {}",
            i.number,
            strong(&i.client),
            money(i.amount),
            i.due_on.format("%Y-%m-%d")
        )
    };
    let mut text = format!("🧾 {}<br><br>", strong("Open invoices"));
    if !overdue.is_empty() {
        text.push_str(&format!(
            "Overdue ({}): {}<br>{}<br><br>",
            overdue.len(),
            negative(&money(agg::invoice_total(&overdue))),
            bullets(overdue.iter().map(line))
        ));
    }
    if !pending.is_empty() {
        text.push_str(&format!(
            "Pending ({}): {}<br>{}",
            pending.len(),
            neutral(&money(agg::invoice_total(&pending))),
            bullets(pending.iter().map(line))
        ));
    }
    text
}

fn top_clients_es(ctx: &TemplateContext<'_>) -> String {
    let top = agg::top_clients_by_volume(ctx.dataset, 5);
    if top.is_empty() {
        return "No hay clientes registrados.".to_string();
    }
    let total = agg::total_client_volume(ctx.dataset);
    let lines = top.iter().map(|c| {
        format!(
            "{} ({}, {}): {} mensuales · {} del volumen",
            strong(&c.name),
            c.region,
            c.segment.label_es(),
            money(c.monthly_volume),
            pct(if total > 0.0 { c.monthly_volume / total * 100.0 } else { 0.0 })
        )
    });
    format!("🤝 {}<br><br>{}", strong("Principales clientes"), numbered(lines))
}

fn top_clients_en(ctx: &TemplateContext<'_>) -> String {
    let top = agg::top_clients_by_volume(ctx.dataset, 5);
    if top.is_empty() {
        return "There are no clients on file.".to_string();
    }
    let total = agg::total_client_volume(ctx.dataset);
    let lines = top.iter().map(|c| {
        format!(
            "{} ({}, {}): {} per month · {} of volume",
            strong(&c.name),
            c.region,
            c.segment.label_en(),
            money(c.monthly_volume),
            pct(if total > 0.0 { c.monthly_volume / total * 100.0 } else { 0.0 })
        )
    });
    format!("🤝 {}<br><br>{}", strong("Top clients"), numbered(lines))
}
