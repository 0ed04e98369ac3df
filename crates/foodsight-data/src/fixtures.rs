//! Literal business fixtures for Alimentos del Valle.

use chrono::NaiveDate;

use crate::types::*;

pub const COMPANY_NAME: &str = "Alimentos del Valle";

impl FixtureDataset {
    /// The standard dataset served by the application.
    pub fn standard() -> Self {
        let dataset = Self {
            company: COMPANY_NAME.to_string(),
            products: products(),
            regions: regions(),
            clients: clients(),
            sales_reps: sales_reps(),
            promotions: promotions(),
            stock_status: stock_status(),
            invoices: invoices(),
            channels: channels(),
        };
        tracing::debug!(
            products = dataset.products.len(),
            clients = dataset.clients.len(),
            regions = dataset.regions.len(),
            "Fixture dataset built"
        );
        dataset
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    name: &str,
    category: &str,
    stock_units: u32,
    reorder_point: u32,
    backorders: u32,
    margin_pct: f64,
    monthly_units: u32,
    monthly_revenue: f64,
    trend_pct: f64,
) -> Product {
    Product {
        name: name.into(),
        category: category.into(),
        stock_units,
        reorder_point,
        backorders,
        margin_pct,
        monthly_units,
        monthly_revenue,
        trend_pct,
    }
}

fn products() -> Vec<Product> {
    vec![
        product("Salsa Verde 500g", "Salsas", 4_200, 1_500, 0, 38.5, 18_500, 592_000.0, 6.2),
        product("Salsa Roja 500g", "Salsas", 0, 1_500, 1_200, 36.0, 14_200, 440_200.0, -3.8),
        product("Tortillas de Maíz 1kg", "Tortillería", 12_500, 5_000, 0, 22.4, 64_000, 1_472_000.0, 4.1),
        product("Tostadas Horneadas 300g", "Tortillería", 900, 1_200, 350, 31.2, 9_800, 245_000.0, -7.5),
        product("Mole Poblano 250g", "Especialidades", 2_600, 800, 0, 45.8, 6_100, 366_000.0, 12.3),
        product("Frijoles Refritos 430g", "Abarrotes", 8_800, 3_000, 0, 27.1, 22_800, 501_600.0, 1.9),
        product("Chiles Chipotle 200g", "Abarrotes", 0, 2_000, 2_100, 33.4, 11_500, 299_000.0, 8.7),
        product("Cajeta Quemada 350g", "Dulces", 1_500, 600, 0, 41.2, 3_900, 175_500.0, -1.4),
        product("Chocolate de Mesa 540g", "Dulces", 450, 700, 180, 39.6, 4_700, 258_500.0, 3.0),
        product("Nopales en Escabeche 440g", "Especialidades", 3_100, 900, 0, 29.9, 5_200, 145_600.0, -9.2),
    ]
}

fn region(
    name: &str,
    aliases: &[&str],
    target_revenue: f64,
    current_revenue: f64,
    rep: &str,
    key_clients: &[&str],
) -> Region {
    Region {
        name: name.into(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        target_revenue,
        current_revenue,
        rep: rep.into(),
        key_clients: key_clients.iter().map(|c| c.to_string()).collect(),
    }
}

fn regions() -> Vec<Region> {
    vec![
        region(
            "Norte",
            &["north", "northern"],
            1_250_000.0,
            1_318_400.0,
            "Alejandra Treviño",
            &["Supermercados del Norte", "Distribuidora Regia"],
        ),
        region(
            "Centro",
            &["central", "center region"],
            1_600_000.0,
            1_452_300.0,
            "Ricardo Mendoza",
            &["MegaMart Centro", "Tiendas La Canasta", "Fonda Real Restaurantes"],
        ),
        region(
            "Bajío",
            &["bajio"],
            820_000.0,
            861_200.0,
            "Fernanda Ruiz",
            &["Hipermercado El Sol", "Abarrotera del Bajío"],
        ),
        region(
            "Occidente",
            &["west", "western"],
            760_000.0,
            655_900.0,
            "Jorge Castañeda",
            &["Cadena Tapatía", "Abarrotes Jalisco"],
        ),
        region(
            "Sureste",
            &["southeast", "south east"],
            540_000.0,
            507_600.0,
            "Mariana Pech",
            &["Súper Maya", "Mercados Peninsulares"],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn client(
    name: &str,
    region: &str,
    segment: ClientSegment,
    monthly_volume: f64,
    monthly_budget: f64,
    payment_terms_days: u32,
    overdue_amount: f64,
    overdue_days: u32,
    risk: RiskLevel,
) -> Client {
    Client {
        name: name.into(),
        region: region.into(),
        segment,
        monthly_volume,
        monthly_budget,
        payment_terms_days,
        overdue_amount,
        overdue_days,
        risk,
    }
}

fn clients() -> Vec<Client> {
    use ClientSegment::*;
    use RiskLevel::*;
    vec![
        client("MegaMart Centro", "Centro", Chain, 412_000.0, 450_000.0, 60, 0.0, 0, Low),
        client("Supermercados del Norte", "Norte", Chain, 365_000.0, 340_000.0, 45, 0.0, 0, Low),
        client("Hipermercado El Sol", "Bajío", Chain, 198_000.0, 235_000.0, 45, 86_500.0, 18, Medium),
        client("Cadena Tapatía", "Occidente", Chain, 154_000.0, 190_000.0, 60, 124_300.0, 42, High),
        client("Tiendas La Canasta", "Centro", Chain, 221_000.0, 215_000.0, 30, 0.0, 0, Low),
        client("Distribuidora Regia", "Norte", Distributor, 287_000.0, 270_000.0, 30, 0.0, 0, Low),
        client("Abarrotera del Bajío", "Bajío", Distributor, 176_000.0, 160_000.0, 30, 32_800.0, 9, Medium),
        client("Abarrotes Jalisco", "Occidente", Independent, 64_000.0, 75_000.0, 15, 15_200.0, 27, High),
        client("Súper Maya", "Sureste", Independent, 92_000.0, 88_000.0, 15, 0.0, 0, Low),
        client("Mercados Peninsulares", "Sureste", Chain, 131_000.0, 150_000.0, 30, 47_900.0, 63, High),
        client("Fonda Real Restaurantes", "Centro", Foodservice, 58_000.0, 55_000.0, 30, 0.0, 0, Medium),
    ]
}

fn sales_reps() -> Vec<SalesRep> {
    [
        ("Alejandra Treviño", "Norte", 1_250_000.0, 1_318_400.0),
        ("Ricardo Mendoza", "Centro", 1_600_000.0, 1_452_300.0),
        ("Fernanda Ruiz", "Bajío", 820_000.0, 861_200.0),
        ("Jorge Castañeda", "Occidente", 760_000.0, 655_900.0),
        ("Mariana Pech", "Sureste", 540_000.0, 507_600.0),
    ]
    .into_iter()
    .map(|(name, region, target, achieved)| SalesRep {
        name: name.into(),
        region: region.into(),
        target,
        achieved,
    })
    .collect()
}

fn promotions() -> Vec<Promotion> {
    [
        ("2x1 Salsa Verde Cuaresma", "Salsa Verde 500g", 85_000.0, 312_000.0),
        ("Mole Fiestas Patrias", "Mole Poblano 250g", 60_000.0, 174_000.0),
        ("Degustación Tostadas", "Tostadas Horneadas 300g", 45_000.0, 52_000.0),
        ("Combo Desayuno Frijoles", "Frijoles Refritos 430g", 70_000.0, 63_000.0),
        ("Regreso a Clases Cajeta", "Cajeta Quemada 350g", 30_000.0, 81_000.0),
    ]
    .into_iter()
    .map(|(name, product, investment, revenue_generated)| Promotion {
        name: name.into(),
        product: product.into(),
        investment,
        revenue_generated,
    })
    .collect()
}

fn stock_status() -> Vec<StockStatus> {
    [
        ("Salsa Roja 500g", "CEDIS Monterrey", 0, 4),
        ("Salsa Roja 500g", "CEDIS Guadalajara", 0, 6),
        ("Chiles Chipotle 200g", "CEDIS Ciudad de México", 0, 3),
        ("Chiles Chipotle 200g", "CEDIS Mérida", 0, 9),
        ("Tostadas Horneadas 300g", "CEDIS León", 0, 5),
        ("Salsa Verde 500g", "CEDIS Monterrey", 1_800, 0),
        ("Tortillas de Maíz 1kg", "CEDIS Ciudad de México", 7_400, 0),
        ("Chocolate de Mesa 540g", "CEDIS Guadalajara", 450, 0),
        ("Mole Poblano 250g", "CEDIS Mérida", 2_600, 0),
    ]
    .into_iter()
    .map(|(product, branch, units, days_to_restock)| StockStatus {
        product: product.into(),
        branch: branch.into(),
        units,
        is_out_of_stock: units == 0,
        days_to_restock,
    })
    .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn invoices() -> Vec<Invoice> {
    use InvoiceStatus::*;
    [
        ("FAC-10421", "Cadena Tapatía", 124_300.0, date(2024, 3, 18), date(2024, 4, 17), Overdue),
        ("FAC-10433", "Hipermercado El Sol", 86_500.0, date(2024, 4, 1), date(2024, 5, 16), Overdue),
        ("FAC-10457", "Mercados Peninsulares", 47_900.0, date(2024, 2, 26), date(2024, 3, 27), Overdue),
        ("FAC-10462", "Abarrotera del Bajío", 32_800.0, date(2024, 4, 20), date(2024, 5, 20), Overdue),
        ("FAC-10470", "Abarrotes Jalisco", 15_200.0, date(2024, 4, 12), date(2024, 4, 27), Overdue),
        ("FAC-10488", "MegaMart Centro", 206_000.0, date(2024, 5, 6), date(2024, 7, 5), Pending),
        ("FAC-10491", "Supermercados del Norte", 182_500.0, date(2024, 5, 8), date(2024, 6, 22), Pending),
        ("FAC-10495", "Distribuidora Regia", 143_500.0, date(2024, 5, 10), date(2024, 6, 9), Pending),
        ("FAC-10402", "Tiendas La Canasta", 110_500.0, date(2024, 4, 5), date(2024, 5, 5), Paid),
    ]
    .into_iter()
    .map(|(number, client, amount, issued_on, due_on, status)| Invoice {
        number: number.into(),
        client: client.into(),
        amount,
        issued_on,
        due_on,
        status,
    })
    .collect()
}

fn channels() -> Vec<Channel> {
    [
        ("Autoservicio", 2_135_000.0, 3.4),
        ("Mayoreo", 1_012_000.0, 5.1),
        ("Canal Tradicional", 846_000.0, -2.2),
        ("Foodservice", 318_400.0, 7.8),
        ("E-commerce", 184_000.0, 24.5),
    ]
    .into_iter()
    .map(|(name, revenue, growth_pct)| Channel {
        name: name.into(),
        revenue,
        growth_pct,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_dataset_is_populated() {
        let ds = FixtureDataset::standard();
        assert_eq!(ds.company, COMPANY_NAME);
        assert_eq!(ds.products.len(), 10);
        assert_eq!(ds.regions.len(), 5);
        assert_eq!(ds.clients.len(), 11);
        assert_eq!(ds.sales_reps.len(), 5);
        assert!(!ds.promotions.is_empty());
        assert!(!ds.invoices.is_empty());
        assert!(!ds.channels.is_empty());
    }

    #[test]
    fn test_stock_records_agree_with_products() {
        let ds = FixtureDataset::standard();
        for record in ds.stock_status.iter().filter(|s| s.is_out_of_stock) {
            let product = ds
                .products
                .iter()
                .find(|p| p.name == record.product)
                .expect("stock record references a known product");
            assert!(product.is_out_of_stock() || product.is_low_stock());
        }
    }

    #[test]
    fn test_every_client_region_exists() {
        let ds = FixtureDataset::standard();
        for client in &ds.clients {
            assert!(
                ds.regions.iter().any(|r| r.name == client.region),
                "unknown region {}",
                client.region
            );
        }
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let ds = FixtureDataset::standard();
        let json = ds.to_json().unwrap();
        assert!(json.contains("\"isOutOfStock\""));
        assert!(json.contains("\"overdueAmount\""));
        let back: FixtureDataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ds);
    }
}
