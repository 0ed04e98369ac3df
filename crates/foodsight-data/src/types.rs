//! Business entity types held by the fixture dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A finished-goods SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub category: String,
    pub stock_units: u32,
    pub reorder_point: u32,
    pub backorders: u32,
    /// Gross margin, in percent.
    pub margin_pct: f64,
    pub monthly_units: u32,
    pub monthly_revenue: f64,
    /// Month-over-month sales trend, in percent.
    pub trend_pct: f64,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_units == 0
    }

    /// Still has stock but sits at or below its reorder point.
    pub fn is_low_stock(&self) -> bool {
        self.stock_units > 0 && self.stock_units <= self.reorder_point
    }
}

/// A sales region with its revenue target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    /// English alias used when matching questions (e.g. "north").
    #[serde(default)]
    pub aliases: Vec<String>,
    pub target_revenue: f64,
    pub current_revenue: f64,
    pub rep: String,
    pub key_clients: Vec<String>,
}

impl Region {
    pub fn attainment_pct(&self) -> f64 {
        ratio_pct(self.current_revenue, self.target_revenue)
    }

    pub fn gap(&self) -> f64 {
        self.current_revenue - self.target_revenue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientSegment {
    Chain,
    Independent,
    Distributor,
    Foodservice,
}

impl ClientSegment {
    pub fn label_es(&self) -> &'static str {
        match self {
            Self::Chain => "Cadena",
            Self::Independent => "Independiente",
            Self::Distributor => "Distribuidor",
            Self::Foodservice => "Foodservice",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Self::Chain => "Chain",
            Self::Independent => "Independent",
            Self::Distributor => "Distributor",
            Self::Foodservice => "Foodservice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label_es(&self) -> &'static str {
        match self {
            Self::Low => "Bajo",
            Self::Medium => "Medio",
            Self::High => "Alto",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub region: String,
    pub segment: ClientSegment,
    pub monthly_volume: f64,
    pub monthly_budget: f64,
    pub payment_terms_days: u32,
    pub overdue_amount: f64,
    pub overdue_days: u32,
    pub risk: RiskLevel,
}

impl Client {
    pub fn is_overdue(&self) -> bool {
        self.overdue_days > 0
    }

    pub fn budget_attainment_pct(&self) -> f64 {
        ratio_pct(self.monthly_volume, self.monthly_budget)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRep {
    pub name: String,
    pub region: String,
    pub target: f64,
    pub achieved: f64,
}

impl SalesRep {
    pub fn performance_pct(&self) -> f64 {
        ratio_pct(self.achieved, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub name: String,
    pub product: String,
    pub investment: f64,
    pub revenue_generated: f64,
}

impl Promotion {
    /// Return on investment: (revenue - investment) / investment, in percent.
    pub fn roi_pct(&self) -> f64 {
        if self.investment <= 0.0 {
            return 0.0;
        }
        (self.revenue_generated - self.investment) / self.investment * 100.0
    }
}

/// Stock position of one product at one distribution branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStatus {
    pub product: String,
    pub branch: String,
    pub units: u32,
    pub is_out_of_stock: bool,
    pub days_to_restock: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub number: String,
    pub client: String,
    pub amount: f64,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub status: InvoiceStatus,
}

/// A route to market (supermarkets, wholesale, e-commerce, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub name: String,
    pub revenue: f64,
    pub growth_pct: f64,
}

/// The complete, read-only business dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureDataset {
    pub company: String,
    pub products: Vec<Product>,
    pub regions: Vec<Region>,
    pub clients: Vec<Client>,
    pub sales_reps: Vec<SalesRep>,
    pub promotions: Vec<Promotion>,
    pub stock_status: Vec<StockStatus>,
    pub invoices: Vec<Invoice>,
    pub channels: Vec<Channel>,
}

impl FixtureDataset {
    /// A dataset with no records at all.
    pub fn empty() -> Self {
        Self {
            company: crate::fixtures::COMPANY_NAME.to_string(),
            ..Default::default()
        }
    }

    /// Serialize the whole dataset as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `part / whole` in percent, 0 when `whole` is not positive.
pub(crate) fn ratio_pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
