//! Spend Table Records
//! Explicit row types for the three logical tables and the fixed sample dataset.

use std::fmt;

/// The three logical tables a cost workbook provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalTable {
    Csp,
    Services,
    Application,
}

impl LogicalTable {
    pub const ALL: [LogicalTable; 3] = [
        LogicalTable::Csp,
        LogicalTable::Services,
        LogicalTable::Application,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogicalTable::Csp => "CSP",
            LogicalTable::Services => "Services",
            LogicalTable::Application => "Application",
        }
    }
}

impl fmt::Display for LogicalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spend for one cloud service provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CspSpend {
    pub provider: String,
    pub spend: f64,
    /// `None` when the sheet has no `Marketplace` column or the cell is blank.
    pub marketplace_spend: Option<f64>,
}

impl CspSpend {
    pub fn new(provider: &str, spend: f64, marketplace_spend: Option<f64>) -> Self {
        Self {
            provider: provider.to_string(),
            spend,
            marketplace_spend,
        }
    }

    /// Marketplace spend with a missing value counted as zero.
    pub fn marketplace(&self) -> f64 {
        self.marketplace_spend.unwrap_or(0.0)
    }
}

/// Spend for one service category, optionally scoped to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSpend {
    pub service: String,
    pub spend: f64,
    pub provider: Option<String>,
}

impl ServiceSpend {
    pub fn new(service: &str, spend: f64) -> Self {
        Self {
            service: service.to_string(),
            spend,
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: &str) -> Self {
        self.provider = Some(provider.to_string());
        self
    }
}

/// Spend for one application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationSpend {
    pub application: String,
    pub spend: f64,
}

impl ApplicationSpend {
    pub fn new(application: &str, spend: f64) -> Self {
        Self {
            application: application.to_string(),
            spend,
        }
    }
}

/// A normalized snapshot of all three tables, in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct CostDataset {
    pub csp: Vec<CspSpend>,
    pub services: Vec<ServiceSpend>,
    pub applications: Vec<ApplicationSpend>,
}

impl Default for CostDataset {
    fn default() -> Self {
        Self::fallback()
    }
}

impl CostDataset {
    /// The sample dataset shown whenever real data cannot be loaded.
    pub fn fallback() -> Self {
        Self {
            csp: fallback_csp(),
            services: fallback_services(),
            applications: fallback_applications(),
        }
    }

    /// Distinct providers named by the services table, in first-seen order.
    pub fn service_providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = Vec::new();
        for provider in self.services.iter().filter_map(|s| s.provider.as_deref()) {
            if !providers.contains(&provider) {
                providers.push(provider);
            }
        }
        providers
    }

    /// Services filtered to one provider; `None` keeps every row.
    pub fn services_for(&self, provider: Option<&str>) -> Vec<&ServiceSpend> {
        self.services
            .iter()
            .filter(|s| match provider {
                Some(p) => s.provider.as_deref() == Some(p),
                None => true,
            })
            .collect()
    }
}

pub fn fallback_csp() -> Vec<CspSpend> {
    vec![
        CspSpend::new("AWS", 100000.0, Some(15000.0)),
        CspSpend::new("Azure", 75000.0, Some(12000.0)),
        CspSpend::new("GCP", 50000.0, Some(8000.0)),
    ]
}

pub fn fallback_services() -> Vec<ServiceSpend> {
    vec![
        ServiceSpend::new("Compute", 50000.0),
        ServiceSpend::new("Database", 40000.0),
        ServiceSpend::new("Storage", 35000.0),
    ]
}

pub fn fallback_applications() -> Vec<ApplicationSpend> {
    vec![
        ApplicationSpend::new("App1", 40000.0),
        ApplicationSpend::new("App2", 35000.0),
        ApplicationSpend::new("App3", 30000.0),
    ]
}
