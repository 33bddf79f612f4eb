//! Bucket assignment by substring match on the free-text `investment_type`.
//!
//! Two rule sets exist. The table view has a leading DCA rule; the composition
//! (pie) view does not, so "DCA Renta Fija" lands in `dca` for one and in
//! `renta_fija` for the other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Dca,
    RentaFija,
    RentaVariable,
    Cryptomonedas,
    Acciones,
    Crowfounding,
    Epsv,
    CapitalRiesgo,
}

impl Bucket {
    pub fn key(self) -> &'static str {
        match self {
            Bucket::Dca => "dca",
            Bucket::RentaFija => "renta_fija",
            Bucket::RentaVariable => "renta_variable",
            Bucket::Cryptomonedas => "cryptomonedas",
            Bucket::Acciones => "acciones",
            Bucket::Crowfounding => "crowfounding",
            Bucket::Epsv => "epsv",
            Bucket::CapitalRiesgo => "capital_riesgo",
        }
    }

    /// Key used in the composition `totals` object. Only crypto differs.
    pub fn totals_key(self) -> &'static str {
        match self {
            Bucket::Cryptomonedas => "crypto",
            other => other.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Dca => "DCA",
            Bucket::RentaFija => "RENTA FIJA",
            Bucket::RentaVariable => "RENTA VARIABLE",
            Bucket::Cryptomonedas => "CRYPTOMONEDAS",
            Bucket::Acciones => "ACCIONES",
            Bucket::Crowfounding => "CROWFOUNDING",
            Bucket::Epsv => "EPSV",
            Bucket::CapitalRiesgo => "CAPITAL RIESGO & STARTUPS",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Bucket::RentaFija => "#FF6B6B",
            Bucket::RentaVariable => "#48CAE4",
            Bucket::Cryptomonedas => "#F9C74F",
            Bucket::Acciones => "#6BCB77",
            Bucket::Crowfounding => "#4D96FF",
            Bucket::Epsv => "#BC6FF1",
            Bucket::CapitalRiesgo => "#FFA500",
            // never charted
            Bucket::Dca => "#999999",
        }
    }

    /// Uppercase substring that selects this bucket (DCA has a compound rule).
    fn pattern(self) -> &'static str {
        match self {
            Bucket::Dca => "DCA",
            Bucket::RentaFija => "RENTA FIJA",
            Bucket::RentaVariable => "RENTA VARIABLE",
            Bucket::Cryptomonedas => "CRYPTO",
            Bucket::Acciones => "ACCIONES",
            Bucket::Crowfounding => "CROWFOUNDING",
            Bucket::Epsv => "EPSV",
            Bucket::CapitalRiesgo => "CAPITAL RIESGO",
        }
    }

    fn matches(self, upper: &str) -> bool {
        match self {
            Bucket::Dca => {
                upper.contains("DCA")
                    && (upper.contains("RENTA FIJA") || upper.contains("RENTA VARIABLE"))
            }
            other => upper.contains(other.pattern()),
        }
    }
}

const TABLE_ORDER: [Bucket; 8] = [
    Bucket::Dca,
    Bucket::RentaFija,
    Bucket::RentaVariable,
    Bucket::Cryptomonedas,
    Bucket::Acciones,
    Bucket::Crowfounding,
    Bucket::Epsv,
    Bucket::CapitalRiesgo,
];

const COMPOSITION_ORDER: [Bucket; 7] = [
    Bucket::RentaFija,
    Bucket::RentaVariable,
    Bucket::Cryptomonedas,
    Bucket::Acciones,
    Bucket::Crowfounding,
    Bucket::Epsv,
    Bucket::CapitalRiesgo,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// Eight buckets, DCA first.
    Table,
    /// Seven buckets, no DCA.
    Composition,
}

impl RuleSet {
    /// Buckets in match order, which is also display order.
    pub fn buckets(self) -> &'static [Bucket] {
        match self {
            RuleSet::Table => &TABLE_ORDER,
            RuleSet::Composition => &COMPOSITION_ORDER,
        }
    }

    /// First matching bucket, or `RentaVariable` when nothing matches.
    pub fn categorize(self, investment_type: Option<&str>) -> Bucket {
        let upper = investment_type.unwrap_or_default().to_uppercase();
        self.buckets()
            .iter()
            .copied()
            .find(|bucket| bucket.matches(&upper))
            .unwrap_or(Bucket::RentaVariable)
    }
}

/// Positions labelled by their isin as crowdfunding or venture capital have no
/// market price and are skipped by the bulk refresh.
pub fn is_non_tradable_isin(isin: &str) -> bool {
    let lower = isin.to_lowercase();
    lower.contains("crowfounding") || lower.contains("capital riesgo")
}
