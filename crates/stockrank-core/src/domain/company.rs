use serde::{Deserialize, Serialize};
use stockrank_warehouse::CompanyRecord;

use crate::domain::Symbol;
use crate::ValidationError;

/// Company identity. Absent fields leave the stored value untouched on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub symbol: Symbol,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

impl Company {
    /// True when writing `self` over `stored` would change nothing.
    pub fn is_covered_by(&self, stored: &Self) -> bool {
        fn covered(update: &Option<String>, stored: &Option<String>) -> bool {
            update.is_none() || update == stored
        }

        self.symbol == stored.symbol
            && covered(&self.name, &stored.name)
            && covered(&self.sector, &stored.sector)
            && covered(&self.industry, &stored.industry)
    }

    pub(crate) fn into_record(self) -> CompanyRecord {
        CompanyRecord {
            symbol: self.symbol.into(),
            name: self.name,
            sector: self.sector,
            industry: self.industry,
        }
    }

    pub(crate) fn from_record(record: CompanyRecord) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: Symbol::parse(&record.symbol)?,
            name: record.name,
            sector: record.sector,
            industry: record.industry,
        })
    }
}

/// Trim and drop empty text so `""` never overwrites a stored value.
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
