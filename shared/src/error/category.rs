use serde::{Deserialize, Serialize};

/// High-level grouping of error codes, derived from the numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Order,
    Discount,
    Product,
    Customer,
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            0..=999 => Self::General,
            4000..=4999 => Self::Order,
            5000..=5999 => Self::Discount,
            6000..=6999 => Self::Product,
            8000..=8999 => Self::Customer,
            9000..=9999 => Self::System,
            _ => Self::General,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Order => "order",
            Self::Discount => "discount",
            Self::Product => "product",
            Self::Customer => "customer",
            Self::System => "system",
        }
    }
}
