use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Payme,
    Click,
    Uzum,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Payme => "payme",
            PaymentMethod::Click => "click",
            PaymentMethod::Uzum => "uzum",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "payme" => Ok(PaymentMethod::Payme),
            "click" => Ok(PaymentMethod::Click),
            "uzum" => Ok(PaymentMethod::Uzum),
            _ => Err(UnknownPaymentMethod(value.to_string())),
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_codes_only() {
        assert_eq!("uzum".parse::<PaymentMethod>(), Ok(PaymentMethod::Uzum));
        assert_eq!(
            "Payme".parse::<PaymentMethod>(),
            Err(UnknownPaymentMethod("Payme".to_string()))
        );
        assert_eq!(PaymentMethod::Click.to_string(), "click");
    }
}
