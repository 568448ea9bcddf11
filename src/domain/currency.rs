use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

/// Supported currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Ngn,
    Usd,
    Gbp,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
        }
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NGN" => Ok(Self::Ngn),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            other => Err(ValidationError::new(
                "currency",
                format!("unsupported currency '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_codes() {
        assert_eq!("NGN".parse::<Currency>().unwrap(), Currency::Ngn);
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" GBP ".parse::<Currency>().unwrap(), Currency::Gbp);
    }

    #[test]
    fn rejects_everything_else() {
        for code in ["EUR", "ngn", "", "BRL", "US"] {
            let err = code.parse::<Currency>().unwrap_err();
            assert_eq!(err.field, "currency");
        }
    }

    #[test]
    fn display_is_iso_code() {
        assert_eq!(Currency::Ngn.to_string(), "NGN");
        assert_eq!(Currency::Gbp.code(), "GBP");
    }
}
