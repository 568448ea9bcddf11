use std::fmt;

use super::error::ValidationError;

/// Non-negative count of a currency's smallest unit (cents, kobo, pence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Validate a signed minor-unit count coming from untrusted input
    pub fn new(minor_units: i64) -> Result<Self, ValidationError> {
        u64::try_from(minor_units)
            .map(Self)
            .map_err(|_| ValidationError::new("amount", "must not be negative"))
    }

    /// Build from an already non-negative value (storage, arithmetic)
    pub fn from_minor_units(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Get raw minor-unit value
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition, returns None on overflow
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction, returns None when the result would be negative
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_positive() {
        assert_eq!(Amount::new(0).unwrap(), Amount::ZERO);
        assert_eq!(Amount::new(500).unwrap().value(), 500);
        assert_eq!(Amount::new(i64::MAX).unwrap().value(), i64::MAX as u64);
    }

    #[test]
    fn rejects_negative() {
        let err = Amount::new(-1).unwrap_err();
        assert_eq!(err.field, "amount");
        assert!(Amount::new(i64::MIN).is_err());
    }

    #[test]
    fn checked_add_works() {
        let a = Amount::from_minor_units(300);
        let b = Amount::from_minor_units(200);
        assert_eq!(a.checked_add(b), Some(Amount::from_minor_units(500)));
    }

    #[test]
    fn checked_add_detects_overflow() {
        let max = Amount::from_minor_units(u64::MAX);
        assert_eq!(max.checked_add(Amount::from_minor_units(1)), None);
    }

    #[test]
    fn checked_sub_never_goes_negative() {
        let a = Amount::from_minor_units(100);
        assert_eq!(
            a.checked_sub(Amount::from_minor_units(40)),
            Some(Amount::from_minor_units(60))
        );
        assert_eq!(a.checked_sub(Amount::from_minor_units(101)), None);
    }

    #[test]
    fn ordering_works() {
        assert!(Amount::from_minor_units(500) > Amount::from_minor_units(300));
        assert!(Amount::from_minor_units(299) < Amount::from_minor_units(300));
    }

    #[test]
    fn default_is_zero() {
        assert!(Amount::default().is_zero());
        assert_eq!(Amount::from_minor_units(42).to_string(), "42");
    }
}
