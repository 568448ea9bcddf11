use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::error::ValidationError;
use super::identifier::Identifier;
use super::money::Money;

/// What an account holder is allowed to do with their wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Regular holder, may send and receive
    Ordinary,
    /// Receive-only
    Merchant,
}

impl Role {
    /// May this account fund an outbound transfer?
    pub fn can_fund_transfers(&self) -> bool {
        match self {
            Self::Ordinary => true,
            Self::Merchant => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "COMMON",
            Self::Merchant => "MERCHANT",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "COMMON" | "ORDINARY" => Ok(Self::Ordinary),
            "MERCHANT" => Ok(Self::Merchant),
            other => Err(ValidationError::new(
                "role",
                format!("unknown account role '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque credential placeholder; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Registered account holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: Identifier,
    full_name: String,
    email: String,
    password: Credential,
    role: Role,
    wallet: Option<Money>,
    created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: Identifier,
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: Credential,
        role: Role,
        wallet: Option<Money>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            password,
            role,
            wallet,
            created_at,
        }
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &Credential {
        &self.password
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Wallet as stored, regardless of role
    pub fn wallet(&self) -> Option<&Money> {
        self.wallet.as_ref()
    }

    /// Wallet usable as the source of an outbound transfer
    ///
    /// Always `None` for receive-only roles.
    pub fn funding_wallet(&self) -> Option<&Money> {
        if self.role.can_fund_transfers() {
            self.wallet.as_ref()
        } else {
            None
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
