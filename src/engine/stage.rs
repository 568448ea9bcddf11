use std::fmt;

/// Where a transfer currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransferStage {
    Validating,
    Resolving,
    RuleChecking,
    Authorizing,
    Committing,
    Notifying,
    Done,
}

impl TransferStage {
    /// Is cancellation still honoured on entering this stage?
    ///
    /// Once the commit has started the transfer runs to completion.
    pub fn accepts_cancellation(&self) -> bool {
        *self <= Self::Committing
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::RuleChecking => "rule_checking",
            Self::Authorizing => "authorizing",
            Self::Committing => "committing",
            Self::Notifying => "notifying",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
