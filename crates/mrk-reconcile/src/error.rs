use mrk_record::MoneyError;

/// Errors surfaced by reconciliation operations.
///
/// Only `InvalidArgument` and `MalformedAmount` are ever returned to a
/// caller. `NotInitialized` is logged by operations that need a collaborator
/// and then answered with an empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Programmer-error input, e.g. an anchor time without a zone.
    InvalidArgument(String),
    /// A required collaborator (page source) was not supplied.
    NotInitialized(&'static str),
    /// The matched fee transaction carries a non-numeric amount.
    MalformedAmount { order_id: String, source: MoneyError },
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotInitialized(what) => write!(f, "{what} source is not initialized"),
            Self::MalformedAmount { order_id, source } => {
                write!(f, "fee transaction for order '{order_id}' has malformed amount: {source}")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedAmount { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ReconcileError::InvalidArgument("anchor has no zone".into()).to_string(),
            "invalid argument: anchor has no zone"
        );
        assert_eq!(
            ReconcileError::NotInitialized("transactions").to_string(),
            "transactions source is not initialized"
        );
        let e = ReconcileError::MalformedAmount {
            order_id: "A".into(),
            source: MoneyError::Invalid { raw: "x".into() },
        };
        assert_eq!(
            e.to_string(),
            "fee transaction for order 'A' has malformed amount: amount could not be parsed: 'x'"
        );
        assert!(std::error::Error::source(&e).is_some());
    }
}
