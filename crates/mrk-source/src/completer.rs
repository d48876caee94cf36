//! Sale-completion boundary.
//!
//! The one write the reconciliation core issues: a completion request
//! (paid/shipped flags, tracking details) handed to the platform. As with
//! [`PagedSource`](crate::PagedSource), transport and authentication live in
//! the implementation.

use mrk_record::CanonicalRecord;

use crate::{Ack, FetchError};

/// Platform answer to one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub ack: Ack,
    pub errors: Vec<String>,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Self {
            ack: Ack::Success,
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            ack: Ack::Failure,
            errors,
        }
    }
}

/// Submits sale-completion requests. One attempt per call.
pub trait SaleCompleter: Send + Sync {
    /// Identifies the completer in logs.
    fn name(&self) -> &str;

    fn complete_sale(&self, request: &CanonicalRecord) -> Result<Acknowledgement, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completer_is_object_safe() {
        struct Accepting;
        impl SaleCompleter for Accepting {
            fn name(&self) -> &str {
                "accepting"
            }
            fn complete_sale(
                &self,
                _request: &CanonicalRecord,
            ) -> Result<Acknowledgement, FetchError> {
                Ok(Acknowledgement::success())
            }
        }
        let c: Box<dyn SaleCompleter> = Box::new(Accepting);
        let ack = c.complete_sale(&CanonicalRecord::new()).unwrap();
        assert!(ack.ack.is_success());
        assert!(!Acknowledgement::failure(vec!["no".into()]).ack.is_success());
    }
}
