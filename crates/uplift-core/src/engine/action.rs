//! Actions applied to lower-quality entries.

use crate::config::OnLower;
use crate::traits::Entry;

/// Disposition change applied to entries that lost out within their group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerAction {
    Accept,
    Reject,
    Fail,
}

impl LowerAction {
    pub fn apply<E: Entry + ?Sized>(self, entry: &mut E, reason: &str) {
        match self {
            Self::Accept => entry.accept(reason),
            Self::Reject => entry.reject(reason),
            Self::Fail => entry.fail(reason),
        }
    }
}

impl OnLower {
    /// The action to apply, or `None` for [`OnLower::Skip`].
    pub fn action(self) -> Option<LowerAction> {
        match self {
            OnLower::Accept => Some(LowerAction::Accept),
            OnLower::Reject => Some(LowerAction::Reject),
            OnLower::Fail => Some(LowerAction::Fail),
            OnLower::Skip => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Disposition, Item};

    #[test]
    fn test_on_lower_mapping() {
        assert_eq!(OnLower::Skip.action(), None);
        assert_eq!(OnLower::Fail.action(), Some(LowerAction::Fail));

        let mut item = Item::new("x 720p");
        OnLower::Reject.action().unwrap().apply(&mut item, "lower");
        assert_eq!(item.disposition, Disposition::Rejected);
        assert_eq!(item.reason.as_deref(), Some("lower"));
    }
}
