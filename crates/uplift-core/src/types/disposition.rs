//! Pipeline-visible outcome of an entry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Disposition of an entry within one batch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Disposition {
    /// No decision yet.
    #[default]
    Pending,
    Accepted,
    Rejected,
    Failed,
}

impl Disposition {
    /// Rejected and failed entries cannot be accepted again within a batch.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Rejected | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_string_forms() {
        assert_eq!(Disposition::Accepted.to_string(), "accepted");
        assert_eq!(Disposition::from_str("failed").unwrap(), Disposition::Failed);
        assert_eq!(
            serde_json::to_string(&Disposition::Rejected).unwrap(),
            "\"rejected\""
        );
    }

    #[test]
    fn test_final_states() {
        assert!(!Disposition::Pending.is_final());
        assert!(!Disposition::Accepted.is_final());
        assert!(Disposition::Rejected.is_final());
        assert!(Disposition::Failed.is_final());
    }
}
