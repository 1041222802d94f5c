//! Item lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a marketplace item.
///
/// Serialized as the wire integers used by the marketplace API:
/// `1` = initial, `2` = on sale, `3` = sold out.
///
/// An item is created in [`Initial`](Self::Initial), becomes visible on the
/// marketplace only through the explicit sell call
/// ([`OnSale`](Self::OnSale)), and reaches [`SoldOut`](Self::SoldOut)
/// through a successful purchase. `SoldOut` is terminal; the server rejects
/// any further purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ItemStatus {
    /// Created but not yet visible on the marketplace.
    Initial,
    /// Listed and purchasable.
    OnSale,
    /// Sold; no further transitions.
    SoldOut,
}

impl ItemStatus {
    /// Whether a purchase attempt against this status can succeed.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::OnSale)
    }
}

impl TryFrom<i64> for ItemStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Initial),
            2 => Ok(Self::OnSale),
            3 => Ok(Self::SoldOut),
            other => Err(format!("invalid item status: {other}")),
        }
    }
}

impl From<ItemStatus> for i64 {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Initial => 1,
            ItemStatus::OnSale => 2,
            ItemStatus::SoldOut => 3,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::OnSale => write!(f, "on sale"),
            Self::SoldOut => write!(f, "sold out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_integers_roundtrip() {
        for (status, wire) in [
            (ItemStatus::Initial, "1"),
            (ItemStatus::OnSale, "2"),
            (ItemStatus::SoldOut, "3"),
        ] {
            assert_eq!(serde_json::to_string(&status).expect("serialize"), wire);
            let back: ItemStatus = serde_json::from_str(wire).expect("deserialize");
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_unknown_wire_value_rejected() {
        let result: Result<ItemStatus, _> = serde_json::from_str("9");
        assert!(result.is_err());
    }

    #[test]
    fn test_only_on_sale_is_purchasable() {
        assert!(ItemStatus::OnSale.is_purchasable());
        assert!(!ItemStatus::Initial.is_purchasable());
        assert!(!ItemStatus::SoldOut.is_purchasable());
    }
}
