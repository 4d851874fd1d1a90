//! Settlement result types.

use std::fmt;

use dutch_shared::Amount;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::request::Eligibility;

/// Key of one owed line in a participant's breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    /// Share of a round, keyed by its title.
    Round(String),
    /// Share of the fixed surcharge.
    Surcharge,
    /// Leader-only adjustment closing the per-item rounding gap.
    RoundingCorrection,
}

impl ItemKey {
    /// Stable string form, used for lookups by renderers and JSON output.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Round(title) => title,
            Self::Surcharge => "surcharge",
            Self::RoundingCorrection => "rounding-correction",
        }
    }

    /// Returns true if a round titled `title` would share its string form
    /// with a built-in line.
    #[must_use]
    pub fn is_reserved(title: &str) -> bool {
        title == Self::Surcharge.as_str() || title == Self::RoundingCorrection.as_str()
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A billable round as it entered the settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTotal {
    /// Round title.
    pub title: String,
    /// Round amount.
    pub amount: Amount,
    /// Who paid it.
    pub payer: String,
}

/// One participant's settled position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSettlement {
    /// Display name.
    pub name: String,
    /// Surcharge opt-in used for this settlement.
    pub eligibility: Eligibility,
    /// Rounded owed amount per item, rounds first in declaration order.
    pub items: IndexMap<ItemKey, Amount>,
    /// Sum of `items`.
    pub owed: Amount,
    /// Sum of the rounds this participant paid for.
    pub paid: Amount,
    /// `owed - paid`: positive owes the pool, negative is refunded.
    pub delta: Amount,
}

impl ParticipantSettlement {
    /// Owed amount for one item, if the participant has it.
    #[must_use]
    pub fn item(&self, key: &ItemKey) -> Option<Amount> {
        self.items.get(key).copied()
    }

    /// Owed amount for a round title, zero when absent.
    #[must_use]
    pub fn round_share(&self, title: &str) -> Amount {
        self.item(&ItemKey::Round(title.to_string())).unwrap_or(0)
    }

    /// Surcharge share, zero when absent.
    #[must_use]
    pub fn surcharge_share(&self) -> Amount {
        self.item(&ItemKey::Surcharge).unwrap_or(0)
    }

    /// Rounding correction, zero when absent.
    #[must_use]
    pub fn rounding_correction(&self) -> Amount {
        self.item(&ItemKey::RoundingCorrection).unwrap_or(0)
    }
}

/// Immutable outcome of a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementResult {
    /// Leader who collects and absorbs rounding.
    pub leader: String,
    /// Billable rounds in declaration order.
    pub rounds: Vec<RoundTotal>,
    /// Every participant in roster order.
    pub participants: Vec<ParticipantSettlement>,
    /// Whether the surcharge was actually applied.
    pub surcharge_applied: bool,
    /// Sum of round amounts, surcharge excluded.
    pub total_base: Amount,
    /// Surcharge amount if applied, else zero.
    pub total_surcharge: Amount,
}

impl SettlementResult {
    /// Looks up a participant by display name.
    #[must_use]
    pub fn participant(&self, name: &str) -> Option<&ParticipantSettlement> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Amount the participants collectively owe.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.total_base + self.total_surcharge
    }

    /// Sum of every participant's owed total.
    #[must_use]
    pub fn total_owed(&self) -> Amount {
        self.participants.iter().map(|p| p.owed).sum()
    }
}
