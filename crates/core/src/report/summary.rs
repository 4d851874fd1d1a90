//! Summary rendering.

use dutch_shared::format_amount;

use crate::settlement::{CollectionAccount, SettlementResult};

/// Renders totals, the collection account, and one line per participant,
/// leader included.
#[must_use]
pub fn render_summary(result: &SettlementResult, account: &CollectionAccount) -> String {
    let mut lines = vec![
        format!(
            "Settlement (rounds: {} / surcharge: {})",
            format_amount(result.total_base),
            format_amount(result.total_surcharge)
        ),
        format!(
            "Deposit to: {} {} (leader: {})",
            account.bank, account.account_number, result.leader
        ),
        String::new(),
    ];

    lines.extend(result.participants.iter().map(|p| {
        format!(
            "- {}: owed {} / paid {} / net {}",
            p.name,
            format_amount(p.owed),
            format_amount(p.paid),
            format_amount(p.delta)
        )
    }));

    lines.join("\n")
}
