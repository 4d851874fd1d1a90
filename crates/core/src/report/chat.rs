//! Chat-block rendering.

use dutch_shared::format_amount;

use crate::settlement::SettlementResult;

/// Renders the chat-paste breakdown.
///
/// The header lists each billable round, the base total and the surcharge
/// total. Every participant except the leader then gets a block with one line
/// per round, the surcharge line, a pre-paid line if they paid anything, and
/// the amount they still have to send (negative means a refund).
#[must_use]
pub fn render_chat_block(result: &SettlementResult) -> String {
    let mut lines = vec!["Settlement".to_string()];
    for round in &result.rounds {
        lines.push(format!("{} : {}", round.title, format_amount(round.amount)));
    }
    lines.push(format!("Total : {}", format_amount(result.total_base)));
    lines.push(format!("Surcharge : {}", format_amount(result.total_surcharge)));
    lines.push(String::new());
    lines.push(String::new());

    for person in result
        .participants
        .iter()
        .filter(|p| p.name != result.leader)
    {
        lines.push(person.name.clone());
        for round in &result.rounds {
            lines.push(format!(
                "{} : {}",
                round.title,
                format_amount(person.round_share(&round.title))
            ));
        }
        lines.push(format!(
            "Surcharge : {}",
            format_amount(person.surcharge_share())
        ));

        let due = if person.paid > 0 {
            lines.push(format!("Pre-paid : {}", format_amount(person.paid)));
            person.owed - person.paid
        } else {
            person.owed
        };
        lines.push(format!("Amount due : {}", format_amount(due)));
        lines.push(String::new());
        lines.push(String::new());
    }

    lines.join("\n")
}
