//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, core::gate_pass, errors::Error};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Suggests pending gate pass ids for `/gatepass approve` and `/gatepass reject`.
///
/// Matches the partial input against the pass id, student name and roll number,
/// so admins can type a name instead of an opaque id.
pub async fn autocomplete_pending_pass_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<poise::serenity_prelude::AutocompleteChoice> {
    let Ok(pending) = gate_pass::list_pending_gate_passes(ctx.data().database()).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    pending
        .into_iter()
        .filter(|pass| {
            pass.id.to_lowercase().contains(&partial_lower)
                || pass.student_name.to_lowercase().contains(&partial_lower)
                || pass.roll_number.to_lowercase().contains(&partial_lower)
        })
        .take(MAX_SUGGESTIONS)
        .map(|pass| {
            poise::serenity_prelude::AutocompleteChoice::new(
                format!("{} ({}) - {}", pass.student_name, pass.roll_number, pass.reason),
                pass.id,
            )
        })
        .collect()
}
