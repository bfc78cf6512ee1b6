//! General Discord commands - ping and help.
//! These commands don't touch the database and provide basic bot functionality.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Hostel Gate Help**\n\n\
        **Students**\n\
        • `/gatepass apply <reason> <from> <to>` - Requests a gate pass.\n\
        • `/gatepass status` - Shows your pass and the code to present.\n\n\
        **Admins**\n\
        • `/gatepass pending` - Lists requests waiting for a decision.\n\
        • `/gatepass list` - Lists all gate passes.\n\
        • `/gatepass approve <pass>` / `/gatepass reject <pass>` - Decides a request.\n\
        • `/gatepass approve_token <code>` - Approves from a scanned approval code.\n\n\
        **Gate security**\n\
        • `/gatepass scan <code>` - Scans a student out, or back in.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
