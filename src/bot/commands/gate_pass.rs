//! Gate pass Discord commands - the `/gatepass` command group.
//!
//! Students apply and check their pass, admins review and approve (by id or by
//! scanning the student's approval code), and gate staff submit scanned gate
//! payloads. Every subcommand checks the caller's role against the actor the
//! lifecycle assigns to its event before touching the manager.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            gate_pass,
            lifecycle::{Actor, GateEvent},
            payload::ApprovalToken,
            student,
        },
        entities::{GatePassModel, GatePassStatus, StudentModel},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    type Context<'a> = poise::Context<'a, BotData, Error>;

    /// Discord caps embeds at 25 fields.
    const MAX_EMBED_FIELDS: usize = 25;
    /// Discord rejects embeds whose text adds up to more than 6000 characters.
    const EMBED_TEXT_BUDGET: usize = 5500;
    /// Discord caps embed descriptions at 4096 characters.
    const MAX_DESCRIPTION_CHARS: usize = 4000;
    const MAX_REASON_CHARS: usize = 200;
    const MAX_SHORT_FIELD_CHARS: usize = 100;

    /// Gate pass commands for students, admins and gate security.
    #[poise::command(
        slash_command,
        subcommands(
            "gatepass_apply",
            "gatepass_status",
            "gatepass_list",
            "gatepass_pending",
            "gatepass_approve",
            "gatepass_reject",
            "gatepass_approve_token",
            "gatepass_scan"
        )
    )]
    pub async fn gatepass(ctx: Context<'_>) -> Result<()> {
        let help_text = "Gate pass commands:\n\
            • `/gatepass apply` - Request a gate pass (students).\n\
            • `/gatepass status` - Show your current pass and its QR content.\n\
            • `/gatepass list` / `/gatepass pending` - Review requests (admins).\n\
            • `/gatepass approve` / `/gatepass reject` - Decide a request (admins).\n\
            • `/gatepass approve_token` - Approve from a scanned approval code (admins).\n\
            • `/gatepass scan` - Submit a scanned gate payload (gate security).";

        ctx.send(
            poise::CreateReply::default()
                .content(help_text)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Applies for a gate pass.
    #[poise::command(slash_command, rename = "apply")]
    pub async fn gatepass_apply(
        ctx: Context<'_>,
        #[description = "Reason for leaving"]
        #[max_length = 500]
        reason: String,
        #[description = "Departure, e.g. 2024-01-01T10:00"]
        #[max_length = 32]
        from_date: String,
        #[description = "Return, e.g. 2024-01-03T18:00"]
        #[max_length = 32]
        to_date: String,
    ) -> Result<()> {
        let Some(student) = linked_student(ctx).await? else {
            return Ok(());
        };

        let result = ctx
            .data()
            .manager
            .apply(&student.id, &reason, &from_date, &to_date)
            .await;
        match result {
            Ok(pass) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(
                            "✅ Request submitted. Show the approval code below to the hostel warden or admin.",
                        )
                        .embed(pass_embed(&pass)),
                )
                .await?;
                Ok(())
            }
            Err(e) => reply_with_error(ctx, e).await,
        }
    }

    /// Shows your active gate pass and the code to present.
    #[poise::command(slash_command, rename = "status")]
    pub async fn gatepass_status(ctx: Context<'_>) -> Result<()> {
        let Some(student) = linked_student(ctx).await? else {
            return Ok(());
        };

        let active = gate_pass::get_active_pass_for_student(ctx.data().database(), &student.id).await?;
        let Some(pass) = active else {
            ctx.say("You have no active gate pass requests. Use `/gatepass apply` to request one.")
                .await?;
            return Ok(());
        };

        let note = match pass.status {
            GatePassStatus::Pending => "Waiting for approval. Show the approval code to an admin.",
            GatePassStatus::Approved => "Approved. Show the gate code to security when leaving.",
            GatePassStatus::Out => "You are out. Show the gate code to security when you return.",
            GatePassStatus::In | GatePassStatus::Rejected => "This pass is closed.",
        };
        ctx.send(
            poise::CreateReply::default()
                .content(note)
                .embed(pass_embed(&pass))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Lists all gate passes, newest first (admins).
    #[poise::command(slash_command, rename = "list")]
    pub async fn gatepass_list(ctx: Context<'_>) -> Result<()> {
        if !require_staff(ctx, GateEvent::Approve).await? {
            return Ok(());
        }
        let passes = gate_pass::list_gate_passes(ctx.data().database()).await?;
        send_pass_list(ctx, "Gate Pass Requests", &passes).await
    }

    /// Lists gate passes waiting for a decision (admins).
    #[poise::command(slash_command, rename = "pending")]
    pub async fn gatepass_pending(ctx: Context<'_>) -> Result<()> {
        if !require_staff(ctx, GateEvent::Approve).await? {
            return Ok(());
        }
        let passes = gate_pass::list_pending_gate_passes(ctx.data().database()).await?;
        send_pass_list(ctx, "Pending Gate Passes", &passes).await
    }

    /// Approves a pending gate pass (admins).
    #[poise::command(slash_command, rename = "approve")]
    pub async fn gatepass_approve(
        ctx: Context<'_>,
        #[description = "Gate pass id"]
        #[autocomplete = "autocomplete::autocomplete_pending_pass_id"]
        pass_id: String,
    ) -> Result<()> {
        decide(ctx, &pass_id, true).await
    }

    /// Rejects a pending gate pass (admins).
    #[poise::command(slash_command, rename = "reject")]
    pub async fn gatepass_reject(
        ctx: Context<'_>,
        #[description = "Gate pass id"]
        #[autocomplete = "autocomplete::autocomplete_pending_pass_id"]
        pass_id: String,
    ) -> Result<()> {
        decide(ctx, &pass_id, false).await
    }

    /// Approves the pass behind a scanned student approval code (admins).
    #[poise::command(slash_command, rename = "approve_token")]
    pub async fn gatepass_approve_token(
        ctx: Context<'_>,
        #[description = "Content of the student's approval QR code"] token: String,
    ) -> Result<()> {
        if !require_staff(ctx, GateEvent::Approve).await? {
            return Ok(());
        }
        match ctx.data().manager.approve_by_approval_token(&token).await {
            Ok(pass) => {
                ctx.say(format!(
                    "✅ Success! Gate pass for {} has been approved.",
                    pass.student_name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_error(ctx, e).await,
        }
    }

    /// Records a gate scan, toggling the student out or back in (gate security).
    #[poise::command(slash_command, rename = "scan")]
    pub async fn gatepass_scan(
        ctx: Context<'_>,
        #[description = "Content of the gate pass QR code"] payload: String,
    ) -> Result<()> {
        if !require_staff(ctx, GateEvent::Scan).await? {
            return Ok(());
        }
        match ctx.data().manager.scan_update(&payload).await {
            Ok(pass) => {
                let direction = if pass.status == GatePassStatus::Out {
                    "🚪 OUT"
                } else {
                    "🏠 IN"
                };
                ctx.say(format!(
                    "{direction}: {} ({}) - {}",
                    pass.student_name, pass.roll_number, pass.reason
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_error(ctx, e).await,
        }
    }

    async fn decide(ctx: Context<'_>, pass_id: &str, approve: bool) -> Result<()> {
        let event = if approve {
            GateEvent::Approve
        } else {
            GateEvent::Reject
        };
        if !require_staff(ctx, event).await? {
            return Ok(());
        }

        match ctx.data().manager.decide(pass_id, approve).await {
            Ok(pass) => {
                let verdict = if approve { "approved" } else { "rejected" };
                ctx.say(format!(
                    "✅ Gate pass for {} ({}) has been {verdict}.",
                    pass.student_name, pass.roll_number
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_error(ctx, e).await,
        }
    }

    /// Resolves the command author to a student, telling them if they aren't one.
    async fn linked_student(ctx: Context<'_>) -> Result<Option<StudentModel>> {
        let author_id = ctx.author().id.to_string();
        let found = student::get_student_by_discord_id(ctx.data().database(), &author_id).await?;
        if found.is_none() {
            ctx.say("❌ Your Discord account is not linked to a student record.")
                .await?;
        }
        Ok(found)
    }

    /// Checks the author may act as the actor `event` requires.
    async fn require_staff(ctx: Context<'_>, event: GateEvent) -> Result<bool> {
        let actor = event.actor();
        if ctx
            .data()
            .staff
            .allows(&ctx.author().id.to_string(), actor)
        {
            return Ok(true);
        }

        let message = match actor {
            Actor::Admin => "❌ Only hostel admins can review gate passes.",
            Actor::Gate => "❌ Only gate security can scan gate passes.",
            Actor::Student => "❌ Only students can do that.",
        };
        ctx.send(
            poise::CreateReply::default()
                .content(message)
                .ephemeral(true),
        )
        .await?;
        Ok(false)
    }

    /// Shows lifecycle failures to the actor verbatim; anything else is
    /// propagated to the framework error handler.
    async fn reply_with_error(ctx: Context<'_>, error: Error) -> Result<()> {
        match error {
            Error::UnknownStudent { .. }
            | Error::DuplicateActivePass { .. }
            | Error::PassNotFound { .. }
            | Error::MalformedPayload { .. }
            | Error::InvalidTransition { .. }
            | Error::MissingTripDates
            | Error::InvalidDateRange { .. } => {
                ctx.say(format!("❌ {error}")).await?;
                Ok(())
            }
            other => Err(other),
        }
    }

    async fn send_pass_list(ctx: Context<'_>, title: &str, passes: &[GatePassModel]) -> Result<()> {
        let students_out = gate_pass::count_students_out(ctx.data().database()).await?;

        if passes.is_empty() {
            ctx.say(format!("No gate passes to show. Students currently out: {students_out}"))
                .await?;
            return Ok(());
        }

        let fields = pass_list_fields(passes);
        let mut description = format!("Students currently out: {students_out}");
        if fields.len() < passes.len() {
            description.push_str(&format!(
                "\nShowing {} of {} passes.",
                fields.len(),
                passes.len()
            ));
        }

        let embed = serenity::CreateEmbed::default()
            .title(title)
            .description(description)
            .color(0x0058_65F2)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// One embed field per pass, newest first, stopping at the field count or
    /// text budget of a single embed.
    fn pass_list_fields(passes: &[GatePassModel]) -> Vec<(String, String, bool)> {
        let mut used = 0;
        passes
            .iter()
            .take(MAX_EMBED_FIELDS)
            .map(|pass| {
                (
                    truncate(
                        &format!("{} ({})", pass.student_name, pass.roll_number),
                        MAX_SHORT_FIELD_CHARS,
                    ),
                    format!(
                        "**Status:** {}\n**Reason:** {}\n**From:** {}\n**To:** {}\n`{}`",
                        pass.status.as_str(),
                        truncate(&pass.reason, MAX_REASON_CHARS),
                        truncate(&pass.from_date, MAX_SHORT_FIELD_CHARS),
                        truncate(&pass.to_date, MAX_SHORT_FIELD_CHARS),
                        pass.id
                    ),
                    false,
                )
            })
            .take_while(|(name, value, _)| {
                used += name.chars().count() + value.chars().count();
                used <= EMBED_TEXT_BUDGET
            })
            .collect()
    }

    /// Renders a pass and the code its holder should present next.
    fn pass_embed(pass: &GatePassModel) -> serenity::CreateEmbed {
        let (code_label, code) = match pass.status {
            GatePassStatus::Pending => (
                "Approval code",
                ApprovalToken::for_pass(pass).as_str().to_string(),
            ),
            GatePassStatus::Approved | GatePassStatus::Out => (
                "Gate code",
                pass.qr_code_data.clone().unwrap_or_default(),
            ),
            GatePassStatus::In | GatePassStatus::Rejected => ("Pass id", pass.id.clone()),
        };

        // The code is only useful whole, so it goes in the description untruncated
        let description = if code.chars().count() > MAX_DESCRIPTION_CHARS {
            format!(
                "**{code_label}** is too long to display. Ask an admin for pass `{}`.",
                pass.id
            )
        } else {
            format!("**{code_label}**\n```\n{code}\n```")
        };

        serenity::CreateEmbed::default()
            .title(format!("Gate Pass - {}", pass.status.as_str()))
            .description(description)
            .color(status_color(pass.status))
            .field(
                "Student",
                truncate(
                    &format!("{} ({})", pass.student_name, pass.roll_number),
                    MAX_SHORT_FIELD_CHARS,
                ),
                false,
            )
            .field("Reason", truncate(&pass.reason, MAX_REASON_CHARS), false)
            .field("From", truncate(&pass.from_date, MAX_SHORT_FIELD_CHARS), true)
            .field("To", truncate(&pass.to_date, MAX_SHORT_FIELD_CHARS), true)
    }

    /// Cuts `text` to at most `max_chars` characters, marking the cut with an ellipsis.
    fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }

    const fn status_color(status: GatePassStatus) -> u32 {
        match status {
            GatePassStatus::Pending => 0x00F1_C40F,
            GatePassStatus::Approved => 0x002E_CC71,
            GatePassStatus::Out => 0x0034_98DB,
            GatePassStatus::In => 0x0095_A5A6,
            GatePassStatus::Rejected => 0x00E7_4C3C,
        }
    }

}

// Re-export all commands
pub use inner::*;
