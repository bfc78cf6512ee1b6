//! Gate pass business logic - the lifecycle manager and gate pass queries.
//!
//! [`GatePassManager`] owns every status change. It receives the student
//! directory and the notifier as injected dependencies and writes through the
//! database connection it is built with. Status updates are compare-and-swap
//! on the status the caller read; a lost race yields
//! [`Error::InvalidTransition`] with the status that won.

use crate::{
    core::{
        lifecycle::{self, GateEvent},
        notify::{Notification, Notifier},
        payload::{ApprovalToken, GatePayload},
        student::StudentDirectory,
    },
    entities::{GatePass, GatePassModel, GatePassStatus, gate_pass},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, Set, SqlErr, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Finds a gate pass by id.
pub async fn get_gate_pass_by_id<C>(db: &C, pass_id: &str) -> Result<Option<GatePassModel>>
where
    C: ConnectionTrait,
{
    GatePass::find_by_id(pass_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the student's pending, approved or out pass, if any.
///
/// There is at most one; this is what the student portal shows.
pub async fn get_active_pass_for_student<C>(
    db: &C,
    student_id: &str,
) -> Result<Option<GatePassModel>>
where
    C: ConnectionTrait,
{
    GatePass::find()
        .filter(gate_pass::Column::StudentId.eq(student_id))
        .filter(gate_pass::Column::Status.is_in(GatePassStatus::ACTIVE))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every gate pass, newest first.
pub async fn list_gate_passes(db: &DatabaseConnection) -> Result<Vec<GatePassModel>> {
    GatePass::find()
        .order_by_desc(gate_pass::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists passes waiting for an admin decision, newest first.
pub async fn list_pending_gate_passes(db: &DatabaseConnection) -> Result<Vec<GatePassModel>> {
    GatePass::find()
        .filter(gate_pass::Column::Status.eq(GatePassStatus::Pending))
        .order_by_desc(gate_pass::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a student's full gate pass history, newest first.
pub async fn list_gate_passes_for_student(
    db: &DatabaseConnection,
    student_id: &str,
) -> Result<Vec<GatePassModel>> {
    GatePass::find()
        .filter(gate_pass::Column::StudentId.eq(student_id))
        .order_by_desc(gate_pass::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of students currently outside on a gate pass.
pub async fn count_students_out(db: &DatabaseConnection) -> Result<u64> {
    GatePass::find()
        .filter(gate_pass::Column::Status.eq(GatePassStatus::Out))
        .count(db)
        .await
        .map_err(Into::into)
}

fn new_pass_id() -> String {
    format!("gp-{}", Uuid::new_v4().simple())
}

/// Parses the date formats the student portal produces (`datetime-local`
/// values, optionally with seconds) and RFC 3339 timestamps.
fn parse_pass_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Rejects a blank date or a window that ends before it starts. Dates that
/// don't parse are kept verbatim and not compared.
fn validate_window(from_date: &str, to_date: &str) -> Result<()> {
    if from_date.trim().is_empty() || to_date.trim().is_empty() {
        return Err(Error::MissingTripDates);
    }
    match (parse_pass_datetime(from_date), parse_pass_datetime(to_date)) {
        (Some(from), Some(to)) if from > to => Err(Error::InvalidDateRange {
            from: from_date.to_string(),
            to: to_date.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Runs the gate pass lifecycle against a database.
pub struct GatePassManager<D, N> {
    db: DatabaseConnection,
    directory: D,
    notifier: N,
}

impl<D, N> GatePassManager<D, N>
where
    D: StudentDirectory + Sync,
    N: Notifier,
{
    /// Creates a manager writing to `db`, resolving students through
    /// `directory` and announcing approvals through `notifier`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, directory: D, notifier: N) -> Self {
        Self {
            db,
            directory,
            notifier,
        }
    }

    /// The connection the manager writes to, for read-only queries.
    #[must_use]
    pub const fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Files a new gate pass for a student.
    ///
    /// The pass starts `pending` and its approval token is its own id. Fails with
    /// [`Error::UnknownStudent`] if the student does not resolve and with
    /// [`Error::DuplicateActivePass`] while the student still holds a pending,
    /// approved or out pass.
    #[instrument(skip(self, reason))]
    pub async fn apply(
        &self,
        student_id: &str,
        reason: &str,
        from_date: &str,
        to_date: &str,
    ) -> Result<GatePassModel> {
        if let Some(existing) = get_active_pass_for_student(&self.db, student_id).await? {
            warn!(
                "Student {} already holds pass {} ({})",
                student_id,
                existing.id,
                existing.status.as_str()
            );
            return Err(Error::DuplicateActivePass {
                student_id: student_id.to_string(),
            });
        }

        let student = self
            .directory
            .resolve_student(student_id)
            .await?
            .ok_or_else(|| Error::UnknownStudent {
                id: student_id.to_string(),
            })?;

        validate_window(from_date, to_date)?;

        let pass_id = new_pass_id();
        let now = Utc::now();
        let pass = gate_pass::ActiveModel {
            id: Set(pass_id.clone()),
            student_id: Set(student.id),
            student_name: Set(student.name),
            roll_number: Set(student.roll_number),
            reason: Set(reason.to_string()),
            from_date: Set(from_date.to_string()),
            to_date: Set(to_date.to_string()),
            status: Set(lifecycle::INITIAL_STATUS),
            approval_qr_code_data: Set(pass_id),
            qr_code_data: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The partial unique index catches an application that raced past the check above
        match pass.insert(&self.db).await {
            Ok(created) => {
                info!("Gate pass {} filed by {}", created.id, created.student_id);
                Ok(created)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                warn!("Concurrent gate pass application by {}", student_id);
                Err(Error::DuplicateActivePass {
                    student_id: student_id.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records an admin decision on a pending pass.
    ///
    /// Approving issues the gate payload and notifies the student; rejecting
    /// only changes the status. Deciding a pass that is no longer pending fails
    /// with [`Error::InvalidTransition`].
    #[instrument(skip(self))]
    pub async fn decide(&self, pass_id: &str, approve: bool) -> Result<GatePassModel> {
        let pass = self.require_pass(pass_id).await?;
        let event = if approve {
            GateEvent::Approve
        } else {
            GateEvent::Reject
        };
        let next = lifecycle::transition(pass.status, event)?;

        let gate_payload = if approve {
            Some(GatePayload::for_pass(&pass).encode()?)
        } else {
            None
        };

        let updated = self.swap_status(&pass, next, gate_payload).await?;
        info!(
            "Gate pass {} {} for {}",
            updated.id,
            updated.status.as_str(),
            updated.student_id
        );

        if approve {
            self.announce_approval(&updated).await;
        }
        Ok(updated)
    }

    /// Toggles a pass out and back in from a scanned gate payload.
    ///
    /// The pass must match both the payload's pass id and student id.
    #[instrument(skip(self, qr_payload))]
    pub async fn scan_update(&self, qr_payload: &str) -> Result<GatePassModel> {
        let payload = GatePayload::decode(qr_payload)?;

        let pass = GatePass::find()
            .filter(gate_pass::Column::Id.eq(payload.pass_id.as_str()))
            .filter(gate_pass::Column::StudentId.eq(payload.student_id.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::PassNotFound {
                id: payload.pass_id.clone(),
            })?;

        let next = lifecycle::transition(pass.status, GateEvent::Scan)?;
        let updated = self.swap_status(&pass, next, None).await?;
        info!(
            "Gate scan: {} is now {}",
            updated.student_id,
            updated.status.as_str()
        );
        Ok(updated)
    }

    /// Approves the pass named by a scanned approval token.
    #[instrument(skip(self))]
    pub async fn approve_by_approval_token(&self, token: &str) -> Result<GatePassModel> {
        let token = ApprovalToken::parse(token)?;
        self.decide(token.as_str(), true).await
    }

    async fn require_pass(&self, pass_id: &str) -> Result<GatePassModel> {
        get_gate_pass_by_id(&self.db, pass_id)
            .await?
            .ok_or_else(|| Error::PassNotFound {
                id: pass_id.to_string(),
            })
    }

    /// Moves `pass` to `next` only if its stored status is still the one read.
    async fn swap_status(
        &self,
        pass: &GatePassModel,
        next: GatePassStatus,
        gate_payload: Option<String>,
    ) -> Result<GatePassModel> {
        let mut update = GatePass::update_many()
            .col_expr(gate_pass::Column::Status, Expr::value(next))
            .col_expr(gate_pass::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(data) = gate_payload {
            update = update.col_expr(gate_pass::Column::QrCodeData, Expr::value(data));
        }

        let result = update
            .filter(gate_pass::Column::Id.eq(pass.id.as_str()))
            .filter(gate_pass::Column::Status.eq(pass.status))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let current = self.require_pass(&pass.id).await?;
            warn!(
                "Gate pass {} changed to {} concurrently",
                pass.id,
                current.status.as_str()
            );
            return Err(Error::InvalidTransition {
                status: current.status,
            });
        }

        self.require_pass(&pass.id).await
    }

    async fn announce_approval(&self, pass: &GatePassModel) {
        match self.directory.resolve_student(&pass.student_id).await {
            Ok(Some(student)) => {
                debug!("Notifying {} of approval", student.id);
                self.notifier
                    .notify(Notification::gate_pass_approved(student, pass));
            }
            Ok(None) => warn!(
                "Student {} no longer in directory; approval not announced",
                pass.student_id
            ),
            Err(e) => warn!("Could not resolve student for approval notice: {}", e),
        }
    }
}
