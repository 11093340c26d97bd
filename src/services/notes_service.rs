use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::enums::{NoteStatus, NoteType, NotificationKind},
    db::models::{NOTE_VISIBILITY_ALL, Note, NoteDetail, NoteFilter, UserSummary},
    db::store::Store,
    error::{AppError, AppResult},
    routes::notes::{CreateNoteRequest, NoteQuery},
    services::authz::{self, Action},
    services::context::RequestContext,
    services::notifications_service::{NotificationDraft, NotificationEmitter},
    services::shift_time::parse_date,
    validation::note::{validate_note_body, validate_note_range},
};

pub struct NotesService;

impl NotesService {
    /// Notes of a team, newest first. With both bounds given, only notes whose
    /// range overlaps `[dateFrom, dateTo]` are returned.
    pub async fn list(
        store: &dyn Store,
        ctx: &RequestContext,
        query: &NoteQuery,
    ) -> AppResult<Vec<NoteDetail>> {
        let overlapping = match (query.date_from.as_deref(), query.date_to.as_deref()) {
            (Some(from), Some(to)) => Some((parse_date(from)?, parse_date(to)?)),
            _ => None,
        };
        let notes = store
            .list_notes(NoteFilter {
                team_id: query.team_id.unwrap_or(ctx.team_id),
                overlapping,
            })
            .await?;
        Self::enrich(store, notes).await
    }

    async fn enrich(store: &dyn Store, notes: Vec<Note>) -> AppResult<Vec<NoteDetail>> {
        let mut author_ids: Vec<Uuid> = notes.iter().map(|n| n.created_by_user_id).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors: HashMap<Uuid, UserSummary> = store
            .find_users(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(notes
            .into_iter()
            .map(|note| NoteDetail {
                created_by: authors.get(&note.created_by_user_id).cloned(),
                note,
            })
            .collect())
    }

    pub async fn create(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        req: &CreateNoteRequest,
    ) -> AppResult<NoteDetail> {
        let (Some(note_type), Some(body), Some(date_from), Some(date_to)) = (
            req.note_type.as_deref(),
            req.body.as_deref(),
            req.date_from.as_deref(),
            req.date_to.as_deref(),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };
        if req.created_by_user_id.is_some_and(|id| id != ctx.user_id) {
            return Err(AppError::forbidden("Notes can only be created on your own behalf"));
        }
        let team_id = req.team_id.unwrap_or(ctx.team_id);
        if team_id != ctx.team_id {
            return Err(AppError::forbidden("You are not a member of this team"));
        }

        let note_type: NoteType = note_type
            .parse()
            .map_err(|_| AppError::validation("Invalid note type"))?;
        let status = match req.status.as_deref() {
            None => NoteStatus::Pending,
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::validation("Invalid status"))?,
        };
        if status != NoteStatus::Pending {
            authz::require(ctx, Action::ApproveNotes)?;
        }
        validate_note_body(body)?;
        let (date_from, date_to) = validate_note_range(date_from, date_to)?;

        let note = store
            .insert_note(Note {
                id: Uuid::new_v4(),
                team_id,
                created_by_user_id: ctx.user_id,
                note_type,
                status,
                title: req
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
                body: body.trim().to_string(),
                date_from,
                date_to,
                visibility: NOTE_VISIBILITY_ALL.to_string(),
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            note_id = %note.id,
            %team_id,
            note_type = note.note_type.as_str(),
            %date_from,
            %date_to,
            "note created"
        );

        emitter
            .emit(NotificationDraft::new(
                team_id,
                Some(note.created_by_user_id),
                NotificationKind::NoteCreated,
                "Notat opprettet",
                format!("Nytt notat opprettet: {}", note.label()),
            ))
            .await;

        let author = store.find_user(note.created_by_user_id).await?;
        Ok(NoteDetail {
            created_by: author.as_ref().map(UserSummary::from),
            note,
        })
    }

    /// Sets the decision on a note and tells its author.
    pub async fn set_status(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        note_id: Uuid,
        status: Option<&str>,
    ) -> AppResult<Note> {
        authz::require(ctx, Action::ApproveNotes)?;
        let status: NoteStatus = status
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| AppError::validation("Invalid status"))?;

        let note = store
            .update_note_status(note_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Note not found"))?;
        tracing::info!(%note_id, status = status.as_str(), decided_by = %ctx.user_id, "note status changed");

        let (title, verdict) = match status {
            NoteStatus::Approved => ("Notat godkjent", "godkjent"),
            NoteStatus::Rejected => ("Notat avvist", "avvist"),
            NoteStatus::Pending => ("Notat til behandling", "satt tilbake til behandling"),
        };
        emitter
            .emit(NotificationDraft::new(
                note.team_id,
                Some(note.created_by_user_id),
                NotificationKind::NoteStatusChanged,
                title,
                format!("Ditt notat \"{}\" er {}", note.label(), verdict),
            ))
            .await;

        Ok(note)
    }
}
