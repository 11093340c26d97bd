//! Demo data: one rota team with its shift types, staff, four weeks of
//! shifts from 2026-01-05 and two notes.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::db::enums::{NoteStatus, NoteType, UserRole};
use crate::db::models::{NOTE_VISIBILITY_ALL, NewTeam, Note, Shift, ShiftType, User};
use crate::db::store::Store;
use crate::error::{AppError, AppResult};
use crate::services::shift_time::resolve_from_strings;

pub const DEMO_TEAM_NAME: &str = "HDO - Turnus";

const SHIFT_TYPES: &[(&str, &str, &str, &str, &str, bool)] = &[
    ("Fri", "Fri", "#90EE90", "00:00", "00:00", false),
    ("Dag", "Dag 08-16.00", "#9ACD32", "08:00", "16:00", false),
    ("Dag2", "Dag 08.00-17.10", "#9ACD32", "08:00", "17:10", false),
    ("N1", "N1 22.45-08.15", "#CD853F", "22:45", "08:15", true),
    ("N2", "N2 20.00-08.15", "#CD853F", "20:00", "08:15", true),
    ("K1", "K1 15.00-23.00", "#191970", "15:00", "23:00", false),
    ("D2", "D2 08.00-20.15", "#808080", "08:00", "20:15", false),
];

const USERS: &[(&str, &str, UserRole)] = &[
    ("Admin User", "admin@hdo.no", UserRole::Admin),
    ("Leader User", "leader@hdo.no", UserRole::Leader),
    ("Jan Thomas Kristiansen", "jan.thomas.kristiansen@hdo.no", UserRole::Employee),
    ("Erik Heyerdahl", "erik.heyerdahl@hdo.no", UserRole::Employee),
    ("Stian Jørgensen", "stian.jorgensen@hdo.no", UserRole::Employee),
    ("Gerardas Zozulia", "gerardas.zozulia@hdo.no", UserRole::Employee),
    ("Sara Luggenes", "sara.luggenes@hdo.no", UserRole::Employee),
    ("Alexander Stenersen", "alexander.stenersen@hdo.no", UserRole::Employee),
];

/// One week per row: (employee email, shift type codes Monday to Sunday).
const WEEKS: &[(&str, [&str; 7])] = &[
    (
        "jan.thomas.kristiansen@hdo.no",
        ["Dag", "Dag", "Dag", "Fri", "Fri", "D2", "D2"],
    ),
    (
        "erik.heyerdahl@hdo.no",
        ["N1", "N1", "N1", "Fri", "Fri", "Fri", "Fri"],
    ),
    (
        "stian.jorgensen@hdo.no",
        ["Fri", "Fri", "Fri", "N1", "N1", "N2", "N2"],
    ),
    (
        "sara.luggenes@hdo.no",
        ["K1", "K1", "K1", "K1", "K1", "Fri", "Fri"],
    ),
];

#[derive(Debug, Default, Clone)]
pub struct SeedSummary {
    pub team_id: Option<Uuid>,
    pub shift_types: usize,
    pub users: usize,
    pub shifts: usize,
    pub notes: usize,
}

fn first_monday() -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 1, 5).ok_or_else(|| AppError::internal("invalid seed date"))
}

/// Loads the demo data. Does nothing when the demo team already exists.
pub async fn seed_demo(store: &dyn Store) -> AppResult<SeedSummary> {
    if let Some(team) = store
        .list_teams()
        .await?
        .into_iter()
        .find(|t| t.name == DEMO_TEAM_NAME)
    {
        tracing::info!(team_id = %team.id, "demo data already present, skipping seed");
        return Ok(SeedSummary {
            team_id: Some(team.id),
            ..SeedSummary::default()
        });
    }

    let mut summary = SeedSummary::default();
    let team = store.create_team(NewTeam::new(DEMO_TEAM_NAME)).await?;
    summary.team_id = Some(team.id);

    let mut types: HashMap<String, ShiftType> = store
        .list_shift_types()
        .await?
        .into_iter()
        .map(|t| (t.code.clone(), t))
        .collect();
    for &(code, label, color, start, end, crosses) in SHIFT_TYPES {
        if types.contains_key(code) {
            continue;
        }
        let shift_type = store
            .create_shift_type(ShiftType {
                id: Uuid::new_v4(),
                code: code.to_string(),
                label: label.to_string(),
                color: color.to_string(),
                default_start_time: start.to_string(),
                default_end_time: end.to_string(),
                crosses_midnight: crosses,
            })
            .await?;
        types.insert(code.to_string(), shift_type);
        summary.shift_types += 1;
    }

    let mut users: HashMap<&str, User> = HashMap::new();
    for &(name, email, role) in USERS {
        let user = store
            .create_user(User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                team_id: team.id,
            })
            .await?;
        users.insert(email, user);
        summary.users += 1;
    }

    let monday = first_monday()?;
    for (week, (email, codes)) in WEEKS.iter().enumerate() {
        let user = users
            .get(email)
            .ok_or_else(|| AppError::internal(format!("seed user {} missing", email)))?;
        for (day, code) in codes.iter().enumerate() {
            let shift_type = types
                .get(*code)
                .ok_or_else(|| AppError::internal(format!("seed shift type {} missing", code)))?;
            let date = monday + Duration::days((week * 7 + day) as i64);
            let (date, window) = resolve_from_strings(
                &date.format("%Y-%m-%d").to_string(),
                &shift_type.default_start_time,
                &shift_type.default_end_time,
                shift_type.crosses_midnight,
            )?;
            store
                .insert_shift(Shift {
                    id: Uuid::new_v4(),
                    team_id: team.id,
                    user_id: user.id,
                    date,
                    start_date_time: window.start,
                    end_date_time: window.end,
                    shift_type_id: shift_type.id,
                    comment: None,
                })
                .await?;
            summary.shifts += 1;
        }
    }

    let employees = ["jan.thomas.kristiansen@hdo.no", "erik.heyerdahl@hdo.no"];
    let notes = [
        (
            employees[0],
            NoteType::General,
            NoteStatus::Approved,
            "Viktig informasjon",
            "Denne uken har ikke noen beskjeder.",
            (2026, 1, 5),
            (2026, 1, 11),
        ),
        (
            employees[1],
            NoteType::Absence,
            NoteStatus::Pending,
            "Forespørsel om fravær",
            "Ønsker å ta fri 15-16 januar",
            (2026, 1, 15),
            (2026, 1, 16),
        ),
    ];
    for (email, note_type, status, title, body, from, to) in notes {
        let author = users
            .get(email)
            .ok_or_else(|| AppError::internal(format!("seed user {} missing", email)))?;
        let date = |(y, m, d): (i32, u32, u32)| {
            NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| AppError::internal("invalid seed date"))
        };
        store
            .insert_note(Note {
                id: Uuid::new_v4(),
                team_id: team.id,
                created_by_user_id: author.id,
                note_type,
                status,
                title: Some(title.to_string()),
                body: body.to_string(),
                date_from: date(from)?,
                date_to: date(to)?,
                visibility: NOTE_VISIBILITY_ALL.to_string(),
                created_at: Utc::now(),
            })
            .await?;
        summary.notes += 1;
    }

    tracing::info!(
        team_id = %team.id,
        shift_types = summary.shift_types,
        users = summary.users,
        shifts = summary.shifts,
        notes = summary.notes,
        "demo data seeded"
    );
    Ok(summary)
}
