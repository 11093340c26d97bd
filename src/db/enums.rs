use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Team role. ADMIN and LEADER may edit shifts and decide swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Leader,
    Employee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Leader => "LEADER",
            UserRole::Employee => "EMPLOYEE",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "LEADER" => Ok(UserRole::Leader),
            "EMPLOYEE" => Ok(UserRole::Employee),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for UserRole {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapRequestStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
}

impl SwapRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapRequestStatus::Pending => "PENDING",
            SwapRequestStatus::Approved => "APPROVED",
            SwapRequestStatus::Rejected => "REJECTED",
            SwapRequestStatus::Executed => "EXECUTED",
        }
    }

    /// REJECTED and EXECUTED accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SwapRequestStatus::Rejected | SwapRequestStatus::Executed)
    }

    /// Legal single-step transitions of the swap lifecycle.
    pub fn can_transition_to(&self, next: SwapRequestStatus) -> bool {
        matches!(
            (self, next),
            (SwapRequestStatus::Pending, SwapRequestStatus::Approved)
                | (SwapRequestStatus::Pending, SwapRequestStatus::Rejected)
                | (SwapRequestStatus::Approved, SwapRequestStatus::Executed)
        )
    }
}

impl FromStr for SwapRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SwapRequestStatus::Pending),
            "APPROVED" => Ok(SwapRequestStatus::Approved),
            "REJECTED" => Ok(SwapRequestStatus::Rejected),
            "EXECUTED" => Ok(SwapRequestStatus::Executed),
            other => Err(format!("Invalid swap request status: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for SwapRequestStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for SwapRequestStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteType {
    General,
    Absence,
    Sickness,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::General => "GENERAL",
            NoteType::Absence => "ABSENCE",
            NoteType::Sickness => "SICKNESS",
        }
    }
}

impl FromStr for NoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GENERAL" => Ok(NoteType::General),
            "ABSENCE" => Ok(NoteType::Absence),
            "SICKNESS" => Ok(NoteType::Sickness),
            other => Err(format!("Invalid note type: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for NoteType {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for NoteType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteStatus {
    Pending,
    Approved,
    Rejected,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Pending => "PENDING",
            NoteStatus::Approved => "APPROVED",
            NoteStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for NoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(NoteStatus::Pending),
            "APPROVED" => Ok(NoteStatus::Approved),
            "REJECTED" => Ok(NoteStatus::Rejected),
            other => Err(format!("Invalid note status: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for NoteStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for NoteStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

/// Tag stored on every notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    ShiftCreated,
    ShiftUpdated,
    ShiftDeleted,
    SwapRequested,
    SwapApproved,
    SwapRejected,
    SwapExecuted,
    NoteCreated,
    NoteStatusChanged,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ShiftCreated => "SHIFT_CREATED",
            NotificationKind::ShiftUpdated => "SHIFT_UPDATED",
            NotificationKind::ShiftDeleted => "SHIFT_DELETED",
            NotificationKind::SwapRequested => "SWAP_REQUESTED",
            NotificationKind::SwapApproved => "SWAP_APPROVED",
            NotificationKind::SwapRejected => "SWAP_REJECTED",
            NotificationKind::SwapExecuted => "SWAP_EXECUTED",
            NotificationKind::NoteCreated => "NOTE_CREATED",
            NotificationKind::NoteStatusChanged => "NOTE_STATUS_CHANGED",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHIFT_CREATED" => Ok(NotificationKind::ShiftCreated),
            "SHIFT_UPDATED" => Ok(NotificationKind::ShiftUpdated),
            "SHIFT_DELETED" => Ok(NotificationKind::ShiftDeleted),
            "SWAP_REQUESTED" => Ok(NotificationKind::SwapRequested),
            "SWAP_APPROVED" => Ok(NotificationKind::SwapApproved),
            "SWAP_REJECTED" => Ok(NotificationKind::SwapRejected),
            "SWAP_EXECUTED" => Ok(NotificationKind::SwapExecuted),
            "NOTE_CREATED" => Ok(NotificationKind::NoteCreated),
            "NOTE_STATUS_CHANGED" => Ok(NotificationKind::NoteStatusChanged),
            other => Err(format!("Invalid notification type: {}", other)),
        }
    }
}

impl FromSql<Text, Pg> for NotificationKind {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl ToSql<Text, Pg> for NotificationKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}
