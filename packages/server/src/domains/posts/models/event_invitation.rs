use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::{InvitationId, MemberId, PostId};

/// RSVP response enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationResponse {
    Yes,
    No,
    Interested,
    Pending,
}

impl InvitationResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationResponse::Yes => "yes",
            InvitationResponse::No => "no",
            InvitationResponse::Interested => "interested",
            InvitationResponse::Pending => "pending",
        }
    }
}

impl std::fmt::Display for InvitationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InvitationResponse {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "yes" => Ok(InvitationResponse::Yes),
            "no" => Ok(InvitationResponse::No),
            "interested" => Ok(InvitationResponse::Interested),
            "pending" => Ok(InvitationResponse::Pending),
            _ => Err(anyhow::anyhow!("Invalid invitation response: {}", s)),
        }
    }
}

/// EventInvitation - one member's invitation/RSVP for an event post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventInvitation {
    pub id: InvitationId,
    pub event_id: PostId,
    pub user_id: MemberId,
    pub inviter_id: MemberId,
    pub response: String, // 'yes', 'no', 'interested', 'pending'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventInvitation {
    /// Create one invitation (no-op if the member is already invited)
    pub async fn create(
        event_id: PostId,
        user_id: MemberId,
        inviter_id: MemberId,
        response: InvitationResponse,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let invitation = sqlx::query_as::<_, EventInvitation>(
            r#"
            INSERT INTO event_invitations (id, event_id, user_id, inviter_id, response)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (event_id, user_id) DO UPDATE SET updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(InvitationId::new())
        .bind(event_id)
        .bind(user_id)
        .bind(inviter_id)
        .bind(response.as_str())
        .fetch_one(&mut *conn)
        .await?;
        Ok(invitation)
    }

    /// Replace the invitee list for an event.
    ///
    /// Invitees not in the new list are removed; the inviter's own RSVP
    /// row is never touched. Newly invited members start as 'pending'.
    pub async fn set_invitees(
        event_id: PostId,
        invitee_ids: &[MemberId],
        inviter_id: MemberId,
        conn: &mut PgConnection,
    ) -> Result<()> {
        let uuids: Vec<Uuid> = invitee_ids.iter().map(|id| id.into_uuid()).collect();

        sqlx::query(
            r#"
            DELETE FROM event_invitations
            WHERE event_id = $1
              AND user_id <> $2
              AND user_id <> ALL($3::uuid[])
            "#,
        )
        .bind(event_id)
        .bind(inviter_id)
        .bind(&uuids)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO event_invitations (id, event_id, user_id, inviter_id, response)
            SELECT gen_random_uuid(), $1, unnest($2::uuid[]), $3, $4
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(&uuids)
        .bind(inviter_id)
        .bind(InvitationResponse::Pending.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Invitations for an event, oldest first
    pub async fn find_for_event(event_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        let invitations = sqlx::query_as::<_, EventInvitation>(
            "SELECT * FROM event_invitations WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await?;
        Ok(invitations)
    }
}
