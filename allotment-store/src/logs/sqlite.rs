// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{Actor, AssignmentLog, LogId, NewAssignmentLog, current_timestamp};
use sqlx::{FromRow, query, query_as};

use crate::logs::{AuditLogStore, LogQuery};
use crate::sqlite::{DecodeError, SqliteError, SqliteStore, decode_id, decode_int, encode_int};

impl<'a> AuditLogStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn append_log(&self, entry: NewAssignmentLog) -> Result<AssignmentLog, Self::Error> {
        let timestamp = current_timestamp();
        let (id,) = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT
                    INTO
                        assignment_logs_v1 (
                            staff_id,
                            software_id,
                            action,
                            changed_by,
                            changed_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(encode_int("staff_id", entry.staff_id.as_u64())?)
                .bind(encode_int("software_id", entry.software_id.as_u64())?)
                .bind(entry.action.as_str())
                .bind(encode_int("changed_by", entry.changed_by.into())?)
                .bind(encode_int("changed_at", timestamp)?)
                .bind(encode_int("updated_at", timestamp)?)
                .fetch_one(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        Ok(AssignmentLog {
            id: decode_id("id", id)?,
            staff_id: entry.staff_id,
            software_id: entry.software_id,
            action: entry.action,
            changed_by: entry.changed_by,
            changed_at: timestamp,
            updated_at: timestamp,
        })
    }

    async fn get_log(&self, id: LogId) -> Result<Option<AssignmentLog>, Self::Error> {
        let row = self
            .execute(async |conn| {
                query_as::<_, LogRow>(
                    "
                    SELECT
                        id,
                        staff_id,
                        software_id,
                        action,
                        changed_by,
                        changed_at,
                        updated_at
                    FROM
                        assignment_logs_v1
                    WHERE
                        id = ?
                    ",
                )
                .bind(encode_int("id", id.as_u64())?)
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        row.map(AssignmentLog::try_from).transpose()
    }

    async fn logs(&self, filter: &LogQuery) -> Result<Vec<AssignmentLog>, Self::Error> {
        let staff_id = filter
            .staff_id
            .map(|id| encode_int("staff_id", id.as_u64()))
            .transpose()?;
        let software_id = filter
            .software_id
            .map(|id| encode_int("software_id", id.as_u64()))
            .transpose()?;
        let action = filter.action.map(|action| action.as_str());
        // A negative limit removes the upper bound in SQLite.
        let limit = filter.limit.map_or(-1, i64::from);

        let rows = self
            .execute(async |conn| {
                query_as::<_, LogRow>(
                    "
                    SELECT
                        id,
                        staff_id,
                        software_id,
                        action,
                        changed_by,
                        changed_at,
                        updated_at
                    FROM
                        assignment_logs_v1
                    WHERE
                        (? IS NULL OR staff_id = ?)
                        AND (? IS NULL OR software_id = ?)
                        AND (? IS NULL OR action = ?)
                    ORDER BY
                        changed_at DESC,
                        id DESC
                    LIMIT
                        ?
                    OFFSET
                        ?
                    ",
                )
                .bind(staff_id)
                .bind(staff_id)
                .bind(software_id)
                .bind(software_id)
                .bind(action)
                .bind(action)
                .bind(limit)
                .bind(i64::from(filter.offset))
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter().map(AssignmentLog::try_from).collect()
    }

    async fn update_log(&self, entry: &AssignmentLog) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE
                        assignment_logs_v1
                    SET
                        staff_id = ?,
                        software_id = ?,
                        action = ?,
                        changed_by = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(encode_int("staff_id", entry.staff_id.as_u64())?)
                .bind(encode_int("software_id", entry.software_id.as_u64())?)
                .bind(entry.action.as_str())
                .bind(encode_int("changed_by", entry.changed_by.into())?)
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", entry.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_log(&self, id: LogId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        assignment_logs_v1
                    WHERE
                        id = ?
                    ",
                )
                .bind(encode_int("id", id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, FromRow)]
struct LogRow {
    id: i64,
    staff_id: i64,
    software_id: i64,
    action: String,
    changed_by: i64,
    changed_at: i64,
    updated_at: i64,
}

impl TryFrom<LogRow> for AssignmentLog {
    type Error = SqliteError;

    fn try_from(row: LogRow) -> Result<Self, Self::Error> {
        Ok(AssignmentLog {
            id: decode_id("id", row.id)?,
            staff_id: decode_id("staff_id", row.staff_id)?,
            software_id: decode_id("software_id", row.software_id)?,
            action: row
                .action
                .parse()
                .map_err(|err| SqliteError::Decode("action".into(), DecodeError::Action(err)))?,
            changed_by: Actor::from(decode_int("changed_by", row.changed_by)?),
            changed_at: decode_int("changed_at", row.changed_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}
