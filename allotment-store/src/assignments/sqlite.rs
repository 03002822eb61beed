// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{
    AssignedSoftware, AssignmentId, AssignmentSource, NewAssignment, SoftwareId, StaffId,
    current_timestamp,
};
use sqlx::{FromRow, query, query_as};

use crate::assignments::AssignmentStore;
use crate::sqlite::{DecodeError, SqliteError, SqliteStore, decode_id, decode_int, encode_int};

const SELECT_ASSIGNMENTS: &str = "
    SELECT
        id,
        staff_id,
        software_id,
        source,
        assigned_at,
        updated_at
    FROM
        assigned_software_v1
";

impl<'a> SqliteStore<'a> {
    /// Select all edges matching the filter, `params` are bound in order.
    async fn query_assignments(
        &self,
        filter: &str,
        params: &[i64],
    ) -> Result<Vec<AssignedSoftware>, SqliteError> {
        let sql = format!("{} {} ORDER BY id", SELECT_ASSIGNMENTS, filter);
        let rows = self
            .execute(async |conn| {
                let mut query = query_as::<_, AssignmentRow>(&sql);
                for param in params {
                    query = query.bind(*param);
                }
                query
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter().map(AssignedSoftware::try_from).collect()
    }
}

impl<'a> AssignmentStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<AssignedSoftware, Self::Error> {
        let timestamp = current_timestamp();
        let (id,) = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT
                    INTO
                        assigned_software_v1 (
                            staff_id,
                            software_id,
                            source,
                            assigned_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(encode_int("staff_id", assignment.staff_id.as_u64())?)
                .bind(encode_int("software_id", assignment.software_id.as_u64())?)
                .bind(assignment.source.as_str())
                .bind(encode_int("assigned_at", timestamp)?)
                .bind(encode_int("updated_at", timestamp)?)
                .fetch_one(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        Ok(AssignedSoftware {
            id: decode_id("id", id)?,
            staff_id: assignment.staff_id,
            software_id: assignment.software_id,
            source: assignment.source,
            assigned_at: timestamp,
            updated_at: timestamp,
        })
    }

    async fn get_assignment(
        &self,
        id: AssignmentId,
    ) -> Result<Option<AssignedSoftware>, Self::Error> {
        let mut assignments = self
            .query_assignments("WHERE id = ?", &[encode_int("id", id.as_u64())?])
            .await?;
        Ok(assignments.pop())
    }

    async fn assignments_for_staff(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<AssignedSoftware>, Self::Error> {
        self.query_assignments(
            "WHERE staff_id = ?",
            &[encode_int("staff_id", staff_id.as_u64())?],
        )
        .await
    }

    async fn assignments_for_software(
        &self,
        software_id: SoftwareId,
    ) -> Result<Vec<AssignedSoftware>, Self::Error> {
        self.query_assignments(
            "WHERE software_id = ?",
            &[encode_int("software_id", software_id.as_u64())?],
        )
        .await
    }

    async fn assigned_software_ids(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<SoftwareId>, Self::Error> {
        let rows = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    SELECT
                        software_id
                    FROM
                        assigned_software_v1
                    WHERE
                        staff_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(encode_int("staff_id", staff_id.as_u64())?)
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter()
            .map(|(software_id,)| decode_id("software_id", software_id))
            .collect()
    }

    async fn find_assignment(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
    ) -> Result<Option<AssignedSoftware>, Self::Error> {
        let assignments = self
            .query_assignments(
                "WHERE staff_id = ? AND software_id = ?",
                &[
                    encode_int("staff_id", staff_id.as_u64())?,
                    encode_int("software_id", software_id.as_u64())?,
                ],
            )
            .await?;
        Ok(assignments.into_iter().next())
    }

    async fn update_assignment(&self, assignment: &AssignedSoftware) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE
                        assigned_software_v1
                    SET
                        staff_id = ?,
                        software_id = ?,
                        source = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(encode_int("staff_id", assignment.staff_id.as_u64())?)
                .bind(encode_int("software_id", assignment.software_id.as_u64())?)
                .bind(assignment.source.as_str())
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", assignment.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_assignment(&self, id: AssignmentId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        assigned_software_v1
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

    async fn delete_assignments(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
        source: AssignmentSource,
    ) -> Result<u64, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        assigned_software_v1
                    WHERE
                        staff_id = ?
                        AND software_id = ?
                        AND source = ?
                    ",
                )
                .bind(encode_int("staff_id", staff_id.as_u64())?)
                .bind(encode_int("software_id", software_id.as_u64())?)
                .bind(source.as_str())
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, FromRow)]
struct AssignmentRow {
    id: i64,
    staff_id: i64,
    software_id: i64,
    source: String,
    assigned_at: i64,
    updated_at: i64,
}

impl TryFrom<AssignmentRow> for AssignedSoftware {
    type Error = SqliteError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(AssignedSoftware {
            id: decode_id("id", row.id)?,
            staff_id: decode_id("staff_id", row.staff_id)?,
            software_id: decode_id("software_id", row.software_id)?,
            source: row
                .source
                .parse()
                .map_err(|err| SqliteError::Decode("source".into(), DecodeError::Source(err)))?,
            assigned_at: decode_int("assigned_at", row.assigned_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}
