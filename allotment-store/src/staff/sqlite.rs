// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{DepartmentId, NewStaff, Staff, StaffId, TeamId, current_timestamp};
use sqlx::{FromRow, query, query_as};

use crate::sqlite::{
    DecodeError, SqliteError, SqliteStore, decode_id, decode_int, decode_optional_id, encode_int,
};
use crate::staff::StaffStore;

const SELECT_STAFF: &str = "
    SELECT
        id,
        first_name,
        last_name,
        email,
        department_id,
        team_id,
        status,
        created_at,
        updated_at
    FROM
        staff_v1
";

impl<'a> SqliteStore<'a> {
    async fn query_staff(
        &self,
        filter: &str,
        value: Option<FilterValue<'_>>,
    ) -> Result<Vec<Staff>, SqliteError> {
        let sql = format!("{} {} ORDER BY id", SELECT_STAFF, filter);
        let rows = self
            .execute(async |conn| {
                let query = query_as::<_, StaffRow>(&sql);
                let query = match value {
                    Some(FilterValue::Int(value)) => query.bind(value),
                    Some(FilterValue::Text(value)) => query.bind(value),
                    None => query,
                };
                query
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter().map(Staff::try_from).collect()
    }
}

enum FilterValue<'q> {
    Int(i64),
    Text(&'q str),
}

impl<'a> StaffStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn insert_staff(&self, staff: NewStaff) -> Result<Option<Staff>, Self::Error> {
        let timestamp = current_timestamp();
        let row = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT OR IGNORE
                    INTO
                        staff_v1 (
                            first_name,
                            last_name,
                            email,
                            department_id,
                            team_id,
                            status,
                            created_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(&staff.first_name)
                .bind(&staff.last_name)
                .bind(&staff.email)
                .bind(
                    staff
                        .department_id
                        .map(|id| encode_int("department_id", id.as_u64()))
                        .transpose()?,
                )
                .bind(
                    staff
                        .team_id
                        .map(|id| encode_int("team_id", id.as_u64()))
                        .transpose()?,
                )
                .bind(staff.status.as_str())
                .bind(encode_int("created_at", timestamp)?)
                .bind(encode_int("updated_at", timestamp)?)
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        let Some((id,)) = row else {
            return Ok(None);
        };

        Ok(Some(Staff {
            id: decode_id("id", id)?,
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            department_id: staff.department_id,
            team_id: staff.team_id,
            status: staff.status,
            created_at: timestamp,
            updated_at: timestamp,
        }))
    }

    async fn get_staff(&self, id: StaffId) -> Result<Option<Staff>, Self::Error> {
        let mut staff = self
            .query_staff(
                "WHERE id = ?",
                Some(FilterValue::Int(encode_int("id", id.as_u64())?)),
            )
            .await?;
        Ok(staff.pop())
    }

    async fn update_staff(&self, staff: &Staff) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE
                        staff_v1
                    SET
                        first_name = ?,
                        last_name = ?,
                        email = ?,
                        department_id = ?,
                        team_id = ?,
                        status = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(&staff.first_name)
                .bind(&staff.last_name)
                .bind(&staff.email)
                .bind(
                    staff
                        .department_id
                        .map(|id| encode_int("department_id", id.as_u64()))
                        .transpose()?,
                )
                .bind(
                    staff
                        .team_id
                        .map(|id| encode_int("team_id", id.as_u64()))
                        .transpose()?,
                )
                .bind(staff.status.as_str())
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", staff.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_staff(&self, id: StaffId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        staff_v1
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

    async fn all_staff(&self) -> Result<Vec<Staff>, Self::Error> {
        self.query_staff("", None).await
    }

    async fn staff_by_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Staff>, Self::Error> {
        self.query_staff(
            "WHERE department_id = ?",
            Some(FilterValue::Int(encode_int(
                "department_id",
                department_id.as_u64(),
            )?)),
        )
        .await
    }

    async fn staff_by_team(&self, team_id: TeamId) -> Result<Vec<Staff>, Self::Error> {
        self.query_staff(
            "WHERE team_id = ?",
            Some(FilterValue::Int(encode_int("team_id", team_id.as_u64())?)),
        )
        .await
    }

    async fn staff_by_email(&self, email: &str) -> Result<Option<Staff>, Self::Error> {
        let mut staff = self
            .query_staff("WHERE email = ?", Some(FilterValue::Text(email)))
            .await?;
        Ok(staff.pop())
    }
}

#[derive(Debug, FromRow)]
struct StaffRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    department_id: Option<i64>,
    team_id: Option<i64>,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<StaffRow> for Staff {
    type Error = SqliteError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        Ok(Staff {
            id: decode_id("id", row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            department_id: decode_optional_id("department_id", row.department_id)?,
            team_id: decode_optional_id("team_id", row.team_id)?,
            status: row
                .status
                .parse()
                .map_err(|err| SqliteError::Decode("status".into(), DecodeError::Status(err)))?,
            created_at: decode_int("created_at", row.created_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}
