// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{
    Department, DepartmentId, NewDepartment, NewTeam, Team, TeamId, current_timestamp,
};
use sqlx::{FromRow, query, query_as};

use crate::sqlite::{
    SqliteError, SqliteStore, decode_id, decode_int, decode_optional_id, encode_int,
};
use crate::units::UnitStore;

impl<'a> UnitStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn insert_department(
        &self,
        department: NewDepartment,
    ) -> Result<Option<Department>, Self::Error> {
        let timestamp = current_timestamp();
        let row = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT OR IGNORE
                    INTO
                        departments_v1 (
                            name,
                            created_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(&department.name)
                .bind(encode_int("created_at", timestamp)?)
                .bind(encode_int("updated_at", timestamp)?)
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        match row {
            Some((id,)) => Ok(Some(Department {
                id: decode_id("id", id)?,
                name: department.name,
                created_at: timestamp,
                updated_at: timestamp,
            })),
            None => Ok(None),
        }
    }

    async fn get_department(&self, id: DepartmentId) -> Result<Option<Department>, Self::Error> {
        let row = self
            .execute(async |conn| {
                query_as::<_, DepartmentRow>(
                    "
                    SELECT
                        id,
                        name,
                        created_at,
                        updated_at
                    FROM
                        departments_v1
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

        row.map(Department::try_from).transpose()
    }

    async fn all_departments(&self) -> Result<Vec<Department>, Self::Error> {
        let rows = self
            .execute(async |conn| {
                query_as::<_, DepartmentRow>(
                    "
                    SELECT
                        id,
                        name,
                        created_at,
                        updated_at
                    FROM
                        departments_v1
                    ORDER BY
                        id
                    ",
                )
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter().map(Department::try_from).collect()
    }

    async fn update_department(&self, department: &Department) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE
                        departments_v1
                    SET
                        name = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(&department.name)
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", department.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        departments_v1
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

    async fn insert_team(&self, team: NewTeam) -> Result<Team, Self::Error> {
        let timestamp = current_timestamp();
        let (id,) = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT
                    INTO
                        teams_v1 (
                            name,
                            department_id,
                            created_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(&team.name)
                .bind(
                    team.department_id
                        .map(|id| encode_int("department_id", id.as_u64()))
                        .transpose()?,
                )
                .bind(encode_int("created_at", timestamp)?)
                .bind(encode_int("updated_at", timestamp)?)
                .fetch_one(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        Ok(Team {
            id: decode_id("id", id)?,
            name: team.name,
            department_id: team.department_id,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, Self::Error> {
        let row = self
            .execute(async |conn| {
                query_as::<_, TeamRow>(
                    "
                    SELECT
                        id,
                        name,
                        department_id,
                        created_at,
                        updated_at
                    FROM
                        teams_v1
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

        row.map(Team::try_from).transpose()
    }

    async fn teams_by_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Team>, Self::Error> {
        let rows = self
            .execute(async |conn| {
                query_as::<_, TeamRow>(
                    "
                    SELECT
                        id,
                        name,
                        department_id,
                        created_at,
                        updated_at
                    FROM
                        teams_v1
                    WHERE
                        department_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(encode_int("department_id", department_id.as_u64())?)
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter().map(Team::try_from).collect()
    }

    async fn update_team(&self, team: &Team) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE
                        teams_v1
                    SET
                        name = ?,
                        department_id = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(&team.name)
                .bind(
                    team.department_id
                        .map(|id| encode_int("department_id", id.as_u64()))
                        .transpose()?,
                )
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", team.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_team(&self, id: TeamId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        teams_v1
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
struct DepartmentRow {
    id: i64,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<DepartmentRow> for Department {
    type Error = SqliteError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        Ok(Department {
            id: decode_id("id", row.id)?,
            name: row.name,
            created_at: decode_int("created_at", row.created_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    department_id: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<TeamRow> for Team {
    type Error = SqliteError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: decode_id("id", row.id)?,
            name: row.name,
            department_id: decode_optional_id("department_id", row.department_id)?,
            created_at: decode_int("created_at", row.created_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}
