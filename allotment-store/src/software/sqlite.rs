// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{NewSoftware, Software, SoftwareId, current_timestamp};
use sqlx::{FromRow, query, query_as};

use crate::software::SoftwareStore;
use crate::sqlite::{SqliteError, SqliteStore, decode_id, decode_int, encode_int};

impl<'a> SoftwareStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn insert_software(
        &self,
        software: NewSoftware,
    ) -> Result<Option<Software>, Self::Error> {
        let timestamp = current_timestamp();
        let row = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT OR IGNORE
                    INTO
                        software_v1 (
                            name,
                            description,
                            kind,
                            created_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(&software.name)
                .bind(&software.description)
                .bind(&software.kind)
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

        Ok(Some(Software {
            id: decode_id("id", id)?,
            name: software.name,
            description: software.description,
            kind: software.kind,
            created_at: timestamp,
            updated_at: timestamp,
        }))
    }

    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error> {
        let row = self
            .execute(async |conn| {
                query_as::<_, SoftwareRow>(
                    "
                    SELECT
                        id,
                        name,
                        description,
                        kind,
                        created_at,
                        updated_at
                    FROM
                        software_v1
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

        row.map(Software::try_from).transpose()
    }

    async fn software_by_name(&self, name: &str) -> Result<Option<Software>, Self::Error> {
        let row = self
            .execute(async |conn| {
                query_as::<_, SoftwareRow>(
                    "
                    SELECT
                        id,
                        name,
                        description,
                        kind,
                        created_at,
                        updated_at
                    FROM
                        software_v1
                    WHERE
                        name = ?
                    ",
                )
                .bind(name)
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        row.map(Software::try_from).transpose()
    }

    async fn all_software(&self) -> Result<Vec<Software>, Self::Error> {
        let rows = self
            .execute(async |conn| {
                query_as::<_, SoftwareRow>(
                    "
                    SELECT
                        id,
                        name,
                        description,
                        kind,
                        created_at,
                        updated_at
                    FROM
                        software_v1
                    ORDER BY
                        id
                    ",
                )
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter().map(Software::try_from).collect()
    }

    async fn update_software(&self, software: &Software) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE
                        software_v1
                    SET
                        name = ?,
                        description = ?,
                        kind = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(&software.name)
                .bind(&software.description)
                .bind(&software.kind)
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", software.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_software(&self, id: SoftwareId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        software_v1
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
struct SoftwareRow {
    id: i64,
    name: String,
    description: String,
    kind: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SoftwareRow> for Software {
    type Error = SqliteError;

    fn try_from(row: SoftwareRow) -> Result<Self, Self::Error> {
        Ok(Software {
            id: decode_id("id", row.id)?,
            name: row.name,
            description: row.description,
            kind: row.kind,
            created_at: decode_int("created_at", row.created_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}
