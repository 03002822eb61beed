// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{MatchId, MatchRule, MatchScope, SoftwareId, current_timestamp};
use sqlx::{FromRow, query, query_as};

use crate::matches::MatchStore;
use crate::sqlite::{DecodeError, SqliteError, SqliteStore, decode_id, decode_int, encode_int};

const SELECT_MATCHES: &str = "
    SELECT
        id,
        software_id,
        scope,
        scope_id,
        created_at,
        updated_at
    FROM
        match_rules_v1
";

/// Splits a scope into its `scope` and `scope_id` columns.
///
/// Organization rules are stored with a `scope_id` of `0` so the unique index over software and
/// scope also covers them.
fn encode_scope(scope: &MatchScope) -> Result<(&'static str, i64), SqliteError> {
    let name = match scope {
        MatchScope::Organization => "organization",
        MatchScope::Department(_) => "department",
        MatchScope::Team(_) => "team",
    };
    let id = encode_int("scope_id", scope.unit_id().unwrap_or_default())?;
    Ok((name, id))
}

fn decode_scope(name: &str, id: i64) -> Result<MatchScope, SqliteError> {
    match name {
        "organization" => Ok(MatchScope::Organization),
        "department" => Ok(MatchScope::Department(decode_id("scope_id", id)?)),
        "team" => Ok(MatchScope::Team(decode_id("scope_id", id)?)),
        _ => Err(SqliteError::Decode(
            "scope".into(),
            DecodeError::Scope(name.to_string()),
        )),
    }
}

impl<'a> SqliteStore<'a> {
    async fn query_matches(
        &self,
        scope: Option<&MatchScope>,
    ) -> Result<Vec<MatchRule>, SqliteError> {
        let rows = match scope {
            Some(scope) => {
                let (name, id) = encode_scope(scope)?;
                let sql = format!(
                    "{} WHERE scope = ? AND scope_id = ? ORDER BY id",
                    SELECT_MATCHES
                );
                self.execute(async |conn| {
                    query_as::<_, MatchRow>(&sql)
                        .bind(name)
                        .bind(id)
                        .fetch_all(&mut *conn)
                        .await
                        .map_err(SqliteError::Sqlite)
                })
                .await?
            }
            None => {
                let sql = format!("{} ORDER BY id", SELECT_MATCHES);
                self.execute(async |conn| {
                    query_as::<_, MatchRow>(&sql)
                        .fetch_all(&mut *conn)
                        .await
                        .map_err(SqliteError::Sqlite)
                })
                .await?
            }
        };

        rows.into_iter().map(MatchRule::try_from).collect()
    }
}

impl<'a> MatchStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn insert_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> Result<Option<MatchRule>, Self::Error> {
        let timestamp = current_timestamp();
        let (scope_name, scope_id) = encode_scope(&scope)?;
        let row = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    INSERT OR IGNORE
                    INTO
                        match_rules_v1 (
                            software_id,
                            scope,
                            scope_id,
                            created_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?)
                    RETURNING
                        id
                    ",
                )
                .bind(encode_int("software_id", software_id.as_u64())?)
                .bind(scope_name)
                .bind(scope_id)
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

        Ok(Some(MatchRule {
            id: decode_id("id", id)?,
            software_id,
            scope,
            created_at: timestamp,
            updated_at: timestamp,
        }))
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<MatchRule>, Self::Error> {
        let sql = format!("{} WHERE id = ?", SELECT_MATCHES);
        let row = self
            .execute(async |conn| {
                query_as::<_, MatchRow>(&sql)
                    .bind(encode_int("id", id.as_u64())?)
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(SqliteError::Sqlite)
            })
            .await?;

        row.map(MatchRule::try_from).transpose()
    }

    async fn find_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> Result<Option<MatchRule>, Self::Error> {
        Ok(self
            .query_matches(Some(&scope))
            .await?
            .into_iter()
            .find(|rule| rule.software_id == software_id))
    }

    async fn matches_for_scope(&self, scope: MatchScope) -> Result<Vec<MatchRule>, Self::Error> {
        self.query_matches(Some(&scope)).await
    }

    async fn software_for_scope(&self, scope: MatchScope) -> Result<Vec<SoftwareId>, Self::Error> {
        let (scope_name, scope_id) = encode_scope(&scope)?;
        let rows = self
            .execute(async |conn| {
                query_as::<_, (i64,)>(
                    "
                    SELECT
                        software_id
                    FROM
                        match_rules_v1
                    WHERE
                        scope = ?
                        AND scope_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(scope_name)
                .bind(scope_id)
                .fetch_all(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;

        rows.into_iter()
            .map(|(software_id,)| decode_id("software_id", software_id))
            .collect()
    }

    async fn all_matches(&self) -> Result<Vec<MatchRule>, Self::Error> {
        self.query_matches(None).await
    }

    async fn update_match(&self, rule: &MatchRule) -> Result<bool, Self::Error> {
        let (scope_name, scope_id) = encode_scope(&rule.scope)?;
        let result = self
            .execute(async |conn| {
                query(
                    "
                    UPDATE OR IGNORE
                        match_rules_v1
                    SET
                        software_id = ?,
                        scope = ?,
                        scope_id = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(encode_int("software_id", rule.software_id.as_u64())?)
                .bind(scope_name)
                .bind(scope_id)
                .bind(encode_int("updated_at", current_timestamp())?)
                .bind(encode_int("id", rule.id.as_u64())?)
                .execute(&mut *conn)
                .await
                .map_err(SqliteError::Sqlite)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_match(&self, id: MatchId) -> Result<bool, Self::Error> {
        let result = self
            .execute(async |conn| {
                query(
                    "
                    DELETE FROM
                        match_rules_v1
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
struct MatchRow {
    id: i64,
    software_id: i64,
    scope: String,
    scope_id: i64,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<MatchRow> for MatchRule {
    type Error = SqliteError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(MatchRule {
            id: decode_id("id", row.id)?,
            software_id: decode_id("software_id", row.software_id)?,
            scope: decode_scope(&row.scope, row.scope_id)?,
            created_at: decode_int("created_at", row.created_at)?,
            updated_at: decode_int("updated_at", row.updated_at)?,
        })
    }
}
