//! `PostgreSQL` repository implementation for section ordering.
//!
//! Moves, appends, and removals run inside a single transaction; the
//! project's section rows are locked with `SELECT .. FOR UPDATE` so
//! concurrent movers serialize instead of corrupting the dense ordering.

use super::{
    models::{NewSectionRow, SectionRow},
    schema::sections,
};
use crate::ordering::adapters::postgres::{
    DensityRow, LockedIdRow, MAX_MOVE_ATTEMPTS, PgPool, map_diesel_error, retry_on_conflict,
};
use crate::ordering::domain::{
    DensitySnapshot, Destination, Position, PositionRange, ShiftDirection,
};
use crate::ordering::ledger::{
    LedgerError, MoveOutcome, execute_append, execute_move, execute_removal,
};
use crate::ordering::ports::{GatewayError, GatewayResult, PositionGateway};
use crate::section::domain::{
    NewSection, PersistedSectionData, ProjectId, Section, SectionId, SectionName,
};
use crate::section::ports::{SectionRepository, SectionRepositoryError, SectionRepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed section repository.
#[derive(Debug, Clone)]
pub struct PostgresSectionRepository {
    pool: PgPool,
}

impl PostgresSectionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SectionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SectionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SectionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SectionRepositoryError::persistence)?
    }
}

#[async_trait]
impl SectionRepository for PostgresSectionRepository {
    async fn append(&self, section: NewSection) -> SectionRepositoryResult<Section> {
        self.run_blocking(move |connection| {
            let id = section.id();
            let scope = section.project_id();
            retry_on_conflict(MAX_MOVE_ATTEMPTS, || {
                let pending = section.clone();
                connection.transaction::<_, LedgerError, _>(|tx| {
                    let mut gateway = PgSectionGateway { conn: tx };
                    execute_append(&mut gateway, scope, |position| {
                        pending.into_section(position)
                    })
                })
            })
            .map_err(|err| SectionRepositoryError::from_ledger(err, id))
        })
        .await
    }

    async fn find_by_id(&self, id: SectionId) -> SectionRepositoryResult<Option<Section>> {
        self.run_blocking(move |connection| {
            let row = sections::table
                .find(id.into_inner())
                .select(SectionRow::as_select())
                .first::<SectionRow>(connection)
                .optional()
                .map_err(SectionRepositoryError::persistence)?;
            row.map(|found| {
                row_to_section(found).map_err(SectionRepositoryError::persistence)
            })
            .transpose()
        })
        .await
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
    ) -> SectionRepositoryResult<Vec<Section>> {
        self.run_blocking(move |connection| {
            let rows = sections::table
                .filter(sections::project_id.eq(project_id.into_inner()))
                .order(sections::position.asc())
                .select(SectionRow::as_select())
                .load::<SectionRow>(connection)
                .map_err(SectionRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_section(row).map_err(SectionRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn update(&self, section: &Section) -> SectionRepositoryResult<()> {
        let id = section.id();
        let name = section.name().as_str().to_owned();
        let updated_at = section.updated_at();
        self.run_blocking(move |connection| {
            let affected = diesel::update(sections::table.find(id.into_inner()))
                .set((
                    sections::name.eq(name),
                    sections::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(SectionRepositoryError::persistence)?;
            if affected == 0 {
                return Err(SectionRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn move_to(
        &self,
        id: SectionId,
        position: Position,
        now: DateTime<Utc>,
    ) -> SectionRepositoryResult<Section> {
        self.run_blocking(move |connection| {
            retry_on_conflict(MAX_MOVE_ATTEMPTS, || {
                connection.transaction::<_, LedgerError, _>(|tx| {
                    let mut gateway = PgSectionGateway { conn: tx };
                    execute_move(&mut gateway, id, Destination::CurrentScope, position, now)
                })
            })
            .map(MoveOutcome::into_record)
            .map_err(|err| SectionRepositoryError::from_ledger(err, id))
        })
        .await
    }

    async fn remove(&self, id: SectionId) -> SectionRepositoryResult<Section> {
        self.run_blocking(move |connection| {
            retry_on_conflict(MAX_MOVE_ATTEMPTS, || {
                connection.transaction::<_, LedgerError, _>(|tx| {
                    let mut gateway = PgSectionGateway { conn: tx };
                    execute_removal(&mut gateway, id)
                })
            })
            .map_err(|err| SectionRepositoryError::from_ledger(err, id))
        })
        .await
    }
}

/// Transaction-scoped gateway over the `sections` table.
struct PgSectionGateway<'conn> {
    conn: &'conn mut PgConnection,
}

impl PositionGateway for PgSectionGateway<'_> {
    type Record = Section;

    fn lock_scope(&mut self, scope: ProjectId) -> GatewayResult<()> {
        // Stable lock order over the sibling rows; concurrent movers in the
        // same project queue here instead of deadlocking. Projects
        // themselves live outside this crate, so an empty result simply
        // means an empty project.
        diesel::sql_query(
            "SELECT id FROM sections WHERE project_id = $1 ORDER BY id FOR UPDATE",
        )
        .bind::<diesel::sql_types::Uuid, _>(scope.into_inner())
        .load::<LockedIdRow>(self.conn)
        .map_err(map_diesel_error)?;
        Ok(())
    }

    fn load(&mut self, id: SectionId) -> GatewayResult<Option<Section>> {
        let row = sections::table
            .find(id.into_inner())
            .select(SectionRow::as_select())
            .first::<SectionRow>(self.conn)
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_section).transpose()
    }

    fn max_position(&mut self, scope: ProjectId) -> GatewayResult<Option<Position>> {
        let max: Option<i32> = sections::table
            .filter(sections::project_id.eq(scope.into_inner()))
            .select(diesel::dsl::max(sections::position))
            .first(self.conn)
            .map_err(map_diesel_error)?;
        max.map(Position::new).transpose().map_err(GatewayError::storage)
    }

    fn shift(
        &mut self,
        scope: ProjectId,
        range: PositionRange,
        direction: ShiftDirection,
    ) -> GatewayResult<()> {
        let delta = direction.delta();
        let result = match range.end() {
            Some(end) => diesel::update(
                sections::table
                    .filter(sections::project_id.eq(scope.into_inner()))
                    .filter(sections::position.ge(range.start().get()))
                    .filter(sections::position.lt(end.get())),
            )
            .set(sections::position.eq(sections::position + delta))
            .execute(self.conn),
            None => diesel::update(
                sections::table
                    .filter(sections::project_id.eq(scope.into_inner()))
                    .filter(sections::position.ge(range.start().get())),
            )
            .set(sections::position.eq(sections::position + delta))
            .execute(self.conn),
        };
        result.map_err(map_diesel_error)?;
        Ok(())
    }

    fn place(
        &mut self,
        id: SectionId,
        scope: ProjectId,
        position: Position,
        at: DateTime<Utc>,
    ) -> GatewayResult<Section> {
        let row = diesel::update(sections::table.find(id.into_inner()))
            .set((
                sections::project_id.eq(scope.into_inner()),
                sections::position.eq(position.get()),
                sections::updated_at.eq(at),
            ))
            .returning(SectionRow::as_returning())
            .get_result::<SectionRow>(self.conn)
            .optional()
            .map_err(map_diesel_error)?;
        // The scope rows are locked, so a missing row means a concurrent
        // delete got in first.
        let Some(updated) = row else {
            return Err(GatewayError::Conflict);
        };
        row_to_section(updated)
    }

    fn insert(&mut self, record: Section) -> GatewayResult<Section> {
        diesel::insert_into(sections::table)
            .values(section_to_new_row(&record))
            .execute(self.conn)
            .map_err(map_diesel_error)?;
        Ok(record)
    }

    fn delete(&mut self, id: SectionId) -> GatewayResult<Section> {
        let row = diesel::delete(sections::table.find(id.into_inner()))
            .returning(SectionRow::as_returning())
            .get_result::<SectionRow>(self.conn)
            .optional()
            .map_err(map_diesel_error)?;
        let Some(removed) = row else {
            return Err(GatewayError::Conflict);
        };
        row_to_section(removed)
    }

    fn density_snapshot(&mut self, scope: ProjectId) -> GatewayResult<DensitySnapshot> {
        diesel::sql_query(concat!(
            "SELECT COUNT(*) AS records, ",
            "COUNT(DISTINCT position) AS distinct_positions, ",
            "COALESCE(MIN(position), 0) AS min_position, ",
            "COALESCE(MAX(position), 0) AS max_position ",
            "FROM sections WHERE project_id = $1",
        ))
        .bind::<diesel::sql_types::Uuid, _>(scope.into_inner())
        .get_result::<DensityRow>(self.conn)
        .map(DensityRow::into_snapshot)
        .map_err(map_diesel_error)
    }
}

fn row_to_section(row: SectionRow) -> GatewayResult<Section> {
    let SectionRow {
        id,
        project_id,
        name: persisted_name,
        position: persisted_position,
        created_at,
        updated_at,
    } = row;

    let name = SectionName::new(persisted_name).map_err(GatewayError::storage)?;
    let position = Position::new(persisted_position).map_err(GatewayError::storage)?;

    Ok(Section::from_persisted(PersistedSectionData {
        id: SectionId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        name,
        position,
        created_at,
        updated_at,
    }))
}

fn section_to_new_row(section: &Section) -> NewSectionRow {
    NewSectionRow {
        id: section.id().into_inner(),
        project_id: section.project_id().into_inner(),
        name: section.name().as_str().to_owned(),
        position: section.position().get(),
        created_at: section.created_at(),
        updated_at: section.updated_at(),
    }
}
