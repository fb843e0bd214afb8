//! `PostgreSQL` repository implementation for task ordering.
//!
//! Moves, appends, and removals run inside a single transaction. The task
//! gateway locks the parent section row first, then the section's task
//! rows, so concurrent movers serialize even when the destination section
//! is empty; a missing section row surfaces as `ScopeNotFound`.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
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
use crate::section::domain::SectionId;
use crate::task::domain::{NewTask, PersistedTaskData, Task, TaskId, TaskName};
use crate::task::ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn append(&self, task: NewTask) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let id = task.id();
            let scope = task.section_id();
            retry_on_conflict(MAX_MOVE_ATTEMPTS, || {
                let pending = task.clone();
                connection.transaction::<_, LedgerError, _>(|tx| {
                    let mut gateway = PgTaskGateway { conn: tx };
                    execute_append(&mut gateway, scope, |position| pending.into_task(position))
                })
            })
            .map_err(|err| TaskRepositoryError::from_ledger(err, id, Some(scope)))
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(|found| row_to_task(found).map_err(TaskRepositoryError::persistence))
                .transpose()
        })
        .await
    }

    async fn list_by_section(&self, section_id: SectionId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::section_id.eq(section_id.into_inner()))
                .order(tasks::position.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_task(row).map_err(TaskRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        let name = task.name().as_str().to_owned();
        let description = task.description().map(str::to_owned);
        let due_date = task.due_date();
        let is_completed = task.is_completed();
        let updated_at = task.updated_at();
        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(id.into_inner()))
                .set((
                    tasks::name.eq(name),
                    tasks::description.eq(description),
                    tasks::due_date.eq(due_date),
                    tasks::is_completed.eq(is_completed),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn move_to(
        &self,
        id: TaskId,
        section_id: SectionId,
        position: Position,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            retry_on_conflict(MAX_MOVE_ATTEMPTS, || {
                connection.transaction::<_, LedgerError, _>(|tx| {
                    let mut gateway = PgTaskGateway { conn: tx };
                    execute_move(
                        &mut gateway,
                        id,
                        Destination::Scope(section_id),
                        position,
                        now,
                    )
                })
            })
            .map(MoveOutcome::into_record)
            .map_err(|err| TaskRepositoryError::from_ledger(err, id, Some(section_id)))
        })
        .await
    }

    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            retry_on_conflict(MAX_MOVE_ATTEMPTS, || {
                connection.transaction::<_, LedgerError, _>(|tx| {
                    let mut gateway = PgTaskGateway { conn: tx };
                    execute_removal(&mut gateway, id)
                })
            })
            .map_err(|err| TaskRepositoryError::from_ledger(err, id, None))
        })
        .await
    }
}

/// Transaction-scoped gateway over the `tasks` table.
struct PgTaskGateway<'conn> {
    conn: &'conn mut PgConnection,
}

impl PositionGateway for PgTaskGateway<'_> {
    type Record = Task;

    fn lock_scope(&mut self, scope: SectionId) -> GatewayResult<()> {
        // The parent section row is locked first: it serializes movers
        // targeting an empty destination section, which has no task rows
        // to lock, and doubles as the existence check.
        let section_rows = diesel::sql_query("SELECT id FROM sections WHERE id = $1 FOR UPDATE")
            .bind::<diesel::sql_types::Uuid, _>(scope.into_inner())
            .load::<LockedIdRow>(self.conn)
            .map_err(map_diesel_error)?;
        if section_rows.is_empty() {
            return Err(GatewayError::ScopeNotFound);
        }

        diesel::sql_query("SELECT id FROM tasks WHERE section_id = $1 ORDER BY id FOR UPDATE")
            .bind::<diesel::sql_types::Uuid, _>(scope.into_inner())
            .load::<LockedIdRow>(self.conn)
            .map_err(map_diesel_error)?;
        Ok(())
    }

    fn load(&mut self, id: TaskId) -> GatewayResult<Option<Task>> {
        let row = tasks::table
            .find(id.into_inner())
            .select(TaskRow::as_select())
            .first::<TaskRow>(self.conn)
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_task).transpose()
    }

    fn max_position(&mut self, scope: SectionId) -> GatewayResult<Option<Position>> {
        let max: Option<i32> = tasks::table
            .filter(tasks::section_id.eq(scope.into_inner()))
            .select(diesel::dsl::max(tasks::position))
            .first(self.conn)
            .map_err(map_diesel_error)?;
        max.map(Position::new).transpose().map_err(GatewayError::storage)
    }

    fn shift(
        &mut self,
        scope: SectionId,
        range: PositionRange,
        direction: ShiftDirection,
    ) -> GatewayResult<()> {
        let delta = direction.delta();
        let result = match range.end() {
            Some(end) => diesel::update(
                tasks::table
                    .filter(tasks::section_id.eq(scope.into_inner()))
                    .filter(tasks::position.ge(range.start().get()))
                    .filter(tasks::position.lt(end.get())),
            )
            .set(tasks::position.eq(tasks::position + delta))
            .execute(self.conn),
            None => diesel::update(
                tasks::table
                    .filter(tasks::section_id.eq(scope.into_inner()))
                    .filter(tasks::position.ge(range.start().get())),
            )
            .set(tasks::position.eq(tasks::position + delta))
            .execute(self.conn),
        };
        result.map_err(map_diesel_error)?;
        Ok(())
    }

    fn place(
        &mut self,
        id: TaskId,
        scope: SectionId,
        position: Position,
        at: DateTime<Utc>,
    ) -> GatewayResult<Task> {
        let row = diesel::update(tasks::table.find(id.into_inner()))
            .set((
                tasks::section_id.eq(scope.into_inner()),
                tasks::position.eq(position.get()),
                tasks::updated_at.eq(at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(self.conn)
            .optional()
            .map_err(map_diesel_error)?;
        // The scope rows are locked, so a missing row means a concurrent
        // delete got in first.
        let Some(updated) = row else {
            return Err(GatewayError::Conflict);
        };
        row_to_task(updated)
    }

    fn insert(&mut self, record: Task) -> GatewayResult<Task> {
        diesel::insert_into(tasks::table)
            .values(task_to_new_row(&record))
            .execute(self.conn)
            .map_err(map_diesel_error)?;
        Ok(record)
    }

    fn delete(&mut self, id: TaskId) -> GatewayResult<Task> {
        let row = diesel::delete(tasks::table.find(id.into_inner()))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(self.conn)
            .optional()
            .map_err(map_diesel_error)?;
        let Some(removed) = row else {
            return Err(GatewayError::Conflict);
        };
        row_to_task(removed)
    }

    fn density_snapshot(&mut self, scope: SectionId) -> GatewayResult<DensitySnapshot> {
        diesel::sql_query(concat!(
            "SELECT COUNT(*) AS records, ",
            "COUNT(DISTINCT position) AS distinct_positions, ",
            "COALESCE(MIN(position), 0) AS min_position, ",
            "COALESCE(MAX(position), 0) AS max_position ",
            "FROM tasks WHERE section_id = $1",
        ))
        .bind::<diesel::sql_types::Uuid, _>(scope.into_inner())
        .get_result::<DensityRow>(self.conn)
        .map(DensityRow::into_snapshot)
        .map_err(map_diesel_error)
    }
}

fn row_to_task(row: TaskRow) -> GatewayResult<Task> {
    let TaskRow {
        id,
        section_id,
        name: persisted_name,
        description,
        due_date,
        is_completed,
        position: persisted_position,
        created_at,
        updated_at,
    } = row;

    let name = TaskName::new(persisted_name).map_err(GatewayError::storage)?;
    let position = Position::new(persisted_position).map_err(GatewayError::storage)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        section_id: SectionId::from_uuid(section_id),
        name,
        description,
        due_date,
        completed: is_completed,
        position,
        created_at,
        updated_at,
    }))
}

fn task_to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        section_id: task.section_id().into_inner(),
        name: task.name().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        due_date: task.due_date(),
        is_completed: task.is_completed(),
        position: task.position().get(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}
