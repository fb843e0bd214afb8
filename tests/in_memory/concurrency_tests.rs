//! Concurrency storms: many movers on one board must never leave a scope
//! with duplicated or skipped positions.

use super::helpers::{Board, Lcg, assert_dense, board};
use eyre::{Result, ensure};
use rstest::rstest;
use tessera::section::domain::SectionId;
use tessera::task::domain::TaskId;

const WORKERS: u64 = 8;
const MOVES_PER_WORKER: u64 = 20;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_section_moves_preserve_density(board: Board) {
    let mut section_ids = Vec::new();
    for name in ["One", "Two", "Three", "Four", "Five", "Six"] {
        section_ids.push(board.add_section(name).await.id());
    }

    let mut workers = Vec::new();
    for seed in 0..WORKERS {
        let service = board.sections.clone();
        let ids = section_ids.clone();
        workers.push(tokio::spawn(async move {
            let mut rng = Lcg::new(seed);
            for _ in 0..MOVES_PER_WORKER {
                let index =
                    usize::try_from(rng.next_below(ids.len() as u64)).expect("small index");
                let id = *ids.get(index).expect("known section");
                let to = i32::try_from(rng.next_below(8) + 1).expect("small position");
                service
                    .move_section(id, to)
                    .await
                    .expect("concurrent section move should succeed");
            }
        }));
    }
    for worker in workers {
        worker.await.expect("worker should not panic");
    }

    let positions: Vec<i32> = board
        .sections
        .sections(board.project_id)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|s| s.position().get())
        .collect();
    assert_eq!(positions.len(), section_ids.len());
    assert_dense(&positions);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_transfers_preserve_density_in_both_sections(board: Board) {
    let left = board.add_section("Left").await.id();
    let right = board.add_section("Right").await.id();

    let mut task_ids = Vec::new();
    for name in ["a", "b", "c", "d", "e"] {
        task_ids.push(board.add_task(left, name).await.id());
    }
    for name in ["v", "w", "x", "y", "z"] {
        task_ids.push(board.add_task(right, name).await.id());
    }
    let total = task_ids.len();

    let mut workers = Vec::new();
    for seed in 0..WORKERS {
        let service = board.tasks.clone();
        let ids = task_ids.clone();
        workers.push(tokio::spawn(async move {
            run_task_storm(seed, &service, &ids, left, right).await
        }));
    }
    for worker in workers {
        worker
            .await
            .expect("worker should not panic")
            .expect("storm should succeed");
    }

    let left_positions = board.task_positions(left).await;
    let right_positions = board.task_positions(right).await;
    assert_eq!(left_positions.len() + right_positions.len(), total);
    assert_dense(&left_positions);
    assert_dense(&right_positions);
}

async fn run_task_storm(
    seed: u64,
    service: &super::helpers::Tasks,
    ids: &[TaskId],
    left: SectionId,
    right: SectionId,
) -> Result<()> {
    let mut rng = Lcg::new(seed.wrapping_add(101));
    for _ in 0..MOVES_PER_WORKER {
        let index = usize::try_from(rng.next_below(ids.len() as u64))?;
        let id = *ids.get(index).ok_or_else(|| eyre::eyre!("index in range"))?;
        let dest = if rng.next_below(2) == 0 { left } else { right };
        let to = i32::try_from(rng.next_below(12) + 1)?;
        let moved = service.move_task(id, dest, to).await?;
        ensure!(
            moved.section_id() == dest,
            "moved task must land in the requested section"
        );
    }
    Ok(())
}
