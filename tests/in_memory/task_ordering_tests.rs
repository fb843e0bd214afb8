//! Task reordering and cross-section transfer against the full stack.

use super::helpers::{Board, assert_dense, board};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_transfer_renumbers_the_vacated_and_the_entered_section(board: Board) {
    let source = board.add_section("Todo").await;
    let dest = board.add_section("Doing").await;

    let mut source_tasks = Vec::new();
    for name in ["a", "b", "c"] {
        source_tasks.push(board.add_task(source.id(), name).await);
    }
    for name in ["x", "y"] {
        board.add_task(dest.id(), name).await;
    }

    let b = source_tasks.get(1).expect("seeded task");
    let moved = board
        .tasks
        .move_task(b.id(), dest.id(), 1)
        .await
        .expect("transfer should succeed");

    assert_eq!(moved.section_id(), dest.id());
    assert_eq!(moved.position().get(), 1);
    assert_eq!(board.task_order(source.id()).await, vec!["a", "c"]);
    assert_eq!(board.task_order(dest.id()).await, vec!["b", "x", "y"]);
    assert_dense(&board.task_positions(source.id()).await);
    assert_dense(&board.task_positions(dest.id()).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn draining_a_section_task_by_task_keeps_both_sides_dense(board: Board) {
    let source = board.add_section("Todo").await;
    let dest = board.add_section("Done").await;

    let mut tasks = Vec::new();
    for name in ["a", "b", "c", "d"] {
        tasks.push(board.add_task(source.id(), name).await);
    }

    for task in &tasks {
        board
            .tasks
            .move_task(task.id(), dest.id(), 1)
            .await
            .expect("transfer should succeed");
        assert_dense(&board.task_positions(source.id()).await);
        assert_dense(&board.task_positions(dest.id()).await);
    }

    assert!(board.task_order(source.id()).await.is_empty());
    // Each transfer lands at the front, reversing the original order.
    assert_eq!(board.task_order(dest.id()).await, vec!["d", "c", "b", "a"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn section_moves_do_not_disturb_task_ordering(board: Board) {
    let first = board.add_section("Todo").await;
    let second = board.add_section("Doing").await;
    board.add_task(first.id(), "a").await;
    board.add_task(first.id(), "b").await;
    board.add_task(second.id(), "x").await;

    board
        .sections
        .move_section(second.id(), 1)
        .await
        .expect("move should succeed");

    assert_eq!(board.section_order().await, vec!["Doing", "Todo"]);
    assert_eq!(board.task_order(first.id()).await, vec!["a", "b"]);
    assert_eq!(board.task_order(second.id()).await, vec!["x"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_scripted_editing_session_stays_dense_throughout(board: Board) {
    let todo = board.add_section("Todo").await;
    let doing = board.add_section("Doing").await;
    let done = board.add_section("Done").await;

    let mut names = Vec::new();
    for name in ["plan", "build", "test", "ship", "blog"] {
        names.push(board.add_task(todo.id(), name).await);
    }

    let plan = names.first().expect("seeded task");
    let build = names.get(1).expect("seeded task");
    let test = names.get(2).expect("seeded task");
    let ship = names.get(3).expect("seeded task");

    board
        .tasks
        .move_task(build.id(), doing.id(), 1)
        .await
        .expect("transfer should succeed");
    board
        .tasks
        .move_task(test.id(), doing.id(), 2)
        .await
        .expect("transfer should succeed");
    board
        .tasks
        .move_task(plan.id(), done.id(), 99)
        .await
        .expect("transfer should succeed");
    board
        .tasks
        .move_task(ship.id(), todo.id(), 1)
        .await
        .expect("move should succeed");
    board
        .tasks
        .delete_task(test.id())
        .await
        .expect("delete should succeed");

    assert_eq!(board.task_order(todo.id()).await, vec!["ship", "blog"]);
    assert_eq!(board.task_order(doing.id()).await, vec!["build"]);
    assert_eq!(board.task_order(done.id()).await, vec!["plan"]);
    for section_id in [todo.id(), doing.id(), done.id()] {
        assert_dense(&board.task_positions(section_id).await);
    }
}
