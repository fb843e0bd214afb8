//! Section reordering against the full service stack.

use super::helpers::{Board, assert_dense, board};
use rstest::rstest;

const NAMES: [&str; 5] = ["Backlog", "Todo", "Doing", "Review", "Done"];

/// Expected order after moving the element at `from` (1-based) to `to`,
/// with `to` clamped to the board size.
fn model_move(names: &[&str], from: usize, to: usize) -> Vec<String> {
    let mut model: Vec<String> = names.iter().map(|n| (*n).to_owned()).collect();
    let clamped = to.min(model.len());
    let name = model.remove(from - 1);
    model.insert(clamped - 1, name);
    model
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_single_move_on_a_small_board_matches_the_model(
    #[values(1, 2, 3, 4, 5)] from: usize,
    #[values(1, 2, 3, 4, 5, 6)] to: usize,
) {
    let fresh = board();
    let mut created = Vec::new();
    for name in NAMES {
        created.push(fresh.add_section(name).await);
    }
    let mover = created.get(from - 1).expect("seeded section");

    let to_position = i32::try_from(to).expect("small board");
    fresh
        .sections
        .move_section(mover.id(), to_position)
        .await
        .expect("move should succeed");

    assert_eq!(fresh.section_order().await, model_move(&NAMES, from, to));

    let positions: Vec<i32> = fresh
        .sections
        .sections(fresh.project_id)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|s| s.position().get())
        .collect();
    assert_dense(&positions);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_long_mixed_sequence_keeps_the_project_dense(board: Board) {
    let mut created = Vec::new();
    for name in NAMES {
        created.push(board.add_section(name).await);
    }

    let backlog = created.first().expect("seeded section");
    let done = created.last().expect("seeded section");
    let review = created.get(3).expect("seeded section");

    board
        .sections
        .move_section(done.id(), 1)
        .await
        .expect("move should succeed");
    board
        .sections
        .move_section(backlog.id(), 4)
        .await
        .expect("move should succeed");
    board
        .sections
        .delete_section(review.id())
        .await
        .expect("delete should succeed");
    let triage = board.add_section("Triage").await;
    board
        .sections
        .move_section(triage.id(), 2)
        .await
        .expect("move should succeed");

    // Done, Todo, Doing, Backlog after the two moves and the delete; the
    // new section then lands in second place.
    assert_eq!(
        board.section_order().await,
        vec!["Done", "Triage", "Todo", "Doing", "Backlog"]
    );

    let positions: Vec<i32> = board
        .sections
        .sections(board.project_id)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|s| s.position().get())
        .collect();
    assert_dense(&positions);
}
