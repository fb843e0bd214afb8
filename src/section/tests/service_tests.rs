//! Service orchestration tests for section ordering.

use std::sync::Arc;

use crate::ordering::domain::OrderingDomainError;
use crate::section::{
    adapters::memory::InMemorySectionRepository,
    domain::{ProjectId, Section, SectionId},
    ports::SectionRepositoryError,
    services::{SectionOrderingError, SectionOrderingService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = SectionOrderingService<InMemorySectionRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    SectionOrderingService::new(
        Arc::new(InMemorySectionRepository::new()),
        Arc::new(DefaultClock),
    )
}

async fn seed(service: &TestService, project_id: ProjectId, names: &[&str]) -> Vec<Section> {
    let mut sections = Vec::new();
    for name in names {
        let section = service
            .create_section(project_id, name)
            .await
            .expect("section creation should succeed");
        sections.push(section);
    }
    sections
}

async fn names_in_order(service: &TestService, project_id: ProjectId) -> Vec<String> {
    service
        .sections(project_id)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|section| section.name().as_str().to_owned())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_sections_append_behind_their_siblings(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing", "Done"]).await;

    let positions: Vec<i32> = sections.iter().map(|s| s.position().get()).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert_eq!(
        names_in_order(&service, project_id).await,
        vec!["Todo", "Doing", "Done"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_a_section_down_rotates_the_run_it_passes(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing", "Review", "Done"]).await;
    let first = sections.first().expect("seeded section");

    let moved = service
        .move_section(first.id(), 3)
        .await
        .expect("move should succeed");

    assert_eq!(moved.position().get(), 3);
    assert_eq!(
        names_in_order(&service, project_id).await,
        vec!["Doing", "Review", "Todo", "Done"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_a_section_up_displaces_the_run_it_enters(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing", "Review", "Done"]).await;
    let last = sections.last().expect("seeded section");

    service
        .move_section(last.id(), 2)
        .await
        .expect("move should succeed");

    assert_eq!(
        names_in_order(&service, project_id).await,
        vec!["Todo", "Done", "Doing", "Review"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn positions_past_the_end_clamp_to_the_last_section(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing", "Done"]).await;
    let first = sections.first().expect("seeded section");

    let moved = service
        .move_section(first.id(), 99)
        .await
        .expect("move should succeed");

    assert_eq!(moved.position().get(), 3);
    assert_eq!(
        names_in_order(&service, project_id).await,
        vec!["Doing", "Done", "Todo"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_to_the_current_position_returns_the_section_unchanged(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing"]).await;
    let second = sections.last().expect("seeded section");

    let moved = service
        .move_section(second.id(), 2)
        .await
        .expect("no-op move should succeed");

    assert_eq!(moved, *second);
    assert_eq!(
        names_in_order(&service, project_id).await,
        vec!["Todo", "Doing"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_a_missing_section_reports_not_found(service: TestService) {
    let result = service.move_section(SectionId::new(), 1).await;
    assert!(matches!(
        result,
        Err(SectionOrderingError::Repository(
            SectionRepositoryError::NotFound(_)
        ))
    ));
}

#[rstest]
#[case(0)]
#[case(-5)]
#[tokio::test(flavor = "multi_thread")]
async fn non_positive_positions_are_rejected(service: TestService, #[case] position: i32) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo"]).await;
    let only = sections.first().expect("seeded section");

    let result = service.move_section(only.id(), position).await;
    assert!(matches!(
        result,
        Err(SectionOrderingError::Position(
            OrderingDomainError::InvalidPosition(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renaming_keeps_the_placement(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing"]).await;
    let second = sections.last().expect("seeded section");

    let renamed = service
        .rename_section(second.id(), "In Progress")
        .await
        .expect("rename should succeed");

    assert_eq!(renamed.name().as_str(), "In Progress");
    assert_eq!(renamed.position().get(), 2);
    assert_eq!(
        names_in_order(&service, project_id).await,
        vec!["Todo", "In Progress"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renaming_a_missing_section_reports_not_found(service: TestService) {
    let result = service.rename_section(SectionId::new(), "Anything").await;
    assert!(matches!(
        result,
        Err(SectionOrderingError::Repository(
            SectionRepositoryError::NotFound(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_section_closes_the_gap_behind_it(service: TestService) {
    let project_id = ProjectId::new();
    let sections = seed(&service, project_id, &["Todo", "Doing", "Done"]).await;
    let middle = sections.get(1).expect("seeded section");

    let removed = service
        .delete_section(middle.id())
        .await
        .expect("delete should succeed");
    assert_eq!(removed.name().as_str(), "Doing");

    let remaining = service
        .sections(project_id)
        .await
        .expect("listing should succeed");
    let placements: Vec<(String, i32)> = remaining
        .iter()
        .map(|s| (s.name().as_str().to_owned(), s.position().get()))
        .collect();
    assert_eq!(
        placements,
        vec![("Todo".to_owned(), 1), ("Done".to_owned(), 2)]
    );
}
