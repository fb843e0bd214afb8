//! Shared fixtures for in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tessera::section::adapters::memory::InMemorySectionRepository;
use tessera::section::domain::{ProjectId, Section, SectionId};
use tessera::section::services::SectionOrderingService;
use tessera::task::adapters::memory::InMemoryTaskRepository;
use tessera::task::domain::Task;
use tessera::task::services::{CreateTaskRequest, TaskOrderingService};

/// Section service wired to the in-memory repository.
pub type Sections = SectionOrderingService<InMemorySectionRepository, DefaultClock>;

/// Task service wired to the in-memory repository.
pub type Tasks = TaskOrderingService<InMemoryTaskRepository, DefaultClock>;

/// One project board backed by in-memory repositories.
pub struct Board {
    pub project_id: ProjectId,
    pub sections: Sections,
    pub tasks: Tasks,
    pub task_repository: Arc<InMemoryTaskRepository>,
}

/// Provides a fresh board for each test.
#[fixture]
pub fn board() -> Board {
    let task_repository = Arc::new(InMemoryTaskRepository::new());
    Board {
        project_id: ProjectId::new(),
        sections: SectionOrderingService::new(
            Arc::new(InMemorySectionRepository::new()),
            Arc::new(DefaultClock),
        ),
        tasks: TaskOrderingService::new(Arc::clone(&task_repository), Arc::new(DefaultClock)),
        task_repository,
    }
}

impl Board {
    /// Creates a section and registers it as a task container.
    pub async fn add_section(&self, name: &str) -> Section {
        let section = self
            .sections
            .create_section(self.project_id, name)
            .await
            .expect("section creation should succeed");
        self.task_repository
            .register_section(section.id())
            .expect("section registration should succeed");
        section
    }

    /// Creates a task at the end of `section_id`.
    pub async fn add_task(&self, section_id: SectionId, name: &str) -> Task {
        self.tasks
            .create_task(CreateTaskRequest::new(section_id, name))
            .await
            .expect("task creation should succeed")
    }

    /// Section names ordered front to back.
    pub async fn section_order(&self) -> Vec<String> {
        self.sections
            .sections(self.project_id)
            .await
            .expect("listing should succeed")
            .iter()
            .map(|section| section.name().as_str().to_owned())
            .collect()
    }

    /// Task names of `section_id` ordered front to back.
    pub async fn task_order(&self, section_id: SectionId) -> Vec<String> {
        self.tasks
            .tasks(section_id)
            .await
            .expect("listing should succeed")
            .iter()
            .map(|task| task.name().as_str().to_owned())
            .collect()
    }

    /// Task positions of `section_id` in listing order.
    pub async fn task_positions(&self, section_id: SectionId) -> Vec<i32> {
        self.tasks
            .tasks(section_id)
            .await
            .expect("listing should succeed")
            .iter()
            .map(|task| task.position().get())
            .collect()
    }
}

/// Asserts that `positions` forms exactly `1..=n`.
pub fn assert_dense(positions: &[i32]) {
    let expected: Vec<i32> = (1..=i32::try_from(positions.len()).expect("small boards")).collect();
    assert_eq!(positions, expected.as_slice(), "positions must be gapless");
}

/// Deterministic pseudo-random sequence for concurrency storms.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1))
    }

    /// Next value in `0..bound`.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound.max(1)
    }
}
