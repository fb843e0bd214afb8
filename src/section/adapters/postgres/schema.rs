//! Diesel schema for section persistence.
//!
//! The backing table is expected to carry a
//! `UNIQUE (project_id, position) DEFERRABLE INITIALLY DEFERRED`
//! constraint so the intermediate states of a range shift never trip it.

diesel::table! {
    /// Section records ordered within their project.
    sections (id) {
        /// Section identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// One-based position within the project.
        position -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
