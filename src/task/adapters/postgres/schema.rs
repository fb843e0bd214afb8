//! Diesel schema for task persistence.
//!
//! The backing table is expected to carry a
//! `UNIQUE (section_id, position) DEFERRABLE INITIALLY DEFERRED`
//! constraint so the intermediate states of a range shift never trip it,
//! and a foreign key from `section_id` to `sections (id)`. The section row
//! lock in the task gateway goes through raw SQL, so the `sections` table
//! is not redeclared here.

diesel::table! {
    /// Task records ordered within their section.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning section.
        section_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Completion flag.
        is_completed -> Bool,
        /// One-based position within the section.
        position -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
