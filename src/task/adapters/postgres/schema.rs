//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records owned by users, soft-deleted via `deleted_date`.
    tasks (id) {
        /// Task identifier generated by the database.
        id -> Uuid,
        /// Owning user identifier.
        user_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Optional scheduled date.
        date -> Nullable<Timestamptz>,
        /// Task lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_date -> Timestamptz,
        /// Last update timestamp.
        updated_date -> Timestamptz,
        /// Soft-delete timestamp; `NULL` for live rows.
        deleted_date -> Nullable<Timestamptz>,
    }
}
