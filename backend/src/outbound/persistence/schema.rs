//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the DDL in `schema_bootstrap.rs` exactly.
//! They are used by Diesel for compile-time query validation and type-safe
//! SQL generation.

diesel::table! {
    /// Registered users. `email` carries a unique constraint.
    users (id) {
        /// Primary key generated by `SERIAL`.
        id -> Int4,
        /// Name as supplied at creation.
        name -> Text,
        /// Unique email address.
        email -> Text,
    }
}

diesel::table! {
    /// One profile per user, removed when its user is deleted.
    profiles (id) {
        /// Primary key generated by `SERIAL`.
        id -> Int4,
        /// Owning user (`ON DELETE CASCADE`, unique).
        user_id -> Int4,
        /// Profile label.
        profile_name -> Text,
    }
}

diesel::joinable!(profiles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, users);
