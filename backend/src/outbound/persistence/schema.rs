//! Diesel table definitions matching the SQL migrations in `backend/migrations`.

diesel::table! {
    /// Registered accounts. `name` carries a unique index.
    users (id) {
        id -> Int8,
        name -> Varchar,
        /// Argon2 PHC string; never leaves the persistence and domain layers.
        password_digest -> Varchar,
        /// One of `user`, `mechanic` or `admin` (check constraint).
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Aircraft. `tail_number` carries a unique index.
    planes (id) {
        id -> Int8,
        tail_number -> Varchar,
        model -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Installed parts. `plane_id` is indexed but has no foreign key, so
    /// deleting a plane leaves its parts behind.
    plane_parts (id) {
        id -> Int8,
        plane_id -> Int8,
        part_name -> Varchar,
        serial_number -> Varchar,
        category -> Varchar,
        usage_hours -> Float8,
        usage_limit_hours -> Float8,
        installed_at -> Timestamptz,
    }
}
