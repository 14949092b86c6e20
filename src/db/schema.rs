//! Database schema and migrations for FileForge.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. The schema_version table tracks which ones have run.

/// Database migrations, in order.
pub const MIGRATIONS: &[&str] = &[
    // v1: Folders table
    r#"
CREATE TABLE folders (
    folder_id       TEXT PRIMARY KEY NOT NULL,              -- UUID v4
    name            TEXT NOT NULL UNIQUE,
    type            TEXT NOT NULL CHECK (type IN ('csv', 'img', 'pdf', 'ppt')),
    max_file_limit  INTEGER NOT NULL CHECK (max_file_limit > 0)
);
"#,
    // v2: Files table, owned by a folder
    r#"
CREATE TABLE files (
    file_id         TEXT PRIMARY KEY NOT NULL,              -- UUID v4
    folder_id       TEXT NOT NULL REFERENCES folders(folder_id)
                        ON DELETE CASCADE ON UPDATE CASCADE,
    name            TEXT NOT NULL,
    description     TEXT,
    type            TEXT NOT NULL,                          -- mime type
    size            INTEGER NOT NULL CHECK (size >= 0),
    url             TEXT NOT NULL,
    uploaded_at     TEXT NOT NULL
);

CREATE INDEX idx_files_folder_id ON files(folder_id);
CREATE INDEX idx_files_type ON files(type);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_folders_migration() {
        let folders = MIGRATIONS[0];
        assert!(folders.contains("CREATE TABLE folders"));
        assert!(folders.contains("name            TEXT NOT NULL UNIQUE"));
        assert!(folders.contains("'csv', 'img', 'pdf', 'ppt'"));
        assert!(folders.contains("max_file_limit"));
    }

    #[test]
    fn test_files_migration_cascades() {
        let files = MIGRATIONS[1];
        assert!(files.contains("CREATE TABLE files"));
        assert!(files.contains("REFERENCES folders(folder_id)"));
        assert!(files.contains("ON DELETE CASCADE"));
        assert!(files.contains("uploaded_at"));
    }
}
