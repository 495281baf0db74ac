//! Table definitions, applied idempotently when a store is opened.

pub const CREATE_PROJECTS: &str = r"
    CREATE TABLE IF NOT EXISTS projects (
        name TEXT PRIMARY KEY NOT NULL,
        base_path TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
";

pub const CREATE_FILES: &str = r"
    CREATE TABLE IF NOT EXISTS files (
        project TEXT NOT NULL,
        path TEXT NOT NULL,
        content TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (project, path)
    )
";

/// All statements in application order
pub const STATEMENTS: [&str; 2] = [CREATE_PROJECTS, CREATE_FILES];
