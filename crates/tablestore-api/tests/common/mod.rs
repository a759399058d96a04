// Common test utilities for engine integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tablestore::{Engine, EngineConfig};
use tempfile::TempDir;

/// Test fixture that owns a temporary data directory
pub struct EngineFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
}

impl EngineFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(&data_dir).expect("Failed to create data directory");

        Self { temp_dir, data_dir }
    }

    pub fn open(&self) -> Engine {
        Engine::open(EngineConfig::new(&self.data_dir)).expect("Failed to open engine")
    }

    /// Engine with database `school` selected and an empty `students`
    /// table `(id INT, name CHAR(20), age INT)`.
    #[allow(dead_code)]
    pub fn school(&self) -> Engine {
        let mut engine = self.open();
        engine.create_database("school").expect("create database");
        engine.use_database("school").expect("use database");
        engine
            .create_table("students", "id INT, name CHAR(20), age INT")
            .expect("create table");
        engine
    }

    /// `school` plus the three sample students.
    #[allow(dead_code)]
    pub fn school_with_rows(&self) -> Engine {
        let mut engine = self.school();
        for values in ["1,Alice,20", "2,Bob,25", "3,Carol,31"] {
            engine.insert_into("students", "", values).expect("insert");
        }
        engine
    }

    #[allow(dead_code)]
    pub fn db_path(&self, db: &str) -> PathBuf {
        self.data_dir.join(db)
    }

    #[allow(dead_code)]
    pub fn read_table_file(&self, db: &str, table: &str) -> String {
        read(&self.db_path(db).join(format!("{}.table", table)))
    }
}

impl Default for EngineFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_data_dir() {
        let fixture = EngineFixture::new();
        assert!(fixture.data_dir.exists());
        assert!(fixture.data_dir.is_dir());
    }
}
