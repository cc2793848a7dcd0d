use std::path::Path;

use rusqlite::Connection;

use super::DataProvider;
use crate::error::StoreError;

/// Pages and phones kept in one SQLite file.
pub struct SqliteProvider {
    conn: Connection,
}

impl SqliteProvider {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Add page URLs; already known URLs are skipped. Returns how many were new.
    pub fn insert_pages(&mut self, urls: &[String]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO pages (url) VALUES (?1)")?;
            for url in urls {
                inserted += stmt.execute([url])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS phones (
            number   TEXT PRIMARY KEY,
            found_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

impl DataProvider for SqliteProvider {
    fn get_pages(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT url FROM pages ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn process_phone_numbers(&self, phones: &[String]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO phones (number) VALUES (?1)")?;
            for phone in phones {
                stmt.execute([phone])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> SqliteProvider {
        SqliteProvider::with_connection(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn stored_phones(db: &SqliteProvider) -> Vec<String> {
        let mut stmt = db.conn.prepare("SELECT number FROM phones ORDER BY number").unwrap();
        let rows = stmt.query_map([], |row| row.get::<_, String>(0)).unwrap();
        rows.map(Result::unwrap).collect()
    }

    #[test]
    fn pages_come_back_in_insert_order() {
        let mut db = memory();
        let urls = vec!["https://b.example".to_string(), "https://a.example".to_string()];
        assert_eq!(db.insert_pages(&urls).unwrap(), 2);
        assert_eq!(db.get_pages().unwrap(), urls);
    }

    #[test]
    fn duplicate_pages_ignored() {
        let mut db = memory();
        let urls = vec!["https://a.example".to_string()];
        db.insert_pages(&urls).unwrap();
        assert_eq!(db.insert_pages(&urls).unwrap(), 0);
        assert_eq!(db.get_pages().unwrap().len(), 1);
    }

    #[test]
    fn phones_are_unique_across_runs() {
        let db = memory();
        let first = vec!["84954555533".to_string(), "84950210213".to_string()];
        db.process_phone_numbers(&first).unwrap();
        db.process_phone_numbers(&first[..1]).unwrap();
        assert_eq!(stored_phones(&db), ["84950210213", "84954555533"]);
    }

    #[test]
    fn opens_file_and_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("phones.sqlite");
        let db = SqliteProvider::open(&path).unwrap();
        assert!(db.get_pages().unwrap().is_empty());
        assert!(path.exists());
    }
}
