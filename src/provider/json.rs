use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DataProvider;
use crate::error::StoreError;

/// Pages from a JSON array of URLs; phones to a JSON array of strings.
pub struct JsonFileProvider {
    pages_path: PathBuf,
    phones_path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(pages_path: impl Into<PathBuf>, phones_path: impl Into<PathBuf>) -> Self {
        Self {
            pages_path: pages_path.into(),
            phones_path: phones_path.into(),
        }
    }

    pub fn phones_path(&self) -> &Path {
        &self.phones_path
    }
}

/// Read a JSON array of page URLs.
pub fn read_pages(path: &Path) -> Result<Vec<String>, StoreError> {
    let file = File::open(path)?;
    let pages: Vec<String> = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), count = pages.len(), "Loaded pages");
    Ok(pages)
}

impl DataProvider for JsonFileProvider {
    fn get_pages(&self) -> Result<Vec<String>, StoreError> {
        read_pages(&self.pages_path)
    }

    fn process_phone_numbers(&self, phones: &[String]) -> Result<(), StoreError> {
        if let Some(dir) = self.phones_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let unique: BTreeSet<&str> = phones.iter().map(String::as_str).collect();

        let mut out = BufWriter::new(File::create(&self.phones_path)?);
        serde_json::to_writer(&mut out, &unique)?;
        out.flush()?;
        debug!(path = %self.phones_path.display(), count = unique.len(), "Wrote phones");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages.json");
        fs::write(&pages, r#"["https://b.example", "https://a.example"]"#).unwrap();

        let provider = JsonFileProvider::new(&pages, dir.path().join("phones.json"));
        assert_eq!(
            provider.get_pages().unwrap(),
            ["https://b.example", "https://a.example"]
        );
    }

    #[test]
    fn missing_pages_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            JsonFileProvider::new(dir.path().join("nope.json"), dir.path().join("out.json"));
        assert!(matches!(provider.get_pages(), Err(StoreError::Io(_))));
    }

    #[test]
    fn malformed_pages_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages.json");
        fs::write(&pages, r#"{"pages": []}"#).unwrap();
        let provider = JsonFileProvider::new(&pages, dir.path().join("out.json"));
        assert!(matches!(provider.get_pages(), Err(StoreError::Json(_))));
    }

    #[test]
    fn read_pages_without_provider() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("import.json");
        fs::write(&pages, r#"["https://a.example"]"#).unwrap();
        assert_eq!(read_pages(&pages).unwrap(), ["https://a.example"]);
    }

    #[test]
    fn writes_unique_phones_creating_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json_data").join("phones.json");
        let provider = JsonFileProvider::new(dir.path().join("pages.json"), &out);

        let phones = vec![
            "84954555533".to_string(),
            "84950210213".to_string(),
            "84954555533".to_string(),
        ];
        provider.process_phone_numbers(&phones).unwrap();

        let written: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, ["84950210213", "84954555533"]);
    }

    #[test]
    fn empty_result_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("phones.json");
        let provider = JsonFileProvider::new(dir.path().join("pages.json"), &out);
        provider.process_phone_numbers(&[]).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[]");
    }
}
