use std::io::Read;
use std::path::Path;

/// Trait for importing types from a file path or reader
pub trait Importable: Sized {
    /// The error type returned by import operations
    type Error: std::error::Error + Send + Sync + 'static + From<std::io::Error>;
    /// Options controlling the import (e.g., column names)
    type ImportOptions: Default;

    /// Import from a reader, specifying the format and options.
    fn import_from_reader_with_options<R: Read>(
        reader: R,
        format: &str,
        options: Self::ImportOptions,
    ) -> Result<Self, Self::Error>;

    /// Import from a reader, specifying the format, using default options.
    fn import_from_reader<R: Read>(reader: R, format: &str) -> Result<Self, Self::Error> {
        Self::import_from_reader_with_options(reader, format, Self::ImportOptions::default())
    }

    /// Import from a file path with the given options.
    /// The format is inferred from the file extension.
    fn import_from_path_with_options<P: AsRef<Path>>(
        path: P,
        options: Self::ImportOptions,
    ) -> Result<Self, Self::Error> {
        let path = path.as_ref();
        let format = infer_format(path).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Could not infer format from path",
            )
        })?;

        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Self::import_from_reader_with_options(reader, &format, options)
    }

    /// Import from a file path using default options.
    fn import_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error> {
        Self::import_from_path_with_options(path, Self::ImportOptions::default())
    }

    /// Import from a byte slice, specifying the format.
    fn import_from_bytes(bytes: &[u8], format: &str) -> Result<Self, Self::Error> {
        Self::import_from_reader(std::io::Cursor::new(bytes), format)
    }
}

/// Infer format from path, keeping compound extensions (e.g., `.csv.gz`) intact.
pub fn infer_format(path: &Path) -> Option<String> {
    let path_str = path.to_string_lossy().to_lowercase();
    if let Some(stripped) = path_str.strip_suffix(".gz") {
        let inner = Path::new(stripped).extension()?.to_str()?;
        return Some(format!("{inner}.gz"));
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_format() {
        assert_eq!(infer_format(Path::new("log.CSV")), Some("csv".to_string()));
        assert_eq!(
            infer_format(Path::new("dir/log.csv.gz")),
            Some("csv.gz".to_string())
        );
        assert_eq!(infer_format(Path::new("table.json")), Some("json".into()));
        assert_eq!(infer_format(Path::new("no_extension")), None);
    }
}
