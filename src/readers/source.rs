use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the dataset for a run comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DatasetSource {
    /// File supplied by the caller for this run
    Uploaded(PathBuf),
    /// Default dataset shipped alongside the tool
    Bundled(PathBuf),
}

impl DatasetSource {
    /// Prefer the supplied file when present, otherwise fall back to the bundled one
    pub fn resolve(uploaded: Option<&Path>, bundled: &Path) -> Self {
        match uploaded {
            Some(path) => DatasetSource::Uploaded(path.to_path_buf()),
            None => DatasetSource::Bundled(bundled.to_path_buf()),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DatasetSource::Uploaded(path) | DatasetSource::Bundled(path) => path,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, DatasetSource::Uploaded(_))
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Uploaded(path) => write!(f, "uploaded file {}", path.display()),
            DatasetSource::Bundled(path) => write!(f, "local file {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_uploaded_file() {
        let bundled = Path::new("pollution_us_2000_2016.csv");
        let source = DatasetSource::resolve(Some(Path::new("upload.csv")), bundled);

        assert!(source.is_uploaded());
        assert_eq!(source.path(), Path::new("upload.csv"));
    }

    #[test]
    fn test_falls_back_to_bundled_file() {
        let bundled = Path::new("pollution_us_2000_2016.csv");
        let source = DatasetSource::resolve(None, bundled);

        assert!(!source.is_uploaded());
        assert_eq!(source.path(), bundled);
        assert_eq!(source.to_string(), "local file pollution_us_2000_2016.csv");
    }
}
