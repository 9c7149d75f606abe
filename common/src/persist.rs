use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use crate::{Error, Result};

/// Models that can be saved to and restored from a file
pub trait Persist {
    /// Serialize the model to `path`, creating missing parent directories
    fn persist_to_file(&self, path: &Path) -> Result<()>;

    /// Replace the model's state with the one stored at `path`
    fn restore_from_file(&mut self, path: &Path) -> Result<()>;
}

/// Write `value` as JSON to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::EmptyPath);
    }
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes)?;

    Ok(())
}

/// Read a JSON document from `path`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path.as_os_str().is_empty() {
        return Err(Error::EmptyPath);
    }
    let bytes = fs::read(path)?;

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(write_json(&PathBuf::new(), &1.0), Err(Error::EmptyPath)));
        assert!(matches!(read_json::<f64>(&PathBuf::new()), Err(Error::EmptyPath)));
    }

    #[test]
    fn nested_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("values.json");

        write_json(&path, &vec![1.0, 2.5]).unwrap();
        let back: Vec<f64> = read_json(&path).unwrap();
        assert_eq!(back, vec![1.0, 2.5]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_json::<Vec<f64>>(&dir.path().join("nope.json"));
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[test]
    fn garbage_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(read_json::<Vec<f64>>(&path), Err(Error::Serialization(_))));
    }
}
