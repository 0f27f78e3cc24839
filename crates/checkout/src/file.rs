//! Uploaded design files.

use std::path::Path;

/// A design file selected for quoting: raw bytes plus the display name
/// shown in the order summary and sent as the multipart file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignFile {
    name: String,
    bytes: Vec<u8>,
}

impl DesignFile {
    /// Create a design file from in-memory bytes.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a design file from disk, using the file name as the display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }

    /// Display name (e.g. `"bracket.stl"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_file_accessors() {
        let file = DesignFile::new("gear.stl", vec![1, 2, 3]);
        assert_eq!(file.name(), "gear.stl");
        assert_eq!(file.bytes(), &[1, 2, 3]);
    }
}
