//! Read-only filesystem helpers built on `cap-std` and `camino`.
//!
//! Waymeal only ever reads local data files (restaurant GeoJSON exports), so
//! these helpers resolve a path against ambient authority once and then work
//! through the resulting capability handles.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read};

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read an entire UTF-8 text file.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = open_utf8_file(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the directory containing `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether an existing path is a regular file.
///
/// Missing paths report an [`io::ErrorKind::NotFound`] error.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn reads_text_files(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let path = root.join("restaurants.geojson");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"{\"type\":\"FeatureCollection\"}")
            .expect("write file");
        let text = read_utf8_to_string(&path).expect("read file");
        assert!(text.contains("FeatureCollection"));
        assert!(file_is_file(&path).expect("metadata"));
    }

    #[rstest]
    fn missing_file_reports_not_found(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let err = file_is_file(&root.join("absent.geojson")).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn directory_is_not_a_file(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        std::fs::create_dir(root.join("exports")).expect("create dir");
        assert!(!file_is_file(&root.join("exports")).expect("directory metadata"));
    }

    #[rstest]
    fn missing_file_cannot_be_read(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let err = read_utf8_to_string(&root.join("absent.geojson")).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
