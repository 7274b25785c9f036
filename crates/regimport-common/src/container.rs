use std::{
    fs,
    path::{Path, PathBuf},
};

use der::{AnyRef, Decode, SliceReader, Tag, Tagged};
use encoding_rs::WINDOWS_1251;
use thiserror::Error;
use tracing::debug;

/// File inside the container holding the ASN.1-encoded key name.
pub const NAME_FILE: &str = "name.key";

/// Suffix identifying importable key material files.
pub const KEY_FILE_SUFFIX: &str = ".key";

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asn.1 error: {0}")]
    Der(#[from] der::Error),
    #[error("unexpected asn.1 tag: expected {expected}, found {found}")]
    UnexpectedTag { expected: Tag, found: Tag },
    #[error("key name is not valid windows-1251")]
    KeyNameEncoding,
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A CryptoPro key container: a directory holding `name.key` plus the
/// `*.key` material files to import.
#[derive(Debug, Clone)]
pub struct KeyContainer {
    root: PathBuf,
}

impl KeyContainer {
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, ContainerError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ContainerError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Container key name, read from `name.key`.
    pub fn key_name(&self) -> Result<String, ContainerError> {
        let path = self.root.join(NAME_FILE);
        debug!("reading key name from {}", path.display());
        let data = fs::read(path)?;
        parse_key_name(&data)
    }

    /// Every `*.key` file under the container, recursively, in sorted order.
    /// `name.key` itself matches the suffix and is included.
    pub fn key_files(&self) -> Result<Vec<PathBuf>, ContainerError> {
        let mut files = Vec::new();
        collect_key_files(&self.root, &mut files)?;
        files.sort();
        Ok(files)
    }
}

/// Extracts the key name from the DER contents of `name.key`: a SEQUENCE
/// whose first element is an IA5String. CryptoPro stores windows-1251 bytes
/// in that string, so it is decoded with that code page rather than UTF-8.
/// Elements after the first string, and data after the sequence, are ignored.
fn parse_key_name(data: &[u8]) -> Result<String, ContainerError> {
    let mut reader = SliceReader::new(data)?;
    let seq = AnyRef::decode(&mut reader)?;
    if seq.tag() != Tag::Sequence {
        return Err(ContainerError::UnexpectedTag {
            expected: Tag::Sequence,
            found: seq.tag(),
        });
    }

    let mut inner = SliceReader::new(seq.value())?;
    let name = AnyRef::decode(&mut inner)?;
    if name.tag() != Tag::Ia5String {
        return Err(ContainerError::UnexpectedTag {
            expected: Tag::Ia5String,
            found: name.tag(),
        });
    }

    let (decoded, _, had_errors) = WINDOWS_1251.decode(name.value());
    if had_errors {
        return Err(ContainerError::KeyNameEncoding);
    }
    Ok(decoded.into_owned())
}

fn collect_key_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ContainerError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_key_files(&path, out)?;
        } else if is_key_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_key_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(KEY_FILE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    // SEQUENCE { IA5String "ABC" }
    const NAME_ABC: &[u8] = &[0x30, 0x05, 0x16, 0x03, 0x41, 0x42, 0x43];

    #[test]
    fn key_name_ascii() {
        assert_eq!(parse_key_name(NAME_ABC).unwrap(), "ABC");
    }

    #[test]
    fn key_name_windows_1251() {
        // 0xCA 0xCB 0xCC are К Л М in windows-1251
        let data = [0x30, 0x05, 0x16, 0x03, 0xCA, 0xCB, 0xCC];
        assert_eq!(parse_key_name(&data).unwrap(), "КЛМ");
    }

    #[test]
    fn key_name_ignores_trailing_elements() {
        // SEQUENCE { IA5String "ABC", INTEGER 5 }
        let data = [
            0x30, 0x08, 0x16, 0x03, 0x41, 0x42, 0x43, 0x02, 0x01, 0x05,
        ];
        assert_eq!(parse_key_name(&data).unwrap(), "ABC");
    }

    #[test]
    fn key_name_rejects_non_sequence() {
        // OCTET STRING "ABC"
        let data = [0x04, 0x03, 0x41, 0x42, 0x43];
        match parse_key_name(&data) {
            Err(ContainerError::UnexpectedTag { expected, found }) => {
                assert_eq!(expected, Tag::Sequence);
                assert_eq!(found, Tag::OctetString);
            }
            other => panic!("expected tag mismatch, got {other:?}"),
        }
    }

    #[test]
    fn key_name_rejects_non_ia5_first_element() {
        // SEQUENCE { INTEGER 5 }
        let data = [0x30, 0x03, 0x02, 0x01, 0x05];
        match parse_key_name(&data) {
            Err(ContainerError::UnexpectedTag { expected, found }) => {
                assert_eq!(expected, Tag::Ia5String);
                assert_eq!(found, Tag::Integer);
            }
            other => panic!("expected tag mismatch, got {other:?}"),
        }
    }

    #[test]
    fn key_name_rejects_empty_sequence() {
        let data = [0x30, 0x00];
        assert!(parse_key_name(&data).is_err());
    }

    #[test]
    fn key_files_match_suffix_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("name.key"), NAME_ABC).unwrap();
        fs::write(dir.path().join("primary.key"), b"p").unwrap();
        fs::write(dir.path().join("readme.txt"), b"ignore me").unwrap();

        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("masks.key"), b"m").unwrap();
        fs::write(sub.join("masks.dat"), b"ignore me too").unwrap();

        let container = KeyContainer::open(dir.path()).unwrap();
        let names: Vec<_> = container
            .key_files()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, ["name.key", "primary.key", "masks.key"]);
    }

    #[test]
    fn key_name_from_container() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("name.key"), NAME_ABC).unwrap();

        let container = KeyContainer::open(dir.path()).unwrap();
        assert_eq!(container.key_name().unwrap(), "ABC");
    }

    #[test]
    fn open_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            KeyContainer::open(missing),
            Err(ContainerError::NotADirectory(_))
        ));
    }
}
