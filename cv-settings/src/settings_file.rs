//! INI persistence of a [`ParameterStore`].
//!
//! Keys of the form `Group/name` are written as `name` under a `[Group]` section;
//! ungrouped keys go in `[General]`, so the group named `General` is written as
//! `[%General]`. Window geometry and state are opaque blobs
//! kept next to the parameters and handed back to the caller untouched.

use crate::store::ParameterStore;
use crate::{Error, Result};
use log::*;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const WINDOW_GEOMETRY: &str = "windowGeometry";
pub const WINDOW_STATE: &str = "windowState";

/// Holds the keys that belong to no group.
const GENERAL_SECTION: &str = "General";
/// Holds the keys of the group that is itself named `General`.
const ESCAPED_GENERAL_SECTION: &str = "%General";
const BYTE_ARRAY_PREFIX: &str = "@ByteArray(";
const APPLICATION_DIRECTORY: &str = "cv-settings";
const DEFAULT_FILE_NAME: &str = "config.ini";

/// Opaque user-interface blobs persisted alongside the parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLayout {
    pub geometry: Vec<u8>,
    pub state: Vec<u8>,
}

fn home_directory() -> PathBuf {
    std::env::var_os(if cfg!(windows) { "USERPROFILE" } else { "HOME" })
        .map(PathBuf::from)
        .unwrap_or_default()
}

/// The directory where the application keeps its working files.
pub fn working_directory() -> PathBuf {
    if cfg!(windows) {
        home_directory().join("Documents").join(APPLICATION_DIRECTORY)
    } else {
        home_directory()
    }
}

/// The settings file used when the caller does not name one.
pub fn ini_default_path() -> PathBuf {
    if cfg!(windows) {
        working_directory().join(DEFAULT_FILE_NAME)
    } else {
        home_directory()
            .join(format!(".{}", APPLICATION_DIRECTORY))
            .join(DEFAULT_FILE_NAME)
    }
}

impl ParameterStore {
    /// Loads every catalog key present in the file at `path`.
    ///
    /// Keys missing from the file keep their value. Values that do not parse as
    /// the declared type of their key are skipped with a warning. A missing file
    /// leaves the store untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<WindowLayout> {
        let path = path.as_ref();
        let document = match IniDocument::read(path)? {
            Some(document) => document,
            None => {
                info!("No settings file at {}, keeping current settings", path.display());
                return Ok(WindowLayout::default());
            }
        };
        let keys: Vec<&'static str> = self.iter().map(|(key, _)| key).collect();
        for key in keys {
            let text = match document.entries.get(key) {
                Some(IniValue::Text(text)) => text,
                Some(IniValue::Bytes(_)) => {
                    warn!("Ignoring binary value of parameter \"{}\"", key);
                    continue;
                }
                None => continue,
            };
            if let Err(e) = self.set_text(key, text) {
                warn!("Ignoring persisted value: {}", e);
            }
        }
        let layout = WindowLayout {
            geometry: document.bytes(WINDOW_GEOMETRY),
            state: document.bytes(WINDOW_STATE),
        };
        info!("Settings loaded from {}", path.display());
        Ok(layout)
    }

    /// Writes every current value to the file at `path`.
    ///
    /// Entries of an existing file that the store does not know about are kept.
    /// Empty window blobs are not written, leaving any previous blob in place.
    pub fn save(&self, path: impl AsRef<Path>, layout: &WindowLayout) -> Result<()> {
        let path = path.as_ref();
        let mut document = IniDocument::read(path)?.unwrap_or_default();
        for (key, value) in self.iter() {
            document
                .entries
                .insert(key.to_owned(), IniValue::Text(value.to_text()));
        }
        for (key, blob) in [(WINDOW_GEOMETRY, &layout.geometry), (WINDOW_STATE, &layout.state)] {
            if !blob.is_empty() {
                document
                    .entries
                    .insert(key.to_owned(), IniValue::Bytes(blob.clone()));
            }
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_owned(),
                source,
            })?;
        }
        fs::write(path, document.render()).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IniValue {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Default)]
struct IniDocument {
    entries: BTreeMap<String, IniValue>,
}

impl IniDocument {
    /// Returns `None` when there is no file at `path`.
    fn read(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(Self::parse(&text, path))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Lines that do not parse are skipped with a warning. After a malformed
    /// section header, entries are skipped until the next valid header.
    fn parse(text: &str, path: &Path) -> Self {
        let mut document = Self::default();
        let mut section = Some(GENERAL_SECTION.to_owned());
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[') {
                section = name.strip_suffix(']').map(|name| name.trim().to_owned());
                if section.is_none() {
                    skip(path, number, "unterminated section header");
                }
                continue;
            }
            let group = match &section {
                Some(group) => group,
                None => continue,
            };
            let (name, raw) = match line.split_once('=') {
                Some(entry) => entry,
                None => {
                    skip(path, number, "expected `key=value`");
                    continue;
                }
            };
            let name = name.trim();
            let key = match group.as_str() {
                GENERAL_SECTION => name.to_owned(),
                ESCAPED_GENERAL_SECTION => format!("{}/{}", GENERAL_SECTION, name),
                group => format!("{}/{}", group, name),
            };
            match decode_value(raw.trim()) {
                Some(value) => {
                    document.entries.insert(key, value);
                }
                None => skip(path, number, "malformed quoted value"),
            }
        }
        document
    }

    fn bytes(&self, key: &str) -> Vec<u8> {
        match self.entries.get(key) {
            Some(IniValue::Bytes(bytes)) => bytes.clone(),
            Some(IniValue::Text(text)) => text.clone().into_bytes(),
            None => Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut sections: BTreeMap<&str, Vec<(&str, &IniValue)>> = BTreeMap::new();
        for (key, value) in &self.entries {
            let (section, name) = match key.split_once('/') {
                Some((GENERAL_SECTION, name)) => (ESCAPED_GENERAL_SECTION, name),
                Some(grouped) => grouped,
                None => (GENERAL_SECTION, key.as_str()),
            };
            sections.entry(section).or_default().push((name, value));
        }
        let general = sections.remove_entry(GENERAL_SECTION);
        let mut out = String::new();
        for (section, entries) in general.into_iter().chain(sections) {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", section);
            for (name, value) in entries {
                let _ = writeln!(out, "{}={}", name, encode_value(value));
            }
        }
        out
    }
}

fn skip(path: &Path, number: usize, reason: &str) {
    warn!(
        "Skipping line {} of settings file {}: {}",
        number + 1,
        path.display(),
        reason
    );
}

fn needs_quotes(text: &str) -> bool {
    text.starts_with('@')
        || text.trim() != text
        || text
            .chars()
            .any(|c| matches!(c, ';' | ',' | '=' | '"' | '\\') || c.is_ascii_control())
}

fn encode_value(value: &IniValue) -> String {
    match value {
        IniValue::Text(text) if !needs_quotes(text) => text.clone(),
        IniValue::Text(text) => {
            let mut out = String::with_capacity(text.len() + 2);
            out.push('"');
            for c in text.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    c if c.is_ascii_control() => {
                        let _ = write!(out, "\\x{:02x}", c as u32);
                    }
                    c => out.push(c),
                }
            }
            out.push('"');
            out
        }
        IniValue::Bytes(bytes) => {
            let mut out = String::from(BYTE_ARRAY_PREFIX);
            for &byte in bytes {
                match byte {
                    b'\\' => out.push_str("\\\\"),
                    0x20..=0x7e => out.push(byte as char),
                    _ => {
                        let _ = write!(out, "\\x{:02x}", byte);
                    }
                }
            }
            out.push(')');
            out
        }
    }
}

fn decode_value(raw: &str) -> Option<IniValue> {
    if let Some(inner) = raw
        .strip_prefix(BYTE_ARRAY_PREFIX)
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return unescape(inner.as_bytes()).map(IniValue::Bytes);
    }
    if let Some(quoted) = raw.strip_prefix('"') {
        let inner = quoted.strip_suffix('"')?;
        let bytes = unescape(inner.as_bytes())?;
        return String::from_utf8(bytes).ok().map(IniValue::Text);
    }
    Some(IniValue::Text(raw.to_owned()))
}

fn unescape(escaped: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(escaped.len());
    let mut bytes = escaped.iter().copied();
    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        out.push(match bytes.next()? {
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'x' => {
                let high = (bytes.next()? as char).to_digit(16)?;
                let low = (bytes.next()? as char).to_digit(16)?;
                (high * 16 + low) as u8
            }
            other => other,
        });
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_encoding() {
        for text in [
            "",
            "plain",
            "7:Dense;Fast;GFTT",
            " padded ",
            "quote \" and \\ backslash",
            "line\nbreak",
            "@not a blob",
        ] {
            let value = IniValue::Text(text.to_owned());
            assert_eq!(decode_value(&encode_value(&value)), Some(value));
        }
        let blob = IniValue::Bytes((0..=255).collect());
        assert_eq!(decode_value(&encode_value(&blob)), Some(blob));
    }

    #[test]
    fn strategy_codes_are_quoted() {
        assert_eq!(
            encode_value(&IniValue::Text("1:LMEDS;RANSAC".to_owned())),
            "\"1:LMEDS;RANSAC\""
        );
    }

    #[test]
    fn sections_map_to_key_groups() {
        let text = "[General]\nwindowState=@ByteArray(ab\\x00)\n\n[Feature2D]\nFast_threshold = 12\n; comment\n[Homography]\nmethod=\"0:LMEDS;RANSAC\"\n";
        let document = IniDocument::parse(text, Path::new("test.ini"));
        assert_eq!(
            document.entries.get("Feature2D/Fast_threshold"),
            Some(&IniValue::Text("12".to_owned()))
        );
        assert_eq!(
            document.entries.get("Homography/method"),
            Some(&IniValue::Text("0:LMEDS;RANSAC".to_owned()))
        );
        assert_eq!(document.bytes(WINDOW_STATE), b"ab\0".to_vec());
        assert!(document.bytes(WINDOW_GEOMETRY).is_empty());
    }

    #[test]
    fn general_section_is_rendered_first() {
        let mut document = IniDocument::default();
        document
            .entries
            .insert("Camera/1deviceId".to_owned(), IniValue::Text("0".to_owned()));
        document
            .entries
            .insert(WINDOW_STATE.to_owned(), IniValue::Bytes(b"xy".to_vec()));
        document
            .entries
            .insert("General/threads".to_owned(), IniValue::Text("1".to_owned()));
        let text = document.render();
        assert_eq!(
            text,
            "[General]\nwindowState=@ByteArray(xy)\n\n[%General]\nthreads=1\n\n[Camera]\n1deviceId=0\n"
        );
        let parsed = IniDocument::parse(&text, Path::new("test.ini"));
        assert_eq!(parsed.entries, document.entries);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "[Camera]\njunk\ndeviceId=0\nname=\"open\n[Feature2D\nFast_threshold=12\n[Homography]\nmethod=1\n";
        let document = IniDocument::parse(text, Path::new("bad.ini"));
        let keys: Vec<_> = document.entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Camera/deviceId", "Homography/method"]);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let document = IniDocument::parse("\u{feff}[Camera]\ndeviceId=0\n", Path::new("bom.ini"));
        assert_eq!(
            document.entries.get("Camera/deviceId"),
            Some(&IniValue::Text("0".to_owned()))
        );
    }

    #[test]
    fn default_path_lives_under_home() {
        assert!(ini_default_path().ends_with(DEFAULT_FILE_NAME));
        assert!(ini_default_path().starts_with(home_directory()));
    }
}
