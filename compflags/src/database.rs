/*
   Copyright (C) 2012-2021 by László Nagy
   Copyright (C) 2021 by Michael Bikovitksy

   This file is part of flagsfor.

   flagsfor is a tool to resolve compiler flags for clang tooling from a
   compilation database.

   flagsfor is free software: you can redistribute it and/or modify
   it under the terms of the GNU General Public License as published by
   the Free Software Foundation, either version 3 of the License, or
   (at your option) any later version.

   flagsfor is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
   GNU General Public License for more details.

   You should have received a copy of the GNU General Public License
   along with flagsfor.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{
    collections::{hash_map, HashMap},
    convert::TryFrom,
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use serde::Deserialize;

use util::{command_line_to_argv, normalize_path};

use crate::Entry;

pub const DATABASE_FILE_NAME: &str = "compile_commands.json";

/// The compile command recorded for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub file: PathBuf,
    pub flags: Vec<String>,
    /// Base for the relative paths in `flags`.
    pub working_dir: PathBuf,
}

impl From<Entry> for Record {
    fn from(entry: Entry) -> Self {
        let working_dir = normalize_path(&entry.directory);

        Self {
            file: normalize_path(working_dir.join(&entry.file)),
            flags: entry.arguments,
            working_dir,
        }
    }
}

/// Read-only view of a directory-scoped compilation database.
///
/// Lookups are exact up to `.` and `..` components: a file is found only
/// under the absolute path it was recorded with.
#[derive(Debug, Clone, Default)]
pub struct CompilationDatabase {
    records: HashMap<PathBuf, Record>,
}

impl CompilationDatabase {
    /// Loads `compile_commands.json` from `directory`.
    ///
    /// A missing directory is not an error: the project simply has no
    /// database, and `Ok(None)` is returned.
    pub fn load(directory: impl AsRef<Path>) -> Result<Option<Self>, Box<dyn Error>> {
        let directory = directory.as_ref();
        if !directory.exists() {
            debug!(
                "No compilation database directory at '{}'.",
                directory.display()
            );
            return Ok(None);
        }

        let path = directory.join(DATABASE_FILE_NAME);
        let content = fs::read_to_string(&path)
            .map_err(|error| format!("Failed to read '{}': {}", path.display(), error))?;

        let entries = from_json(&content)
            .map_err(|error| format!("Failed to parse '{}': {}", path.display(), error))?;

        let entries = entries.into_iter().map(|mut entry| {
            if entry.directory.is_relative() {
                entry.directory = directory.join(&entry.directory);
            }
            entry
        });

        let database = Self::from_entries(entries);
        info!(
            "Loaded {} compile commands from '{}'.",
            database.len(),
            path.display()
        );

        Ok(Some(database))
    }

    /// Builds a database from entries that are already parsed.
    ///
    /// When a file appears more than once, the first entry is kept.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut records = HashMap::new();

        for entry in entries {
            let record = Record::from(entry);
            match records.entry(record.file.clone()) {
                hash_map::Entry::Occupied(_) => {
                    debug!(
                        "Ignoring duplicate compile command for '{}'.",
                        record.file.display()
                    );
                }
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        Self { records }
    }

    pub fn lookup(&self, file: impl AsRef<Path>) -> Option<&Record> {
        self.records.get(&normalize_path(file))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses the records of a `compile_commands.json` document.
///
/// Only a document that is not a JSON array fails. A record that cannot be
/// used is logged and skipped, so the rest of the database stays available.
pub fn from_json(input: impl AsRef<str>) -> Result<Vec<Entry>, Box<dyn Error>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(input.as_ref())?;

    let entries = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match parse_entry(record) {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!("Skipping compile command #{}: {}", index, error);
                None
            }
        })
        .collect();

    Ok(entries)
}

// An empty argument list is a usable record; it means "no flags".
fn parse_entry(record: serde_json::Value) -> Result<Entry, Box<dyn Error>> {
    let entry = Entry::try_from(serde_json::from_value::<SerializableEntry>(record)?)?;

    if entry.file.as_os_str().is_empty() {
        return Err("Field 'file' is empty string.")?;
    }
    if entry.directory.as_os_str().is_empty() {
        return Err("Field 'directory' is empty string.")?;
    }

    Ok(entry)
}

#[derive(Debug, Clone, Deserialize)]
struct SerializableEntry {
    pub file: String,

    pub directory: String,

    #[serde(flatten)]
    pub arguments: SerializableArguments,
}

impl TryFrom<SerializableEntry> for Entry {
    type Error = Box<dyn Error>;

    fn try_from(entry: SerializableEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            file: entry.file.into(),
            directory: entry.directory.into(),
            arguments: entry.arguments.into_arguments()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SerializableArguments {
    Arguments(Vec<String>),
    Command(String),
}

impl SerializableArguments {
    pub fn into_arguments(self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(match self {
            SerializableArguments::Arguments(arguments) => arguments,
            SerializableArguments::Command(command) => command_line_to_argv(command)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::{from_json, CompilationDatabase, DATABASE_FILE_NAME};
    use crate::Entry;

    fn entry(file: &str, directory: &str, arguments: &[&str]) -> Entry {
        Entry {
            file: file.into(),
            directory: directory.into(),
            arguments: arguments.iter().copied().map(String::from).collect(),
        }
    }

    #[test]
    fn arguments_read() {
        let json = r#"[
            {
                "file": "entry_one.c",
                "directory": "/path/to",
                "arguments": ["cc", "-c", "entry_one.c"]
            },
            {
                "file": "entries.c",
                "directory": "/path/to",
                "output": "entries.o",
                "arguments": ["cc", "-c", "-o", "entries.o", "entries.c"]
            }
        ]"#;

        let expected = vec![
            entry("entry_one.c", "/path/to", &["cc", "-c", "entry_one.c"]),
            entry(
                "entries.c",
                "/path/to",
                &["cc", "-c", "-o", "entries.o", "entries.c"],
            ),
        ];

        assert_eq!(expected, from_json(json).unwrap());
    }

    #[test]
    fn command_read() {
        let json = r#"[
            {
                "file": "entry_one.c",
                "directory": "/path/to",
                "command": "cc -c -I \"my include\" entry_one.c"
            }
        ]"#;

        let expected = vec![entry(
            "entry_one.c",
            "/path/to",
            &["cc", "-c", "-I", "my include", "entry_one.c"],
        )];

        assert_eq!(expected, from_json(json).unwrap());
    }

    #[test]
    fn empty_arguments_read() {
        let json = r#"[
            { "file": "one.c", "directory": "/path/to", "arguments": [] },
            { "file": "two.c", "directory": "/path/to", "command": "" },
            { "file": "three.c", "directory": "/path/to", "output": "", "arguments": ["cc"] }
        ]"#;

        let expected = vec![
            entry("one.c", "/path/to", &[]),
            entry("two.c", "/path/to", &[]),
            entry("three.c", "/path/to", &["cc"]),
        ];

        assert_eq!(expected, from_json(json).unwrap());
    }

    #[test]
    fn deserialize_fails_when_not_a_list() {
        assert!(from_json("").is_err());
        assert!(from_json("{ }").is_err());
    }

    #[test]
    fn unusable_records_skipped() {
        let json = r#"[
            { },
            { "file": "no_arguments.c", "directory": "/path/to" },
            { "file": "no_directory.c", "directory": "", "command": "cc -c no_directory.c" },
            { "file": "", "directory": "/path/to", "arguments": ["cc"] },
            { "file": "bad_quote.c", "directory": "/path/to", "command": "cc \"bad_quote.c" },
            { "file": "good.c", "directory": "/path/to", "arguments": ["cc", "-c", "good.c"] }
        ]"#;

        let expected = vec![entry("good.c", "/path/to", &["cc", "-c", "good.c"])];

        assert_eq!(expected, from_json(json).unwrap());
    }

    #[test]
    fn lookup_is_exact() {
        let sut = CompilationDatabase::from_entries(vec![entry(
            "/path/to/source.c",
            "/path/to",
            &["cc", "-c", "source.c"],
        )]);

        let record = sut.lookup("/path/to/source.c").unwrap();
        assert_eq!(vec!["cc", "-c", "source.c"], record.flags);
        assert_eq!(PathBuf::from("/path/to"), record.working_dir);

        assert!(sut.lookup("/path/to/source.h").is_none());
        assert!(sut.lookup("source.c").is_none());
        assert!(sut.lookup("").is_none());
    }

    #[test]
    fn relative_file_resolved_against_directory() {
        let sut = CompilationDatabase::from_entries(vec![entry(
            "src/source.c",
            "/path/to",
            &["cc", "-c", "src/source.c"],
        )]);

        assert!(sut.lookup("/path/to/src/source.c").is_some());
    }

    #[test]
    fn parent_directory_components_removed() {
        let sut = CompilationDatabase::from_entries(vec![entry(
            "../src/main.c",
            "/root/build",
            &["cc", "-c", "../src/main.c"],
        )]);

        let record = sut.lookup("/root/src/main.c").unwrap();
        assert_eq!(PathBuf::from("/root/src/main.c"), record.file);
        assert_eq!(PathBuf::from("/root/build"), record.working_dir);

        assert!(sut.lookup("/root/build/../src/./main.c").is_some());
    }

    #[test]
    fn first_duplicate_wins() {
        let sut = CompilationDatabase::from_entries(vec![
            entry("/path/to/source.c", "/path/to", &["cc", "-c", "source.c"]),
            entry("/path/to/source.c", "/path/to", &["cc1", "-c", "source.c"]),
        ]);

        assert_eq!(1, sut.len());
        assert_eq!("cc", sut.lookup("/path/to/source.c").unwrap().flags[0]);
    }

    #[test]
    fn missing_directory_is_no_database() {
        let root = tempfile::tempdir().unwrap();

        let result = CompilationDatabase::load(root.path().join("build")).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn directory_without_database_fails() {
        let root = tempfile::tempdir().unwrap();

        assert!(CompilationDatabase::load(root.path()).is_err());
    }

    #[test]
    fn malformed_database_fails() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(DATABASE_FILE_NAME), "{ not json").unwrap();

        assert!(CompilationDatabase::load(root.path()).is_err());
    }

    #[test]
    fn loaded_from_directory() {
        let root = tempfile::tempdir().unwrap();
        let build = root.path().join("build");
        fs::create_dir(&build).unwrap();
        let json = r#"[
            {
                "file": "../src/main.cpp",
                "directory": ".",
                "command": "c++ -Iinclude -c ../src/main.cpp"
            },
            {
                "file": "/opt/lib/lib.c",
                "directory": "/opt/lib",
                "arguments": ["cc", "-c", "lib.c"]
            }
        ]"#;
        fs::write(build.join(DATABASE_FILE_NAME), json).unwrap();

        let sut = CompilationDatabase::load(&build).unwrap().unwrap();

        assert_eq!(2, sut.len());

        let record = sut.lookup(root.path().join("src/main.cpp")).unwrap();
        assert_eq!(
            vec!["c++", "-Iinclude", "-c", "../src/main.cpp"],
            record.flags
        );
        assert_eq!(build, record.working_dir);

        let record = sut.lookup("/opt/lib/lib.c").unwrap();
        assert_eq!(PathBuf::from("/opt/lib"), record.working_dir);
    }

    #[test]
    fn record_without_flags_does_not_hide_others() {
        let root = tempfile::tempdir().unwrap();
        let json = r#"[
            { "file": "good.c", "directory": ".", "arguments": ["cc", "-Iinc", "-c", "good.c"] },
            { "file": "empty.c", "directory": ".", "arguments": [] }
        ]"#;
        fs::write(root.path().join(DATABASE_FILE_NAME), json).unwrap();

        let sut = CompilationDatabase::load(root.path()).unwrap().unwrap();

        assert_eq!(2, sut.len());
        assert_eq!(
            vec!["cc", "-Iinc", "-c", "good.c"],
            sut.lookup(root.path().join("good.c")).unwrap().flags
        );
        assert!(sut
            .lookup(root.path().join("empty.c"))
            .unwrap()
            .flags
            .is_empty());
    }
}
