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
    collections::HashMap,
    ffi::OsString,
    path::{Component, Path, PathBuf},
};

use itertools::Itertools;
use log::{debug, trace};

use util::quote_argument;

use crate::{
    configuration::Configuration,
    database::{CompilationDatabase, Record},
    filesystem::{FileSystem, RealFileSystem},
    flags::make_relative_paths_in_flags_absolute,
    FlagsForFile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Header,
    Source,
    Other,
}

/// Answers "which flags should this file be analyzed with?".
///
/// Build systems record compile commands for translation units only. For a
/// header, the resolver borrows the command of a source file with the same
/// stem: first next to the header, then under the source root when the
/// header lives under the include root. Whatever happens, the caller gets a
/// usable flag list; the configured default flags are the last resort.
pub struct FlagResolver<F: FileSystem = RealFileSystem> {
    configuration: Configuration,
    database: Option<CompilationDatabase>,
    file_system: F,
}

impl FlagResolver<RealFileSystem> {
    pub fn new(configuration: Configuration, database: Option<CompilationDatabase>) -> Self {
        Self::with_file_system(configuration, database, RealFileSystem)
    }
}

impl<F: FileSystem> FlagResolver<F> {
    pub fn with_file_system(
        configuration: Configuration,
        database: Option<CompilationDatabase>,
        file_system: F,
    ) -> Self {
        Self {
            configuration,
            database,
            file_system,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn resolve(&self, file: impl AsRef<Path>) -> FlagsForFile {
        self.flags_for_file(file, &HashMap::new())
    }

    /// Entry point for host tools. `client_data` carries the host's own
    /// options and does not influence the result.
    pub fn flags_for_file(
        &self,
        file: impl AsRef<Path>,
        client_data: &HashMap<String, String>,
    ) -> FlagsForFile {
        let file = file.as_ref();
        trace!(
            "Resolving flags for '{}' ({} client options).",
            file.display(),
            client_data.len()
        );

        let compilation = &self.configuration.compilation;
        let (flags, working_dir) = match self.compilation_info_for_file(file) {
            Some(record) => (&record.flags, record.working_dir.as_path()),
            None => {
                debug!(
                    "No compile command for '{}', using default flags.",
                    file.display()
                );
                (
                    &compilation.default_flags,
                    self.configuration.layout.project_root.as_path(),
                )
            }
        };

        let flags: Vec<String> = flags
            .iter()
            .filter(|flag| !compilation.flags_to_remove.contains(flag))
            .cloned()
            .collect();
        let flags = make_relative_paths_in_flags_absolute(&flags, working_dir);

        debug!(
            "Flags for '{}': {}",
            file.display(),
            flags
                .iter()
                .map(|flag| quote_argument(flag.as_str()))
                .join(" ")
        );

        FlagsForFile {
            flags,
            do_cache: true,
        }
    }

    /// Finds the compile command to use for `file`, if the database has one.
    pub fn compilation_info_for_file(&self, file: &Path) -> Option<&Record> {
        let database = self.database.as_ref()?;

        if self.kind(file) == FileKind::Header {
            if let Some(record) = self.substitute_for_header(database, file) {
                return Some(record);
            }
        }

        let record = database.lookup(file);
        if record.is_some() {
            debug!("Found compile command for '{}'.", file.display());
        }
        record
    }

    pub fn kind(&self, file: &Path) -> FileKind {
        let classification = &self.configuration.classification;

        let extension = match file.extension().and_then(|extension| extension.to_str()) {
            Some(extension) => extension,
            None => return FileKind::Other,
        };

        if classification
            .header_extensions
            .iter()
            .any(|candidate| candidate == extension)
        {
            FileKind::Header
        } else if classification
            .source_extensions
            .iter()
            .any(|candidate| candidate == extension)
        {
            FileKind::Source
        } else {
            FileKind::Other
        }
    }

    /// Source files that may stand in for `header`, most preferred first.
    ///
    /// For every source extension, the file next to the header comes before
    /// its counterpart under the source root.
    pub fn substitution_candidates(&self, header: &Path) -> Vec<PathBuf> {
        let layout = &self.configuration.layout;

        let base = header.with_extension("");
        let alternate_base =
            relative_to(&base, &layout.include_root).map(|path| layout.source_root.join(path));

        let mut candidates = vec![];
        for extension in &self.configuration.classification.source_extensions {
            candidates.push(add_extension(&base, extension));
            if let Some(alternate_base) = &alternate_base {
                candidates.push(add_extension(alternate_base, extension));
            }
        }

        candidates
    }

    // A candidate whose command has no flags does not count; the scan goes on.
    fn substitute_for_header<'a>(
        &self,
        database: &'a CompilationDatabase,
        header: &Path,
    ) -> Option<&'a Record> {
        let result = self
            .substitution_candidates(header)
            .into_iter()
            .filter(|candidate| self.file_system.exists(candidate))
            .filter_map(|candidate| database.lookup(&candidate))
            .find(|record| !record.flags.is_empty());

        if let Some(record) = result {
            debug!(
                "Using compile command of '{}' for header '{}'.",
                record.file.display(),
                header.display()
            );
        }

        result
    }
}

fn add_extension(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    path.into()
}

/// `path` relative to `root`, compared component by component.
fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    let mut remainder = path
        .components()
        .filter(|component| *component != Component::CurDir);
    for expected in root
        .components()
        .filter(|component| *component != Component::CurDir)
    {
        if remainder.next() != Some(expected) {
            return None;
        }
    }

    Some(remainder.collect())
}
