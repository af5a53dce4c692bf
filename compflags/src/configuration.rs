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

use std::path::PathBuf;

/// Flags used when the compilation database knows nothing about a file.
pub const DEFAULT_FLAGS: [&str; 8] = [
    "-std=c++17",
    "-Iinclude",
    "-fno-use-cxa-atexit",
    "-nostdlib",
    "-fno-builtin",
    "-fno-rtti",
    "-fno-exceptions",
    "-Wno-write-strings",
];

pub const HEADER_EXTENSIONS: [&str; 5] = ["h", "hxx", "hpp", "hh", "inl"];

/// Source extensions, in the order header substitution tries them.
pub const SOURCE_EXTENSIONS: [&str; 6] = ["cpp", "cxx", "cc", "c", "m", "mm"];

pub const FLAGS_TO_REMOVE: [&str; 1] = ["-Werror"];

pub const DATABASE_DIRECTORY: &str = "build";
pub const INCLUDE_DIRECTORY: &str = "include";
pub const SOURCE_DIRECTORY: &str = "src";

#[derive(Debug, Clone)]
pub struct Configuration {
    pub layout: Layout,
    pub classification: Classification,
    pub compilation: Compilation,
}

impl Configuration {
    /// Lays out every directory under `root` the conventional way.
    pub fn for_project(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::for_project(root),
            classification: Default::default(),
            compilation: Default::default(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::for_project(".")
    }
}

/// Where things live in the project.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Base for the default flags.
    pub project_root: PathBuf,
    pub include_root: PathBuf,
    pub source_root: PathBuf,
    pub database_dir: PathBuf,
}

impl Layout {
    pub fn for_project(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();

        Self {
            include_root: project_root.join(INCLUDE_DIRECTORY),
            source_root: project_root.join(SOURCE_DIRECTORY),
            database_dir: project_root.join(DATABASE_DIRECTORY),
            project_root,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::for_project(".")
    }
}

/// Extensions (without the leading dot) that decide how a file is looked up.
#[derive(Debug, Clone)]
pub struct Classification {
    pub header_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            header_extensions: to_strings(&HEADER_EXTENSIONS),
            source_extensions: to_strings(&SOURCE_EXTENSIONS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compilation {
    pub default_flags: Vec<String>,
    pub flags_to_remove: Vec<String>,
}

impl Default for Compilation {
    fn default() -> Self {
        Self {
            default_flags: to_strings(&DEFAULT_FLAGS),
            flags_to_remove: to_strings(&FLAGS_TO_REMOVE),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().copied().map(String::from).collect()
}
