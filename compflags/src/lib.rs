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

use serde::Serialize;

pub mod configuration;
pub mod database;
pub mod filesystem;
pub mod flags;
pub mod resolver;

/// One compile command, as recorded in a compilation database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub file: PathBuf,
    pub directory: PathBuf,
    pub arguments: Vec<String>,
}

/// The answer handed back to the host tool for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagsForFile {
    pub flags: Vec<String>,
    /// Whether the host may cache `flags` against the requested path.
    pub do_cache: bool,
}
