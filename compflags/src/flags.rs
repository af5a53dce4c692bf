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

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// The path is the next argument: `-I dir`.
    Exact,
    /// The path sticks to the flag: `-Idir`.
    Partial,
    Both,
}

impl Match {
    pub const fn exact_match_allowed(&self) -> bool {
        match self {
            Match::Exact | Match::Both => true,
            _ => false,
        }
    }

    pub const fn partial_match_allowed(&self) -> bool {
        match self {
            Match::Partial | Match::Both => true,
            _ => false,
        }
    }
}

/// A compiler flag that introduces a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFlag {
    pub prefix: &'static str,
    pub match_: Match,
}

impl PathFlag {
    pub const fn new(prefix: &'static str, match_: Match) -> Self {
        Self { prefix, match_ }
    }
}

/// Consulted in order; the first flag that matches a token decides.
pub const PATH_FLAGS: [PathFlag; 4] = [
    PathFlag::new("-isystem", Match::Both),
    PathFlag::new("-I", Match::Both),
    PathFlag::new("-iquote", Match::Both),
    PathFlag::new("--sysroot=", Match::Partial),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup<'a> {
    PathFollows,
    PathAttached(&'static str, &'a str),
    NotAPath,
}

fn lookup(flag: &str) -> Lookup<'_> {
    for path_flag in &PATH_FLAGS {
        if path_flag.match_.exact_match_allowed() && flag == path_flag.prefix {
            return Lookup::PathFollows;
        }

        if path_flag.match_.partial_match_allowed() && flag.starts_with(path_flag.prefix) {
            return Lookup::PathAttached(path_flag.prefix, &flag[path_flag.prefix.len()..]);
        }
    }

    Lookup::NotAPath
}

fn join(working_directory: &Path, path: &str) -> String {
    working_directory.join(path).to_string_lossy().into_owned()
}

/// Rewrites the relative paths of include and sysroot flags as absolute
/// paths under `working_directory`.
///
/// Every other argument is kept as it is, and the result has the same
/// length as `flags`. An empty `working_directory` leaves the flags alone.
pub fn make_relative_paths_in_flags_absolute(
    flags: &[String],
    working_directory: impl AsRef<Path>,
) -> Vec<String> {
    let working_directory = working_directory.as_ref();
    if working_directory.as_os_str().is_empty() {
        return flags.to_vec();
    }

    let mut result = Vec::with_capacity(flags.len());
    let mut make_next_absolute = false;

    for flag in flags {
        if make_next_absolute {
            make_next_absolute = false;

            if Path::new(flag).is_absolute() {
                result.push(flag.clone());
            } else {
                result.push(join(working_directory, flag));
            }
            continue;
        }

        match lookup(flag) {
            Lookup::PathFollows => {
                make_next_absolute = true;
                result.push(flag.clone());
            }
            Lookup::PathAttached(prefix, path) if !path.is_empty() => {
                result.push(format!("{}{}", prefix, join(working_directory, path)));
            }
            _ => result.push(flag.clone()),
        }
    }

    result
}
