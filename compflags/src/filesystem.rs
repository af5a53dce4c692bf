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

#[cfg(test)]
use mockall::automock;

/// The only question asked of the disk: does a candidate file exist?
#[cfg_attr(test, automock)]
pub trait FileSystem {
    fn exists(&self, file: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, file: &Path) -> bool {
        file.exists()
    }
}
