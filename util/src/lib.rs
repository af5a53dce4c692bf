use std::{
    borrow::Cow,
    error::Error,
    path::{Component, Path, PathBuf},
};

/// Splits a command line into its arguments, following POSIX shell quoting.
///
/// A blank command line has no arguments.
pub fn command_line_to_argv(command_line: impl AsRef<str>) -> Result<Vec<String>, Box<dyn Error>> {
    let command_line = command_line.as_ref();

    let argv = shell_words::split(command_line)
        .map_err(|error| format!("Failed to split command line '{}': {}", command_line, error))?;

    Ok(argv)
}

/// Quotes a single argument so that `command_line_to_argv` reads it back unchanged.
pub fn quote_argument<'a>(argument: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
    let argument = argument.into();

    let quoted = shell_words::quote(&argument).into_owned();
    if quoted == argument {
        argument
    } else {
        quoted.into()
    }
}

/// Removes `.` and `..` components without touching the disk.
///
/// `..` right under the root stays at the root; leading `..` of a relative
/// path are kept.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let mut result: Vec<Component> = vec![];

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.last() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(component),
            },
            _ => result.push(component),
        }
    }

    result.iter().collect()
}
