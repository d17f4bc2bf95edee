//! `@file` argument expansion.
//!
//! When the first argument starts with `@`, the rest of that argument names
//! a UTF-8 file holding one argument per line. Lines are trimmed, blank
//! lines and lines starting with `#` are dropped, and the surviving lines
//! replace the `@` argument. Expansion happens once; an `@` line inside the
//! file, or an `@` argument in any later position, is an ordinary token.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StructuredError, codes};
use crate::strings::{Localization, keys};

/// Expands a leading `@file` argument.
///
/// # Errors
///
/// Returns an `io` [`StructuredError`] naming the file's absolute path if it
/// cannot be read.
pub fn expand_arguments(
    arguments: &[String],
    localization: &Localization,
) -> Result<Vec<String>, StructuredError> {
    let Some((first, rest)) = arguments.split_first() else {
        return Ok(Vec::new());
    };
    let Some(file) = first.strip_prefix('@') else {
        return Ok(arguments.to_vec());
    };

    let path = Path::new(file);
    let text = fs::read_to_string(path).map_err(|e| {
        StructuredError::new(codes::IO, localization.localize_key(keys::ERROR_IO_FILE))
            .with_attribute(
                localization.localize_key(keys::ATTR_FILE),
                absolute(path).display().to_string(),
            )
            .with_cause(e)
    })?;

    let mut expanded: Vec<String> = parse_lines(&text).collect();
    debug!(file = %path.display(), lines = expanded.len(), "expanded argument file");
    expanded.extend(rest.iter().cloned());
    Ok(expanded)
}

fn parse_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_drops_comments_and_blanks() {
        let lines: Vec<String> = parse_lines("# comment\n   \na\n  b  \n\n\t# indented\nc\n").collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_at_sign_is_untouched() {
        let loc = Localization::internal_only();
        let input = vec!["x".to_string(), "@y".to_string()];
        assert_eq!(expand_arguments(&input, &loc).unwrap(), input);
        assert!(expand_arguments(&[], &loc).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error_with_absolute_path() {
        let loc = Localization::internal_only();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");
        let input = vec![format!("@{}", missing.display())];

        let error = expand_arguments(&input, &loc).unwrap_err();
        assert_eq!(error.code(), "io");
        assert_eq!(error.attribute("file"), Some(missing.display().to_string().as_str()));
        assert!(error.cause().is_some());
    }
}
