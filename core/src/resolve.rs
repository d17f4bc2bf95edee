//! Resolution of a token prefix against the command tree.

use std::sync::Arc;

use crate::command::Command;
use crate::tree::{CommandGroup, CommandNode, CommandTree};

/// Where a token list lands in the command tree.
#[derive(Clone)]
pub enum Resolution<'a> {
    /// No tokens were given.
    Root,
    /// The tokens named a group and nothing more.
    Group {
        /// The group.
        group: &'a Arc<CommandGroup>,
        /// Names consumed to reach it.
        path: Vec<String>,
    },
    /// The tokens reached a command.
    Command {
        /// The command.
        command: &'a Arc<dyn Command>,
        /// Names consumed to reach it, including the command's own.
        path: Vec<String>,
        /// Every token after the command name.
        remaining: Vec<String>,
    },
    /// A token named nothing at its level.
    NotFound {
        /// Names consumed, including the offending one.
        path: Vec<String>,
        /// The offending name.
        name: String,
    },
}

impl Resolution<'_> {
    /// The consumed path; empty for [`Resolution::Root`].
    pub fn path(&self) -> &[String] {
        match self {
            Self::Root => &[],
            Self::Group { path, .. } | Self::Command { path, .. } | Self::NotFound { path, .. } => {
                path
            }
        }
    }
}

impl std::fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str("Root"),
            Self::Group { path, .. } => f.debug_struct("Group").field("path", path).finish(),
            Self::Command { path, remaining, .. } => f
                .debug_struct("Command")
                .field("path", path)
                .field("remaining", remaining)
                .finish(),
            Self::NotFound { path, name } => f
                .debug_struct("NotFound")
                .field("path", path)
                .field("name", name)
                .finish(),
        }
    }
}

/// Walks `arguments` down `tree` until a command, a missing name, or the
/// end of the tokens. Never modifies the tree.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{resolve, CommandTree, Resolution};
///
/// let tree = CommandTree::default();
/// assert!(matches!(resolve(&tree, &[]), Resolution::Root));
///
/// let args = vec!["nope".to_string()];
/// match resolve(&tree, &args) {
///     Resolution::NotFound { name, .. } => assert_eq!(name, "nope"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn resolve<'a>(tree: &'a CommandTree, arguments: &[String]) -> Resolution<'a> {
    let Some((mut token, mut rest)) = arguments.split_first() else {
        return Resolution::Root;
    };

    let mut current = tree;
    let mut path: Vec<String> = Vec::new();

    loop {
        path.push(token.clone());
        match current.get(token) {
            None => {
                return Resolution::NotFound {
                    path,
                    name: token.clone(),
                };
            }
            Some(CommandNode::Command(command)) => {
                return Resolution::Command {
                    command,
                    path,
                    remaining: rest.to_vec(),
                };
            }
            Some(CommandNode::Group(group)) => match rest.split_first() {
                None => return Resolution::Group { group, path },
                Some((next, tail)) => {
                    current = group.tree();
                    token = next;
                    rest = tail;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandMetadata;
    use crate::tree::TreeBuilder;
    use crate::tree::tests::Noop;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn tree() -> CommandTree {
        let mut builder = TreeBuilder::new();
        builder.add_command(Arc::new(Noop::new("top"))).unwrap();
        {
            let a = builder
                .create_group(CommandMetadata::new("a", "A").unwrap())
                .unwrap();
            let b = a
                .create_command_group(CommandMetadata::new("b", "B").unwrap())
                .unwrap();
            b.add_command(Noop::new("c")).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_empty_is_root() {
        assert!(matches!(resolve(&tree(), &[]), Resolution::Root));
    }

    #[test]
    fn test_command_keeps_remaining_tokens() {
        let tree = tree();
        let input = args(&["a", "b", "c", "x", "a", "--y"]);
        match resolve(&tree, &input) {
            Resolution::Command {
                command,
                path,
                remaining,
            } => {
                assert_eq!(command.metadata().name().as_str(), "c");
                assert_eq!(path, args(&["a", "b", "c"]));
                assert_eq!(remaining, args(&["x", "a", "--y"]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_command_as_last_token_has_no_remaining() {
        let tree = tree();
        match resolve(&tree, &args(&["a", "b", "c"])) {
            Resolution::Command { path, remaining, .. } => {
                assert_eq!(path, args(&["a", "b", "c"]));
                assert!(remaining.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_group_when_tokens_end_at_group() {
        let tree = tree();
        match resolve(&tree, &args(&["a", "b"])) {
            Resolution::Group { group, path } => {
                assert_eq!(group.metadata().name().as_str(), "b");
                assert_eq!(path, args(&["a", "b"]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_not_found_reports_offending_name() {
        let tree = tree();
        match resolve(&tree, &args(&["a", "zz", "c"])) {
            Resolution::NotFound { path, name } => {
                assert_eq!(path, args(&["a", "zz"]));
                assert_eq!(name, "zz");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_names_are_scoped_per_level() {
        let tree = tree();
        assert!(matches!(
            resolve(&tree, &args(&["c"])),
            Resolution::NotFound { .. }
        ));
        assert!(matches!(
            resolve(&tree, &args(&["top", "a"])),
            Resolution::Command { .. }
        ));
    }
}
