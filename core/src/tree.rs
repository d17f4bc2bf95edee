//! The command tree: commands and nested groups keyed by name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::command::{Command, CommandMetadata};
use crate::error::InvalidArgument;

/// A node in the command tree.
#[derive(Clone)]
pub enum CommandNode {
    /// A terminal command.
    Command(Arc<dyn Command>),
    /// A group of further commands and groups.
    Group(Arc<CommandGroup>),
}

impl CommandNode {
    /// The node's metadata.
    pub fn metadata(&self) -> &CommandMetadata {
        match self {
            Self::Command(command) => command.metadata(),
            Self::Group(group) => group.metadata(),
        }
    }

    /// Groups are never hidden.
    pub fn is_hidden(&self) -> bool {
        match self {
            Self::Command(command) => command.is_hidden(),
            Self::Group(_) => false,
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(command) => f
                .debug_tuple("Command")
                .field(&command.metadata().name().as_str())
                .finish(),
            Self::Group(group) => f.debug_tuple("Group").field(group).finish(),
        }
    }
}

/// Commands and groups keyed by name, in name order.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    nodes: BTreeMap<String, CommandNode>,
}

impl CommandTree {
    /// Looks up a direct child by name.
    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.nodes.get(name)
    }

    /// Iterates direct children in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates direct children that are not hidden, in name order.
    pub fn visible(&self) -> impl Iterator<Item = &CommandNode> {
        self.nodes.values().filter(|node| !node.is_hidden())
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// An interior node of the command tree.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    metadata: CommandMetadata,
    tree: CommandTree,
}

impl CommandGroup {
    /// The group's metadata.
    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    /// The group's children.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }
}

/// Builds one level of a command tree, enforcing name uniqueness across
/// commands and groups at that level.
#[derive(Default)]
pub struct TreeBuilder {
    commands: BTreeMap<String, Arc<dyn Command>>,
    groups: BTreeMap<String, GroupBuilder>,
}

impl TreeBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::DuplicateCommand`] or
    /// [`InvalidArgument::DuplicateGroup`] if the name is taken at this
    /// level.
    pub fn add_command(&mut self, command: Arc<dyn Command>) -> Result<&mut Self, InvalidArgument> {
        let name = command.metadata().name().to_string();
        self.check_name_free(&name)?;
        self.commands.insert(name, command);
        Ok(self)
    }

    /// Adds a group and returns its builder.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::DuplicateCommand`] or
    /// [`InvalidArgument::DuplicateGroup`] if the name is taken at this
    /// level.
    pub fn create_group(&mut self, metadata: CommandMetadata) -> Result<&mut GroupBuilder, InvalidArgument> {
        let name = metadata.name().to_string();
        self.check_name_free(&name)?;
        Ok(self.groups.entry(name).or_insert_with(|| GroupBuilder {
            metadata,
            tree: TreeBuilder::new(),
        }))
    }

    /// Adds or replaces a command without the uniqueness check.
    pub(crate) fn replace_command(&mut self, command: Arc<dyn Command>) {
        let name = command.metadata().name().to_string();
        self.groups.remove(&name);
        self.commands.insert(name, command);
    }

    fn check_name_free(&self, name: &str) -> Result<(), InvalidArgument> {
        if self.commands.contains_key(name) {
            return Err(InvalidArgument::DuplicateCommand(name.to_string()));
        }
        if self.groups.contains_key(name) {
            return Err(InvalidArgument::DuplicateGroup(name.to_string()));
        }
        Ok(())
    }

    /// Builds the tree.
    pub fn build(self) -> CommandTree {
        let mut nodes: BTreeMap<String, CommandNode> = self
            .commands
            .into_iter()
            .map(|(name, command)| (name, CommandNode::Command(command)))
            .collect();
        for (name, group) in self.groups {
            nodes.insert(name, CommandNode::Group(Arc::new(group.build())));
        }
        CommandTree { nodes }
    }
}

/// Builds a nested command group.
pub struct GroupBuilder {
    metadata: CommandMetadata,
    tree: TreeBuilder,
}

impl GroupBuilder {
    /// Adds a command to the group.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken within the group.
    pub fn add_command(&mut self, command: impl Command + 'static) -> Result<&mut Self, InvalidArgument> {
        self.tree.add_command(Arc::new(command))?;
        Ok(self)
    }

    /// Adds a nested group and returns its builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken within the group.
    pub fn create_command_group(&mut self, metadata: CommandMetadata) -> Result<&mut GroupBuilder, InvalidArgument> {
        self.tree.create_group(metadata)
    }

    /// The group's metadata.
    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn build(self) -> CommandGroup {
        CommandGroup {
            metadata: self.metadata,
            tree: self.tree.build(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::command::CommandStatus;
    use crate::context::CommandContext;
    use crate::error::BoxError;

    pub(crate) struct Noop {
        metadata: CommandMetadata,
        hidden: bool,
    }

    impl Noop {
        pub(crate) fn new(name: &str) -> Self {
            Self {
                metadata: CommandMetadata::new(name, format!("The {name} command.")).unwrap(),
                hidden: false,
            }
        }

        pub(crate) fn hidden(name: &str) -> Self {
            Self {
                hidden: true,
                ..Self::new(name)
            }
        }
    }

    impl Command for Noop {
        fn metadata(&self) -> &CommandMetadata {
            &self.metadata
        }

        fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
            Ok(CommandStatus::Success)
        }

        fn is_hidden(&self) -> bool {
            self.hidden
        }
    }

    fn meta(name: &str) -> CommandMetadata {
        CommandMetadata::new(name, "A group.").unwrap()
    }

    #[test]
    fn test_names_unique_across_commands_and_groups() {
        let mut builder = TreeBuilder::new();
        builder.add_command(Arc::new(Noop::new("a"))).unwrap();
        builder.create_group(meta("g")).unwrap();

        assert_eq!(
            builder.add_command(Arc::new(Noop::new("a"))).err(),
            Some(InvalidArgument::DuplicateCommand("a".into()))
        );
        assert_eq!(
            builder.add_command(Arc::new(Noop::new("g"))).err(),
            Some(InvalidArgument::DuplicateGroup("g".into()))
        );
        assert_eq!(
            builder.create_group(meta("a")).err(),
            Some(InvalidArgument::DuplicateCommand("a".into()))
        );
    }

    #[test]
    fn test_nested_groups_build() {
        let mut builder = TreeBuilder::new();
        {
            let a = builder.create_group(meta("a")).unwrap();
            let b = a.create_command_group(meta("b")).unwrap();
            b.add_command(Noop::new("c")).unwrap();
            b.add_command(Noop::hidden("d")).unwrap();
        }
        let tree = builder.build();

        let Some(CommandNode::Group(a)) = tree.get("a") else {
            panic!("expected group a");
        };
        let Some(CommandNode::Group(b)) = a.tree().get("b") else {
            panic!("expected group b");
        };
        assert_eq!(b.tree().len(), 2);
        let visible: Vec<_> = b.tree().visible().map(|n| n.metadata().name().to_string()).collect();
        assert_eq!(visible, vec!["c"]);
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut builder = TreeBuilder::new();
        builder.add_command(Arc::new(Noop::new("zeta"))).unwrap();
        builder.create_group(meta("alpha")).unwrap();
        builder.add_command(Arc::new(Noop::new("mid"))).unwrap();
        let names: Vec<_> = builder.build().iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
