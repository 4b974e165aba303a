use crate::commands::{listings, serve};

/// A titled block of example invocations shown under a subcommand's `--help`.
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

const EXAMPLES: &[CommandExample] = &[
    CommandExample { name: "serve", groups: serve::EXAMPLES },
    CommandExample { name: "search", groups: listings::SEARCH_EXAMPLES },
    CommandExample { name: "seed", groups: listings::SEED_EXAMPLES },
    CommandExample { name: "update", groups: listings::UPDATE_EXAMPLES },
];

pub fn command_examples() -> &'static [CommandExample] {
    EXAMPLES
}
