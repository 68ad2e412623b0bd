#![allow(dead_code)]

use std::sync::Arc;

use kindred::config::KindredConfig;
use kindred::shell::Shell;
use kindred::storage::Store;

/// Config with zeroed simulation delays and no demo seed data.
pub fn instant_config() -> KindredConfig {
    let mut config = KindredConfig::default();
    config.memory.seed_sample = false;
    config.conversation.thinking_delay_ms = 0;
    config.conversation.reveal_char_delay_ms = 0;
    config.conversation.speaking_hold_ms = 0;
    config.conversation.welcome_delay_ms = 0;
    config.conversation.welcome_hold_ms = 0;
    config
}

/// A fully wired shell over an in-memory store.
pub fn test_shell() -> Arc<Shell> {
    Shell::build(&instant_config(), Arc::new(Store::open_in_memory().unwrap()))
}

/// A fully wired shell over the given store (for reload scenarios).
pub fn test_shell_with_store(store: Arc<Store>) -> Arc<Shell> {
    Shell::build(&instant_config(), store)
}

/// A docs content tree with one real page per documented section.
pub fn docs_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let pages = [
        (
            "architecture/overview.md",
            "# Architecture Overview\n\nThe companion is a cluster of small engines.\n\n## Components\n\nConversation, rituals, memory, settings.\n",
        ),
        (
            "user-interaction/interfaces.md",
            "# Interfaces\n\nA single pixel carries the whole interface.\n",
        ),
        (
            "ethics/principles.md",
            "# Principles\n\nConnection over utility, presence over metrics.\n",
        ),
        (
            "analysis/validation.md",
            "# Validation\n\nWhat the prototype does and does not demonstrate.\n",
        ),
    ];

    for (rel, content) in pages {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    dir
}
