//! Inbound message classification.
//!
//! Turns raw message text into a closed set of commands so the engine
//! branches on variants instead of scattered keyword checks.

use once_cell::sync::Lazy;
use regex::Regex;

static TRIGGER_WITH_THE_CREW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^auto\s+sync\s+the\s+(.+)\s+crew$").unwrap());
static TRIGGER_WITH_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^auto\s+sync\s+(.+)$").unwrap());
static TRIGGER_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:auto\s+sync|autosync)$").unwrap());

/// Sub-commands of "auto sync" that belong to other flows and must not be
/// mistaken for a crew name.
const EXCLUDED_TOKENS: [&str; 3] = ["check", "stop", "cancel"];

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCommand {
    /// The trigger keyword, optionally carrying a crew name token.
    Trigger { crew_name: Option<String> },
    /// Explicit exit/cancel while a conversation is active.
    Exit,
    /// Anything else; interpreted by the current phase.
    Text(String),
}

impl InboundCommand {
    /// Classifies one inbound message.
    ///
    /// `conversation_active` gates exit handling: "exit" and "cancel" are
    /// plain text when no Auto Sync conversation exists.
    pub fn classify(message: &str, conversation_active: bool) -> Self {
        let trimmed = message.trim();
        let lowered = trimmed.to_lowercase();

        if conversation_active && (lowered == "exit" || lowered == "cancel") {
            return Self::Exit;
        }

        if TRIGGER_BARE.is_match(trimmed) {
            return Self::Trigger { crew_name: None };
        }

        if let Some(caps) = TRIGGER_WITH_THE_CREW.captures(trimmed) {
            let name = caps[1].trim().to_string();
            if !Self::is_excluded(&name) {
                return Self::Trigger {
                    crew_name: Some(name),
                };
            }
        }

        if let Some(caps) = TRIGGER_WITH_NAME.captures(trimmed) {
            let name = caps[1].trim().to_string();
            if !Self::is_excluded(&name) {
                return Self::Trigger {
                    crew_name: Some(name),
                };
            }
        }

        Self::Text(message.to_string())
    }

    fn is_excluded(token: &str) -> bool {
        let lowered = token.to_lowercase();
        EXCLUDED_TOKENS.iter().any(|cmd| lowered == *cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod trigger_matching {
        use super::*;

        #[test]
        fn bare_trigger_matches() {
            assert_eq!(
                InboundCommand::classify("auto sync", false),
                InboundCommand::Trigger { crew_name: None }
            );
        }

        #[test]
        fn one_word_form_matches() {
            assert_eq!(
                InboundCommand::classify("autosync", false),
                InboundCommand::Trigger { crew_name: None }
            );
        }

        #[test]
        fn matching_is_case_insensitive() {
            assert_eq!(
                InboundCommand::classify("Auto Sync", false),
                InboundCommand::Trigger { crew_name: None }
            );
        }

        #[test]
        fn trigger_with_crew_name_captures_token() {
            assert_eq!(
                InboundCommand::classify("auto sync Friends", false),
                InboundCommand::Trigger {
                    crew_name: Some("Friends".to_string())
                }
            );
        }

        #[test]
        fn the_crew_form_strips_decoration() {
            assert_eq!(
                InboundCommand::classify("auto sync the Poker crew", false),
                InboundCommand::Trigger {
                    crew_name: Some("Poker".to_string())
                }
            );
        }

        #[test]
        fn surrounding_whitespace_is_ignored() {
            assert_eq!(
                InboundCommand::classify("  auto sync Friends  ", false),
                InboundCommand::Trigger {
                    crew_name: Some("Friends".to_string())
                }
            );
        }

        #[test]
        fn sub_commands_are_not_crew_names() {
            for message in ["auto sync check", "auto sync stop", "auto sync cancel"] {
                let cmd = InboundCommand::classify(message, false);
                assert!(
                    matches!(cmd, InboundCommand::Text(_)),
                    "{message:?} classified as {cmd:?}"
                );
            }
        }
    }

    mod exit_matching {
        use super::*;

        #[test]
        fn exit_requires_an_active_conversation() {
            assert_eq!(
                InboundCommand::classify("exit", true),
                InboundCommand::Exit
            );
            assert_eq!(
                InboundCommand::classify("exit", false),
                InboundCommand::Text("exit".to_string())
            );
        }

        #[test]
        fn cancel_is_an_exit_alias_when_active() {
            assert_eq!(
                InboundCommand::classify("Cancel", true),
                InboundCommand::Exit
            );
        }

        #[test]
        fn exit_embedded_in_a_sentence_is_plain_text() {
            let cmd = InboundCommand::classify("I want to exit soon", true);
            assert!(matches!(cmd, InboundCommand::Text(_)));
        }
    }

    mod text_fallthrough {
        use super::*;

        #[test]
        fn free_text_keeps_original_content() {
            assert_eq!(
                InboundCommand::classify("Test Event", true),
                InboundCommand::Text("Test Event".to_string())
            );
        }

        #[test]
        fn blank_text_is_preserved_for_phase_handling() {
            assert_eq!(
                InboundCommand::classify("   ", true),
                InboundCommand::Text("   ".to_string())
            );
        }
    }
}
