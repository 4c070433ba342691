// Shared prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it,
// declaring `PromptTemplate` constants that are rendered here.

use std::collections::HashMap;

use thiserror::Error;

use crate::llm_client::ChatMessage;

/// Named values substituted into a template's `{placeholder}` slots.
pub type PromptFields<'a> = HashMap<&'a str, &'a str>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("template '{template}' requires field '{field}' but it was not supplied")]
    MissingField {
        template: &'static str,
        field: String,
    },
}

/// A fixed system/user message pair with `{name}` placeholders.
/// Process-wide constant — never mutated after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

impl PromptTemplate {
    /// Distinct placeholder names in order of first appearance
    /// (system message first, then user message).
    pub fn slots(&self) -> Vec<&'static str> {
        let mut slots: Vec<&'static str> = Vec::new();
        for segment in segments(self.system).chain(segments(self.user)) {
            if let Segment::Slot(name) = segment {
                if !slots.contains(&name) {
                    slots.push(name);
                }
            }
        }
        slots
    }

    /// Renders the template into `[system, user]` messages.
    ///
    /// Values are inserted verbatim and never re-scanned, so a value that
    /// itself contains `{field}` is emitted literally.
    pub fn build(&self, fields: &PromptFields<'_>) -> Result<Vec<ChatMessage>, PromptError> {
        if let Some(missing) = self.slots().into_iter().find(|s| !fields.contains_key(*s)) {
            return Err(PromptError::MissingField {
                template: self.name,
                field: missing.to_string(),
            });
        }

        Ok(vec![
            ChatMessage::system(self.render(self.system, fields)?),
            ChatMessage::user(self.render(self.user, fields)?),
        ])
    }

    fn render(&self, text: &'static str, fields: &PromptFields<'_>) -> Result<String, PromptError> {
        let mut out = String::with_capacity(text.len());
        for segment in segments(text) {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Slot(name) => {
                    let value = fields.get(name).ok_or_else(|| PromptError::MissingField {
                        template: self.name,
                        field: name.to_string(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'t> {
    Literal(&'t str),
    Slot(&'t str),
}

/// Splits template text into literal runs and `{identifier}` slots.
/// Braces that do not enclose an identifier are kept as literal text.
fn segments(text: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut search_from = 0;
        while let Some(offset) = rest[search_from..].find('{') {
            let open = search_from + offset;
            if let Some(len) = slot_len(&rest[open + 1..]) {
                if open > 0 {
                    let literal = &rest[..open];
                    rest = &rest[open..];
                    return Some(Segment::Literal(literal));
                }
                let name = &rest[1..=len];
                rest = &rest[len + 2..];
                return Some(Segment::Slot(name));
            }
            search_from = open + 1;
        }
        let literal = rest;
        rest = "";
        Some(Segment::Literal(literal))
    })
}

/// Length of the identifier at the start of `s` if it is immediately
/// followed by `}`.
fn slot_len(s: &str) -> Option<usize> {
    let len = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_alphabetic() || *c == '_' || (*i > 0 && c.is_ascii_digit()))
        .count();
    (len > 0 && s[len..].starts_with('}')).then_some(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Role;

    const GREETING: PromptTemplate = PromptTemplate {
        name: "greeting",
        system: "You greet people from {place}.",
        user: "Name: {name}\nPlace: {place}\nLiteral {braces} stay: { not_a_slot }",
    };

    #[test]
    fn test_slots_are_ordered_and_distinct() {
        assert_eq!(GREETING.slots(), vec!["place", "name", "braces"]);
    }

    #[test]
    fn test_build_substitutes_every_slot() {
        let fields = PromptFields::from([
            ("name", "Ada"),
            ("place", "Lisbon"),
            ("braces", "{x}"),
        ]);
        let messages = GREETING.build(&fields).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "You greet people from Lisbon.");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "Name: Ada\nPlace: Lisbon\nLiteral {x} stay: { not_a_slot }"
        );
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let fields = PromptFields::from([
            ("name", "{place}"),
            ("place", "Oslo"),
            ("braces", ""),
        ]);
        let messages = GREETING.build(&fields).unwrap();
        assert!(messages[1].content.starts_with("Name: {place}\n"));
    }

    #[test]
    fn test_omitting_any_slot_is_missing_field() {
        let all = [("name", "Ada"), ("place", "Lisbon"), ("braces", "b")];
        for skipped in GREETING.slots() {
            let fields: PromptFields = all.iter().copied().filter(|(k, _)| *k != skipped).collect();
            assert_eq!(
                GREETING.build(&fields),
                Err(PromptError::MissingField {
                    template: "greeting",
                    field: skipped.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let fields = PromptFields::from([
            ("name", "Ada"),
            ("place", "Lisbon"),
            ("braces", "b"),
            ("unused", "zzz"),
        ]);
        let messages = GREETING.build(&fields).unwrap();
        assert!(!messages[1].content.contains("zzz"));
    }

    #[test]
    fn test_segments_handle_edge_braces() {
        let parts: Vec<_> = segments("{a}{b}x{").collect();
        assert_eq!(
            parts,
            vec![
                Segment::Slot("a"),
                Segment::Slot("b"),
                Segment::Literal("x{"),
            ]
        );
    }

    #[test]
    fn test_slot_len_rejects_leading_digit() {
        assert_eq!(slot_len("1abc}"), None);
        assert_eq!(slot_len("user_type}"), Some(9));
        assert_eq!(slot_len("abc"), None);
    }
}
