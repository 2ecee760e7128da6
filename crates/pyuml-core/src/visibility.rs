//! Naming-convention visibility classifier
//!
//! Python has no access modifiers, so visibility is read off the spelling of
//! a name. This is a heuristic: a class that does not follow the underscore
//! convention gets misclassified, and a "private" name is still reachable
//! through name mangling.

use crate::model::MemberVisibility;

const MARKER: char = '_';

/// Classify a member name.
///
/// - `__name` (but not `__dunder__`) is private
/// - `_name` is protected
/// - everything else, dunders included, is public
pub fn classify(name: &str) -> MemberVisibility {
    let mut chars = name.chars();
    let first = chars.next();
    let second = chars.next();

    match (first, second) {
        (Some(MARKER), Some(MARKER)) => {
            if is_dunder(name) {
                MemberVisibility::Public
            } else {
                MemberVisibility::Private
            }
        }
        (Some(MARKER), _) => MemberVisibility::Protected,
        _ => MemberVisibility::Public,
    }
}

fn is_dunder(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dunder_is_public() {
        assert_eq!(classify("__init__"), MemberVisibility::Public);
        assert_eq!(classify("__repr__"), MemberVisibility::Public);
        assert_eq!(classify("__"), MemberVisibility::Public);
    }

    #[test]
    fn test_single_underscore_is_protected() {
        assert_eq!(classify("_helper"), MemberVisibility::Protected);
        assert_eq!(classify("_"), MemberVisibility::Protected);
        assert_eq!(classify("_trailing_"), MemberVisibility::Protected);
    }

    #[test]
    fn test_double_underscore_is_private() {
        assert_eq!(classify("__secret"), MemberVisibility::Private);
        assert_eq!(classify("___triple"), MemberVisibility::Private);
        assert_eq!(classify("__half_"), MemberVisibility::Private);
    }

    #[test]
    fn test_plain_names_are_public() {
        assert_eq!(classify("tick"), MemberVisibility::Public);
        assert_eq!(classify("name_"), MemberVisibility::Public);
        assert_eq!(classify(""), MemberVisibility::Public);
    }
}
