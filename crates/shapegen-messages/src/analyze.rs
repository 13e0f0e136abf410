//! Argument discovery for message templates.
//!
//! Every placeholder occurrence contributes a type hint derived from its
//! formatting keyword. Occurrences sharing a name are unified into a single
//! [`Argument`], so a template that mentions `{count}` twice yields one
//! parameter in the generated accessor.

use crate::template::{Template, TemplateError};

/// Coarse type class of a message argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgumentType {
    /// Bare `{name}`: any value, rendered with its display form.
    Untyped,
    Text,
    Numeric,
    Temporal,
    /// Unknown keyword, or occurrences that disagree.
    Generic,
}

impl ArgumentType {
    /// Map a formatting keyword to its type class.
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword {
            None => Self::Untyped,
            Some("string" | "select") => Self::Text,
            Some("number" | "plural" | "selectordinal" | "choice") => Self::Numeric,
            Some("date" | "time") => Self::Temporal,
            Some(_) => Self::Generic,
        }
    }

    /// Unify the hints of every occurrence of one placeholder name.
    ///
    /// Agreeing hints keep their class. Otherwise untyped hints are ignored
    /// and a single remaining class wins; anything else degrades to
    /// [`ArgumentType::Generic`]. The result depends only on the set of hints,
    /// never on their order.
    pub fn unify<I: IntoIterator<Item = Self>>(hints: I) -> Self {
        let mut seen: Vec<Self> = Vec::new();
        for hint in hints {
            if !seen.contains(&hint) {
                seen.push(hint);
            }
        }
        match seen.as_slice() {
            [] => Self::Untyped,
            [only] => *only,
            _ => {
                seen.retain(|t| *t != Self::Untyped);
                match seen.as_slice() {
                    [only] => *only,
                    _ => Self::Generic,
                }
            }
        }
    }
}

/// One unified message argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub ty: ArgumentType,
}

/// Parse `template` and return its unified arguments in order of first
/// appearance.
pub fn analyze(template: &str) -> Result<Vec<Argument>, TemplateError> {
    Ok(arguments(&Template::parse(template)?))
}

/// Unified arguments of an already parsed template.
pub fn arguments(template: &Template) -> Vec<Argument> {
    let mut groups: Vec<(&str, Vec<ArgumentType>)> = Vec::new();
    for placeholder in template.placeholders() {
        let hint = ArgumentType::from_keyword(placeholder.keyword());
        match groups.iter_mut().find(|(name, _)| *name == placeholder.name) {
            Some((_, hints)) => hints.push(hint),
            None => groups.push((&placeholder.name, vec![hint])),
        }
    }

    groups
        .into_iter()
        .map(|(name, hints)| {
            let ty = ArgumentType::unify(hints.iter().copied());
            if ty == ArgumentType::Generic && !hints.contains(&ArgumentType::Generic) {
                tracing::debug!(argument = name, ?hints, "conflicting argument types, using generic");
            }
            Argument {
                name: name.to_string(),
                ty,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ArgumentType::*;

    fn arg(name: &str, ty: ArgumentType) -> Argument {
        Argument {
            name: name.into(),
            ty,
        }
    }

    #[test]
    fn plural_with_inner_reference_is_one_numeric_argument() {
        let args = analyze("You have {count, plural, one{1 item} other{{count} items}}").unwrap();
        assert_eq!(args, vec![arg("count", Numeric)]);
    }

    #[test]
    fn keywords_map_to_classes() {
        let args = analyze(
            "{a} {b, string} {c, select, x{} other{}} {d, number} {e, choice, 0#none|1#one} \
             {f, date, short} {g, time} {h, spellout} {i, selectordinal, one{#st} other{#th}}",
        )
        .unwrap();
        assert_eq!(
            args,
            vec![
                arg("a", Untyped),
                arg("b", Text),
                arg("c", Text),
                arg("d", Numeric),
                arg("e", Numeric),
                arg("f", Temporal),
                arg("g", Temporal),
                arg("h", Generic),
                arg("i", Numeric),
            ]
        );
    }

    #[test]
    fn untyped_occurrence_does_not_downgrade() {
        let args = analyze("{when} ... {when, date, long}").unwrap();
        assert_eq!(args, vec![arg("when", Temporal)]);
    }

    #[test]
    fn genuine_conflicts_degrade_to_generic() {
        let args = analyze("{x, number} vs {x, date}").unwrap();
        assert_eq!(args, vec![arg("x", Generic)]);
    }

    #[test]
    fn orders_by_first_appearance() {
        let args = analyze("{b} {a} {b, number} {c, select, one{{d}} other{{a}}}").unwrap();
        let names: Vec<_> = args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn unification_ignores_order_and_grouping() {
        let hints = [Untyped, Numeric, Untyped, Numeric];
        let forward = ArgumentType::unify(hints);
        let backward = ArgumentType::unify(hints.into_iter().rev());
        assert_eq!(forward, Numeric);
        assert_eq!(forward, backward);

        let conflicting = [Text, Untyped, Temporal];
        let left = ArgumentType::unify([ArgumentType::unify([Text, Untyped]), Temporal]);
        let right = ArgumentType::unify([Text, ArgumentType::unify([Untyped, Temporal])]);
        assert_eq!(ArgumentType::unify(conflicting), Generic);
        assert_eq!(left, Generic);
        assert_eq!(right, Generic);
    }

    #[test]
    fn template_without_placeholders_has_no_arguments() {
        assert!(analyze("Plain text, it''s fine").unwrap().is_empty());
    }

    #[test]
    fn malformed_template_is_an_error() {
        assert!(analyze("{unclosed").is_err());
    }
}
