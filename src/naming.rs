//! Page title resolution.
//!
//! Titles are a pure function of the node, its parent and the strategy, so a retry
//! pass that re-plans from the same tree produces byte-identical titles.

use serde::{Deserialize, Serialize};

use crate::models::{NodeKind, OutlineNode};

/// How outline nodes are turned into page titles.
///
/// - `Numbered`: `"1. Week 1"`, `"1.1. Ownership"`
/// - `Plain`: `"Week 1"`, `"Ownership"`
/// - `Prefixed`: sections as `Numbered`, lessons as `"1. Week 1 - 1.1. Ownership"`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    Numbered,
    Plain,
    Prefixed,
}

impl NamingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numbered => "numbered",
            Self::Plain => "plain",
            Self::Prefixed => "prefixed",
        }
    }
}

impl std::str::FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "numbered" | "1" => Ok(Self::Numbered),
            "plain" | "2" => Ok(Self::Plain),
            "prefixed" | "3" => Ok(Self::Prefixed),
            other => Err(format!(
                "Invalid naming strategy '{}'. Must be: numbered, plain, or prefixed",
                other
            )),
        }
    }
}

impl std::fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the display title of `node`.
///
/// `parent` is the owning section and is only consulted for lessons under
/// [`NamingStrategy::Prefixed`]. Lesson numbering reuses the node's own dotted index.
pub fn resolve_title(
    node: &OutlineNode,
    strategy: NamingStrategy,
    parent: Option<&OutlineNode>,
) -> String {
    match (strategy, node.kind) {
        (_, NodeKind::Course) | (NamingStrategy::Plain, _) => node.title.clone(),
        (NamingStrategy::Numbered, _) | (NamingStrategy::Prefixed, NodeKind::Section) => {
            numbered(node)
        }
        (NamingStrategy::Prefixed, NodeKind::Lesson) => match parent {
            Some(section) => format!("{} - {}", numbered(section), numbered(node)),
            None => numbered(node),
        },
    }
}

fn numbered(node: &OutlineNode) -> String {
    format!("{}. {}", node.index, node.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week() -> OutlineNode {
        OutlineNode::section("1", "Week 1")
    }

    fn lesson() -> OutlineNode {
        OutlineNode::lesson("1.2", "Borrowing")
    }

    #[test]
    fn numbered_titles() {
        assert_eq!(resolve_title(&week(), NamingStrategy::Numbered, None), "1. Week 1");
        assert_eq!(
            resolve_title(&lesson(), NamingStrategy::Numbered, Some(&week())),
            "1.2. Borrowing"
        );
    }

    #[test]
    fn plain_titles() {
        assert_eq!(resolve_title(&week(), NamingStrategy::Plain, None), "Week 1");
        assert_eq!(
            resolve_title(&lesson(), NamingStrategy::Plain, Some(&week())),
            "Borrowing"
        );
    }

    #[test]
    fn prefixed_titles() {
        assert_eq!(resolve_title(&week(), NamingStrategy::Prefixed, None), "1. Week 1");
        assert_eq!(
            resolve_title(&lesson(), NamingStrategy::Prefixed, Some(&week())),
            "1. Week 1 - 1.2. Borrowing"
        );
    }

    #[test]
    fn is_deterministic() {
        for strategy in [
            NamingStrategy::Numbered,
            NamingStrategy::Plain,
            NamingStrategy::Prefixed,
        ] {
            let first = resolve_title(&lesson(), strategy, Some(&week()));
            let second = resolve_title(&lesson(), strategy, Some(&week()));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("Prefixed".parse::<NamingStrategy>(), Ok(NamingStrategy::Prefixed));
        assert_eq!("2".parse::<NamingStrategy>(), Ok(NamingStrategy::Plain));
        assert!("fancy".parse::<NamingStrategy>().is_err());
    }
}
