//! Ordered scoring rule tables
//!
//! A score is a base value plus the deltas of the rules that fire. Rules are
//! organised in exclusive groups: inside a group the first matching rule wins
//! and the rest are skipped, while the groups themselves add up.

use serde::Serialize;

/// A single adjustment applied when its predicate holds
#[derive(Debug)]
pub struct Rule<I, D> {
    pub name: &'static str,
    pub applies: fn(&I) -> bool,
    pub delta: D,
}

/// Rules of which at most one applies, checked in order
#[derive(Debug)]
pub struct ExclusiveGroup<I: 'static, D: 'static> {
    pub category: &'static str,
    pub rules: &'static [Rule<I, D>],
}

impl<I: 'static, D: Copy + 'static> ExclusiveGroup<I, D> {
    /// First rule in table order whose predicate holds
    pub fn first_match(&self, input: &I) -> Option<&'static Rule<I, D>> {
        self.rules.iter().find(|rule| (rule.applies)(input))
    }
}

/// A rule that fired, kept so a score can be explained
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Adjustment<D> {
    pub category: &'static str,
    pub rule: &'static str,
    pub delta: D,
}

/// Evaluate every group against `input`, in group order
pub fn evaluate<I: 'static, D: Copy + 'static>(
    groups: &[ExclusiveGroup<I, D>],
    input: &I,
) -> Vec<Adjustment<D>> {
    groups
        .iter()
        .filter_map(|group| {
            group.first_match(input).map(|rule| Adjustment {
                category: group.category,
                rule: rule.name,
                delta: rule.delta,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN: &[Rule<i32, i32>] = &[
        Rule {
            name: "large",
            applies: |n| *n > 100,
            delta: 3,
        },
        Rule {
            name: "positive",
            applies: |n| *n > 0,
            delta: 1,
        },
    ];

    const EVEN: &[Rule<i32, i32>] = &[Rule {
        name: "even",
        applies: |n| n % 2 == 0,
        delta: 10,
    }];

    const GROUPS: &[ExclusiveGroup<i32, i32>] = &[
        ExclusiveGroup {
            category: "sign",
            rules: SIGN,
        },
        ExclusiveGroup {
            category: "parity",
            rules: EVEN,
        },
    ];

    #[test]
    fn test_first_match_is_exclusive() {
        let rule = GROUPS[0].first_match(&500).unwrap();
        assert_eq!(rule.name, "large");
        assert!(GROUPS[0].first_match(&-1).is_none());
    }

    #[test]
    fn test_groups_are_additive() {
        let adjustments = evaluate(GROUPS, &200);
        let names: Vec<_> = adjustments.iter().map(|a| a.rule).collect();
        assert_eq!(names, vec!["large", "even"]);
        assert_eq!(adjustments.iter().map(|a| a.delta).sum::<i32>(), 13);

        assert!(evaluate(GROUPS, &-3).is_empty());
    }
}
