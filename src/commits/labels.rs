//! Deriving target branches from pull request labels

use crate::types::BranchLabelRule;

/// Expands pull request labels into target branches
///
/// Every rule that matches a label contributes a branch, produced by
/// applying the rule's replacement (capture groups supported). Duplicates
/// keep their first position; labels with no matching rule contribute
/// nothing.
pub fn target_branches_from_labels(labels: &[String], rules: &[BranchLabelRule]) -> Vec<String> {
    let mut branches = Vec::new();
    for label in labels {
        for rule in rules {
            if rule.pattern.is_match(label) {
                let branch = rule
                    .pattern
                    .replace(label, rule.target_branch.as_str())
                    .into_owned();
                if !branches.contains(&branch) {
                    branches.push(branch);
                }
            }
        }
    }
    branches
}
