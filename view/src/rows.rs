use arbor_tree::{Expansion, TreeNode};
use serde::Serialize;
use std::sync::Arc;

use crate::marker;

/// One line of a tree list: what a presentation layer draws for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub marker: &'static str,
    pub is_editing: bool,
}

/// Pre-order walk that only descends into expanded nodes.
pub fn visible_rows(forest: &[Arc<TreeNode>]) -> Vec<VisibleRow> {
    fn walk(nodes: &[Arc<TreeNode>], depth: usize, rows: &mut Vec<VisibleRow>) {
        for node in nodes {
            rows.push(VisibleRow {
                id: node.id.to_string(),
                name: node.name.clone(),
                depth,
                marker: marker(node),
                is_editing: node.is_editing,
            });
            if node.expansion() == Expansion::Expanded {
                walk(node.children(), depth + 1, rows);
            }
        }
    }
    let mut rows = Vec::new();
    walk(forest, 0, &mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Arc<TreeNode>> {
        vec![
            TreeNode::new("1", "Documents")
                .with_children(vec![
                    TreeNode::new("1-1", "Work")
                        .with_children(vec![TreeNode::new("1-1-1", "Reports")]),
                    TreeNode::new("1-2", "Personal"),
                ])
                .expanded(true),
            TreeNode::new("2", "Projects"),
        ]
        .into_iter()
        .map(Arc::new)
        .collect()
    }

    #[test]
    fn rows_skip_collapsed_subtrees() {
        let rows = visible_rows(&sample());
        let summary: Vec<_> = rows.iter().map(|r| (r.id.as_str(), r.depth)).collect();
        assert_eq!(summary, vec![("1", 0), ("1-1", 1), ("1-2", 1), ("2", 0)]);
    }

    #[test]
    fn rows_serialize_as_json() {
        let rows = visible_rows(&sample()[1..]);
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"2","name":"Projects","depth":0,"marker":"▸","is_editing":false}]"#
        );
    }
}
