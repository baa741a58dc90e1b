use super::text::{content_height, distribute, title_line, wrap_all};
use super::*;
use std::collections::{HashMap, VecDeque};

/// Parent/child structure recovered from the edge list.
struct TreeShape {
    root: usize,
    children: Vec<Vec<usize>>,
    depth: Vec<usize>,
}

impl TreeShape {
    fn build(diagram: &Diagram) -> Result<Self, LayoutError> {
        let count = diagram.nodes.len();
        let index: HashMap<&str, usize> = diagram
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.as_str(), idx))
            .collect();
        let mut parent: Vec<Option<usize>> = vec![None; count];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];

        for edge in &diagram.edges {
            let resolve = |id: &str| {
                index.get(id).copied().ok_or_else(|| LayoutError::UnknownNode {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing: id.to_string(),
                })
            };
            let from = resolve(&edge.from)?;
            let to = resolve(&edge.to)?;
            if from == to {
                return Err(LayoutError::CyclicTree {
                    node: edge.to.clone(),
                });
            }
            if parent[to].is_some() {
                return Err(LayoutError::MultipleParents {
                    node: edge.to.clone(),
                });
            }
            parent[to] = Some(from);
            children[from].push(to);
        }

        let roots: Vec<usize> = (0..count).filter(|idx| parent[*idx].is_none()).collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => {
                return Err(LayoutError::CyclicTree {
                    node: diagram.nodes[0].id.clone(),
                });
            }
            _ => {
                return Err(LayoutError::MultipleRoots(
                    roots.iter().map(|idx| diagram.nodes[*idx].id.clone()).collect(),
                ));
            }
        };

        // With a single parent per node, anything unreachable from the root sits on a cycle.
        let mut depth = vec![usize::MAX; count];
        depth[root] = 0;
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for &child in &children[current] {
                depth[child] = depth[current] + 1;
                queue.push_back(child);
            }
        }
        if let Some(stray) = depth.iter().position(|d| *d == usize::MAX) {
            return Err(LayoutError::CyclicTree {
                node: diagram.nodes[stray].id.clone(),
            });
        }

        Ok(Self {
            root,
            children,
            depth,
        })
    }

    /// Descendants of `node` in pre-order, excluding `node` itself.
    fn descendants(&self, node: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children[node].iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children[current].iter().rev());
        }
        out
    }
}

/// WBS trees: root on top, categories side by side, their descendants stacked below.
pub(super) fn compute_tree_layout(
    diagram: &Diagram,
    params: &LayoutParams,
    fills: &mut FillResolver<'_>,
) -> Result<Placement, LayoutError> {
    if diagram.nodes.is_empty() {
        return Ok(Placement {
            boxes: BTreeMap::new(),
            labels: Vec::new(),
            mode: ConnectorMode::TreeLine,
        });
    }
    let shape = TreeShape::build(diagram)?;

    let wrapped: Vec<Vec<String>> = diagram
        .nodes
        .iter()
        .map(|node| wrap_all(&node.lines, params.max_text_width))
        .collect();
    for (idx, node) in diagram.nodes.iter().enumerate() {
        let level = shape.depth[idx];
        let required = content_height(wrapped[idx].len(), node.title.is_some(), params);
        let available = params.level_height(level);
        if required > available {
            return Err(LayoutError::LevelOverflow {
                node: node.id.clone(),
                level,
                required,
                available,
            });
        }
    }

    let mut rects: Vec<Option<Rect>> = vec![None; diagram.nodes.len()];
    let slot = params.box_width + params.spacing;
    let categories = &shape.children[shape.root];
    let root_height = params.level_height(0);
    let root_x = categories.len().saturating_sub(1) as f32 * slot / 2.0;
    rects[shape.root] = Some(Rect::from_origin(root_x, 0.0, params.box_width, root_height));

    let category_y = root_height + params.level_gap;
    let category_height = params.level_height(1);
    for (column, &category) in categories.iter().enumerate() {
        let x0 = column as f32 * slot;
        rects[category] = Some(Rect::from_origin(
            x0,
            category_y,
            params.box_width,
            category_height,
        ));
        let mut cursor = category_y + category_height + params.level_gap;
        for descendant in shape.descendants(category) {
            let height = params.level_height(shape.depth[descendant]);
            rects[descendant] = Some(Rect::from_origin(x0, cursor, params.box_width, height));
            cursor += height + params.level_gap;
        }
    }

    let mut boxes = BTreeMap::new();
    for (idx, node) in diagram.nodes.iter().enumerate() {
        let Some(rect) = rects[idx] else {
            continue;
        };
        let has_title = node.title.is_some();
        boxes.insert(
            node.id.clone(),
            ComputedBox {
                node_id: node.id.clone(),
                rect,
                fill: fills.fill_for(node.category.as_deref()),
                title: node.title.as_deref().map(|t| title_line(t, params)),
                lines: distribute(&wrapped[idx], rect.height(), has_title, params),
                depth: shape.depth[idx],
                placeholder: false,
            },
        );
    }

    Ok(Placement {
        boxes,
        labels: Vec::new(),
        mode: ConnectorMode::TreeLine,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Arrangement, DiagramEdge, DiagramNode};

    fn wbs(categories: usize, leaves: usize) -> Diagram {
        let mut diagram = Diagram::new(Arrangement::Tree);
        diagram.nodes.push(DiagramNode::labeled("Cloud Migration"));
        for c in 0..categories {
            let category = format!("Phase {c}");
            diagram.nodes.push(DiagramNode::labeled(&category));
            diagram
                .edges
                .push(DiagramEdge::new("Cloud Migration", &category));
            for l in 0..leaves {
                let leaf = format!("Task {c}.{l}");
                diagram.nodes.push(DiagramNode::labeled(&leaf));
                diagram.edges.push(DiagramEdge::new(&category, &leaf));
            }
        }
        diagram
    }

    fn place(diagram: &Diagram, params: &LayoutParams) -> Result<Placement, LayoutError> {
        let theme = Theme::dark();
        let mut fills = FillResolver::new(&theme);
        compute_tree_layout(diagram, params, &mut fills)
    }

    #[test]
    fn categories_are_evenly_spaced_and_root_centered() {
        let params = LayoutParams::default();
        let placed = place(&wbs(3, 1), &params).expect("layout");
        let xs: Vec<f32> = (0..3)
            .map(|c| placed.boxes[&format!("Phase {c}")].rect.x0)
            .collect();
        assert_eq!(xs[1] - xs[0], xs[2] - xs[1]);
        let root = placed.boxes["Cloud Migration"].rect.center().0;
        assert_eq!(root, placed.boxes["Phase 1"].rect.center().0);
    }

    #[test]
    fn leaves_stack_below_their_category() {
        let params = LayoutParams::default();
        let placed = place(&wbs(2, 3), &params).expect("layout");
        let category = placed.boxes["Phase 1"].rect;
        let mut previous = category;
        for l in 0..3 {
            let leaf = placed.boxes[&format!("Task 1.{l}")].rect;
            assert_eq!(leaf.x0, category.x0);
            assert_eq!(leaf.y0, previous.y1 + params.level_gap);
            assert_eq!(placed.boxes[&format!("Task 1.{l}")].depth, 2);
            previous = leaf;
        }
    }

    #[test]
    fn no_two_boxes_overlap() {
        let placed = place(&wbs(4, 5), &LayoutParams::default()).expect("layout");
        let rects: Vec<Rect> = placed.boxes.values().map(|b| b.rect).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn deeper_descendants_follow_preorder() {
        let mut diagram = wbs(1, 2);
        diagram.nodes.push(DiagramNode::labeled("Subtask"));
        diagram.edges.push(DiagramEdge::new("Task 0.0", "Subtask"));
        let placed = place(&diagram, &LayoutParams::default()).expect("layout");
        let first = placed.boxes["Task 0.0"].rect;
        let nested = placed.boxes["Subtask"].rect;
        let second = placed.boxes["Task 0.1"].rect;
        assert!(first.y1 < nested.y0 && nested.y1 < second.y0);
        assert_eq!(placed.boxes["Subtask"].depth, 3);
    }

    #[test]
    fn overflowing_level_is_a_configuration_error() {
        let mut diagram = wbs(1, 1);
        diagram.nodes[2].lines = vec![
            "Inventory of applications & data across every business unit".to_string(),
        ];
        let params = LayoutParams {
            box_height: 50.0,
            ..LayoutParams::default()
        };
        assert!(matches!(
            place(&diagram, &params),
            Err(LayoutError::LevelOverflow { ref node, level: 2, .. }) if node == "Task 0.0"
        ));
    }

    #[test]
    fn per_level_heights_are_respected() {
        let params = LayoutParams {
            level_heights: vec![80.0, 60.0, 70.0],
            ..LayoutParams::default()
        };
        let placed = place(&wbs(2, 2), &params).expect("layout");
        assert_eq!(placed.boxes["Cloud Migration"].rect.height(), 80.0);
        assert_eq!(placed.boxes["Phase 0"].rect.height(), 60.0);
        assert_eq!(placed.boxes["Task 0.1"].rect.height(), 70.0);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut diagram = wbs(1, 1);
        diagram.nodes.push(DiagramNode::labeled("x"));
        diagram.nodes.push(DiagramNode::labeled("y"));
        diagram.edges.push(DiagramEdge::new("x", "y"));
        diagram.edges.push(DiagramEdge::new("y", "x"));
        assert!(matches!(
            place(&diagram, &LayoutParams::default()),
            Err(LayoutError::CyclicTree { .. })
        ));
    }

    #[test]
    fn second_parent_is_rejected() {
        let mut diagram = wbs(2, 1);
        diagram.edges.push(DiagramEdge::new("Phase 1", "Task 0.0"));
        assert_eq!(
            place(&diagram, &LayoutParams::default()).err(),
            Some(LayoutError::MultipleParents {
                node: "Task 0.0".to_string()
            })
        );
    }

    #[test]
    fn disconnected_nodes_are_extra_roots() {
        let mut diagram = wbs(1, 1);
        diagram.nodes.push(DiagramNode::labeled("Orphan"));
        assert_eq!(
            place(&diagram, &LayoutParams::default()).err(),
            Some(LayoutError::MultipleRoots(vec![
                "Cloud Migration".to_string(),
                "Orphan".to_string()
            ]))
        );
    }
}
