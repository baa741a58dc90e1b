use std::path::Path;

use dashboard_diagrams::layout::{ConnectorMode, Rect, route};
use dashboard_diagrams::{
    Arrangement, Diagram, DiagramEdge, DiagramNode, Glossary, LayoutError, LayoutParams,
    ReferenceTable, SprintBoard, SprintTask, TermHighlighter, Theme, compute_layout, highlight,
    parse_diagram, render_svg,
};

const FIXTURES: [&str; 5] = [
    "lifecycle.json5",
    "waterfall.json5",
    "wbs.json5",
    "swimlane.json5",
    "oauth_plan.json5",
];

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn load_fixture(name: &str) -> (Diagram, LayoutParams) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    let parsed = parse_diagram(&input).expect("parse failed");
    let mut params = LayoutParams::default();
    if let Some(overrides) = &parsed.layout {
        overrides.apply(&mut params);
    }
    (parsed.diagram, params)
}

fn assert_no_overlaps(rects: &[Rect], fixture: &str) {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.overlaps(b), "{fixture}: {a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn render_all_fixtures() {
    for name in FIXTURES {
        let (diagram, params) = load_fixture(name);
        for theme in [Theme::dark(), Theme::light()] {
            let layout = compute_layout(&diagram, &theme, &params)
                .unwrap_or_else(|err| panic!("{name}: layout failed: {err}"));
            let rects: Vec<Rect> = layout.boxes.values().map(|b| b.rect).collect();
            assert_no_overlaps(&rects, name);
            for node in layout.boxes.values() {
                assert!(layout.extent.x0 <= node.rect.x0 && node.rect.x1 <= layout.extent.x1);
                assert!(layout.extent.y0 <= node.rect.y0 && node.rect.y1 <= layout.extent.y1);
            }
            let term = diagram.glossary.terms().next();
            let highlighter = TermHighlighter::new(term, &diagram.glossary);
            let svg = render_svg(&layout, &theme, &highlighter);
            assert_valid_svg(&svg, name);
        }
    }
}

#[test]
fn sequence_scenario_matches_spacing_and_arrows() {
    let diagram = Diagram::sequence(vec![
        DiagramNode::new("A", ["Assessment"]),
        DiagramNode::new("B", ["Design"]),
    ]);
    let params = LayoutParams {
        spacing: 1.2,
        box_width: 3.0,
        ..LayoutParams::default()
    };
    let layout = compute_layout(&diagram, &Theme::dark(), &params).expect("layout");
    let a = layout.box_for("A").expect("A").rect;
    let b = layout.box_for("B").expect("B").rect;
    assert!((b.x0 - (a.x1 + 1.2)).abs() < 1e-5);
    assert_eq!(layout.connectors.len(), 1);
    assert!(layout.connectors[0].arrow);
}

#[test]
fn tree_scenario_has_eight_lines_and_no_overlaps() {
    let mut diagram = Diagram::new(Arrangement::Tree);
    diagram.nodes.push(DiagramNode::labeled("Project"));
    for category in ["Planning", "Execution"] {
        diagram.nodes.push(DiagramNode::labeled(category));
        diagram.edges.push(DiagramEdge::new("Project", category));
        for leaf in 1..=3 {
            let id = format!("{category} {leaf}");
            diagram.nodes.push(DiagramNode::labeled(&id));
            diagram.edges.push(DiagramEdge::new(category, &id));
        }
    }
    let layout =
        compute_layout(&diagram, &Theme::dark(), &LayoutParams::default()).expect("layout");
    assert_eq!(layout.boxes.len(), 9);
    assert_eq!(layout.connectors.len(), 8);
    assert!(layout.connectors.iter().all(|c| !c.arrow));
    let rects: Vec<Rect> = layout.boxes.values().map(|b| b.rect).collect();
    assert_no_overlaps(&rects, "tree scenario");
}

#[test]
fn dangling_edge_fails_without_output() {
    let mut diagram = Diagram::sequence(vec![
        DiagramNode::labeled("Assessment"),
        DiagramNode::labeled("Design"),
    ]);
    diagram.edges.push(DiagramEdge::new("Design", "Cutover"));
    let err = compute_layout(&diagram, &Theme::dark(), &LayoutParams::default())
        .expect_err("dangling edge");
    assert_eq!(
        err,
        LayoutError::UnknownNode {
            from: "Design".to_string(),
            to: "Cutover".to_string(),
            missing: "Cutover".to_string(),
        }
    );
}

#[test]
fn router_is_usable_on_its_own() {
    let (diagram, params) = load_fixture("wbs.json5");
    let layout = compute_layout(&diagram, &Theme::dark(), &params).expect("layout");
    let segments = route(&diagram.edges, &layout.boxes, ConnectorMode::StackedArrow).expect("route");
    assert_eq!(segments.len(), diagram.edges.len());
    assert!(segments.iter().all(|s| s.arrow));
}

#[test]
fn swimlane_rows_grow_with_content() {
    let (diagram, params) = load_fixture("swimlane.json5");
    let layout = compute_layout(&diagram, &Theme::dark(), &params).expect("layout");
    let coordinator = layout.box_for("Cutover / Project Coordinator").expect("cell").rect;
    let security = layout.box_for("Build / Security Engineer").expect("cell").rect;
    assert!(security.height() >= coordinator.height());
    assert!(layout.box_for("__cell_1_0").expect("placeholder").placeholder);
}

#[test]
fn gantt_fixture_spans_ten_weeks() {
    let (diagram, params) = load_fixture("oauth_plan.json5");
    let layout = compute_layout(&diagram, &Theme::light(), &params).expect("layout");
    let maintain = layout.box_for("maintain").expect("bar").rect;
    assert_eq!(maintain.width(), 16.0 * params.day_width);
    let ticks = layout
        .labels
        .iter()
        .filter(|label| label.text.starts_with("Day "))
        .count();
    assert_eq!(ticks, 11);
    assert_eq!(layout.box_for("db").expect("bar").fill, layout.box_for("authz").expect("bar").fill);
}

#[test]
fn highlighter_contract() {
    let glossary: Glossary = [("CM", "Configuration Management")].into_iter().collect();
    assert_eq!(highlight("CMMC-level", None, &glossary), "CMMC-level");
    assert_eq!(
        highlight("CMMC-level", Some("CM"), &glossary),
        "<b title=\"Configuration Management\">CM</b>MC-level"
    );
    assert_eq!(
        highlight("IR plan", Some("IR"), &glossary),
        "<b title=\"Definition not found\">IR</b> plan"
    );
}

#[test]
fn reference_table_renders_as_grid() {
    let mut table = ReferenceTable::new(["Tool", "Domain", "Cost"]).expect("columns");
    table.push_row(["Wazuh", "Audit & Accountability", "Free"]).expect("row");
    table.push_row(["KeePassXC", "Access Control", ""]).expect("row");
    let diagram = table.to_grid_diagram("Tool").expect("grid");
    let layout =
        compute_layout(&diagram, &Theme::dark(), &LayoutParams::default()).expect("layout");
    assert_eq!(layout.boxes.len(), 4);
    assert!(layout.box_for("__cell_1_1").expect("blank cost").placeholder);
}

#[test]
fn sprint_board_renders_with_role_colours() {
    let board = SprintBoard::new("Sprint 1")
        .with_task(SprintTask::new("CI/CD pipeline finalized", "Cloud Engineer", 3, "Done"))
        .with_task(SprintTask::new("Initial infra hardening", "Security Engineer", 5, "Done"))
        .with_task(SprintTask::new("Documentation & handoff", "Project Coordinator", 2, "Done"));
    let metrics = board.metrics();
    assert_eq!(metrics.total_points, 10);
    assert_eq!(metrics.completion_rate, 100.0);

    let mut theme = Theme::light();
    dashboard_diagrams::sprint::apply_role_colors(&mut theme);
    let params = LayoutParams::default();
    let layout = compute_layout(&board.to_grid_diagram(), &theme, &params).expect("layout");
    let rects: Vec<Rect> = layout.boxes.values().map(|b| b.rect).collect();
    assert_no_overlaps(&rects, "sprint board");
    let glossary = Glossary::new();
    let svg = render_svg(&layout, &theme, &TermHighlighter::new(None, &glossary));
    assert_valid_svg(&svg, "sprint board");
    assert!(svg.contains("Done (3)"));
    assert!(svg.contains("#1F8A70"));
    assert!(svg.contains("(2 pts)"));
}
