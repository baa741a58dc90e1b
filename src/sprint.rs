//! Sprint Kanban boards: status columns, role lanes and point metrics.

use serde::{Deserialize, Serialize};

use crate::ir::{Arrangement, Diagram, DiagramNode};
use crate::theme::Theme;

/// Columns every board shows, in this order, even when empty.
pub const STATUS_ORDER: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Card colours for the roles a migration team usually staffs.
pub const ROLE_COLORS: [(&str, &str); 4] = [
    ("Project Coordinator", "#2B5D8A"),
    ("Cloud Engineer", "#16789B"),
    ("Security Engineer", "#1F8A70"),
    ("Client IT Lead", "#4C6A88"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintTask {
    pub title: String,
    pub role: String,
    pub points: u32,
    pub status: String,
}

impl SprintTask {
    pub fn new(title: &str, role: &str, points: u32, status: &str) -> Self {
        Self {
            title: title.to_string(),
            role: role.to_string(),
            points,
            status: status.to_string(),
        }
    }

    fn card_line(&self) -> String {
        format!("{} ({} pts)", self.title, self.points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SprintMetrics {
    pub total_points: u32,
    pub done_points: u32,
    /// Share of points marked `Done`, as a percentage with one decimal.
    pub completion_rate: f64,
    pub in_progress: usize,
}

impl SprintMetrics {
    pub fn from_tasks(tasks: &[SprintTask]) -> Self {
        let total_points: u32 = tasks.iter().map(|task| task.points).sum();
        let done_points: u32 = tasks
            .iter()
            .filter(|task| task.status == "Done")
            .map(|task| task.points)
            .sum();
        let completion_rate = if total_points == 0 {
            0.0
        } else {
            (f64::from(done_points) / f64::from(total_points) * 1000.0).round() / 10.0
        };
        Self {
            total_points,
            done_points,
            completion_rate,
            in_progress: tasks
                .iter()
                .filter(|task| task.status == "In Progress")
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintBoard {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<SprintTask>,
}

impl SprintBoard {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: SprintTask) -> Self {
        self.tasks.push(task);
        self
    }

    /// The fixed columns, then any other status in the order tasks first use it.
    pub fn statuses(&self) -> Vec<&str> {
        let mut statuses: Vec<&str> = STATUS_ORDER.to_vec();
        for task in &self.tasks {
            if !statuses.contains(&task.status.as_str()) {
                statuses.push(&task.status);
            }
        }
        statuses
    }

    /// Roles in the order tasks first mention them.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        for task in &self.tasks {
            if !roles.contains(&task.role.as_str()) {
                roles.push(&task.role);
            }
        }
        roles
    }

    pub fn metrics(&self) -> SprintMetrics {
        SprintMetrics::from_tasks(&self.tasks)
    }

    /// Lays the board out as a grid: one column per status headed with its
    /// card count, one lane per role. Tasks sharing a role and status stack as
    /// lines of a single card, in declaration order.
    pub fn to_grid_diagram(&self) -> Diagram {
        let statuses = self.statuses();
        let roles = self.roles();
        let columns: Vec<String> = statuses
            .iter()
            .map(|status| {
                let count = self.tasks.iter().filter(|t| t.status == *status).count();
                format!("{status} ({count})")
            })
            .collect();

        let mut nodes = Vec::new();
        for (status, column) in statuses.iter().zip(&columns) {
            for role in &roles {
                let lines: Vec<String> = self
                    .tasks
                    .iter()
                    .filter(|t| t.status == *status && t.role == *role)
                    .map(SprintTask::card_line)
                    .collect();
                if lines.is_empty() {
                    continue;
                }
                nodes.push(
                    DiagramNode::new(&format!("{status} / {role}"), lines)
                        .with_category(role)
                        .in_cell(column, role),
                );
            }
        }

        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let mut diagram = Diagram::grid(&column_refs, &roles, nodes);
        diagram.title = Some(self.name.clone());
        diagram
    }

    /// One swatch per known role, then any other role on this board.
    pub fn legend_diagram(&self) -> Diagram {
        let mut roles: Vec<&str> = ROLE_COLORS.iter().map(|(role, _)| *role).collect();
        for role in self.roles() {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        let mut diagram = Diagram::new(Arrangement::Sequence);
        diagram.title = Some("Role Color Legend".to_string());
        diagram.nodes = roles
            .into_iter()
            .map(|role| DiagramNode::labeled(role).with_category(role))
            .collect();
        diagram
    }
}

/// Adds the role colours to `theme`, keeping any fill the theme already sets.
pub fn apply_role_colors(theme: &mut Theme) {
    for (role, color) in ROLE_COLORS {
        theme
            .category_fills
            .entry(role.to_string())
            .or_insert_with(|| color.to_string());
    }
}
