//! Project management commands for CLI.

use bizplanner_core::planner::Project;
use bizplanner_core::storage::PlannerDb;
use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use super::parse_datetime;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Deadline (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Budget
        #[arg(long, default_value = "0")]
        budget: f64,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List projects (newest first)
    List,
    /// Get project details with its tasks in display order
    Get {
        /// Project ID
        id: String,
    },
    /// Update a project
    Update {
        /// Project ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New deadline (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// New budget
        #[arg(long)]
        budget: Option<f64>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a project and its tasks
    Delete {
        /// Project ID
        id: String,
    },
}

pub fn run(action: ProjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ProjectAction::Create {
            name,
            deadline,
            budget,
            notes,
        } => {
            let profile = db.require_profile()?;
            let project = Project {
                id: Uuid::new_v4().to_string(),
                name,
                deadline: deadline.as_deref().map(parse_datetime).transpose()?,
                budget,
                notes,
                tasks: Vec::new(),
                profile_id: profile.id,
                created_at: Utc::now(),
            };
            db.create_project(&project)?;
            println!("Project created: {}", project.id);
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::List => {
            let projects = db.list_projects()?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        ProjectAction::Get { id } => match db.get_project_with_tasks(&id)? {
            Some(project) => {
                let (completed, total) = db.project_task_counts(&id)?;
                println!("Tasks completed: {completed}/{total}");
                println!("{}", serde_json::to_string_pretty(&project)?);
            }
            None => println!("Project not found: {id}"),
        },
        ProjectAction::Update {
            id,
            name,
            deadline,
            budget,
            notes,
        } => {
            let mut project = db
                .get_project(&id)?
                .ok_or(format!("Project not found: {id}"))?;

            if let Some(n) = name {
                project.name = n;
            }
            if let Some(d) = deadline {
                project.deadline = Some(parse_datetime(&d)?);
            }
            if let Some(b) = budget {
                project.budget = b;
            }
            if let Some(n) = notes {
                project.notes = Some(n);
            }

            db.update_project(&project)?;
            println!("Project updated:");
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::Delete { id } => {
            db.delete_project(&id)?;
            println!("Project deleted: {id}");
        }
    }
    Ok(())
}
