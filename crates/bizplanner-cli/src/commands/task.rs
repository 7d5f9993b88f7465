//! Task management commands for CLI.

use bizplanner_core::notify;
use bizplanner_core::planner::Task;
use bizplanner_core::storage::PlannerDb;
use bizplanner_core::{Ledger, Prefs};
use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use super::parse_datetime;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task name
        name: String,
        /// Project ID the task belongs to
        #[arg(long)]
        project_id: String,
        /// Deadline (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Estimated hours
        #[arg(long, default_value = "0")]
        estimated_hours: i32,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks of this project, in display order
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Toggle completion (completing pays the coin reward)
    Toggle {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New deadline (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// New estimated hours
        #[arg(long)]
        estimated_hours: Option<i32>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TaskAction::Create {
            name,
            project_id,
            deadline,
            estimated_hours,
            notes,
        } => {
            db.get_project(&project_id)?
                .ok_or(format!("Project not found: {project_id}"))?;

            let task = Task {
                id: Uuid::new_v4().to_string(),
                name,
                deadline: deadline.as_deref().map(parse_datetime).transpose()?,
                estimated_hours,
                notes,
                completed: false,
                completed_at: None,
                project_id,
                created_at: Utc::now(),
            };
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);

            let prefs = Prefs::load_or_default();
            if prefs.notifications_enabled {
                if let Some(reminder) = notify::task_deadline_reminder(&task, Utc::now()) {
                    println!("Deadline reminder planned:");
                    println!("{}", serde_json::to_string_pretty(&reminder)?);
                }
            }
        }
        TaskAction::List { project_id } => {
            let tasks = match project_id {
                Some(pid) => db.tasks_for_project(&pid)?,
                None => db.list_tasks()?,
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => match db.get_task(&id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Toggle { id } => {
            let mut ledger = Ledger::new(&db);
            let task = ledger.toggle_task_completion(&id)?;

            if task.completed {
                println!("Task completed: {id}");
                println!("Reminder cancelled: {}", notify::task_reminder_id(&id));
            } else {
                println!("Task reopened: {id}");
            }
            for event in ledger.take_events() {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        TaskAction::Update {
            id,
            name,
            deadline,
            estimated_hours,
            notes,
        } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;

            if let Some(n) = name {
                task.name = n;
            }
            if let Some(d) = deadline {
                task.deadline = Some(parse_datetime(&d)?);
            }
            if let Some(e) = estimated_hours {
                task.estimated_hours = e;
            }
            if let Some(n) = notes {
                task.notes = Some(n);
            }

            db.update_task(&task)?;
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            db.delete_task(&id)?;
            println!("Task deleted: {id}");
            println!("Reminder cancelled: {}", notify::task_reminder_id(&id));
        }
    }
    Ok(())
}
