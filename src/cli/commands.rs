//! Command handlers.
//!
//! The CLI is the validating layer: unknown ids are reported here as
//! errors, while the store itself treats them as no-ops.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::args::*;
use crate::error::StoreError;
use crate::storage::models::*;
use crate::storage::PersistedState;
use crate::store::{SkillQuery, SkillStore, TodoQuery};

/// Facts about the environment a command runs in.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub slot_path: PathBuf,
    /// Whether the state file existed before the store was opened.
    pub slot_existed: bool,
}

/// Execute one command against the store, writing user output to `out`.
pub fn run(command: Command, store: &mut SkillStore, ctx: &RunContext, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Init(args) => run_init(args, store, ctx, out),
        Command::Seed => run_seed(store, out),
        Command::Skill(cmd) => run_skill(cmd, store, out),
        Command::Checkin(args) => run_checkin(args, store, out),
        Command::Streak(args) => run_streak(args, store, out),
        Command::Todo(cmd) => run_todo(cmd, store, out),
        Command::Milestone(cmd) => run_milestone(cmd, store, out),
        Command::Resource(cmd) => run_resource(cmd, store, out),
        Command::Category(cmd) => run_category(cmd, store, out),
        Command::Log(args) => run_log(args, store, out),
        Command::Stats(args) => run_stats(args, store, out),
        Command::Export(args) => run_export(args, store, out),
        Command::Import(args) => run_import(args, store, out),
    }
}

fn run_init(args: InitArgs, store: &mut SkillStore, ctx: &RunContext, out: &mut dyn Write) -> Result<()> {
    if ctx.slot_existed && !args.force {
        writeln!(out, "Already initialized: {}", ctx.slot_path.display())?;
        return Ok(());
    }

    if args.force {
        store.import_state(PersistedState::default());
    }
    store.flush().context("Failed to write initial state")?;
    writeln!(out, "Initialized skill tracker at {}", ctx.slot_path.display())?;
    Ok(())
}

fn run_seed(store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    match store.seed_sample_data() {
        0 => writeln!(out, "Skills already present; sample data not loaded.")?,
        n => writeln!(out, "Loaded {n} sample skills.")?,
    }
    Ok(())
}

// ========== Skills ==========

fn run_skill(cmd: SkillCommand, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    match cmd {
        SkillCommand::Add(args) => {
            let category = match args.category {
                Some(id) => require_category(store, &id)?.id,
                None => String::new(),
            };
            let skill = store.add_skill(NewSkill {
                title: args.title,
                description: args.description,
                category,
                status: args.status,
                progress: args.progress,
                target_date: args.target_date,
                tags: args.tags,
                ..NewSkill::default()
            });
            writeln!(out, "Added skill {}: {}", skill.id, skill.title)?;
        }
        SkillCommand::List(args) => {
            if let Some(id) = &args.category {
                require_category(store, id)?;
            }
            let skills = store.search_skills(&SkillQuery {
                text: args.search,
                status: args.status,
                category: args.category,
            });
            for skill in &skills {
                let category = store
                    .category(&skill.category)
                    .map(|c| format!(" [{}]", c.name))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{}  {:<9}  {:>3}%  {}{}",
                    skill.id, skill.status, skill.progress, skill.title, category
                )?;
            }
            writeln!(out, "Showing {} of {} skills", skills.len(), store.skills().len())?;
        }
        SkillCommand::Show(args) => {
            let skill = require_skill(store, &args.skill_id)?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&skill)?)?;
            } else {
                print_skill(store, &skill, out)?;
            }
        }
        SkillCommand::Update(args) => {
            require_skill(store, &args.skill_id)?;
            if let Some(id) = &args.category {
                require_category(store, id)?;
            }
            let target_date = if args.clear_target_date {
                Some(None)
            } else {
                args.target_date.map(Some)
            };
            let updates = SkillUpdate {
                title: args.title,
                description: args.description,
                category: args.category,
                status: args.status,
                progress: args.progress,
                target_date,
                tags: args.tags,
                ..SkillUpdate::default()
            };
            if updates.is_empty() {
                writeln!(out, "Nothing to update.")?;
                return Ok(());
            }
            store.update_skill(&args.skill_id, updates);
            writeln!(out, "Updated skill {}", args.skill_id)?;
        }
        SkillCommand::Delete(args) => {
            let skill = require_skill(store, &args.skill_id)?;
            store.delete_skill(&skill.id);
            writeln!(out, "Deleted skill {}: {}", skill.id, skill.title)?;
        }
    }
    Ok(())
}

fn print_skill(store: &SkillStore, skill: &Skill, out: &mut dyn Write) -> Result<()> {
    let category = store
        .category(&skill.category)
        .map(|c| c.name)
        .unwrap_or_else(|| "-".to_string());

    writeln!(out, "{}", skill.title)?;
    writeln!(out, "  id:          {}", skill.id)?;
    if !skill.description.is_empty() {
        writeln!(out, "  description: {}", skill.description)?;
    }
    writeln!(out, "  category:    {category}")?;
    writeln!(out, "  status:      {}", skill.status.label())?;
    writeln!(out, "  progress:    {}%", skill.progress)?;
    if let Some(target) = skill.target_date {
        writeln!(out, "  target:      {target}")?;
    }
    if !skill.tags.is_empty() {
        writeln!(out, "  tags:        {}", skill.tags.join(", "))?;
    }
    writeln!(out, "  streak:      {} days", store.get_streak(&skill.id))?;
    writeln!(out, "  practiced:   {} days total", store.get_total_practice_days(&skill.id))?;

    if !skill.milestones.is_empty() {
        let done = skill.milestones.iter().filter(|m| m.completed).count();
        writeln!(out, "  milestones ({done}/{}):", skill.milestones.len())?;
        for m in &skill.milestones {
            writeln!(out, "    [{}] {}  {}", check(m.completed), m.id, m.title)?;
        }
    }
    if !skill.todos.is_empty() {
        writeln!(out, "  todos:")?;
        for t in &skill.todos {
            let due = t.due_date.map(|d| format!(" due {d}")).unwrap_or_default();
            writeln!(out, "    [{}] {}  {} ({}){due}", check(t.completed), t.id, t.title, t.priority)?;
        }
    }
    if !skill.resources.is_empty() {
        writeln!(out, "  resources:")?;
        for r in &skill.resources {
            writeln!(out, "    {}  {} <{}> ({})", r.id, r.title, r.url, r.kind)?;
        }
    }
    Ok(())
}

fn check(done: bool) -> char {
    if done {
        'x'
    } else {
        ' '
    }
}

// ========== Daily progress ==========

fn run_checkin(args: CheckinArgs, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    let skill = require_skill(store, &args.skill_id)?;
    let date = args.date.unwrap_or_else(|| store.today());

    store.toggle_daily_progress(&skill.id, date, args.notes);

    if store.get_daily_progress_for_date(&skill.id, date) {
        writeln!(
            out,
            "Marked {} practiced on {date} (streak: {})",
            skill.title,
            store.get_streak(&skill.id)
        )?;
    } else {
        writeln!(out, "Unmarked {} on {date}", skill.title)?;
    }
    Ok(())
}

fn run_streak(args: SkillIdArg, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    let skill = require_skill(store, &args.skill_id)?;
    writeln!(
        out,
        "{}: {} day streak, {} days practiced",
        skill.title,
        store.get_streak(&skill.id),
        store.get_total_practice_days(&skill.id)
    )?;
    Ok(())
}

// ========== Todos ==========

fn run_todo(cmd: TodoCommand, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    match cmd {
        TodoCommand::Add(args) => {
            let todo = store
                .add_todo(
                    &args.skill_id,
                    NewTodo {
                        title: args.title,
                        priority: args.priority,
                        due_date: args.due,
                    },
                )
                .ok_or_else(|| StoreError::SkillNotFound(args.skill_id.clone()))?;
            writeln!(out, "Added todo {}: {}", todo.id, todo.title)?;
        }
        TodoCommand::List(args) => {
            let entries = store.filter_todos(&TodoQuery {
                state: args.state,
                priority: args.priority,
                skill_id: args.skill,
                text: args.search,
                sort: args.sort,
            });
            for entry in &entries {
                let todo = &entry.todo;
                let due = todo.due_date.map(|d| format!(" due {d}")).unwrap_or_default();
                writeln!(
                    out,
                    "[{}] {}  {:<6}  {}  ({}){due}",
                    check(todo.completed),
                    todo.id,
                    todo.priority,
                    todo.title,
                    entry.skill_title
                )?;
            }
            let stats = store.todo_stats();
            writeln!(
                out,
                "{} total, {} active, {} completed, {} high priority, {} overdue",
                stats.total, stats.active, stats.completed, stats.high_priority, stats.overdue
            )?;
        }
        TodoCommand::Toggle(args) => {
            let todo = require_todo(store, &args.skill_id, &args.todo_id)?;
            store.toggle_todo(&args.skill_id, &args.todo_id);
            let state = if todo.completed { "Reopened" } else { "Completed" };
            writeln!(out, "{state} todo: {}", todo.title)?;
        }
        TodoCommand::Update(args) => {
            require_todo(store, &args.skill_id, &args.todo_id)?;
            let due_date = if args.clear_due {
                Some(None)
            } else {
                args.due.map(Some)
            };
            store.update_todo(
                &args.skill_id,
                &args.todo_id,
                TodoUpdate {
                    title: args.title,
                    priority: args.priority,
                    due_date,
                },
            );
            writeln!(out, "Updated todo {}", args.todo_id)?;
        }
        TodoCommand::Delete(args) => {
            let todo = require_todo(store, &args.skill_id, &args.todo_id)?;
            store.delete_todo(&args.skill_id, &args.todo_id);
            writeln!(out, "Deleted todo: {}", todo.title)?;
        }
    }
    Ok(())
}

// ========== Milestones and resources ==========

fn run_milestone(cmd: MilestoneCommand, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    match cmd {
        MilestoneCommand::Add(args) => {
            let milestone = store
                .add_milestone(
                    &args.skill_id,
                    NewMilestone {
                        title: args.title,
                        description: args.description,
                    },
                )
                .ok_or_else(|| StoreError::SkillNotFound(args.skill_id.clone()))?;
            writeln!(out, "Added milestone {}: {}", milestone.id, milestone.title)?;
        }
        MilestoneCommand::Toggle(args) => {
            let milestone = require_milestone(store, &args.skill_id, &args.milestone_id)?;
            store.toggle_milestone(&args.skill_id, &args.milestone_id);
            let state = if milestone.completed { "Reopened" } else { "Completed" };
            writeln!(out, "{state} milestone: {}", milestone.title)?;
        }
        MilestoneCommand::Delete(args) => {
            let milestone = require_milestone(store, &args.skill_id, &args.milestone_id)?;
            store.delete_milestone(&args.skill_id, &args.milestone_id);
            writeln!(out, "Deleted milestone: {}", milestone.title)?;
        }
    }
    Ok(())
}

fn run_resource(cmd: ResourceCommand, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    match cmd {
        ResourceCommand::Add(args) => {
            let resource = store
                .add_resource(
                    &args.skill_id,
                    NewResource {
                        title: args.title,
                        url: args.url,
                        kind: args.kind,
                    },
                )
                .ok_or_else(|| StoreError::SkillNotFound(args.skill_id.clone()))?;
            writeln!(out, "Added resource {}: {}", resource.id, resource.title)?;
        }
        ResourceCommand::Delete(args) => {
            let skill = require_skill(store, &args.skill_id)?;
            let resource = skill
                .resources
                .iter()
                .find(|r| r.id == args.resource_id)
                .cloned()
                .ok_or_else(|| StoreError::ResourceNotFound {
                    skill_id: args.skill_id.clone(),
                    resource_id: args.resource_id.clone(),
                })?;
            store.delete_resource(&args.skill_id, &args.resource_id);
            writeln!(out, "Deleted resource: {}", resource.title)?;
        }
    }
    Ok(())
}

// ========== Categories ==========

fn run_category(cmd: CategoryCommand, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    match cmd {
        CategoryCommand::Add(args) => {
            let category = store.add_category(NewCategory {
                name: args.name,
                icon: args.icon,
                color: args.color,
                description: args.description,
            });
            writeln!(out, "Added category {}: {}", category.id, category.name)?;
        }
        CategoryCommand::List => {
            for category in store.categories() {
                let count = store.get_skills_by_category(&category.id).len();
                writeln!(
                    out,
                    "{:<36}  {:<22}  {:>3} skills  {} {}",
                    category.id, category.name, count, category.icon, category.color
                )?;
            }
        }
        CategoryCommand::Update(args) => {
            require_category(store, &args.category_id)?;
            store.update_category(
                &args.category_id,
                CategoryUpdate {
                    name: args.name,
                    icon: args.icon,
                    color: args.color,
                    description: args.description,
                },
            );
            writeln!(out, "Updated category {}", args.category_id)?;
        }
        CategoryCommand::Delete(args) => {
            let category = require_category(store, &args.category_id)?;
            let orphaned = store.get_skills_by_category(&category.id).len();
            store.delete_category(&category.id);
            writeln!(out, "Deleted category {}: {}", category.id, category.name)?;
            if orphaned > 0 {
                writeln!(out, "{orphaned} skills still reference it and will show no category.")?;
            }
        }
    }
    Ok(())
}

// ========== Reporting ==========

fn run_log(args: LogArgs, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    for log in store.recent_activity(args.limit) {
        writeln!(
            out,
            "{}  {:<19}  {}",
            log.timestamp.format("%Y-%m-%d %H:%M"),
            log.action,
            log.description
        )?;
    }
    Ok(())
}

fn run_stats(args: StatsArgs, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    let stats = store.stats();
    if args.json {
        let value = serde_json::json!({
            "skills": stats,
            "categories": store.category_breakdown(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "Total skills:     {}", stats.total)?;
    for status in SkillStatus::ALL {
        writeln!(out, "  {:<15} {}", format!("{}:", status.label()), stats.count(status))?;
    }
    writeln!(out, "Average progress: {}%", stats.average_progress)?;

    let breakdown = store.category_breakdown();
    if !breakdown.is_empty() {
        writeln!(out, "By category:")?;
        for row in breakdown {
            writeln!(out, "  {:<22} {}", row.name, row.count)?;
        }
    }

    let recent = store.recent_activity(5);
    if !recent.is_empty() {
        writeln!(out, "Recent activity:")?;
        for log in recent {
            writeln!(out, "  {}", log.description)?;
        }
    }
    Ok(())
}

fn run_export(args: ExportArgs, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    let json = store.export_state().to_json()?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            writeln!(out, "Exported to {}", path.display())?;
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

fn run_import(args: ImportArgs, store: &mut SkillStore, out: &mut dyn Write) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read import: {}", args.file.display()))?;
    let state = PersistedState::from_json(&contents).map_err(|source| StoreError::MalformedState {
        path: args.file.clone(),
        source,
    })?;

    let (skills, categories) = (state.skills.len(), state.categories.len());
    store.import_state(state);
    writeln!(out, "Imported {skills} skills and {categories} categories.")?;
    Ok(())
}

// ========== Lookups ==========

fn require_skill(store: &SkillStore, id: &str) -> Result<Skill, StoreError> {
    store
        .skill(id)
        .ok_or_else(|| StoreError::SkillNotFound(id.to_string()))
}

fn require_category(store: &SkillStore, id: &str) -> Result<Category, StoreError> {
    store
        .category(id)
        .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))
}

fn require_todo(store: &SkillStore, skill_id: &str, todo_id: &str) -> Result<Todo, StoreError> {
    require_skill(store, skill_id)?
        .todos
        .into_iter()
        .find(|t| t.id == todo_id)
        .ok_or_else(|| StoreError::TodoNotFound {
            skill_id: skill_id.to_string(),
            todo_id: todo_id.to_string(),
        })
}

fn require_milestone(store: &SkillStore, skill_id: &str, milestone_id: &str) -> Result<Milestone, StoreError> {
    require_skill(store, skill_id)?
        .milestones
        .into_iter()
        .find(|m| m.id == milestone_id)
        .ok_or_else(|| StoreError::MilestoneNotFound {
            skill_id: skill_id.to_string(),
            milestone_id: milestone_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemorySlot;
    use chrono::NaiveDate;
    use clap::Parser;

    fn setup() -> SkillStore {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        SkillStore::open(MemorySlot::new(), FixedClock::on(today)).unwrap()
    }

    fn exec(store: &mut SkillStore, argv: &[&str]) -> Result<String> {
        let mut full = vec!["skill-tracker"];
        full.extend_from_slice(argv);
        let cli = Cli::try_parse_from(full)?;
        let ctx = RunContext {
            slot_path: PathBuf::from("/tmp/state.json"),
            slot_existed: false,
        };
        let mut out = Vec::new();
        run(cli.command, store, &ctx, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn added_id(output: &str) -> String {
        output
            .split_whitespace()
            .nth(2)
            .unwrap()
            .trim_end_matches(':')
            .to_string()
    }

    #[test]
    fn test_skill_add_and_show() {
        let mut store = setup();
        let out = exec(&mut store, &["skill", "add", "Rust", "--category", "1", "--tag", "systems"]).unwrap();
        assert!(out.starts_with("Added skill "));
        let id = added_id(&out);

        let shown = exec(&mut store, &["skill", "show", &id]).unwrap();
        assert!(shown.contains("Rust"));
        assert!(shown.contains("Programming Languages"));
        assert!(shown.contains("systems"));
        assert!(shown.contains("streak:      0 days"));
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let mut store = setup();
        let err = exec(&mut store, &["skill", "show", "nope"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::SkillNotFound(id)) if id == "nope"
        ));

        let err = exec(&mut store, &["skill", "add", "Rust", "--category", "nope"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::CategoryNotFound(_))
        ));
        assert!(store.skills().is_empty());
    }

    #[test]
    fn test_checkin_toggles() {
        let mut store = setup();
        let id = added_id(&exec(&mut store, &["skill", "add", "Piano"]).unwrap());

        let out = exec(&mut store, &["checkin", &id]).unwrap();
        assert_eq!(out.trim(), "Marked Piano practiced on 2024-06-10 (streak: 1)");

        let out = exec(&mut store, &["checkin", &id, "--date", "2024-06-09"]).unwrap();
        assert!(out.contains("(streak: 2)"));

        let out = exec(&mut store, &["checkin", &id]).unwrap();
        assert_eq!(out.trim(), "Unmarked Piano on 2024-06-10");

        let out = exec(&mut store, &["streak", &id]).unwrap();
        assert_eq!(out.trim(), "Piano: 1 day streak, 1 days practiced");
    }

    #[test]
    fn test_todo_flow() {
        let mut store = setup();
        let skill_id = added_id(&exec(&mut store, &["skill", "add", "Rust"]).unwrap());
        let out = exec(&mut store, &["todo", "add", &skill_id, "Read", "--priority", "high"]).unwrap();
        let todo_id = added_id(&out);

        let out = exec(&mut store, &["todo", "toggle", &skill_id, &todo_id]).unwrap();
        assert_eq!(out.trim(), "Completed todo: Read");

        let out = exec(&mut store, &["todo", "list", "--state", "all"]).unwrap();
        assert!(out.contains("[x]"));
        assert!(out.contains("1 total, 0 active, 1 completed"));

        let err = exec(&mut store, &["todo", "delete", &skill_id, "missing"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::TodoNotFound { .. })
        ));
    }

    #[test]
    fn test_update_status_logs() {
        let mut store = setup();
        let id = added_id(&exec(&mut store, &["skill", "add", "Rust"]).unwrap());
        exec(&mut store, &["skill", "update", &id, "--status", "mastered"]).unwrap();

        let out = exec(&mut store, &["log"]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("status_changed"));
        assert!(lines[0].contains("Changed status to: mastered"));
    }

    #[test]
    fn test_empty_update_is_reported() {
        let mut store = setup();
        let id = added_id(&exec(&mut store, &["skill", "add", "Rust"]).unwrap());
        let out = exec(&mut store, &["skill", "update", &id]).unwrap();
        assert_eq!(out.trim(), "Nothing to update.");
    }

    #[test]
    fn test_stats_json() {
        let mut store = setup();
        exec(&mut store, &["seed"]).unwrap();
        let out = exec(&mut store, &["stats", "--json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["skills"]["total"], 6);
        assert_eq!(value["skills"]["averageProgress"], 43);
        assert_eq!(value["categories"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_init_respects_existing_slot() {
        let mut store = setup();
        let mut out = Vec::new();
        let ctx = RunContext {
            slot_path: PathBuf::from("/tmp/state.json"),
            slot_existed: true,
        };
        run(Command::Init(InitArgs { force: false }), &mut store, &ctx, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "Already initialized: /tmp/state.json");
    }
}
