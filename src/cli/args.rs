//! Command-line argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::storage::models::{Priority, ResourceType, SkillStatus};
use crate::store::{TodoSort, TodoState};

/// Personal skill-learning tracker with daily practice streaks.
#[derive(Parser, Debug)]
#[command(name = "skill-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the state file (overrides config and environment).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a YAML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and the initial state.
    Init(InitArgs),

    /// Load the sample skills into an empty tracker.
    Seed,

    /// Manage skills.
    #[command(subcommand)]
    Skill(SkillCommand),

    /// Toggle a practice check-in for a day (today by default).
    Checkin(CheckinArgs),

    /// Show the current practice streak of a skill.
    Streak(SkillIdArg),

    /// Manage todos.
    #[command(subcommand)]
    Todo(TodoCommand),

    /// Manage milestones of a skill.
    #[command(subcommand)]
    Milestone(MilestoneCommand),

    /// Manage resources of a skill.
    #[command(subcommand)]
    Resource(ResourceCommand),

    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Show the activity log, newest first.
    Log(LogArgs),

    /// Show dashboard statistics.
    Stats(StatsArgs),

    /// Write the full state as JSON.
    Export(ExportArgs),

    /// Replace the state with a JSON export.
    Import(ImportArgs),
}

/// Arguments for the init command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Reset to the default state even if a state file already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SkillIdArg {
    /// Skill ID.
    pub skill_id: String,
}

#[derive(Subcommand, Debug)]
pub enum SkillCommand {
    /// Add a new skill.
    Add(SkillAddArgs),
    /// List skills, optionally filtered.
    List(SkillListArgs),
    /// Show one skill in detail.
    Show(SkillShowArgs),
    /// Update fields of a skill.
    Update(SkillUpdateArgs),
    /// Delete a skill and its activity.
    Delete(SkillIdArg),
}

#[derive(Args, Debug)]
pub struct SkillAddArgs {
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Category ID.
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum, default_value_t = SkillStatus::ToLearn)]
    pub status: SkillStatus,

    /// Progress percentage, 0-100.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub progress: u8,

    /// Target date (YYYY-MM-DD).
    #[arg(long)]
    pub target_date: Option<NaiveDate>,

    /// Tag; repeat for several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SkillListArgs {
    #[arg(long, value_enum)]
    pub status: Option<SkillStatus>,

    /// Category ID.
    #[arg(long)]
    pub category: Option<String>,

    /// Case-insensitive text matched against title, description and tags.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct SkillShowArgs {
    pub skill_id: String,

    /// Print the skill as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SkillUpdateArgs {
    pub skill_id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Category ID.
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<SkillStatus>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub progress: Option<u8>,

    #[arg(long, conflicts_with = "clear_target_date")]
    pub target_date: Option<NaiveDate>,

    #[arg(long)]
    pub clear_target_date: bool,

    /// Replace the tags; repeat for several.
    #[arg(long = "tag")]
    pub tags: Option<Vec<String>>,
}

#[derive(Args, Debug)]
pub struct CheckinArgs {
    pub skill_id: String,

    /// Day to toggle (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    /// Add a todo to a skill.
    Add(TodoAddArgs),
    /// List todos across all skills.
    List(TodoListArgs),
    /// Toggle a todo between open and completed.
    Toggle(TodoRefArgs),
    /// Update a todo.
    Update(TodoUpdateArgs),
    /// Delete a todo.
    Delete(TodoRefArgs),
}

#[derive(Args, Debug)]
pub struct TodoAddArgs {
    pub skill_id: String,
    pub title: String,

    #[arg(long, value_enum, default_value_t = Priority::Medium)]
    pub priority: Priority,

    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct TodoListArgs {
    #[arg(long, value_enum, default_value_t = TodoState::Active)]
    pub state: TodoState,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Only todos of this skill.
    #[arg(long)]
    pub skill: Option<String>,

    /// Case-insensitive text matched against todo and skill titles.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = TodoSort::DueDate)]
    pub sort: TodoSort,
}

#[derive(Args, Debug)]
pub struct TodoRefArgs {
    pub skill_id: String,
    pub todo_id: String,
}

#[derive(Args, Debug)]
pub struct TodoUpdateArgs {
    pub skill_id: String,
    pub todo_id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Subcommand, Debug)]
pub enum MilestoneCommand {
    /// Add a milestone to a skill.
    Add(MilestoneAddArgs),
    /// Toggle a milestone between open and completed.
    Toggle(MilestoneRefArgs),
    /// Delete a milestone.
    Delete(MilestoneRefArgs),
}

#[derive(Args, Debug)]
pub struct MilestoneAddArgs {
    pub skill_id: String,
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct MilestoneRefArgs {
    pub skill_id: String,
    pub milestone_id: String,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    /// Attach a resource to a skill.
    Add(ResourceAddArgs),
    /// Remove a resource.
    Delete(ResourceRefArgs),
}

#[derive(Args, Debug)]
pub struct ResourceAddArgs {
    pub skill_id: String,
    pub title: String,

    #[arg(long, default_value = "")]
    pub url: String,

    #[arg(long = "type", value_enum, default_value_t = ResourceType::Other)]
    pub kind: ResourceType,
}

#[derive(Args, Debug)]
pub struct ResourceRefArgs {
    pub skill_id: String,
    pub resource_id: String,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Add a category.
    Add(CategoryAddArgs),
    /// List categories with skill counts.
    List,
    /// Update a category.
    Update(CategoryUpdateArgs),
    /// Delete a category. Skills keep their reference.
    Delete(CategoryIdArg),
}

#[derive(Args, Debug)]
pub struct CategoryAddArgs {
    pub name: String,

    #[arg(long, default_value = "Folder")]
    pub icon: String,

    #[arg(long, default_value = "#6b7280")]
    pub color: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct CategoryUpdateArgs {
    pub category_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct CategoryIdArg {
    pub category_id: String,
}

/// Arguments for the log command.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Number of entries to show.
    #[arg(long, short = 'n', default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Print the statistics as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file: a previous export or a browser storage dump.
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_skill_add() {
        let cli = Cli::try_parse_from([
            "skill-tracker",
            "skill",
            "add",
            "Rust",
            "--status",
            "to-learn",
            "--progress",
            "20",
            "--tag",
            "systems",
            "--tag",
            "lang",
            "--target-date",
            "2024-12-31",
        ])
        .unwrap();

        let Command::Skill(SkillCommand::Add(args)) = cli.command else {
            panic!("expected skill add");
        };
        assert_eq!(args.title, "Rust");
        assert_eq!(args.status, SkillStatus::ToLearn);
        assert_eq!(args.progress, 20);
        assert_eq!(args.tags, vec!["systems", "lang"]);
        assert_eq!(args.target_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_progress_out_of_range_rejected() {
        let result = Cli::try_parse_from(["skill-tracker", "skill", "add", "Rust", "--progress", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["skill-tracker", "stats", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
