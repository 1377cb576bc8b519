use std::path::PathBuf;

use bookportal_core::Role;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "bookportal")]
#[command(about = "Bookportal CLI: browse books, leave reviews, administer the portal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./bookportal.toml when present)
    #[arg(short, long, global = true, env = "BOOKPORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the configuration file)
    #[arg(short, long, global = true, env = "BOOKPORTAL_URL")]
    pub server: Option<String>,

    /// Session profile name
    #[arg(short, long, global = true, env = "BOOKPORTAL_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Sign out (removes the stored session)
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show or edit your profile
    Profile(ProfileArgs),
    /// Browse and manage books
    Books(BooksArgs),
    /// Browse and manage reviews
    Feedback(FeedbackArgs),
    /// Manage accounts (admin)
    Users(UsersArgs),
    /// Portal-wide counters (admin)
    Dashboard,
    /// Check where a portal path leads for the current session
    Open(OpenArgs),
    /// Inspect CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(long, env = "BOOKPORTAL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(long, env = "BOOKPORTAL_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
}

#[derive(clap::Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile as the server knows it
    Show,
    /// Change name or e-mail
    Update(ProfileUpdateArgs),
}

#[derive(clap::Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
}

#[derive(clap::Args, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(clap::Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(clap::Args)]
pub struct BulkArgs {
    /// Ids to delete
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<i64>,
}

#[derive(clap::Args)]
pub struct BooksArgs {
    #[command(subcommand)]
    pub command: BookCommands,
}

#[derive(Subcommand)]
pub enum BookCommands {
    /// List books
    List(BookListArgs),
    /// Show one book
    Get(IdArgs),
    /// Add a book
    Create(BookCreateArgs),
    /// Edit a book
    Update(BookUpdateArgs),
    /// Delete a book
    Delete(IdArgs),
    /// Delete several books
    BulkDelete(BulkArgs),
}

#[derive(clap::Args)]
pub struct BookListArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
    /// Only books added by this account
    #[arg(long)]
    pub created_by: Option<i64>,
    /// Hide books added by this account
    #[arg(long)]
    pub exclude_created_by: Option<i64>,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(clap::Args)]
pub struct BookCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub isbn: String,
}

#[derive(clap::Args)]
pub struct BookUpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
}

#[derive(clap::Args)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub command: FeedbackCommands,
}

#[derive(Subcommand)]
pub enum FeedbackCommands {
    /// List all reviews
    List(FeedbackListArgs),
    /// Reviews of one book
    Book(BookReviewsArgs),
    /// Your own reviews
    Mine(PageArgs),
    /// Rating summary of one book
    Stats(IdArgs),
    /// Show one review
    Get(IdArgs),
    /// Review a book
    Create(FeedbackCreateArgs),
    /// Edit your review
    Update(FeedbackEditArgs),
    /// Edit any review (admin)
    Moderate(FeedbackEditArgs),
    /// Delete a review
    Delete(IdArgs),
    /// Delete several reviews
    BulkDelete(BulkArgs),
}

#[derive(clap::Args)]
pub struct FeedbackListArgs {
    /// Free-text search over comments
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub rating: Option<u8>,
    #[arg(long)]
    pub book_id: Option<i64>,
    #[arg(long)]
    pub user_id: Option<i64>,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(clap::Args)]
pub struct BookReviewsArgs {
    pub book_id: i64,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(clap::Args)]
pub struct FeedbackCreateArgs {
    #[arg(long)]
    pub book_id: i64,
    /// 1 to 5
    #[arg(long)]
    pub rating: u8,
    #[arg(long)]
    pub comment: String,
}

#[derive(clap::Args)]
pub struct FeedbackEditArgs {
    pub id: i64,
    #[arg(long)]
    pub rating: Option<u8>,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(clap::Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List accounts
    List(UserListArgs),
    /// Show one account
    Get(IdArgs),
    /// Create an account
    Create(UserCreateArgs),
    /// Edit an account
    Update(UserUpdateArgs),
    /// Delete an account with its books and reviews
    Delete(IdArgs),
    /// Delete several accounts
    BulkDelete(BulkArgs),
}

#[derive(clap::Args)]
pub struct UserListArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub role: Option<Role>,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(clap::Args)]
pub struct UserCreateArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(long, env = "BOOKPORTAL_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub role: Option<Role>,
}

#[derive(clap::Args)]
pub struct UserUpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub role: Option<Role>,
}

#[derive(clap::Args)]
pub struct OpenArgs {
    /// Portal path, e.g. /admin/users
    pub path: String,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bookportal",
            "books",
            "list",
            "--title",
            "Dune",
            "--format",
            "json",
            "--profile",
            "admin",
        ])
        .unwrap();
        assert_eq!(cli.profile, "admin");
        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Commands::Books(BooksArgs {
            command: BookCommands::List(args),
        }) = cli.command
        else {
            panic!("expected books list");
        };
        assert_eq!(args.title.as_deref(), Some("Dune"));
        assert_eq!(args.paging.page, 1);
        assert_eq!(args.paging.limit, 10);
    }

    #[test]
    fn test_role_parses_case_insensitively() {
        let cli =
            Cli::try_parse_from(["bookportal", "users", "list", "--role", "ADMIN"]).unwrap();
        let Commands::Users(UsersArgs {
            command: UserCommands::List(args),
        }) = cli.command
        else {
            panic!("expected users list");
        };
        assert_eq!(args.role, Some(Role::Admin));
    }

    #[test]
    fn test_bulk_delete_requires_ids() {
        assert!(Cli::try_parse_from(["bookportal", "feedback", "bulk-delete"]).is_err());
        assert!(Cli::try_parse_from(["bookportal", "feedback", "bulk-delete", "1", "2"]).is_ok());
    }
}
