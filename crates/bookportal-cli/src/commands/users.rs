use anyhow::Result;
use bookportal_core::{CreateUser, UpdateUser, UserFilters};
use colored::Colorize;

use super::App;
use crate::cli::{UserCommands, UserListArgs};
use crate::output::{print_one, print_page, print_success};

fn filters(args: &UserListArgs) -> UserFilters {
    UserFilters {
        page: Some(args.paging.page),
        limit: Some(args.paging.limit),
        search: args.search.clone(),
        role: args.role,
    }
}

/// Account administration. Every subcommand needs an admin session.
pub async fn run(app: &App, command: &UserCommands) -> Result<()> {
    app.ensure_allowed(&app.admin_path("users"))?;
    let users = app.portal.users();
    match command {
        UserCommands::List(args) => {
            let page = users.list(&filters(args)).await?;
            print_page(&page.data, app.format)
        }
        UserCommands::Get(args) => {
            let user = users.get(args.id).await?;
            print_one(&user.data, app.format)
        }
        UserCommands::Create(args) => {
            let user = users
                .create(&CreateUser {
                    email: args.email.clone(),
                    password: args.password.clone(),
                    first_name: args.first_name.clone(),
                    last_name: args.last_name.clone(),
                    role: args.role,
                })
                .await?;
            print_success(&format!("Created account {} (#{})", user.email.cyan(), user.id));
            print_one(&user, app.format)
        }
        UserCommands::Update(args) => {
            let user = users
                .update(
                    args.id,
                    &UpdateUser {
                        email: args.email.clone(),
                        first_name: args.first_name.clone(),
                        last_name: args.last_name.clone(),
                        role: args.role,
                    },
                )
                .await?;
            print_success(&format!("Updated account #{}", user.id));
            print_one(&user, app.format)
        }
        UserCommands::Delete(args) => {
            let response = users.delete(args.id).await?;
            print_success(
                response
                    .message
                    .as_deref()
                    .unwrap_or(&format!("Deleted account #{}", args.id)),
            );
            Ok(())
        }
        UserCommands::BulkDelete(args) => {
            let response = users.bulk_delete(&args.ids).await?;
            print_success(
                response
                    .message
                    .as_deref()
                    .unwrap_or(&format!("Deleted {} accounts", args.ids.len())),
            );
            Ok(())
        }
    }
}
