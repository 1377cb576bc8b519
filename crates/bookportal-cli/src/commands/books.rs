use anyhow::Result;
use bookportal_core::{BookFilters, CreateBook, UpdateBook};
use colored::Colorize;

use super::App;
use crate::cli::{BookCommands, BookListArgs};
use crate::output::{print_one, print_page, print_success};

const BOOKS_PATH: &str = "/books";

fn filters(args: &BookListArgs) -> BookFilters {
    BookFilters {
        title: args.title.clone(),
        author: args.author.clone(),
        isbn: args.isbn.clone(),
        created_by: args.created_by,
        exclude_created_by: args.exclude_created_by,
        ..BookFilters::page(args.paging.page, args.paging.limit)
    }
}

pub async fn run(app: &App, command: &BookCommands) -> Result<()> {
    app.ensure_allowed(BOOKS_PATH)?;
    let books = app.portal.books();
    match command {
        BookCommands::List(args) => {
            let page = books.list(&filters(args)).await?;
            print_page(&page.data, app.format)
        }
        BookCommands::Get(args) => {
            let book = books.get(args.id).await?;
            print_one(&book.data, app.format)
        }
        BookCommands::Create(args) => {
            let book = books
                .create(&CreateBook {
                    title: args.title.clone(),
                    author: args.author.clone(),
                    isbn: args.isbn.clone(),
                })
                .await?;
            print_success(&format!("Added \"{}\" (#{})", book.title.cyan(), book.id));
            print_one(&book, app.format)
        }
        BookCommands::Update(args) => {
            let book = books
                .update(
                    args.id,
                    &UpdateBook {
                        title: args.title.clone(),
                        author: args.author.clone(),
                        isbn: args.isbn.clone(),
                    },
                )
                .await?;
            print_success(&format!("Updated book #{}", book.id));
            print_one(&book, app.format)
        }
        BookCommands::Delete(args) => {
            let response = books.delete(args.id).await?;
            print_success(
                response
                    .message
                    .as_deref()
                    .unwrap_or(&format!("Deleted book #{}", args.id)),
            );
            Ok(())
        }
        BookCommands::BulkDelete(args) => {
            app.ensure_allowed(&app.admin_path("books"))?;
            let response = books.bulk_delete(&args.ids).await?;
            print_success(
                response
                    .message
                    .as_deref()
                    .unwrap_or(&format!("Deleted {} books", args.ids.len())),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PageArgs;
    use bookportal_core::ListFilter;

    #[test]
    fn test_list_args_become_filters() {
        let args = BookListArgs {
            title: Some("Dune".into()),
            author: None,
            isbn: None,
            created_by: None,
            exclude_created_by: Some(3),
            paging: PageArgs { page: 2, limit: 5 },
        };
        assert_eq!(
            filters(&args).to_query_string(),
            "title=Dune&page=2&limit=5&excludeCreatedBy=3"
        );
    }
}
