use anyhow::Result;
use bookportal_core::{Book, Feedback, Paginated, Principal, User};
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

/// One line of a listing table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl TableRow for Book {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Author", "ISBN", "Added by", "Updated"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author.clone(),
            self.isbn.clone(),
            self.creator
                .as_ref()
                .map(|c| format!("{} {}", c.first_name, c.last_name))
                .unwrap_or_else(|| format!("#{}", self.created_by)),
            self.updated_at.date().to_string(),
        ]
    }
}

impl TableRow for Feedback {
    const HEADERS: &'static [&'static str] = &["ID", "Book", "Rating", "Comment", "By", "Updated"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.book
                .as_ref()
                .map(|b| b.title.clone())
                .unwrap_or_else(|| format!("#{}", self.book_id)),
            stars(self.rating),
            truncate(&self.comment, 48),
            self.user
                .as_ref()
                .map(|u| format!("{} {}", u.first_name, u.last_name))
                .unwrap_or_else(|| format!("#{}", self.user_id)),
            self.updated_at.date().to_string(),
        ]
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "Email", "Name", "Role", "Created"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            format!("{} {}", self.first_name, self.last_name),
            self.role.to_string(),
            self.created_at
                .map(|t| t.date().to_string())
                .unwrap_or_else(|| "-".into()),
        ]
    }
}

impl TableRow for Principal {
    const HEADERS: &'static [&'static str] = &["ID", "Email", "Name", "Role"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            self.full_name(),
            self.role.to_string(),
        ]
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_page<T: TableRow + Serialize>(page: &Paginated<T>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            if page.is_empty() {
                println!("Nothing found.");
                return Ok(());
            }
            println!("{}", render_table(&page.data));
            println!(
                "Page {} of {} ({} total)",
                page.page,
                page.total_pages.max(1),
                page.total
            );
            Ok(())
        }
    }
}

pub fn print_one<T: TableRow + Serialize>(item: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(item),
        OutputFormat::Table => {
            for (header, value) in T::HEADERS.iter().zip(item.row()) {
                println!("{:>10}: {}", header.cyan(), value);
            }
            Ok(())
        }
    }
}

pub fn render_table<T: TableRow>(items: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::HEADERS.iter().copied());
    for item in items {
        builder.push_record(item.row());
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg.red());
}

pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookportal_core::Role;

    fn user(id: i64) -> User {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "email": format!("u{id}@example.com"),
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "admin"
        }))
        .unwrap()
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééé", 4), "ééé…");
    }

    #[test]
    fn test_user_row() {
        let row = user(4).row();
        assert_eq!(row.len(), User::HEADERS.len());
        assert_eq!(row[2], "Ada Lovelace");
        assert_eq!(row[3], Role::Admin.to_string());
        assert_eq!(row[4], "-");
    }

    #[test]
    fn test_table_contains_every_row() {
        let table = render_table(&[user(1), user(2)]);
        assert!(table.contains("u1@example.com"));
        assert!(table.contains("u2@example.com"));
        assert!(table.contains("Email"));
    }
}
