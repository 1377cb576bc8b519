use anyhow::Result;
use bookportal_core::{
    CreateFeedback, FeedbackFilters, ModerateFeedback, PageRequest, UpdateFeedback,
};
use colored::Colorize;

use super::App;
use crate::cli::{FeedbackCommands, FeedbackListArgs, OutputFormat};
use crate::output::{print_json, print_one, print_page, print_success, stars};

const FEEDBACK_PATH: &str = "/feedback";

fn filters(args: &FeedbackListArgs) -> FeedbackFilters {
    FeedbackFilters {
        search: args.search.clone(),
        rating: args.rating,
        book_id: args.book_id,
        user_id: args.user_id,
        ..FeedbackFilters::page(args.paging.page, args.paging.limit)
    }
}

pub async fn run(app: &App, command: &FeedbackCommands) -> Result<()> {
    app.ensure_allowed(FEEDBACK_PATH)?;
    let feedback = app.portal.feedback();
    match command {
        FeedbackCommands::List(args) => {
            let page = feedback.list(&filters(args)).await?;
            print_page(&page.data, app.format)
        }
        FeedbackCommands::Book(args) => {
            let page = feedback
                .for_book(args.book_id, &PageRequest::from(args.paging))
                .await?;
            print_page(&page.data, app.format)
        }
        FeedbackCommands::Mine(paging) => {
            let page = feedback.mine(&PageRequest::from(*paging)).await?;
            print_page(&page.data, app.format)
        }
        FeedbackCommands::Stats(args) => {
            let stats = feedback.book_stats(args.id).await?.data;
            match app.format {
                OutputFormat::Json => print_json(&stats),
                OutputFormat::Table => {
                    println!(
                        "{}: {:.2} from {} reviews",
                        "Average".cyan(),
                        stats.average_rating,
                        stats.total_reviews
                    );
                    for rating in (1..=5u8).rev() {
                        let count = stats
                            .rating_distribution
                            .get(&rating.to_string())
                            .copied()
                            .unwrap_or(0);
                        println!("{} {count}", stars(rating));
                    }
                    Ok(())
                }
            }
        }
        FeedbackCommands::Get(args) => {
            let review = feedback.get(args.id).await?;
            print_one(&review.data, app.format)
        }
        FeedbackCommands::Create(args) => {
            let review = feedback
                .create(&CreateFeedback {
                    rating: args.rating,
                    comment: args.comment.clone(),
                    book_id: args.book_id,
                })
                .await?;
            print_success(&format!("Review #{} saved", review.id));
            print_one(&review, app.format)
        }
        FeedbackCommands::Update(args) => {
            let review = feedback
                .update(
                    args.id,
                    &UpdateFeedback {
                        rating: args.rating,
                        comment: args.comment.clone(),
                    },
                )
                .await?;
            print_success(&format!("Review #{} updated", review.id));
            print_one(&review, app.format)
        }
        FeedbackCommands::Moderate(args) => {
            app.ensure_allowed(&app.admin_path("feedback"))?;
            let review = feedback
                .moderate(
                    args.id,
                    &ModerateFeedback {
                        rating: args.rating,
                        comment: args.comment.clone(),
                    },
                )
                .await?;
            print_success(&format!("Review #{} moderated", review.id));
            print_one(&review, app.format)
        }
        FeedbackCommands::Delete(args) => {
            let response = feedback.delete(args.id).await?;
            print_success(
                response
                    .message
                    .as_deref()
                    .unwrap_or(&format!("Deleted review #{}", args.id)),
            );
            Ok(())
        }
        FeedbackCommands::BulkDelete(args) => {
            app.ensure_allowed(&app.admin_path("feedback"))?;
            let response = feedback.bulk_delete(&args.ids).await?;
            print_success(
                response
                    .message
                    .as_deref()
                    .unwrap_or(&format!("Deleted {} reviews", args.ids.len())),
            );
            Ok(())
        }
    }
}
