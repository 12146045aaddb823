//! Review (testimonial) command handler

use super::{acting_profile, find_by_id, open_store, short_id};
use crate::args::ReviewSubcommand;
use chrono::Utc;
use studyhub::config::Config;
use studyhub::core::models::{public_testimonials, Testimonial};
use studyhub::info;

/// Dispatch review subcommands
///
/// # Errors
/// Returns an error for invalid reviews, unknown ids, missing admin rights, or
/// store failures
pub fn run(subcommand: ReviewSubcommand, config: &Config) -> Result<(), String> {
    let store = open_store(config);
    let profile = acting_profile(config)?;
    let mut all = store
        .load_testimonials()
        .map_err(|e| format!("Failed to load reviews: {e}"))?;

    match subcommand {
        ReviewSubcommand::Add { rating, message } => {
            let review = Testimonial::new(&profile.uid, rating, message.trim(), Utc::now())?;
            let id = review.id.clone();
            all.push(review);
            store
                .save_testimonials(&all)
                .map_err(|e| format!("Failed to save review: {e}"))?;
            info!("Review {id} submitted by {}", profile.uid);
            println!(
                "✓ Review [{}] submitted; it appears once an admin approves it",
                short_id(&id)
            );
        }
        ReviewSubcommand::Approve { id } => {
            if !profile.is_admin() {
                return Err("Permission denied: approving reviews requires the admin role".to_string());
            }
            let idx = find_by_id(&all, &id, |t| t.id.as_str())?;
            if all[idx].approved {
                println!("✓ Review [{}] was already approved", short_id(&all[idx].id));
                return Ok(());
            }
            all[idx].approve();
            store
                .save_testimonials(&all)
                .map_err(|e| format!("Failed to save review: {e}"))?;
            println!("✓ Approved review [{}]", short_id(&all[idx].id));
        }
        ReviewSubcommand::List { all: include_pending } => {
            let shown: Vec<&Testimonial> = if include_pending {
                if !profile.is_admin() {
                    return Err(
                        "Permission denied: listing unapproved reviews requires the admin role"
                            .to_string(),
                    );
                }
                let mut every: Vec<&Testimonial> = all.iter().collect();
                every.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                every
            } else {
                public_testimonials(&all)
            };

            if shown.is_empty() {
                println!("No reviews yet.");
            }
            for review in shown {
                let pending = if review.approved { "" } else { "  (pending)" };
                println!(
                    "{} {}  {} by {}{pending}",
                    stars(review.rating),
                    short_id(&review.id),
                    review.created_at.format("%Y-%m-%d"),
                    review.author
                );
                println!("    {}", review.message);
            }
        }
    }
    Ok(())
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
