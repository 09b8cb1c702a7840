//! User command - lifecycle operations without going through HTTP.
//!
//! This is how the first active admin gets created.

use crate::cli::args::{UserAction, UserArgs};
use crate::config::{Config, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::User;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{Services, UserService};

/// Execute the user command
pub async fn execute(args: UserArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(config.database_url.as_str()).await?;
    let services = Services::from_connection(db.get_connection(), config);

    run(args.action, services.users().as_ref()).await
}

async fn run(action: UserAction, users: &dyn UserService) -> AppResult<()> {
    match action {
        UserAction::Create { email, password } => print_user(&users.register(email, password).await?),
        UserAction::Validate { email } => print_user(&users.validate(&email).await?),
        UserAction::Enable { email } => print_user(&users.enable(&email).await?),
        UserAction::Disable { email } => print_user(&users.disable(&email).await?),
        UserAction::List { page: None, page_size: None } => {
            for user in users.list().await? {
                print_user(&user);
            }
        }
        UserAction::List { page, page_size } => {
            let page = users
                .list_paginated(
                    page.unwrap_or(DEFAULT_PAGE_NUMBER),
                    page_size.unwrap_or(DEFAULT_PAGE_SIZE),
                )
                .await?;
            for user in &page.items {
                print_user(user);
            }
            println!(
                "page {} ({} per page), {} total{}",
                page.page,
                page.page_size,
                page.total,
                if page.has_next { ", more follow" } else { "" }
            );
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    println!(
        "{}\tvalidated={}\tactive={}\tupdated_at={}",
        user.email(),
        user.is_validated(),
        user.is_active(),
        user.updated_at().to_rfc3339()
    );
}
