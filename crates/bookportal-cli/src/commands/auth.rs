use anyhow::Result;
use bookportal_core::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use colored::Colorize;

use super::App;
use crate::cli::{LoginArgs, ProfileCommands, RegisterArgs};
use crate::output::{print_error, print_one, print_success};

pub async fn login(app: &App, args: &LoginArgs) -> Result<()> {
    let response = app
        .portal
        .auth()
        .login(&LoginRequest {
            email: args.email.clone(),
            password: args.password.clone(),
        })
        .await?;
    print_success(&format!(
        "Signed in as {} ({})",
        response.user.full_name().cyan(),
        response.user.role
    ));
    Ok(())
}

pub async fn register(app: &App, args: &RegisterArgs) -> Result<()> {
    let response = app
        .portal
        .auth()
        .register(&RegisterRequest {
            email: args.email.clone(),
            password: args.password.clone(),
            first_name: args.first_name.clone(),
            last_name: args.last_name.clone(),
            role: None,
        })
        .await?;
    print_success(&format!(
        "Account created for {}",
        response.user.email.cyan()
    ));
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    if !app.portal.session().current().is_authenticated() {
        println!("Not signed in (profile \"{}\")", app.profile);
        return Ok(());
    }
    app.portal.auth().logout()?;
    print_success("Signed out (session removed)");
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    let snapshot = app.portal.session().current();
    match (snapshot.principal(), snapshot.credential()) {
        (Some(principal), Some(credential)) => {
            println!("{}: {}", "Profile".cyan(), app.profile);
            println!("{}: {}", "Server".cyan(), app.portal.config().api.base_url);
            println!("{}: {}", "User".cyan(), principal.full_name());
            println!("{}: {}", "Email".cyan(), principal.email);
            println!("{}: {}", "Role".cyan(), principal.role);
            println!("{}: {}", "Token".cyan(), credential.preview());
        }
        _ => print_error(&format!("Not signed in (profile \"{}\")", app.profile)),
    }
    Ok(())
}

pub async fn profile(app: &App, command: &ProfileCommands) -> Result<()> {
    app.ensure_allowed(&app.portal.config().routes.user_home)?;
    match command {
        ProfileCommands::Show => {
            let profile = app.portal.auth().profile().await?;
            print_one(&profile.data, app.format)
        }
        ProfileCommands::Update(args) => {
            let principal = app
                .portal
                .auth()
                .update_profile(&UpdateProfileRequest {
                    email: args.email.clone(),
                    first_name: args.first_name.clone(),
                    last_name: args.last_name.clone(),
                })
                .await?;
            print_success("Profile updated");
            print_one(&principal, app.format)
        }
    }
}
