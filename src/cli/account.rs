use super::ui;
use crate::core::accounts::AccountService;
use crate::core::error::AuthError;
use anyhow::Result;

/// Creates an account and signs the user in.
pub async fn register(
    accounts: &dyn AccountService,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<()> {
    match accounts.register(email, password, display_name).await {
        Ok(session) => {
            println!(
                "Welcome, {}! You are signed in as {}.",
                session.display_name, session.email
            );
            Ok(())
        }
        Err(AuthError::PartialRegistration(reason)) => {
            println!(
                "{}",
                ui::style_text(
                    &format!(
                        "Your account was created, but profile setup failed ({reason}). \
                         Sign in with `login` to continue."
                    ),
                    ui::StyleType::Error
                )
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Signs an existing user in.
pub async fn login(accounts: &dyn AccountService, email: &str, password: &str) -> Result<()> {
    let session = accounts.authenticate(email, password).await?;
    println!("Signed in as {} ({}).", session.display_name, session.email);
    Ok(())
}

/// Signs the current user out. Signing out while signed out is a no-op.
pub async fn logout(accounts: &dyn AccountService) -> Result<()> {
    accounts.sign_out().await?;
    println!("Signed out.");
    Ok(())
}

/// Shows who is currently signed in.
pub async fn whoami(accounts: &dyn AccountService) -> Result<()> {
    match accounts.current_session().await? {
        Some(session) => {
            println!("{} ({})", session.display_name, session.email);
        }
        None => {
            println!(
                "Not signed in. Favorites and history are kept under a local anonymous profile."
            );
        }
    }
    Ok(())
}
