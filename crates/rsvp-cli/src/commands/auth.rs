//! Login, logout and whoami

use anyhow::{anyhow, Result};

use crate::app::App;
use crate::output::Output;

/// Exchange the identity token for a backend session
pub async fn login(app: &mut App, output: &Output) -> Result<()> {
    if !app.session.login().await {
        let error = app
            .session
            .error()
            .map(|e| anyhow!("Login failed: {}", e))
            .unwrap_or_else(|| anyhow!("Login failed"));
        return Err(error);
    }
    let user = app.require_user()?;
    output.success(&format!("Signed in as {} (#{})", user.name, user.id));
    Ok(())
}

pub async fn logout(app: &mut App, output: &Output) -> Result<()> {
    let was_signed_in = app.viewer().is_some();
    app.logout().await?;
    if let Some(e) = app.session.error() {
        tracing::warn!("Server-side logout failed: {}", e);
    }
    if was_signed_in {
        output.success("Signed out");
    } else {
        output.message("Not signed in.");
    }
    Ok(())
}

/// Show the signed-in user
pub fn whoami(app: &App, output: &Output) -> Result<()> {
    match app.viewer() {
        Some(user) => output.print_user(user),
        None => output.message("Not signed in."),
    }
    Ok(())
}
