//! User profile and following handlers

use anyhow::Result;

use rsvp_core::pages::{ProfileTab, UserProfilePage};

use super::{ensure_ready, ensure_written};
use crate::app::App;
use crate::output::Output;

/// Show a profile and one of its lists
pub async fn show(
    app: &App,
    user_id: u64,
    tab: ProfileTab,
    page_number: Option<u32>,
    output: &Output,
) -> Result<()> {
    let mut page = UserProfilePage::new(app.transport.clone(), user_id, tab, app.viewer());
    let query = page_number.map(|n| format!("page={}", n)).unwrap_or_default();
    page.load(&query).await;
    ensure_ready(page.status())?;

    if let Some(user) = page.user() {
        output.print_user(user);
    }
    if output.is_quiet() {
        return Ok(());
    }

    output.message(&format!("\n── {} ──", page.tab()));
    match tab {
        ProfileTab::Posted | ProfileTab::Participated => {
            output.print_invitations(page.invitations(), page.meta())
        }
        ProfileTab::Followings | ProfileTab::Followers => output.print_users(page.users()),
    }
    Ok(())
}

pub async fn follow(app: &App, user_id: u64, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut page = UserProfilePage::new(app.transport.clone(), user_id, ProfileTab::default(), app.viewer());
    let followed = page.follow().await;
    ensure_written(followed, page.status())?;

    let name = page.user().map(|u| u.name.clone()).unwrap_or_else(|| user_id.to_string());
    output.success(&format!("Following {}", name));
    Ok(())
}

pub async fn unfollow(app: &App, user_id: u64, output: &Output) -> Result<()> {
    app.require_user()?;
    let mut page = UserProfilePage::new(app.transport.clone(), user_id, ProfileTab::default(), app.viewer());
    let unfollowed = page.unfollow().await;
    ensure_written(unfollowed, page.status())?;

    let name = page.user().map(|u| u.name.clone()).unwrap_or_else(|| user_id.to_string());
    output.success(&format!("No longer following {}", name));
    Ok(())
}
