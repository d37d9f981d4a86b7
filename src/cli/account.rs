use super::ui;
use crate::core::auth::{Session, User};

pub fn render_registered(user: &User) -> String {
    format!(
        "Registered {} <{}>. Log in with `fintechora login {}`.",
        user.name, user.email, user.email
    )
}

pub fn render_logged_in(session: &Session) -> String {
    format!(
        "{}\nLogged in as {}",
        ui::style_text(
            &format!("Welcome, {}", session.user.name),
            ui::StyleType::Title
        ),
        session.user.email
    )
}

pub fn render_logged_out(session: Option<&Session>) -> String {
    match session {
        Some(session) => format!("Logged out {}.", session.user.email),
        None => "No active session.".to_string(),
    }
}

pub fn render_whoami(session: &Session) -> String {
    format!(
        "{} <{}>\n{}",
        session.user.name,
        session.user.email,
        ui::style_text(
            &format!(
                "Session started {}",
                session.started_at.format("%Y-%m-%d %H:%M UTC")
            ),
            ui::StyleType::Subtle
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session() -> Session {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        Session {
            user: User {
                id: "u1".to_string(),
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                created_at: at,
            },
            started_at: at,
        }
    }

    #[test]
    fn test_account_messages() {
        let session = session();
        assert!(render_registered(&session.user).contains("Registered Asha Rao <asha@example.com>"));
        assert!(render_logged_in(&session).contains("Logged in as asha@example.com"));
        assert_eq!(
            render_logged_out(Some(&session)),
            "Logged out asha@example.com."
        );
        assert_eq!(render_logged_out(None), "No active session.");
        assert!(render_whoami(&session).contains("Session started 2024-06-01 09:30 UTC"));
    }
}
