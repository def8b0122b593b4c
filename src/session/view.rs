use super::state::{Session, SessionStatus};
use serde::Serialize;

/// What the front-end shows for the current status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub title: &'static str,
    pub description: String,
    /// Show a progress indicator
    pub loading: bool,
}

impl StatusView {
    pub fn for_session(session: &Session) -> Self {
        let status = session.status();
        let (title, description) = match status {
            SessionStatus::Setup => (
                "AI Interview Assistant",
                "Start your personalized AI-powered interview experience",
            ),
            SessionStatus::CreatingRoom => (
                "Creating Interview Room",
                "Setting up your private interview space...",
            ),
            SessionStatus::StartingAgent => (
                "Initializing AI Interviewer",
                "Your AI interviewer is preparing questions based on your profile...",
            ),
            SessionStatus::Joining => (
                "Joining Interview Room",
                "Connecting to your interview session with the AI interviewer...",
            ),
            SessionStatus::Active => ("AI Interview Session", "Your interview is in progress"),
            SessionStatus::Ended => (
                "Interview Completed!",
                "Great job! Your AI interview session has ended successfully.",
            ),
            SessionStatus::Error => (
                "Connection Error",
                "We encountered an issue. Please try again.",
            ),
        };

        let description = session
            .error_message()
            .map(str::to_string)
            .unwrap_or_else(|| description.to_string());

        Self {
            title,
            description,
            loading: is_loading(status),
        }
    }
}

pub fn is_loading(status: SessionStatus) -> bool {
    matches!(
        status,
        SessionStatus::CreatingRoom | SessionStatus::Joining | SessionStatus::StartingAgent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creating_room_is_loading() {
        let session = Session::new().submit().unwrap();
        let view = StatusView::for_session(&session);

        assert_eq!(view.title, "Creating Interview Room");
        assert!(view.loading);
    }

    #[test]
    fn test_error_message_replaces_description() {
        let creating = Session::new().submit().unwrap();
        let failed = creating
            .room_failed(creating.id(), "Server error. Please try again in a few moments.")
            .unwrap();
        let view = StatusView::for_session(&failed);

        assert_eq!(view.title, "Connection Error");
        assert_eq!(view.description, "Server error. Please try again in a few moments.");
        assert!(!view.loading);
    }

    #[test]
    fn test_reserved_states_are_loading() {
        assert!(is_loading(SessionStatus::Joining));
        assert!(is_loading(SessionStatus::StartingAgent));
        assert!(!is_loading(SessionStatus::Setup));
    }
}
