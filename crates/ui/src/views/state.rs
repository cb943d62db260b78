use dioxus::prelude::*;
use services::QuizApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    SignedOut,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::SignedOut => "Sign in with Spotify to see this page.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&QuizApiError> for ViewError {
    fn from(error: &QuizApiError) -> Self {
        match error {
            QuizApiError::HttpStatus(status) if status.as_u16() == 401 => ViewError::SignedOut,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_signed_out() {
        let error = QuizApiError::HttpStatus(status(401));
        assert_eq!(ViewError::from(&error), ViewError::SignedOut);

        let error = QuizApiError::Unavailable("down".into());
        assert_eq!(ViewError::from(&error), ViewError::Unknown);
    }

    fn status(code: u16) -> services::StatusCode {
        services::StatusCode::from_u16(code).unwrap()
    }
}
