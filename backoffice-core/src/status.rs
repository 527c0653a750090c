/// Load state of an async resource.
///
/// `Loading` keeps the previously loaded value so it can stay on screen while the
/// next one is fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncStatus<T> {
    Idle,
    Loading { previous: Option<T> },
    Success(T),
    Failure(String),
}

impl<T> Default for AsyncStatus<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> AsyncStatus<T> {
    /// Enter `Loading`, carrying over the currently visible value.
    pub fn start_loading(&mut self) {
        let previous = match std::mem::take(self) {
            Self::Success(data) => Some(data),
            Self::Loading { previous } => previous,
            Self::Idle | Self::Failure(_) => None,
        };
        *self = Self::Loading { previous };
    }

    /// The value to display: the loaded one, or the previous one while loading.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) | Self::Loading { previous: Some(data) } => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}
