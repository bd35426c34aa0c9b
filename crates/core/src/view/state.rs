/// Lifecycle of a data-backed page. Errors never reach the user verbatim; they are
/// logged by the loader and surface as `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Ready(T),
    Empty { message: String },
}

impl<T> PageState<T> {
    pub fn empty(message: impl Into<String>) -> Self {
        PageState::Empty {
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            PageState::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}
