use std::sync::{Mutex, MutexGuard, PoisonError};

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// True for the pages an expired session must not be redirected away from.
pub fn is_auth_route(location: &str) -> bool {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    path == LOGIN_ROUTE || path == REGISTER_ROUTE
}

/// Where the application currently is, and how to move it.
///
/// The API client only calls this when a session expires; the embedding
/// application decides what "navigating" means.
pub trait Navigator: Send + Sync {
    fn current_location(&self) -> String;

    fn navigate(&self, route: &str);

    /// Remembers a location to return to once the user logs in again.
    fn remember_redirect(&self, _location: &str) {}
}

#[derive(Debug, Default)]
struct SessionState {
    location: String,
    redirect_after_login: Option<String>,
    history: Vec<String>,
}

/// In-process navigator that tracks the current location, the
/// session-scoped redirect-after-login path and every navigation made.
#[derive(Debug)]
pub struct SessionNavigator {
    state: Mutex<SessionState>,
}

impl Default for SessionNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SessionNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(SessionState {
                location: location.into(),
                ..SessionState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a location change made by the user rather than by the client.
    pub fn visit(&self, location: &str) {
        self.lock().location = location.to_string();
    }

    /// Navigations requested through [`Navigator::navigate`], oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    pub fn redirect_after_login(&self) -> Option<String> {
        self.lock().redirect_after_login.clone()
    }

    /// Consumes the remembered redirect; falls back to the dashboard.
    pub fn take_redirect_after_login(&self) -> String {
        self.lock()
            .redirect_after_login
            .take()
            .unwrap_or_else(|| DASHBOARD_ROUTE.to_string())
    }
}

impl Navigator for SessionNavigator {
    fn current_location(&self) -> String {
        self.lock().location.clone()
    }

    fn navigate(&self, route: &str) {
        let mut state = self.lock();
        state.location = route.to_string();
        state.history.push(route.to_string());
    }

    fn remember_redirect(&self, location: &str) {
        self.lock().redirect_after_login = Some(location.to_string());
    }
}
