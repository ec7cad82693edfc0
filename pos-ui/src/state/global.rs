//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;
use pos_client::messages::ErrorMessages;
use pos_client::{ApiError, Me};
use std::rc::Rc;

use crate::api::{self, Client};
use crate::browser;

/// How long toasts stay up by default
const SUCCESS_MS: u32 = 2500;
const ERROR_MS: u32 = 4000;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Backend client shared by every page
    pub api: Rc<Client>,
    /// An access token is stored
    pub logged_in: RwSignal<bool>,
    /// Current user once `/auth/me/` answered
    pub me: RwSignal<Option<Me>>,
    /// `/auth/me/` is in flight
    pub me_loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let logged_in = create_rw_signal(false);
    let me = create_rw_signal(None::<Me>);
    let me_loading = create_rw_signal(false);

    // Runs after a failed refresh; the route guards react to it
    let client = api::build_client(move || {
        logged_in.set(false);
        me.set(None);
        me_loading.set(false);
    });
    logged_in.set(client.is_logged_in());

    let state = GlobalState {
        api: Rc::new(client),
        logged_in,
        me,
        me_loading,
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };
    state.load_me();

    provide_context(state);
}

impl GlobalState {
    /// Fetch the current user when a session exists
    pub fn load_me(&self) {
        if !self.logged_in.get_untracked() {
            return;
        }
        let api = self.api.clone();
        let me = self.me;
        let me_loading = self.me_loading;
        me_loading.set(true);
        spawn_local(async move {
            match api.me().await {
                Ok(user) => me.set(Some(user)),
                Err(e) => {
                    browser::log_error("Failed to load current user", &e);
                    me.set(None);
                }
            }
            me_loading.set(false);
        });
    }

    /// Tokens were just stored by a successful login
    pub fn on_login(&self) {
        self.logged_in.set(true);
        self.load_me();
    }

    pub fn logout(&self) {
        self.api.logout();
        self.me.set(None);
        self.me_loading.set(false);
        self.logged_in.set(false);
    }

    pub fn is_admin(&self) -> bool {
        self.me.get().map(|me| me.is_admin()).unwrap_or(false)
    }

    pub fn is_seller(&self) -> bool {
        self.me.get().map(|me| me.is_seller()).unwrap_or(false)
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.show_success_for(message, SUCCESS_MS);
    }

    pub fn show_success_for(&self, message: &str, ms: u32) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        let shown = message.to_string();
        gloo_timers::callback::Timeout::new(ms, move || {
            // a newer message keeps its own timer
            if success_signal.get_untracked().as_deref() == Some(shown.as_str()) {
                success_signal.set(None);
            }
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.show_error_for(message, ERROR_MS);
    }

    pub fn show_error_for(&self, message: &str, ms: u32) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        let shown = message.to_string();
        gloo_timers::callback::Timeout::new(ms, move || {
            if error_signal.get_untracked().as_deref() == Some(shown.as_str()) {
                error_signal.set(None);
            }
        })
        .forget();
    }

    /// Log a failed call and show its localized message
    pub fn report(&self, set: &ErrorMessages, error: &ApiError) {
        browser::log_error("API call failed", error);
        self.show_error(&set.describe(error));
    }

    pub fn clear_messages(&self) {
        self.error.set(None);
        self.success.set(None);
    }
}
