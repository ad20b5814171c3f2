//! View state of the properties panel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `PanelState` is the only state the panel renders from. It changes only
//! through [`reduce`], a pure function of the previous state and one
//! [`Action`]. The form, the subscriber list and the widget subscriptions are
//! independent slots so the server can push each one without resending the
//! others.

#[cfg(test)]
#[path = "properties_test.rs"]
mod properties_test;

use serde::Serialize;

use crate::net::types::{Form, FormEvent, Subscriber, WidgetSubscription};

/// Message shown while no object is selected.
pub const SELECT_OBJECT_MESSAGE: &str = "Please select an object to display its properties";

/// Message shown after a channel-level failure.
pub const CONNECTION_ERROR_MESSAGE: &str = "An error has occured while retrieving the content from the server";

/// Which screen the panel shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewState {
    /// No object selected, or the channel is (re)initializing.
    #[default]
    Loading,
    /// A form is available.
    FormLoaded,
    /// The server finished the stream.
    Complete,
    /// A connection or application error occurred.
    Error,
}

/// Everything the view layer needs to paint the panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    pub view_state: ViewState,
    /// Present only in [`ViewState::FormLoaded`].
    pub form: Option<Form>,
    pub subscribers: Vec<Subscriber>,
    pub widget_subscriptions: Vec<WidgetSubscription>,
    /// Status or error text; empty means no message.
    pub message: String,
}

impl PanelState {
    /// State of a freshly mounted panel.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            view_state: ViewState::Loading,
            form: None,
            subscribers: Vec::new(),
            widget_subscriptions: Vec::new(),
            message: SELECT_OBJECT_MESSAGE.to_owned(),
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Inputs to [`reduce`], produced by the frame classifier or by the panel host.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// The channel failed.
    HandleConnectionError,
    /// The server reported an error for the subscription.
    HandleError { message: String },
    /// The server pushed a form event.
    HandleData(FormEvent),
    /// The panel's target object changed or disappeared.
    HandleUnload,
    /// The server finished the subscription.
    HandleComplete,
}

/// Compute the next panel state.
///
/// Never fails; an event the panel does not understand leaves the state as is.
#[must_use]
pub fn reduce(state: PanelState, action: Action) -> PanelState {
    match action {
        Action::HandleConnectionError => PanelState {
            view_state: ViewState::Error,
            form: None,
            message: CONNECTION_ERROR_MESSAGE.to_owned(),
            ..state
        },
        Action::HandleError { message } => PanelState { view_state: ViewState::Error, form: None, message, ..state },
        Action::HandleData(event) => apply_form_event(state, event),
        Action::HandleUnload => PanelState::initial(),
        Action::HandleComplete => {
            PanelState { view_state: ViewState::Complete, form: None, message: String::new(), ..state }
        }
    }
}

fn apply_form_event(state: PanelState, event: FormEvent) -> PanelState {
    match event {
        FormEvent::FormRefreshed { form } => {
            PanelState { view_state: ViewState::FormLoaded, form: Some(form), message: String::new(), ..state }
        }
        FormEvent::SubscribersUpdated { subscribers } => PanelState { subscribers, ..state },
        FormEvent::WidgetSubscriptionsUpdated { widget_subscriptions } => {
            PanelState { widget_subscriptions, ..state }
        }
        FormEvent::Unknown => state,
    }
}
