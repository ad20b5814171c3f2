//! Typed payload vocabulary for the properties subscription.
//!
//! DESIGN
//! ======
//! These types mirror the server's form event payloads field for field
//! (camelCase on the wire) so a data frame is decoded once, at the boundary,
//! into a closed sum type. Discriminators the client does not know decode to
//! an explicit fallback variant instead of failing the whole frame.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use frames::{Frame, FrameKind};

/// Renderable description of an object's properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Form identifier.
    pub id: String,
    /// Title shown above the pages.
    pub label: String,
    /// Pages in display order.
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// One tab of a form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// A titled section of a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// Editable field inside a group, discriminated by `__typename`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum Widget {
    Textfield { id: String, label: String, value: String },
    Textarea { id: String, label: String, value: String },
    Checkbox { id: String, label: String, value: bool },
    Select {
        id: String,
        label: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    Radio {
        id: String,
        label: String,
        #[serde(default)]
        options: Vec<RadioOption>,
    },
    List {
        id: String,
        label: String,
        #[serde(default)]
        items: Vec<ListItem>,
    },
    /// A widget kind this client cannot render.
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadioOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub label: String,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A user concurrently viewing or editing the same object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub username: String,
}

/// Subscribers currently interacting with one widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSubscription {
    pub widget_id: String,
    #[serde(default)]
    pub subscribers: Vec<Subscriber>,
}

/// Event multiplexed on the form subscription, discriminated by `__typename`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum FormEvent {
    #[serde(rename = "FormRefreshedEventPayload")]
    FormRefreshed { form: Form },
    #[serde(rename = "SubscribersUpdatedEventPayload")]
    SubscribersUpdated {
        #[serde(default)]
        subscribers: Vec<Subscriber>,
    },
    #[serde(rename = "WidgetSubscriptionsUpdatedEventPayload", rename_all = "camelCase")]
    WidgetSubscriptionsUpdated {
        #[serde(default)]
        widget_subscriptions: Vec<WidgetSubscription>,
    },
    /// Any event kind added server-side after this client was built.
    #[serde(other)]
    Unknown,
}

impl FormEvent {
    /// Wire discriminator, for logging.
    #[must_use]
    pub fn typename(&self) -> &'static str {
        match self {
            Self::FormRefreshed { .. } => "FormRefreshedEventPayload",
            Self::SubscribersUpdated { .. } => "SubscribersUpdatedEventPayload",
            Self::WidgetSubscriptionsUpdated { .. } => "WidgetSubscriptionsUpdatedEventPayload",
            Self::Unknown => "unknown",
        }
    }
}

/// GraphQL result envelope of a data frame: `payload.data.formEvent`, plus
/// any execution errors the server reported for the operation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct DataPayload {
    #[serde(default)]
    pub(crate) data: Option<SubscriptionData>,
    #[serde(default)]
    pub(crate) errors: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionData {
    #[serde(default, alias = "propertiesEvent")]
    pub(crate) form_event: Option<FormEvent>,
}
