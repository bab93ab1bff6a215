use crate::message_id::{LEGACY_MESSAGE_ID_PREFIX, URN_UUID_PREFIX};
use crate::namespace::ANONYMOUS_ROLE_URI;

/// Settings shared by every header a [`crate::WsaHeaderBuilder`] writes.
#[derive(Debug, Clone, PartialEq, Eq, typed_builder::TypedBuilder)]
pub struct WsaOptions {
    /// Prepended to generated MessageID values. Caller-supplied ids are used as is.
    #[builder(default = LEGACY_MESSAGE_ID_PREFIX.to_owned(), setter(into))]
    pub message_id_prefix: String,
    /// ReplyTo address used when the caller passes none.
    #[builder(default = ANONYMOUS_ROLE_URI.to_owned(), setter(into))]
    pub default_reply_to: String,
}

impl Default for WsaOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WsaOptions {
    /// Options generating `urn:uuid:` message ids instead of the legacy prefix.
    pub fn standard_message_ids() -> Self {
        Self::builder().message_id_prefix(URN_UUID_PREFIX).build()
    }
}
