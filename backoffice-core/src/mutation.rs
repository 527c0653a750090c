//! Mutation-refresh coordination
//!
//! Every create/update/delete on a management page goes through
//! [`MutationCoordinator`]: on success the affected list keys are invalidated and
//! the modal form is reset; on failure the form stays open with its input and an
//! inline message.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use backoffice_api::ResourceId;

use crate::cache::ListCache;
use crate::error::{CoreError, CoreResult};

/// Inline message replacing any duplicate-term rejection.
pub const DUPLICATE_TERM_MESSAGE: &str = "이미 존재하는 검색어입니다.";

/// Substrings that mark a server message as a duplicate rejection.
const DUPLICATE_MARKERS: [&str; 3] = ["중복", "already exists", "duplicate"];

/// Transient state of one create/edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalFormState {
    fields: BTreeMap<String, String>,
    selected_parent_id: Option<ResourceId>,
    error: Option<String>,
    open: bool,
    submitting: bool,
}

impl ModalFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty form.
    pub fn open(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Open a form pre-filled for editing.
    pub fn open_with<I, K, V>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.open();
        self.fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Close and forget everything typed.
    pub fn close(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Current value of `name` (empty when never set).
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    pub fn selected_parent_id(&self) -> Option<ResourceId> {
        self.selected_parent_id
    }

    pub fn select_parent(&mut self, parent: Option<ResourceId>) {
        self.selected_parent_id = parent;
    }

    /// Trimmed value of a required field.
    ///
    /// A blank field sets `message` as the inline error and fails with
    /// [`CoreError::Validation`], before anything is sent.
    pub fn require(&mut self, name: &str, message: &str) -> CoreResult<String> {
        let value = self.field(name).trim().to_string();
        if value.is_empty() {
            return Err(self.reject(message));
        }
        Ok(value)
    }

    /// Trimmed value of an optional field, `None` when blank.
    pub fn optional(&self, name: &str) -> Option<String> {
        let value = self.field(name).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Show `message` inline and return the matching validation error.
    pub fn reject(&mut self, message: &str) -> CoreError {
        self.error = Some(message.to_string());
        CoreError::Validation(message.to_string())
    }

    fn begin_submit(&mut self) -> CoreResult<()> {
        if self.submitting {
            return Err(CoreError::AlreadySubmitting);
        }
        self.submitting = true;
        self.error = None;
        Ok(())
    }

    fn fail(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

/// How a mutation failure becomes the inline message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessagePolicy {
    /// Server message verbatim, or the generic fallback.
    #[default]
    Passthrough,
    /// Like `Passthrough`, but duplicate rejections read [`DUPLICATE_TERM_MESSAGE`].
    DuplicateTerm,
}

impl MessagePolicy {
    pub fn translate(self, err: &CoreError) -> String {
        if self == Self::DuplicateTerm {
            let duplicate = err.server_message().is_some_and(|msg| {
                let lower = msg.to_lowercase();
                DUPLICATE_MARKERS.iter().any(|marker| lower.contains(marker))
            });
            if duplicate {
                return DUPLICATE_TERM_MESSAGE.to_string();
            }
        }
        err.user_message()
    }
}

/// What a mutation refreshes and how its failures read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationSpec {
    pub invalidate: Vec<&'static str>,
    pub messages: MessagePolicy,
}

impl MutationSpec {
    /// Invalidate `keys` on success.
    pub fn invalidating(keys: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            invalidate: keys.into_iter().collect(),
            messages: MessagePolicy::Passthrough,
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: MessagePolicy) -> Self {
        self.messages = messages;
        self
    }
}

/// Runs mutations and refreshes the lists they affect.
#[derive(Clone)]
pub struct MutationCoordinator {
    cache: Arc<ListCache>,
}

impl MutationCoordinator {
    pub fn new(cache: Arc<ListCache>) -> Self {
        Self { cache }
    }

    /// Submit a modal form.
    ///
    /// Refuses to start while `form` is already submitting. On success invalidates
    /// exactly `spec.invalidate` and closes the form; on failure keeps the form open
    /// with its input and the translated inline message.
    pub async fn submit<T, F, Fut>(
        &self,
        form: &mut ModalFormState,
        spec: &MutationSpec,
        op: F,
    ) -> CoreResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CoreResult<T>>,
    {
        form.begin_submit()?;
        match self.run(spec, op).await {
            Ok(value) => {
                form.close();
                Ok(value)
            }
            Err(err) => {
                form.fail(spec.messages.translate(&err));
                Err(err)
            }
        }
    }

    /// Run a mutation that has no form (delete from a row, toggles).
    pub async fn run<T, F, Fut>(&self, spec: &MutationSpec, op: F) -> CoreResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CoreResult<T>>,
    {
        match op().await {
            Ok(value) => {
                self.cache.invalidate_many(&spec.invalidate).await;
                Ok(value)
            }
            Err(err) => {
                if err.is_expected() {
                    log::warn!("Mutation failed: {err}");
                } else {
                    log::error!("Mutation failed: {err}");
                }
                Err(err)
            }
        }
    }
}
