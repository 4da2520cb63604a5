//! Form controller: bindings, validation, submission and derived state

use super::{
    FieldArrayName, FieldError, FieldErrorKind, FieldErrors, FieldPath, FieldValue, FormError,
    FormValues, PhNumber, Rule,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// When field validation runs outside of submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Validate on submit, then re-validate changed fields
    #[default]
    OnSubmit,
    /// Validate a field when it loses focus
    OnBlur,
    /// Validate a field on every change
    OnChange,
}

/// Side effects of a programmatic value set
#[derive(Debug, Clone, Copy, Default)]
pub struct SetValueOptions {
    pub should_validate: bool,
    pub should_dirty: bool,
    pub should_touch: bool,
}

impl SetValueOptions {
    pub fn all() -> Self {
        Self {
            should_validate: true,
            should_dirty: true,
            should_touch: true,
        }
    }
}

/// Submission counters and flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitStatus {
    pub is_submitting: bool,
    pub is_submitted: bool,
    pub is_submit_successful: bool,
    pub submit_count: u32,
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation passed and the success handler completed
    Submitted,
    /// Validation passed but the success handler failed
    Failed(anyhow::Error),
    /// Validation failed; the success handler was not called
    Invalid(FieldErrors),
}

/// Rules for a field-array row, built from the row index
pub type RowRules = Arc<dyn Fn(usize) -> Vec<Rule> + Send + Sync>;

/// Predicate over a source field's value deciding if a target is disabled
pub type DisabledPredicate = fn(&FieldValue) -> bool;

/// Rules registered for one path
#[derive(Debug, Clone, Default)]
struct Binding {
    rules: Vec<Rule>,
}

/// Disabled-state dependency of `target` on `source`
#[derive(Clone)]
struct Subscription {
    source: FieldPath,
    target: FieldPath,
    predicate: DisabledPredicate,
}

/// Input handle returned by [`FormController::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    path: FieldPath,
}

impl FieldBinding {
    pub fn path(&self) -> FieldPath {
        self.path
    }

    pub fn value(&self, form: &FormController) -> Option<FieldValue> {
        form.get_value(self.path)
    }

    /// Input change: writes the value, marks dirty and re-validates per mode
    pub async fn on_change(
        &self,
        form: &mut FormController,
        value: FieldValue,
    ) -> Result<(), FormError> {
        form.change(self.path, value).await
    }

    pub fn on_focus(&self, form: &mut FormController) {
        form.focus(self.path);
    }

    pub async fn on_blur(&self, form: &mut FormController) {
        form.blur(self.path).await;
    }

    pub fn is_disabled(&self, form: &FormController) -> bool {
        form.is_disabled(self.path)
    }

    pub fn error<'a>(&self, form: &'a FormController) -> Option<&'a FieldError> {
        form.error(self.path)
    }
}

/// Holds form values and everything derived from them
pub struct FormController {
    defaults: FormValues,
    values: FormValues,
    bindings: BTreeMap<FieldPath, Binding>,
    row_rules: BTreeMap<FieldArrayName, RowRules>,
    subscriptions: Vec<Subscription>,
    disabled: BTreeSet<FieldPath>,
    errors: FieldErrors,
    dirty: BTreeSet<FieldPath>,
    touched: BTreeSet<FieldPath>,
    focused: Option<FieldPath>,
    mode: ValidationMode,
    status: SubmitStatus,
    watch_tx: watch::Sender<FormValues>,
}

impl FormController {
    pub fn new(defaults: FormValues, mode: ValidationMode) -> Self {
        let (watch_tx, _) = watch::channel(defaults.clone());
        Self {
            values: defaults.clone(),
            defaults,
            bindings: BTreeMap::new(),
            row_rules: BTreeMap::new(),
            subscriptions: Vec::new(),
            disabled: BTreeSet::new(),
            errors: FieldErrors::new(),
            dirty: BTreeSet::new(),
            touched: BTreeSet::new(),
            focused: None,
            mode,
            status: SubmitStatus::default(),
            watch_tx,
        }
    }

    // ----- registration -----

    /// Associate `rules` with `path`, replacing earlier rules
    pub fn register(&mut self, path: FieldPath, rules: Vec<Rule>) -> Result<FieldBinding, FormError> {
        if !self.values.contains(path) {
            return Err(FormError::UnknownPath(path));
        }
        tracing::debug!("Registered {path} with {} rule(s)", rules.len());
        self.bindings.insert(path, Binding { rules });
        Ok(FieldBinding { path })
    }

    /// Parse `name` and register it
    pub fn register_name(&mut self, name: &str, rules: Vec<Rule>) -> Result<FieldBinding, FormError> {
        self.register(name.parse()?, rules)
    }

    /// Register per-row rules for a field array; applies to existing and future rows
    pub fn register_field_array(&mut self, name: FieldArrayName, rules: RowRules) {
        for index in 0..self.array_len(name) {
            self.bindings.insert(
                name.row(index),
                Binding {
                    rules: rules(index),
                },
            );
        }
        self.row_rules.insert(name, rules);
    }

    /// Disable `target` whenever `predicate(source)` holds
    pub fn register_disabled_when(
        &mut self,
        target: FieldPath,
        source: FieldPath,
        predicate: DisabledPredicate,
    ) -> Result<(), FormError> {
        for path in [target, source] {
            if !self.values.contains(path) {
                return Err(FormError::UnknownPath(path));
            }
        }
        self.subscriptions.push(Subscription {
            source,
            target,
            predicate,
        });
        self.notify(source);
        Ok(())
    }

    /// Binding for an already registered path
    pub fn binding(&self, path: FieldPath) -> Option<FieldBinding> {
        self.bindings.contains_key(&path).then_some(FieldBinding { path })
    }

    // ----- values -----

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn get_value(&self, path: FieldPath) -> Option<FieldValue> {
        self.values.get(path)
    }

    /// Snapshot of the requested paths; unknown paths are skipped
    pub fn get_values(&self, paths: &[FieldPath]) -> Vec<(FieldPath, FieldValue)> {
        paths
            .iter()
            .filter_map(|path| self.values.get(*path).map(|value| (*path, value)))
            .collect()
    }

    /// Subscribe to value snapshots published after every change
    pub fn watch(&self) -> watch::Receiver<FormValues> {
        self.watch_tx.subscribe()
    }

    /// Programmatic set; side effects only as requested by `options`
    pub async fn set_value(
        &mut self,
        path: FieldPath,
        value: FieldValue,
        options: SetValueOptions,
    ) -> Result<(), FormError> {
        self.write(path, value)?;
        if options.should_dirty {
            self.update_dirty(path);
        }
        if options.should_touch {
            self.touched.insert(path);
        }
        if options.should_validate {
            let _ = self.validate(Some(&[path])).await;
        }
        Ok(())
    }

    /// User input on `path`
    pub async fn change(&mut self, path: FieldPath, value: FieldValue) -> Result<(), FormError> {
        self.write(path, value)?;
        self.update_dirty(path);

        let revalidate = self.mode == ValidationMode::OnChange
            || self.status.is_submitted
            || (self.mode == ValidationMode::OnBlur && self.errors.contains_key(&path));
        if revalidate {
            let _ = self.validate(Some(&[path])).await;
        }
        Ok(())
    }

    fn write(&mut self, path: FieldPath, value: FieldValue) -> Result<(), FormError> {
        self.values.set(path, value)?;
        self.notify(path);
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.watch_tx.send_replace(self.values.clone());
    }

    /// Recompute disabled state of fields subscribed to `source`
    fn notify(&mut self, source: FieldPath) {
        let Some(value) = self.values.get(source) else {
            return;
        };
        for sub in self.subscriptions.iter().filter(|s| s.source == source) {
            if (sub.predicate)(&value) {
                if self.disabled.insert(sub.target) {
                    tracing::debug!("{} disabled by {source}", sub.target);
                }
                self.errors.remove(&sub.target);
            } else if self.disabled.remove(&sub.target) {
                tracing::debug!("{} enabled by {source}", sub.target);
            }
        }
    }

    fn update_dirty(&mut self, path: FieldPath) {
        if self.values.get(path) != self.defaults.get(path) {
            self.dirty.insert(path);
        } else {
            self.dirty.remove(&path);
        }
    }

    // ----- focus -----

    pub fn focus(&mut self, path: FieldPath) {
        self.focused = Some(path);
    }

    /// Focus left `path`: marks it touched and validates in blur mode
    pub async fn blur(&mut self, path: FieldPath) {
        if self.focused == Some(path) {
            self.focused = None;
        }
        self.touched.insert(path);
        if self.mode == ValidationMode::OnBlur {
            let _ = self.validate(Some(&[path])).await;
        }
    }

    pub fn focused(&self) -> Option<FieldPath> {
        self.focused
    }

    // ----- validation -----

    /// Validate `paths` (or every registered field). Rules run in declared
    /// order and a field stops at its first failure. Errors of fields not in
    /// `paths` are kept.
    pub async fn validate(&mut self, paths: Option<&[FieldPath]>) -> Result<(), FieldErrors> {
        let targets: Vec<FieldPath> = match paths {
            Some(paths) => paths.to_vec(),
            None => self.bindings.keys().copied().collect(),
        };

        let mut found = FieldErrors::new();
        for path in &targets {
            if let Some(error) = self.check_field(*path).await {
                found.insert(*path, error);
            }
        }

        for path in &targets {
            self.errors.remove(path);
        }
        self.errors
            .extend(found.iter().map(|(path, error)| (*path, error.clone())));

        if found.is_empty() {
            Ok(())
        } else {
            tracing::debug!("Validation failed for {} field(s)", found.len());
            Err(found)
        }
    }

    async fn check_field(&self, path: FieldPath) -> Option<FieldError> {
        if self.disabled.contains(&path) {
            return None;
        }
        let value = self.values.get(path)?;
        let binding = self.bindings.get(&path)?;

        for rule in &binding.rules {
            if let Rule::ValidateAsync { name, check } = rule {
                match check.validate(&value).await {
                    Ok(Ok(())) => {}
                    Ok(Err(message)) => {
                        return Some(FieldError::new(FieldErrorKind::Validate(*name), message))
                    }
                    Err(err) => {
                        tracing::warn!("Async check {name} on {path} failed: {err:#}");
                        return Some(FieldError::new(
                            FieldErrorKind::Indeterminate(*name),
                            check.indeterminate_message(),
                        ));
                    }
                }
            } else if let Some(error) = rule.check(&value) {
                return Some(error);
            }
        }
        None
    }

    // ----- submission -----

    /// Flag a submission as in flight before `submit` runs, so it can be
    /// shown while validation and the success handler are awaited
    pub fn begin_submit(&mut self) {
        self.status.is_submitting = true;
    }

    /// Validate everything, then hand the payload to `on_valid` or the
    /// errors to `on_invalid`.
    pub async fn submit<V, Fut, I>(&mut self, on_valid: V, on_invalid: I) -> SubmitOutcome
    where
        V: FnOnce(serde_json::Value) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
        I: FnOnce(&FieldErrors),
    {
        self.status.is_submitting = true;

        let outcome = match self.validate(None).await {
            Ok(()) => match on_valid(self.payload()).await {
                Ok(()) => SubmitOutcome::Submitted,
                Err(err) => SubmitOutcome::Failed(err),
            },
            Err(errors) => {
                on_invalid(&errors);
                SubmitOutcome::Invalid(errors)
            }
        };

        self.status.is_submitting = false;
        self.status.is_submitted = true;
        self.status.submit_count += 1;
        self.status.is_submit_successful = matches!(outcome, SubmitOutcome::Submitted);
        tracing::info!(
            "Submit #{} finished: successful={}",
            self.status.submit_count,
            self.status.is_submit_successful
        );
        outcome
    }

    /// Serialized values with disabled fields removed
    pub fn payload(&self) -> serde_json::Value {
        let mut payload = serde_json::to_value(&self.values).unwrap_or_default();
        for path in &self.disabled {
            remove_pointer(&mut payload, &path.json_pointer());
        }
        payload
    }

    // ----- reset -----

    /// Restore defaults and clear every derived flag
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        let default_rows = self.defaults.ph_numbers.len();
        self.bindings
            .retain(|path, _| path.array_index().map_or(true, |i| i < default_rows));
        self.errors.clear();
        self.dirty.clear();
        self.touched.clear();
        self.focused = None;
        self.status = SubmitStatus::default();

        let sources: BTreeSet<FieldPath> = self.subscriptions.iter().map(|s| s.source).collect();
        for source in sources {
            self.notify(source);
        }
        self.publish();
        tracing::info!("Form reset to defaults");
    }

    // ----- field arrays -----

    pub fn array_len(&self, name: FieldArrayName) -> usize {
        match name {
            FieldArrayName::PhNumbers => self.values.ph_numbers.len(),
        }
    }

    /// Append a row; returns its index
    pub fn append_entry(&mut self, name: FieldArrayName, entry: PhNumber) -> usize {
        let index = match name {
            FieldArrayName::PhNumbers => {
                self.values.ph_numbers.push(entry);
                self.values.ph_numbers.len() - 1
            }
        };
        let path = name.row(index);
        if let Some(rules) = self.row_rules.get(&name) {
            self.bindings.insert(
                path,
                Binding {
                    rules: rules(index),
                },
            );
        }
        self.update_dirty(path);
        self.publish();
        tracing::debug!("Appended {path}");
        index
    }

    /// Remove the row at `index`. The first row is protected; returns
    /// whether a row was removed.
    pub fn remove_entry(&mut self, name: FieldArrayName, index: usize) -> bool {
        let len = self.array_len(name);
        if index == 0 || index >= len {
            tracing::debug!("Ignoring removal of {name}[{index}] (len {len})");
            return false;
        }
        match name {
            FieldArrayName::PhNumbers => {
                self.values.ph_numbers.remove(index);
            }
        }

        shift_rows(&mut self.errors, index);
        self.dirty = shift_set(&self.dirty, index);
        self.touched = shift_set(&self.touched, index);
        if let Some(focused) = self.focused {
            self.focused = shift_path(focused, index);
        }

        match self.row_rules.get(&name).cloned() {
            Some(rules) => {
                self.bindings.retain(|path, _| path.array_index().map_or(true, |i| i < index));
                for i in index..len - 1 {
                    self.bindings.insert(name.row(i), Binding { rules: rules(i) });
                }
            }
            None => shift_rows(&mut self.bindings, index),
        }

        self.publish();
        tracing::debug!("Removed {name}[{index}]");
        true
    }

    // ----- derived state -----

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, path: FieldPath) -> Option<&FieldError> {
        self.errors.get(&path)
    }

    pub fn is_disabled(&self, path: FieldPath) -> bool {
        self.disabled.contains(&path)
    }

    /// Current values pass every synchronous rule of the enabled fields and
    /// no error is recorded. Async verdicts count once a validation stored them.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
            && self
                .bindings
                .iter()
                .filter(|(path, _)| !self.disabled.contains(path))
                .all(|(path, binding)| match self.values.get(*path) {
                    Some(value) => binding.rules.iter().all(|rule| rule.check(&value).is_none()),
                    None => true,
                })
    }

    /// Any field differs from its default, or the field array changed size
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty() || self.values.ph_numbers.len() != self.defaults.ph_numbers.len()
    }

    pub fn dirty_fields(&self) -> &BTreeSet<FieldPath> {
        &self.dirty
    }

    pub fn touched_fields(&self) -> &BTreeSet<FieldPath> {
        &self.touched
    }

    pub fn is_touched(&self, path: FieldPath) -> bool {
        self.touched.contains(&path)
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }
}

/// Path after removing row `removed`; `None` for the removed row itself
fn shift_path(path: FieldPath, removed: usize) -> Option<FieldPath> {
    match path {
        FieldPath::PhNumber(i) if i == removed => None,
        FieldPath::PhNumber(i) if i > removed => Some(FieldPath::PhNumber(i - 1)),
        other => Some(other),
    }
}

fn shift_rows<T>(map: &mut BTreeMap<FieldPath, T>, removed: usize) {
    let old = std::mem::take(map);
    map.extend(
        old.into_iter()
            .filter_map(|(path, value)| shift_path(path, removed).map(|p| (p, value))),
    );
}

fn shift_set(set: &BTreeSet<FieldPath>, removed: usize) -> BTreeSet<FieldPath> {
    set.iter().filter_map(|p| shift_path(*p, removed)).collect()
}

/// Remove the value at a JSON pointer (object key or array slot)
fn remove_pointer(value: &mut serde_json::Value, pointer: &str) {
    let Some((parent, key)) = pointer.rsplit_once('/') else {
        return;
    };
    match value.pointer_mut(parent) {
        Some(serde_json::Value::Object(map)) => {
            map.remove(key);
        }
        Some(serde_json::Value::Array(items)) => {
            if let Some(slot) = key.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                *slot = serde_json::Value::Null;
            }
        }
        _ => {}
    }
}
