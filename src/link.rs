//! Per-table controller.
//!
//! A [`StateLink`] ties one table instance to the shared fragment: on bind
//! it restores the table from its existing token, and thereafter every
//! trigger event recomputes the complete token and writes it back through
//! the gateway's merge-preserving update.
//!
//! # Lifecycle
//!
//! Uninitialized -> Listening -> (Listening <-> Suppressed)
//!
//! Construction ([`StateLink::bind`]) collects the enabled-condition set
//! (wanted by configuration and applicable to this table), attaches change
//! listeners unless configured not to, applies the decoded token, and issues
//! at most one redraw. [`detach_events`](StateLink::detach_events) moves the
//! link to Suppressed (state changes no longer reach the fragment);
//! [`attach_events`](StateLink::attach_events) moves it back.
//!
//! There is no teardown protocol beyond detaching listeners: every listener
//! holds only a weak reference to the link, so dropping the last strong
//! handle quietly disarms whatever is still attached.
//!
//! # Writes are full-state
//!
//! Rapid back-to-back events are not debounced. Each trigger independently
//! recomputes the *complete* current state, so out-of-order writes
//! self-correct - the last write wins and is never a stale partial.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fraglink::config::LinkConfig;
//! use fraglink::fragment::{FragmentGateway, MemoryLocation};
//! use fraglink::link::StateLink;
//! use fraglink::table::TableView;
//! use fraglink::testing::StubTable;
//!
//! let gateway = FragmentGateway::new(Arc::new(MemoryLocation::default()));
//! let table = Arc::new(StubTable::new("orders"));
//!
//! let link = StateLink::bind(table.clone(), gateway.clone(), LinkConfig::default()).unwrap();
//! table.set_page(2);
//! link.write_token();
//! assert_eq!(gateway.fragment(), "orders=p2");
//! ```

use crate::conditions::{split_token, ConditionRegistry, Redraw, TableContext};
use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::fragment::FragmentGateway;
use crate::table::{Subscription, TableDefaults, TableView};
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::{Arc, Weak};

/// Subscriptions tagged with the condition that owns them, so single-
/// condition detach removes exactly its own listeners.
type TaggedSubscriptions = SmallVec<[(&'static str, Subscription); 8]>;

struct LinkInner {
    /// Names of managed conditions, kept in registry order.
    enabled: Vec<&'static str>,
    /// Live listener handles, one per (condition, trigger event).
    subscriptions: TaggedSubscriptions,
}

/// Controller binding one table instance to the shared fragment.
pub struct StateLink {
    table: Arc<dyn TableView>,
    gateway: FragmentGateway,
    registry: Arc<ConditionRegistry>,
    defaults: TableDefaults,
    /// Handed to listeners so a dropped link disarms them instead of
    /// keeping itself alive through the host's listener storage.
    weak_self: Weak<StateLink>,
    inner: RwLock<LinkInner>,
}

impl std::fmt::Debug for StateLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateLink")
            .field("enabled", &self.inner.read().enabled)
            .finish_non_exhaustive()
    }
}

impl StateLink {
    /// Bind a table with the standard condition catalog.
    pub fn bind(
        table: Arc<dyn TableView>,
        gateway: FragmentGateway,
        config: LinkConfig,
    ) -> Result<Arc<Self>, LinkError> {
        Self::bind_with_registry(table, gateway, config, Arc::new(ConditionRegistry::standard()))
    }

    /// Bind a table against a custom condition catalog.
    pub fn bind_with_registry(
        table: Arc<dyn TableView>,
        gateway: FragmentGateway,
        config: LinkConfig,
        registry: Arc<ConditionRegistry>,
    ) -> Result<Arc<Self>, LinkError> {
        let defaults = TableDefaults::resolve(&*table);
        let Some(options) = config.resolve() else {
            // Deep linking is off for this table: empty enabled set, no
            // listeners, no initial apply.
            return Ok(Arc::new_cyclic(|weak| Self {
                table,
                gateway,
                registry,
                defaults,
                weak_self: weak.clone(),
                inner: RwLock::new(LinkInner {
                    enabled: Vec::new(),
                    subscriptions: SmallVec::new(),
                }),
            }));
        };

        // Wanted set: explicitly selected conditions, or everything.
        let wanted: Option<Vec<&'static str>> = match &options.conditions {
            Some(selector) => {
                let mut names = Vec::new();
                for spec in selector.specs() {
                    let condition = registry
                        .find(&spec)
                        .ok_or_else(|| LinkError::UnknownCondition(spec.clone()))?;
                    names.push(condition.name());
                }
                Some(names)
            }
            None => None,
        };

        // Enabled set: wanted and applicable, in registry order.
        let ctx = TableContext {
            table: &*table,
            defaults: &defaults,
        };
        let enabled: Vec<&'static str> = registry
            .iter()
            .filter(|condition| match &wanted {
                Some(names) => names.contains(&condition.name()),
                None => true,
            })
            .filter(|condition| condition.is_applicable(&ctx))
            .map(|condition| condition.name())
            .collect();

        let link = Arc::new_cyclic(|weak| Self {
            table,
            gateway,
            registry,
            defaults,
            weak_self: weak.clone(),
            inner: RwLock::new(LinkInner {
                enabled,
                subscriptions: SmallVec::new(),
            }),
        });

        if options.attach_events && !link.inner.read().enabled.is_empty() {
            link.attach_events()?;
        }
        link.apply_from_fragment();
        Ok(link)
    }

    /// The initial-load pass: decode this table's token and apply each entry.
    ///
    /// Anomalies (unknown key characters, malformed values) are logged and
    /// skipped; the rest of the token still applies. Issues at most one
    /// redraw, after every entry has been applied.
    fn apply_from_fragment(&self) {
        let id = self.table.id();
        let Some(token) = self.gateway.read_token(&id) else {
            return;
        };
        let enabled = self.inner.read().enabled.clone();
        let ctx = TableContext {
            table: &*self.table,
            defaults: &self.defaults,
        };
        let mut redraw_needed = false;
        for (key, value) in split_token(&token) {
            let Some(condition) = self.registry.by_key(key) else {
                tracing::warn!(table = %id, %key, "token entry has no matching condition, skipping");
                continue;
            };
            if !enabled.contains(&condition.name()) {
                tracing::debug!(
                    table = %id,
                    condition = condition.name(),
                    "token entry for a condition not under management, skipping"
                );
                continue;
            }
            match condition.deserialize(&ctx, value) {
                Ok(Redraw::Required) => redraw_needed = true,
                Ok(Redraw::NotRequired) => {}
                Err(err) => {
                    tracing::warn!(
                        table = %id,
                        condition = condition.name(),
                        %value,
                        error = %err,
                        "failed to apply token entry, skipping"
                    );
                }
            }
        }
        if redraw_needed {
            self.table.redraw();
        }
    }

    /// Compose the complete token for the table's current state.
    ///
    /// Iterates enabled conditions in registry order, skipping any whose
    /// value is still the default and any that decline to serialize.
    pub fn compose_token(&self) -> String {
        let enabled = self.inner.read().enabled.clone();
        let ctx = TableContext {
            table: &*self.table,
            defaults: &self.defaults,
        };
        let mut entries: Vec<String> = Vec::new();
        for condition in self.registry.iter() {
            if !enabled.contains(&condition.name()) {
                continue;
            }
            if !condition.is_non_default(&ctx) {
                continue;
            }
            if let Some(value) = condition.serialize(&ctx) {
                entries.push(format!("{}{}", condition.key(), value));
            }
        }
        entries.join(":")
    }

    /// Compose the current token and write it through the gateway,
    /// preserving every other table's entry untouched.
    pub fn write_token(&self) {
        let token = self.compose_token();
        self.gateway.write_token(&self.table.id(), &token);
    }

    /// Add a condition (by name or key character) to the enabled set.
    ///
    /// Does not attach listeners and does not rewrite the fragment; both
    /// remain separate explicit operations.
    pub fn enable(&self, condition: &str) -> Result<(), LinkError> {
        let name = self.resolve_name(condition)?;
        let mut inner = self.inner.write();
        if !inner.enabled.contains(&name) {
            inner.enabled.push(name);
            let order: Vec<&'static str> =
                self.registry.iter().map(|c| c.name()).collect();
            inner
                .enabled
                .sort_by_key(|n| order.iter().position(|o| o == n));
        }
        Ok(())
    }

    /// Remove a condition (by name or key character) from the enabled set.
    pub fn disable(&self, condition: &str) -> Result<(), LinkError> {
        let name = self.resolve_name(condition)?;
        self.inner.write().enabled.retain(|&n| n != name);
        Ok(())
    }

    /// Enable several conditions at once.
    pub fn enable_many<I, S>(&self, conditions: I) -> Result<(), LinkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for condition in conditions {
            self.enable(condition.as_ref())?;
        }
        Ok(())
    }

    /// Disable several conditions at once.
    pub fn disable_many<I, S>(&self, conditions: I) -> Result<(), LinkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for condition in conditions {
            self.disable(condition.as_ref())?;
        }
        Ok(())
    }

    /// Attach change listeners for every enabled condition's trigger events.
    ///
    /// Always detaches existing listeners first, so repeated calls never
    /// stack duplicate notifications. Fails with
    /// [`LinkError::NoEnabledConditions`] when nothing is enabled.
    pub fn attach_events(&self) -> Result<(), LinkError> {
        let enabled = self.inner.read().enabled.clone();
        if enabled.is_empty() {
            return Err(LinkError::NoEnabledConditions);
        }
        self.detach_all();
        let mut subscriptions = TaggedSubscriptions::new();
        for name in enabled {
            if let Some(condition) = self.registry.by_name(name) {
                for event in condition.trigger_events() {
                    subscriptions.push((name, self.subscribe(event)));
                }
            }
        }
        tracing::debug!(table = %self.table.id(), count = subscriptions.len(), "listeners attached");
        self.inner.write().subscriptions = subscriptions;
        Ok(())
    }

    /// Detach every listener this link attached.
    ///
    /// Fails with [`LinkError::NoEnabledConditions`] when nothing is
    /// enabled - a detach with nothing to manage is a configuration mistake.
    pub fn detach_events(&self) -> Result<(), LinkError> {
        if self.inner.read().enabled.is_empty() {
            return Err(LinkError::NoEnabledConditions);
        }
        self.detach_all();
        Ok(())
    }

    /// Attach listeners for a single condition's trigger events.
    ///
    /// Existing listeners for that condition are detached first, so the
    /// call is safe to repeat.
    pub fn attach_event(&self, condition: &str) -> Result<(), LinkError> {
        let name = self.resolve_name(condition)?;
        self.detach_condition(name);
        let Some(condition) = self.registry.by_name(name) else {
            return Err(LinkError::UnknownCondition(name.to_string()));
        };
        let mut fresh: TaggedSubscriptions = SmallVec::new();
        for event in condition.trigger_events() {
            fresh.push((name, self.subscribe(event)));
        }
        self.inner.write().subscriptions.extend(fresh);
        Ok(())
    }

    /// Detach the listeners for a single condition.
    pub fn detach_event(&self, condition: &str) -> Result<(), LinkError> {
        let name = self.resolve_name(condition)?;
        self.detach_condition(name);
        Ok(())
    }

    /// Names of the enabled conditions, in registry (token entry) order.
    pub fn enabled_conditions(&self) -> Vec<&'static str> {
        self.inner.read().enabled.clone()
    }

    /// Whether any change listeners are currently attached.
    pub fn is_listening(&self) -> bool {
        !self.inner.read().subscriptions.is_empty()
    }

    /// The gateway this link writes through.
    pub fn gateway(&self) -> &FragmentGateway {
        &self.gateway
    }

    /// The table this link manages.
    pub fn table(&self) -> &Arc<dyn TableView> {
        &self.table
    }

    fn resolve_name(&self, condition: &str) -> Result<&'static str, LinkError> {
        self.registry
            .find(condition)
            .map(|c| c.name())
            .ok_or_else(|| LinkError::UnknownCondition(condition.to_string()))
    }

    fn subscribe(&self, event: &str) -> Subscription {
        let weak = self.weak_self.clone();
        self.table.on(
            event,
            Arc::new(move || {
                if let Some(link) = weak.upgrade() {
                    link.write_token();
                }
            }),
        )
    }

    fn detach_all(&self) {
        let subscriptions = std::mem::take(&mut self.inner.write().subscriptions);
        for (_, subscription) in &subscriptions {
            self.table.off(subscription);
        }
    }

    fn detach_condition(&self, name: &'static str) {
        let mut detached: Vec<Subscription> = Vec::new();
        {
            let mut inner = self.inner.write();
            inner.subscriptions.retain(|(owner, subscription)| {
                if *owner == name {
                    detached.push(subscription.clone());
                    false
                } else {
                    true
                }
            });
        }
        for subscription in &detached {
            self.table.off(subscription);
        }
    }
}
