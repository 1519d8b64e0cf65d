// libril/src/icc/mod.rs

//! SIM card state machine.
//!
//! [`IccCard`] listens for radio and SIM status events on the engine's bus,
//! polls the card status, derives a [`CardLifecycleState`] and tells its
//! registrants and collaborators about transitions. All recomputes happen on
//! the engine's reader thread, so they never interleave.

pub mod builder;
pub mod collaborators;
pub mod state;
pub mod status;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};

pub use builder::IccCardBuilder;
pub use collaborators::{FileHandler, MemoryPropertyStore, Noop, PropertyStore, StateBroadcaster};
pub use state::{
    consolidate, derive_state, plan_transition, CardLifecycleState, CardMode, ConsolidationPolicy,
    LockReason, Notification, PhoneType, SubscriptionSource, TransitionPlan,
};
pub use status::{
    AppState, AppType, Application, CardState, CardStatus, PersoSubstate, PinState, RetryCounts,
};

use crate::bus::{Event, Handler, RegistrantList, RegistrationId, Subscription};
use crate::constants::{
    CB_FACILITY_BA_FD, CB_FACILITY_BA_SIM, INTENT_VALUE_ICC_NOT_READY, PROPERTY_SIM_STATE,
    SERVICE_CLASS_FDN, SERVICE_CLASS_LOCK,
};
use crate::engine::pending::completion_pair;
use crate::engine::{Engine, PendingResponse, Waiter};
use crate::protocol::commands::Command;
use crate::protocol::responses::DecodedValue;
use crate::types::{EventKind, RadioState};
use crate::utils::lock;
use crate::Result;

/// Which registrant list a registration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardNotice {
    Ready,
    Absent,
    /// PIN or PUK required; the handler sees which.
    Locked,
    NetworkLocked,
    RuimReady,
}

/// Returned by the `register_for_*` calls; pass back to `unregister`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardRegistration {
    notice: CardNotice,
    id: RegistrationId,
}

impl CardRegistration {
    pub fn notice(&self) -> CardNotice {
        self.notice
    }
}

struct CardCore {
    state: CardLifecycleState,
    ruim_state: CardLifecycleState,
    status: Option<Arc<CardStatus>>,
    /// Sequence number of the last snapshot applied.
    applied_seq: u64,
    pin_lock_enabled: bool,
    fdn_enabled: bool,
}

impl Default for CardCore {
    fn default() -> Self {
        Self {
            state: CardLifecycleState::Unknown,
            ruim_state: CardLifecycleState::Unknown,
            status: None,
            applied_seq: 0,
            pin_lock_enabled: true,
            fdn_enabled: false,
        }
    }
}

#[derive(Default)]
struct Registrants {
    ready: RegistrantList<CardLifecycleState>,
    absent: RegistrantList<CardLifecycleState>,
    locked: RegistrantList<CardLifecycleState>,
    network_locked: RegistrantList<CardLifecycleState>,
    ruim_ready: RegistrantList<CardLifecycleState>,
}

impl Registrants {
    fn list(&self, notice: CardNotice) -> &RegistrantList<CardLifecycleState> {
        match notice {
            CardNotice::Ready => &self.ready,
            CardNotice::Absent => &self.absent,
            CardNotice::Locked => &self.locked,
            CardNotice::NetworkLocked => &self.network_locked,
            CardNotice::RuimReady => &self.ruim_ready,
        }
    }
}

/// Result of one recompute, executed after the core lock is released.
struct Outcome {
    state: CardLifecycleState,
    plan: TransitionPlan,
    aid: Option<String>,
}

struct Inner {
    engine: Engine,
    mode: Mutex<CardMode>,
    file_handler: Arc<dyn FileHandler>,
    broadcaster: Arc<dyn StateBroadcaster>,
    properties: Arc<dyn PropertyStore>,
    core: Mutex<CardCore>,
    next_seq: AtomicU64,
    registrants: Registrants,
    subscriptions: Mutex<Vec<Subscription>>,
    disposed: AtomicBool,
}

/// SIM card lifecycle tracker bound to one engine.
pub struct IccCard {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for IccCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IccCard")
            .field("state", &self.get_state())
            .field("mode", &self.mode())
            .finish()
    }
}

impl IccCard {
    pub fn builder(engine: Engine) -> IccCardBuilder {
        IccCardBuilder::new(engine)
    }

    pub(crate) fn attach(
        engine: Engine,
        mode: CardMode,
        file_handler: Arc<dyn FileHandler>,
        broadcaster: Arc<dyn StateBroadcaster>,
        properties: Arc<dyn PropertyStore>,
    ) -> Self {
        let inner = Arc::new(Inner {
            engine,
            mode: Mutex::new(mode),
            file_handler,
            broadcaster,
            properties,
            core: Mutex::new(CardCore::default()),
            next_seq: AtomicU64::new(0),
            registrants: Registrants::default(),
            subscriptions: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&inner);
        let radio = inner.engine.subscribe(EventKind::RadioStateChanged, move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_radio_state(event);
            }
        });
        let weak = Arc::downgrade(&inner);
        let sim = inner.engine.subscribe(EventKind::SimStatusChanged, move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.poll_logged();
            }
        });
        lock(&inner.subscriptions).extend([radio, sim]);

        if inner.engine.radio_state().is_on() {
            inner.poll_logged();
        }
        Self { inner }
    }

    pub fn get_state(&self) -> CardLifecycleState {
        lock(&self.inner.core).state
    }

    /// State of the RUIM/CSIM application.
    pub fn get_ruim_state(&self) -> CardLifecycleState {
        lock(&self.inner.core).ruim_state
    }

    /// Whether the SIM PIN lock is on. Assumed on until queried.
    pub fn get_pin_lock_enabled(&self) -> bool {
        lock(&self.inner.core).pin_lock_enabled
    }

    pub fn get_fdn_enabled(&self) -> bool {
        lock(&self.inner.core).fdn_enabled
    }

    pub fn mode(&self) -> CardMode {
        *lock(&self.inner.mode)
    }

    /// Last applied card status, if any.
    pub fn card_status(&self) -> Option<Arc<CardStatus>> {
        lock(&self.inner.core).status.clone()
    }

    /// False until a card status has been received.
    pub fn has_icc_card(&self) -> bool {
        match self.card_status() {
            Some(status) => status.has_card(),
            None => {
                debug!("no card status yet");
                false
            }
        }
    }

    pub fn is_application_on_icc(&self, app_type: AppType) -> bool {
        self.card_status()
            .map(|s| s.has_application_type(app_type))
            .unwrap_or(false)
    }

    /// AID of the subscription application.
    pub fn get_aid(&self) -> Option<String> {
        self.inner.aid()
    }

    /// Request a fresh card status; returns the request serial.
    pub fn poll_status(&self) -> Result<u32> {
        self.inner.poll()
    }

    /// Switch the CDMA subscription source. The state follows once the
    /// card status requested here has been applied on the reader thread.
    pub fn set_subscription_source(&self, source: SubscriptionSource) {
        {
            let mut mode = lock(&self.inner.mode);
            if mode.subscription_source == source {
                return;
            }
            mode.subscription_source = source;
        }
        info!("subscription source now {}", source);
        self.inner.poll_logged();
    }

    pub fn supply_pin(&self, pin: &str) -> Result<PendingResponse> {
        let aid = self.get_aid();
        self.send_then_repoll(Command::EnterSimPin {
            pin: pin.to_string(),
            aid,
        })
    }

    pub fn supply_puk(&self, puk: &str, new_pin: &str) -> Result<PendingResponse> {
        let aid = self.get_aid();
        self.send_then_repoll(Command::EnterSimPuk {
            puk: puk.to_string(),
            new_pin: new_pin.to_string(),
            aid,
        })
    }

    pub fn supply_pin2(&self, pin2: &str) -> Result<PendingResponse> {
        let aid = self.get_aid();
        self.send_then_repoll(Command::EnterSimPin2 {
            pin2: pin2.to_string(),
            aid,
        })
    }

    pub fn supply_puk2(&self, puk2: &str, new_pin2: &str) -> Result<PendingResponse> {
        let aid = self.get_aid();
        self.send_then_repoll(Command::EnterSimPuk2 {
            puk2: puk2.to_string(),
            new_pin2: new_pin2.to_string(),
            aid,
        })
    }

    pub fn supply_network_depersonalization(&self, code: &str) -> Result<PendingResponse> {
        self.send_then_repoll(Command::EnterNetworkDepersonalization {
            code: code.to_string(),
        })
    }

    /// Toggle the SIM PIN lock. The cached flag follows on success.
    pub fn set_pin_lock_enabled(&self, enabled: bool, password: &str) -> Result<PendingResponse> {
        let command = Command::SetFacilityLock {
            facility: CB_FACILITY_BA_SIM.to_string(),
            enable: enabled,
            password: password.to_string(),
            service_class: SERVICE_CLASS_LOCK,
            aid: self.get_aid(),
        };
        self.send_tracked(command, move |core| core.pin_lock_enabled = enabled)
    }

    /// Toggle fixed dialing. The cached flag follows on success.
    pub fn set_fdn_enabled(&self, enabled: bool, password: &str) -> Result<PendingResponse> {
        let command = Command::SetFacilityLock {
            facility: CB_FACILITY_BA_FD.to_string(),
            enable: enabled,
            password: password.to_string(),
            service_class: SERVICE_CLASS_FDN,
            aid: self.get_aid(),
        };
        self.send_tracked(command, move |core| core.fdn_enabled = enabled)
    }

    pub fn change_pin(&self, old_pin: &str, new_pin: &str) -> Result<PendingResponse> {
        self.inner.engine.send(Command::ChangeSimPin {
            old_pin: old_pin.to_string(),
            new_pin: new_pin.to_string(),
            aid: self.get_aid(),
        })
    }

    pub fn change_pin2(&self, old_pin2: &str, new_pin2: &str) -> Result<PendingResponse> {
        self.inner.engine.send(Command::ChangeSimPin2 {
            old_pin2: old_pin2.to_string(),
            new_pin2: new_pin2.to_string(),
            aid: self.get_aid(),
        })
    }

    /// Send `command`; once it completes, re-poll the card status, apply it,
    /// and only then hand the command's result to the caller.
    fn send_then_repoll(&self, command: Command) -> Result<PendingResponse> {
        let kind = command.kind();
        let (waiter, rx) = completion_pair();
        let weak = Arc::downgrade(&self.inner);
        let serial = self.inner.engine.send_with(command, move |result| match weak.upgrade() {
            Some(inner) => inner.repoll_then_complete(waiter, result),
            None => waiter.complete(result),
        })?;
        Ok(PendingResponse::new(serial, kind, rx))
    }

    /// Send `command` and apply `on_success` to the cached flags before the
    /// caller sees a successful result.
    fn send_tracked<F>(&self, command: Command, on_success: F) -> Result<PendingResponse>
    where
        F: FnOnce(&mut CardCore) + Send + 'static,
    {
        let kind = command.kind();
        let (waiter, rx) = completion_pair();
        let weak = Arc::downgrade(&self.inner);
        let serial = self.inner.engine.send_with(command, move |result| {
            if result.is_ok() {
                if let Some(inner) = weak.upgrade() {
                    on_success(&mut lock(&inner.core));
                }
            }
            waiter.complete(result);
        })?;
        Ok(PendingResponse::new(serial, kind, rx))
    }

    pub fn register_for_ready<F>(&self, handler: F) -> CardRegistration
    where
        F: Fn(&CardLifecycleState) + Send + Sync + 'static,
    {
        self.register(CardNotice::Ready, Arc::new(handler))
    }

    pub fn register_for_absent<F>(&self, handler: F) -> CardRegistration
    where
        F: Fn(&CardLifecycleState) + Send + Sync + 'static,
    {
        self.register(CardNotice::Absent, Arc::new(handler))
    }

    /// Handlers receive `PinRequired` or `PukRequired`.
    pub fn register_for_locked<F>(&self, handler: F) -> CardRegistration
    where
        F: Fn(&CardLifecycleState) + Send + Sync + 'static,
    {
        self.register(CardNotice::Locked, Arc::new(handler))
    }

    pub fn register_for_network_locked<F>(&self, handler: F) -> CardRegistration
    where
        F: Fn(&CardLifecycleState) + Send + Sync + 'static,
    {
        self.register(CardNotice::NetworkLocked, Arc::new(handler))
    }

    pub fn register_for_ruim_ready<F>(&self, handler: F) -> CardRegistration
    where
        F: Fn(&CardLifecycleState) + Send + Sync + 'static,
    {
        self.register(CardNotice::RuimReady, Arc::new(handler))
    }

    /// Add a handler; if the card is already in the matching state the
    /// handler is called right away.
    fn register(&self, notice: CardNotice, handler: Handler<CardLifecycleState>) -> CardRegistration {
        let (id, current) = {
            let core = lock(&self.inner.core);
            let id = self.inner.registrants.list(notice).add(handler.clone());
            let current = match notice {
                CardNotice::Ready => (core.state == CardLifecycleState::Ready).then_some(core.state),
                CardNotice::Absent => (core.state == CardLifecycleState::Absent).then_some(core.state),
                CardNotice::Locked => core.state.is_pin_locked().then_some(core.state),
                CardNotice::NetworkLocked => {
                    (core.state == CardLifecycleState::NetworkLocked).then_some(core.state)
                }
                CardNotice::RuimReady => (core.ruim_state == CardLifecycleState::Ready)
                    .then_some(CardLifecycleState::Ready),
            };
            (id, current)
        };
        if let Some(state) = current {
            if catch_unwind(AssertUnwindSafe(|| handler(&state))).is_err() {
                error!("{:?} handler panicked on registration", notice);
            }
        }
        CardRegistration { notice, id }
    }

    pub fn unregister(&self, registration: &CardRegistration) -> bool {
        self.inner
            .registrants
            .list(registration.notice)
            .remove(registration.id)
    }

    /// Stop listening to the engine. Also done on drop.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let subscriptions: Vec<Subscription> = lock(&self.inner.subscriptions).drain(..).collect();
        for subscription in &subscriptions {
            self.inner.engine.unsubscribe(subscription);
        }
        debug!("card disposed");
    }
}

impl Drop for IccCard {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Inner {
    fn aid(&self) -> Option<String> {
        let mode = *lock(&self.mode);
        let core = lock(&self.core);
        core.status
            .as_deref()
            .and_then(|s| state::subscription_application(s, &mode))
            .map(|app| app.aid.clone())
    }

    fn on_radio_state(self: &Arc<Self>, event: &Event) {
        match event.value.as_radio_state() {
            Some(radio) if radio.is_on() => self.poll_logged(),
            Some(_) => self.radio_off(),
            None => warn!("radio state event without a state: {:?}", event.value),
        }
    }

    /// Radio off or unavailable: the card state is unknown until the next
    /// poll. Snapshots requested before this point are discarded.
    fn radio_off(&self) {
        {
            let mut core = lock(&self.core);
            core.state = CardLifecycleState::Unknown;
            core.ruim_state = CardLifecycleState::Unknown;
            core.applied_seq = self.next_seq.load(Ordering::SeqCst);
        }
        info!("radio off or unavailable, card state {}", CardLifecycleState::Unknown);
        self.properties
            .set_property(PROPERTY_SIM_STATE, &CardLifecycleState::Unknown.to_string());
        self.broadcaster.broadcast(INTENT_VALUE_ICC_NOT_READY, None);
    }

    fn poll(self: &Arc<Self>) -> Result<u32> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let weak = Arc::downgrade(self);
        self.engine.send_with(Command::GetSimStatus, move |result| {
            if let Some(inner) = weak.upgrade() {
                inner.on_card_status(seq, result);
            }
        })
    }

    fn poll_logged(self: &Arc<Self>) {
        if let Err(e) = self.poll() {
            warn!("card status poll failed: {}", e);
        }
    }

    fn repoll_then_complete(self: &Arc<Self>, waiter: Waiter, result: Result<DecodedValue>) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let weak = Arc::downgrade(self);
        // the completion runs exactly once: after the re-poll, or here if
        // the re-poll could not be sent
        let slot = Arc::new(Mutex::new(Some((waiter, result))));
        let deferred = slot.clone();
        let sent = self.engine.send_with(Command::GetSimStatus, move |status| {
            if let Some(inner) = weak.upgrade() {
                inner.on_card_status(seq, status);
            }
            if let Some((waiter, result)) = lock(&deferred).take() {
                waiter.complete(result);
            }
        });
        if let Err(e) = sent {
            warn!("card status re-poll failed: {}", e);
            if let Some((waiter, result)) = lock(&slot).take() {
                waiter.complete(result);
            }
        }
    }

    fn on_card_status(self: &Arc<Self>, seq: u64, result: Result<DecodedValue>) {
        match result {
            Ok(DecodedValue::CardStatus(status)) => self.apply_snapshot(seq, status),
            Ok(other) => error!("unexpected card status payload: {:?}", other),
            Err(e) => error!("get card status failed: {}", e),
        }
    }

    fn apply_snapshot(self: &Arc<Self>, seq: u64, status: Arc<CardStatus>) {
        let mode = *lock(&self.mode);
        let radio = self.engine.radio_state();
        let outcome = {
            let mut core = lock(&self.core);
            if seq <= core.applied_seq {
                debug!(
                    "discarding stale card status #{} (applied #{})",
                    seq, core.applied_seq
                );
                return;
            }
            core.applied_seq = seq;
            core.status = Some(status);
            Self::recompute(&mut core, radio, mode)
        };
        self.execute(outcome);
    }

    fn recompute(core: &mut CardCore, radio: RadioState, mode: CardMode) -> Outcome {
        let old = core.state;
        let old_ruim = core.ruim_state;
        let new = state::derive_state(core.status.as_deref(), radio, mode);
        let new_ruim = state::derive_ruim_state(core.status.as_deref(), radio);
        core.state = new;
        core.ruim_state = new_ruim;
        if old != new {
            info!("card state {} -> {}", old, new);
        }
        let aid = core
            .status
            .as_deref()
            .and_then(|s| state::subscription_application(s, &mode))
            .map(|app| app.aid.clone());
        Outcome {
            state: new,
            plan: plan_transition(old, new, old_ruim, new_ruim, mode),
            aid,
        }
    }

    fn execute(self: &Arc<Self>, outcome: Outcome) {
        let Outcome { state, plan, aid } = outcome;
        self.properties
            .set_property(PROPERTY_SIM_STATE, &state.to_string());

        for notification in &plan.notifications {
            match notification {
                Notification::Ready => {
                    self.registrants.ready.notify(&state);
                }
                Notification::Locked(_) => {
                    self.registrants.locked.notify(&state);
                }
                Notification::Absent => {
                    self.registrants.absent.notify(&state);
                }
                Notification::NetworkLocked => {
                    self.registrants.network_locked.notify(&state);
                }
                Notification::RuimReady => {
                    self.registrants.ruim_ready.notify(&CardLifecycleState::Ready);
                }
                Notification::CardRemoved => self.broadcaster.card_swapped(false),
                Notification::CardAdded => self.broadcaster.card_swapped(true),
                Notification::PermanentlyDisabled => {}
            }
            if let Some((value, reason)) = notification.broadcast() {
                self.broadcaster.broadcast(value, reason);
            }
        }

        if plan.select_aid {
            match aid.as_deref() {
                Some(aid) => self.file_handler.select_application(aid),
                None => warn!("no subscription application to select"),
            }
        }
        if plan.load_records {
            self.file_handler.load_records();
        }
        if plan.query_pin_lock {
            self.query_facility(CB_FACILITY_BA_SIM);
        }
        if plan.query_fdn {
            self.query_facility(CB_FACILITY_BA_FD);
        }
    }

    fn query_facility(self: &Arc<Self>, facility: &'static str) {
        let command = Command::QueryFacilityLock {
            facility: facility.to_string(),
            password: String::new(),
            service_class: SERVICE_CLASS_LOCK,
            aid: self.aid(),
        };
        let weak = Arc::downgrade(self);
        let sent = self.engine.send_with(command, move |result| {
            if let Some(inner) = weak.upgrade() {
                inner.on_facility_lock(facility, result);
            }
        });
        if let Err(e) = sent {
            warn!("facility {} query not sent: {}", facility, e);
        }
    }

    fn on_facility_lock(&self, facility: &str, result: Result<DecodedValue>) {
        let flag = match result {
            Ok(value) => value.as_ints().and_then(|ints| ints.first().copied()),
            Err(e) => {
                error!("facility {} query failed: {}", facility, e);
                return;
            }
        };
        let Some(flag) = flag else {
            error!("facility {} query returned no value", facility);
            return;
        };
        let enabled = flag != 0;
        let mut core = lock(&self.core);
        if facility == CB_FACILITY_BA_FD {
            core.fdn_enabled = enabled;
        } else {
            core.pin_lock_enabled = enabled;
        }
        debug!("facility {} enabled={}", facility, enabled);
    }
}
