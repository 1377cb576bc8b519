//! The session store: who is signed in, right now.
//!
//! Readers take a lock-free snapshot through [`SessionStore::current`]. Writers
//! are serialized and always swap a whole [`SessionSnapshot`], so a reader sees
//! principal and credential together or neither of them.

use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use bookportal_core::{Credential, Principal, Session};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::storage::{MemorySessionStorage, SessionStorage};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Change notifications published by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Persisted state was read. `authenticated` tells whether a session was found.
    Initialized { authenticated: bool },
    SignedIn(Principal),
    /// Name or e-mail of the current principal changed.
    Updated(Principal),
    SignedOut,
    /// The API rejected the credential and the session was dropped.
    Expired,
}

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    session: Option<Arc<Session>>,
    initialized: bool,
    generation: u64,
}

impl SessionSnapshot {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_deref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.session.as_deref().map(|s| &s.principal)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.session.as_deref().map(|s| &s.credential)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Increments whenever the credential changes (sign-in, sign-out, expiry).
    ///
    /// Profile updates keep the credential and therefore the generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Inner {
    state: ArcSwap<SessionSnapshot>,
    storage: Box<dyn SessionStorage>,
    write_lock: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared handle to the session. Clones point at the same store.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current();
        f.debug_struct("SessionStore")
            .field("initialized", &current.is_initialized())
            .field("authenticated", &current.is_authenticated())
            .field("generation", &current.generation())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: ArcSwap::from_pointee(SessionSnapshot::default()),
                storage: Box::new(storage),
                write_lock: Mutex::new(()),
                events,
            }),
        }
    }

    /// Store without persistence.
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStorage::new())
    }

    /// Hydrate from storage. Later calls return the current snapshot unchanged.
    ///
    /// A malformed persisted session is treated as absent and removed.
    pub fn initialize(&self) -> Arc<SessionSnapshot> {
        let _guard = self.lock();
        let current = self.inner.state.load_full();
        if current.initialized {
            return current;
        }

        let session = match self.inner.storage.load() {
            Ok(session) => session,
            Err(SessionError::Malformed { message }) => {
                warn!(error = %message, "discarding malformed persisted session");
                if let Err(e) = self.inner.storage.clear() {
                    warn!(error = %e, "failed to remove malformed persisted session");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted session");
                None
            }
        };

        let authenticated = session.is_some();
        let next = Arc::new(SessionSnapshot {
            session: session.map(Arc::new),
            initialized: true,
            generation: current.generation + 1,
        });
        self.inner.state.store(Arc::clone(&next));
        debug!(authenticated, "session store initialized");
        self.publish(SessionEvent::Initialized { authenticated });
        next
    }

    /// Snapshot of the current state. Never blocks.
    pub fn current(&self) -> Arc<SessionSnapshot> {
        self.inner.state.load_full()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.current().credential().cloned()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.current().principal().cloned()
    }

    /// Persist and publish a new session.
    ///
    /// Nothing changes in memory when persisting fails.
    pub fn set_session(&self, principal: Principal, credential: Credential) -> SessionResult<()> {
        let session = Session::new(principal, credential);
        let _guard = self.lock();
        self.inner.storage.save(&session)?;

        let generation = self.inner.state.load().generation + 1;
        let principal = session.principal.clone();
        self.inner.state.store(Arc::new(SessionSnapshot {
            session: Some(Arc::new(session)),
            initialized: true,
            generation,
        }));
        info!(user_id = principal.id, role = %principal.role, "signed in");
        self.publish(SessionEvent::SignedIn(principal));
        Ok(())
    }

    /// Replace name and e-mail of the signed-in principal.
    ///
    /// Id, role and credential are kept as they are.
    pub fn update_principal(&self, updated: &Principal) -> SessionResult<Principal> {
        let _guard = self.lock();
        let current = self.inner.state.load_full();
        let Some(existing) = current.session() else {
            return Err(SessionError::NotSignedIn);
        };

        let mut session = existing.clone();
        session.principal.email = updated.email.clone();
        session.principal.first_name = updated.first_name.clone();
        session.principal.last_name = updated.last_name.clone();
        self.inner.storage.save(&session)?;

        let principal = session.principal.clone();
        self.inner.state.store(Arc::new(SessionSnapshot {
            session: Some(Arc::new(session)),
            initialized: true,
            generation: current.generation,
        }));
        debug!(user_id = principal.id, "session principal updated");
        self.publish(SessionEvent::Updated(principal.clone()));
        Ok(principal)
    }

    /// Sign out. The in-memory session is dropped even if removing the
    /// persisted copy fails; that failure is still returned.
    pub fn clear(&self) -> SessionResult<()> {
        let _guard = self.lock();
        let persisted = self.inner.storage.clear();
        self.drop_session();
        info!("signed out");
        self.publish(SessionEvent::SignedOut);
        persisted
    }

    /// Drop the session if it is still the one of `generation`.
    ///
    /// Returns `true` only for the call that actually removed it, so concurrent
    /// authentication failures against the same credential act once.
    pub fn expire(&self, generation: u64) -> bool {
        let _guard = self.lock();
        let current = self.inner.state.load();
        if current.generation != generation || current.session.is_none() {
            return false;
        }
        if let Err(e) = self.inner.storage.clear() {
            warn!(error = %e, "failed to remove expired persisted session");
        }
        self.drop_session();
        info!("session expired");
        self.publish(SessionEvent::Expired);
        true
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn drop_session(&self) {
        let generation = self.inner.state.load().generation + 1;
        self.inner.state.store(Arc::new(SessionSnapshot {
            session: None,
            initialized: true,
            generation,
        }));
    }

    fn publish(&self, event: SessionEvent) {
        // no receivers is fine
        let _ = self.inner.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
