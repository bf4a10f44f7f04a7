//! In-process [`Database`] implementation.

use std::{
    collections::{hash_map::Entry, HashMap},
    fmt,
    future::Future,
    hash::Hash,
    mem,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use common::operations::{By, Commit, Insert, Select, Transact, Update};
use derive_more::{Display, Error as StdError};
use tokio::sync::{
    MappedMutexGuard, Mutex, MutexGuard, OwnedRwLockWriteGuard, RwLock,
    RwLockReadGuard, RwLockWriteGuard,
};
use tracerr::Traced;

use crate::{
    domain::{
        contract, payment, renter, room, Contract, Payment, Renter, Room,
    },
    infra::{database, Database},
};

/// In-process [`Database`] keeping everything in memory.
///
/// Clones share the same [`State`]. Nothing outlives the process.
#[derive(Clone, Debug, Default)]
pub struct Memory<A = Shared>(A);

impl Memory {
    /// Creates a new empty [`Memory`] storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Contents of a [`Memory`] storage.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Room`]s.
    rooms: HashMap<room::Id, Room>,

    /// Stored [`Renter`]s.
    renters: HashMap<renter::Id, Renter>,

    /// Stored [`Contract`]s.
    contracts: HashMap<contract::Id, Contract>,

    /// Stored [`Payment`]s.
    payments: HashMap<payment::Id, Payment>,
}

/// Access to the [`State`] of a [`Memory`] storage.
pub trait Access {
    /// Guard of a read access.
    type Read<'a>: Deref<Target = State>
    where
        Self: 'a;

    /// Guard of a write access.
    type Write<'a>: DerefMut<Target = State>
    where
        Self: 'a;

    /// Acquires a read access to the [`State`].
    fn read(
        &self,
    ) -> impl Future<Output = Result<Self::Read<'_>, Traced<database::Error>>>;

    /// Acquires a write access to the [`State`].
    fn write(
        &self,
    ) -> impl Future<Output = Result<Self::Write<'_>, Traced<database::Error>>>;
}

/// Non-transactional [`Access`] shared between [`Memory`] clones.
#[derive(Clone, Debug, Default)]
pub struct Shared(Arc<RwLock<State>>);

impl Access for Shared {
    type Read<'a> = RwLockReadGuard<'a, State>;
    type Write<'a> = RwLockWriteGuard<'a, State>;

    async fn read(&self) -> Result<Self::Read<'_>, Traced<database::Error>> {
        Ok(self.0.read().await)
    }

    async fn write(&self) -> Result<Self::Write<'_>, Traced<database::Error>> {
        Ok(self.0.write().await)
    }
}

/// Transactional [`Access`] holding the [`Shared`] state exclusively until
/// it's [`Commit`]ted.
///
/// Dropping a [`Tx`] without a [`Commit`] rolls back all its changes.
#[derive(Debug)]
pub struct Tx {
    /// Exclusively held [`State`], released on [`Commit`].
    state: Mutex<Option<OwnedRwLockWriteGuard<State>>>,

    /// [`State`] as of the transaction start.
    backup: State,
}

impl Access for Tx {
    type Read<'a> = MappedMutexGuard<'a, State>;
    type Write<'a> = MappedMutexGuard<'a, State>;

    async fn read(&self) -> Result<Self::Read<'_>, Traced<database::Error>> {
        self.write().await
    }

    async fn write(&self) -> Result<Self::Write<'_>, Traced<database::Error>> {
        MutexGuard::try_map(self.state.lock().await, |s| s.as_deref_mut())
            .map_err(|_| {
                tracerr::new!(database::Error::from(Error::TxFinished))
            })
    }
}

impl Drop for Tx {
    fn drop(&mut self) {
        if let Some(mut state) = self.state.get_mut().take() {
            *state = mem::take(&mut self.backup);
        }
    }
}

/// Entity stored in a [`Memory`] storage.
pub trait Entity: Clone {
    /// Name of this [`Entity`] used in errors.
    const NAME: &'static str;

    /// Type of this [`Entity`] ID.
    type Id: Copy + Eq + Hash + fmt::Display;

    /// Returns ID of this [`Entity`].
    fn id(&self) -> Self::Id;

    /// Returns the table of this [`Entity`] in the provided [`State`].
    fn table(state: &State) -> &HashMap<Self::Id, Self>;

    /// Returns the mutable table of this [`Entity`] in the provided
    /// [`State`].
    fn table_mut(state: &mut State) -> &mut HashMap<Self::Id, Self>;
}

/// Implements [`Entity`] for the provided type stored in the provided
/// [`State`] field.
macro_rules! impl_entity {
    ($ty:ty, $id:ty, $table:ident) => {
        impl Entity for $ty {
            const NAME: &'static str = stringify!($ty);

            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn table(state: &State) -> &HashMap<Self::Id, Self> {
                &state.$table
            }

            fn table_mut(state: &mut State) -> &mut HashMap<Self::Id, Self> {
                &mut state.$table
            }
        }
    };
}

impl_entity!(Room, room::Id, rooms);
impl_entity!(Renter, renter::Id, renters);
impl_entity!(Contract, contract::Id, contracts);
impl_entity!(Payment, payment::Id, payments);

impl<A, T> Database<Insert<T>> for Memory<A>
where
    A: Access,
    T: Entity,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entity): Insert<T>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await.map_err(tracerr::wrap!())?;

        let id = entity.id();
        match T::table_mut(&mut state).entry(id) {
            Entry::Occupied(_) => Err(tracerr::new!(database::Error::from(
                Error::AlreadyExists(format!("{}(id: {id})", T::NAME)),
            ))),
            Entry::Vacant(e) => {
                _ = e.insert(entity);
                Ok(())
            }
        }
    }
}

impl<A, T> Database<Update<T>> for Memory<A>
where
    A: Access,
    T: Entity,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(entity): Update<T>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await.map_err(tracerr::wrap!())?;

        let id = entity.id();
        let Some(stored) = T::table_mut(&mut state).get_mut(&id) else {
            return Err(tracerr::new!(database::Error::from(
                Error::NotExists(format!("{}(id: {id})", T::NAME)),
            )));
        };
        *stored = entity;
        Ok(())
    }
}

impl<A, T> Database<Select<By<Option<T>, T::Id>>> for Memory<A>
where
    A: Access,
    T: Entity,
{
    type Ok = Option<T>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<T>, T::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await.map_err(tracerr::wrap!())?;

        Ok(T::table(&state).get(&by.into_inner()).cloned())
    }
}

impl<A> Database<Select<By<Vec<Payment>, contract::Id>>> for Memory<A>
where
    A: Access,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract_id = by.into_inner();
        let state = self.0.read().await.map_err(tracerr::wrap!())?;

        let mut payments = state
            .payments
            .values()
            .filter(|p| p.contract_id == contract_id)
            .cloned()
            .collect::<Vec<_>>();
        payments.sort_by_key(|p| (p.date, p.created_at));
        Ok(payments)
    }
}

impl<A> Database<Select<By<Vec<Contract>, Option<contract::Status>>>>
    for Memory<A>
where
    A: Access,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Option<contract::Status>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let status = by.into_inner();
        let state = self.0.read().await.map_err(tracerr::wrap!())?;

        let mut contracts = state
            .contracts
            .values()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect::<Vec<_>>();
        contracts.sort_by_key(|c| (c.created_at, c.start_date));
        Ok(contracts)
    }
}

impl Database<Transact> for Memory<Shared> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let state = Arc::clone(&self.0 .0).write_owned().await;
        let backup = State::clone(&state);

        Ok(Memory(Tx {
            state: Mutex::new(Some(state)),
            backup,
        }))
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.0
            .state
            .lock()
            .await
            .take()
            .map(drop)
            .ok_or_else(|| {
                tracerr::new!(database::Error::from(Error::TxFinished))
            })
    }
}

/// [`Memory`] storage error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// Entity with the same ID is stored already.
    #[display("`{_0}` already exists")]
    AlreadyExists(#[error(not(source))] String),

    /// Entity with the provided ID is not stored.
    #[display("`{_0}` does not exist")]
    NotExists(#[error(not(source))] String),

    /// Transaction is committed already.
    #[display("Transaction is committed already")]
    TxFinished,
}
