//! Named-parameter store the projections read their settings from.

use heapless::{LinearMap, String};
use serde::{Deserialize, Serialize};

use crate::{Coord3D, Error, Result};

/// Longest parameter name a [`ParamMap`] accepts.
pub const PARAM_NAME_LEN: usize = 24;

/// Synchronous, always-available lookup of small named parameters.
///
/// `None` means "not set"; callers substitute their default.
pub trait ParamStore {
    /// Integer parameter.
    fn int(&self, name: &str) -> Option<i32>;
    /// Boolean parameter.
    fn boolean(&self, name: &str) -> Option<bool>;
    /// 3-vector parameter.
    fn coord(&self, name: &str) -> Option<Coord3D>;
}

/// Value held by a [`ParamMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Integer.
    Int(i32),
    /// Boolean.
    Bool(bool),
    /// 3-vector.
    Coord(Coord3D),
}

/// Fixed-capacity in-memory [`ParamStore`].
///
/// # Example
///
/// ```rust
/// use led_fixture::config::{ParamMap, ParamStore, ParamValue};
///
/// let mut params = ParamMap::<8>::new();
/// params.set("petals", ParamValue::Int(6))?;
/// assert_eq!(params.int("petals"), Some(6));
/// assert_eq!(params.boolean("petals"), None);
/// # Ok::<(), led_fixture::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamMap<const N: usize> {
    values: LinearMap<String<PARAM_NAME_LEN>, ParamValue, N>,
}

impl<const N: usize> ParamMap<N> {
    /// Empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: LinearMap::new(),
        }
    }

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParamCapacity`] if the map is full or the name is too long.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<()> {
        let key = String::try_from(name).map_err(|()| Error::ParamCapacity)?;
        self.values.insert(key, value).map_err(|_| Error::ParamCapacity)?;
        Ok(())
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let key = String::<PARAM_NAME_LEN>::try_from(name).ok()?;
        self.values.remove(&key)
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.iter().find(|(key, _)| key.as_str() == name).map(|(_, value)| *value)
    }
}

impl<const N: usize> ParamStore for ParamMap<N> {
    fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            ParamValue::Int(value) => Some(value),
            _ => None,
        }
    }

    fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn coord(&self, name: &str) -> Option<Coord3D> {
        match self.get(name)? {
            ParamValue::Coord(value) => Some(value),
            _ => None,
        }
    }
}
