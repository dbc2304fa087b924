//! Logging macros that forward to `defmt` on embedded builds and to `log` everywhere else.
//!
//! Arguments are limited to integers and `&str` so both back ends accept the same call sites.
#![allow(unused_macros, reason = "not every level is used in every build")]

#[cfg(all(feature = "defmt", not(feature = "host")))]
macro_rules! trace {
    ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
}
#[cfg(not(all(feature = "defmt", not(feature = "host"))))]
macro_rules! trace {
    ($($arg:tt)*) => { ::log::trace!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "host")))]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}
#[cfg(not(all(feature = "defmt", not(feature = "host"))))]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "host")))]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}
#[cfg(not(all(feature = "defmt", not(feature = "host"))))]
macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "host")))]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}
#[cfg(not(all(feature = "defmt", not(feature = "host"))))]
macro_rules! warn {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "host")))]
macro_rules! error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}
#[cfg(not(all(feature = "defmt", not(feature = "host"))))]
macro_rules! error {
    ($($arg:tt)*) => { ::log::error!($($arg)*) };
}
