//! Platform-specific adapter fetcher implementations.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `GetAdaptersAddresses` API via the `windows` crate.
//! - **Linux**: Uses `getifaddrs` via `libc`, plus sysfs for MTU and kind.
//! - **Other targets**: [`PlatformFetcher`] reports
//!   [`FetchError::Unsupported`](super::FetchError::Unsupported); use a
//!   snapshot file instead.

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::WindowsFetcher;

#[cfg(windows)]
pub use windows::WindowsFetcher as PlatformFetcher;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxFetcher;

#[cfg(target_os = "linux")]
pub use linux::LinuxFetcher as PlatformFetcher;

#[cfg(not(any(windows, target_os = "linux")))]
pub use unsupported::UnsupportedFetcher as PlatformFetcher;

#[cfg(not(any(windows, target_os = "linux")))]
mod unsupported {
    use crate::network::{AdapterFetcher, FetchError, RawAdapter};

    /// Fallback fetcher for targets without native enumeration.
    #[derive(Debug, Clone, Default)]
    pub struct UnsupportedFetcher;

    impl UnsupportedFetcher {
        /// Creates the fallback fetcher.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl AdapterFetcher for UnsupportedFetcher {
        fn fetch(&self) -> Result<Vec<RawAdapter>, FetchError> {
            Err(FetchError::Unsupported)
        }
    }
}
