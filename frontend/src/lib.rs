//! Client side of the podcast generator.
//!
//! [`PodcastFlow`] drives one generation at a time against a [`PodcastApi`],
//! keeping settings and the history of finished podcasts in a [`LocalStore`].

pub mod api;
pub mod flow;
pub mod notify;
pub mod store;

pub use api::{ApiError, HttpPodcastApi, PodcastApi};
pub use flow::{FlowError, FlowState, PodcastFlow};
pub use notify::{LogNotifier, NoticeLevel, Notifier};
pub use store::{LocalStore, StoreError};
