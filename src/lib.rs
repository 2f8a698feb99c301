//! Page behaviors for the park-booking site, run against a deterministic
//! in-memory browser model.
//!
//! The centerpiece is [`BookingDraftController`], which keeps the booking form
//! alive across a detour to the health & safety guidelines page and gates
//! submission on the acknowledgment checkbox. The remaining scripts
//! (contact-form validation, park gallery, parks carousel, anchor scrolling)
//! are mounted alongside it by [`site_scripts`].
//!
//! ```no_run
//! use park_booking_page::{Page, Result};
//!
//! fn run() -> Result<()> {
//!     let mut page = Page::builder(
//!         "https://parks.example/booking/new?health_safety_read=true",
//!         r#"<form id="bookingForm"><input id="health_safety" type="checkbox"></form>"#,
//!     )
//!     .site_scripts()
//!     .load()?;
//!     page.assert_checked("#health_safety", true)?;
//!     assert_eq!(page.url(), "https://parks.example/booking/new");
//!     Ok(())
//! }
//! ```

mod clock;
mod config;
mod dom;
mod event;
mod html;
mod location;
mod page;
mod scripts;
mod selector;
mod storage;
mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    BookingConfig, CarouselConfig, ContactConfig, GalleryConfig, NavigationConfig, PageConfig,
};
pub use dom::{Dom, NodeId};
pub use event::{Event, EventKind, PageScript, TimerId};
pub use location::{HistoryEntry, LocationHistory};
pub use page::{
    BrowserEnv, FormSubmission, LocationNavigation, LocationNavigationKind, Page, PageBuilder,
    PendingTimer, ScriptMount, ScrollRequest,
};
pub use scripts::booking::{BookingDraft, BookingDraftController, BookingElements, DraftSlot};
pub use scripts::carousel::CarouselController;
pub use scripts::contact::{ContactField, ContactFieldError, ContactFormController};
pub use scripts::gallery::GalleryController;
pub use scripts::navigation::AnchorScroller;
pub use scripts::site_scripts;
pub use storage::{KeyValueStore, MemoryStorage, StorageHandle, StorageSlot};
pub use window::BrowserTab;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("script runtime error: {0}")]
    ScriptRuntime(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },
}
